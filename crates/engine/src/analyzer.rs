// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-transition analyzer (spec §4.3): turns the flat list of
//! observed `(phase, state, configstate, entertime)` transitions
//! recorded while polling into `RequestState` rows with `totaltime`
//! (dwell in the previous canonical state) and `sincestart` filled in.

use crate::pair_run::ObservedTransition;
use endtoend_core::{state_order_sequence, RequestState, RequestUuid};

/// Walk the canonical `StateOrder` sequence, matching each step against
/// the observed list in order (spec §4.3 step 2); anything left over at
/// the end is unmatched and appended with `totaltime = 0` (step 3).
pub fn analyze(request_uuid: RequestUuid, observations: &[ObservedTransition]) -> Vec<RequestState> {
    let mut remaining: Vec<ObservedTransition> = observations.to_vec();
    let mut output: Vec<RequestState> = Vec::new();
    let mut last_timestamp: Option<i64> = None;
    let mut first_timestamp: Option<i64> = None;

    for entry in state_order_sequence() {
        let Some(pos) = remaining
            .iter()
            .position(|o| o.phase == entry.phase && o.state == entry.state && o.configstate == entry.configstate)
        else {
            continue;
        };
        let obs = remaining.remove(pos);
        let first = *first_timestamp.get_or_insert(obs.entertime);

        if let Some(last) = last_timestamp {
            let dwell = obs.entertime - last;
            if let Some(prev) = output.last_mut() {
                prev.totaltime = dwell;
            }
        }
        last_timestamp = Some(obs.entertime);

        output.push(RequestState {
            request_uuid,
            phase: obs.phase,
            state: obs.state,
            configstate: obs.configstate,
            entertime: obs.entertime,
            totaltime: 0,
            sincestart: obs.entertime - first,
        });
    }

    for obs in remaining {
        tracing::warn!(phase = %obs.phase, state = %obs.state, "unmatched state transition, appending with totaltime=0");
        let first = *first_timestamp.get_or_insert(obs.entertime);
        output.push(RequestState {
            request_uuid,
            phase: obs.phase,
            state: obs.state,
            configstate: obs.configstate,
            entertime: obs.entertime,
            totaltime: 0,
            sincestart: obs.entertime - first,
        });
    }

    output
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
