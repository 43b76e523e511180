// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derives normalized table rows from one parsed `PairRun` artifact
//! (spec §4.7). Pure functions: no I/O, no database access — the
//! scanner calls these once per artifact and hands the results to
//! `endtoend-db`.

use endtoend_core::{Action, Phase, PingResult, Request, RequestState, RequestUuid, Verification, VerificationUuid};
use endtoend_engine::PairRun;
use std::collections::HashMap;
use tracing::debug;

/// Build the `Request` row for one artifact (spec §4.7: `failure` text
/// assembled by [`PairRun::failure_text`]; `finalstate`/`pathfindissue`
/// copied straight off the run since the phase drivers are the only
/// code that sets them).
pub fn derive_request(pair_run: &PairRun, uuid: RequestUuid, fileloc: &str, updatedate: i64) -> Request {
    Request {
        uuid,
        port1: pair_run.pair.port1.clone(),
        port2: pair_run.pair.port2.clone(),
        vlan: pair_run.pair.vlan.clone(),
        site1: pair_run.site1.clone(),
        site2: pair_run.site2.clone(),
        request_type: pair_run.request_type,
        finalstate: pair_run.finalstate,
        pathfindissue: pair_run.pathfindissue,
        failure: pair_run.failure_text(),
        fileloc: fileloc.to_string(),
        insertdate: pair_run.insertdate,
        updatedate,
    }
}

/// One `Action` row per phase observed, keyed by that phase's earliest
/// `entertime` (spec §4.7: "one Action row per timing key").
pub fn derive_actions(request_uuid: RequestUuid, pair_run: &PairRun) -> Vec<Action> {
    let mut starts: HashMap<Phase, i64> = HashMap::new();
    for observation in &pair_run.observations {
        starts
            .entry(observation.phase)
            .and_modify(|t| *t = (*t).min(observation.entertime))
            .or_insert(observation.entertime);
    }
    Phase::ALL
        .into_iter()
        .filter_map(|phase| starts.get(&phase).map(|&starttime| Action::new(request_uuid, phase, starttime)))
        .collect()
}

/// Run the state-transition analyzer (spec §4.3) over the observed
/// transitions to produce the `requeststates` rows.
pub fn derive_request_states(request_uuid: RequestUuid, pair_run: &PairRun) -> Vec<RequestState> {
    endtoend_engine::analyze(request_uuid, &pair_run.observations)
}

/// Longest-prefix match of `urn` against the `mappings` configuration
/// table (spec §4.7: "Site attribution for verification"). Returns
/// `None` when no prefix matches, which the caller logs and skips.
pub fn attribute_site<'a>(urn: &str, mappings: &'a HashMap<String, String>) -> Option<&'a str> {
    mappings
        .iter()
        .filter(|(prefix, _)| urn.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, site)| site.as_str())
}

/// One `Verification` row per validation-report entry, attributed to a
/// site via [`attribute_site`]; entries whose URN matches no configured
/// prefix are logged and dropped (spec §4.7).
pub fn derive_verifications(
    request_uuid: RequestUuid,
    pair_run: &PairRun,
    mappings: &HashMap<String, String>,
) -> Vec<Verification> {
    let Some(validation) = &pair_run.validation else { return Vec::new() };
    let Some(phase) = pair_run.validation_phase else { return Vec::new() };

    let mut rows = Vec::new();
    for (entry, verified) in validation.entries() {
        match attribute_site(&entry.urn, mappings) {
            Some(site) => rows.push(Verification {
                uuid: VerificationUuid::new(),
                request_uuid,
                phase,
                site: site.to_string(),
                urn: entry.urn.clone(),
                netstatus: entry.netstatus.clone(),
                verified,
            }),
            None => debug!(urn = %entry.urn, "no site mapping for verification urn, skipping"),
        }
    }
    rows
}

/// One `PingResult` row per ping recorded against a
/// [`Phase::records_pings`]-true phase (spec §4.7: cancel-family phases
/// never record pings, but the filter is defensive here too).
pub fn derive_ping_results(request_uuid: RequestUuid, pair_run: &PairRun) -> Vec<PingResult> {
    pair_run
        .pings
        .iter()
        .filter(|p| p.phase.records_pings())
        .map(|p| {
            let outcome = &p.outcome;
            PingResult {
                uuid: endtoend_core::PingResultUuid::new(),
                request_uuid,
                phase: p.phase,
                ipfrom: outcome.ipfrom.clone(),
                ipto: outcome.ipto.clone(),
                vlanfrom: outcome.vlanfrom.clone(),
                vlanto: outcome.vlanto.clone(),
                transmitted: outcome.transmitted,
                received: outcome.received,
                packetloss: outcome.packetloss,
                rtt: outcome.rtt,
                failed: outcome.failed,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
