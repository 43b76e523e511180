// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared status-polling loop used by every phase driver (spec §4.2's
//! `create`/`cancel`/`reprovision`/`modify` drivers all poll the same
//! way: adaptive back-off, wall-clock deadline from phase entry,
//! terminal-success/terminal-failure detection). Kept in one place so
//! "the progressive sleep `⌊i/15⌋+1` is intentional" (spec §9 REDESIGN
//! FLAGS) only needs to be gotten right once.

use crate::error::EngineError;
use crate::pair_run::PairRun;
use endtoend_core::{Clock, ConfigState, Phase};
use endtoend_orchestrator_client::OrchestratorClient;
use std::str::FromStr;
use std::time::Duration;

/// Poll `instance_get_status_verbose` until `ready_state`/`STABLE` is
/// observed, `failed_state` is observed, or `timeout` seconds have
/// elapsed since this call started — whichever comes first (spec §4.2,
/// §9 "deadline is wall-clock from phase entry, not a countdown
/// decremented on every poll"). Every observed transition is recorded on
/// `run` regardless of outcome, so a timed-out or failed phase still
/// carries its full observation history into the analyzer (spec §4.3).
pub async fn poll_until_terminal<O: OrchestratorClient, C: Clock>(
    client: &O,
    clock: &C,
    si_uuid: &str,
    phase: Phase,
    timeout: i64,
    ready_state: &str,
    failed_state: &str,
    run: &mut PairRun,
) -> Result<(), EngineError> {
    let entry = clock.now_utc();
    let deadline = entry + timeout;
    let mut iteration: i64 = 0;

    loop {
        let status = client.instance_get_status_verbose(si_uuid).await?;
        let entertime = clock.now_utc();
        let configstate = ConfigState::from_str(&status.config_state).unwrap_or(ConfigState::Unknown);
        run.record_transition(phase, &status.state, configstate, entertime);
        tracing::debug!(%phase, state = %status.state, configstate = %status.config_state, "poll");

        if status.state == ready_state && configstate == ConfigState::Stable {
            tracing::info!(%phase, state = %status.state, "terminal success");
            return Ok(());
        }
        if status.state == failed_state {
            return Err(EngineError::PhaseFailed { phase: phase.as_str(), state: status.state });
        }
        if entertime >= deadline {
            return Err(EngineError::PhaseTimeout { phase: phase.as_str(), elapsed: entertime - entry, limit: timeout });
        }

        let sleep_secs = (iteration / 15 + 1).max(0) as u64;
        tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
        iteration += 1;
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
