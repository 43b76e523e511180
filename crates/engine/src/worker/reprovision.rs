// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase driver: `reprovision` (spec §4.2). Reinstates an instance that
//! `cancelrep` left cancelled-but-present, then re-collects manifest,
//! validation, and (unless `ignoreping`) pings exactly as `create` does
//! on its own terminal success.

use super::{fetch_manifest_and_validation, poll};
use crate::error::EngineError;
use crate::pair_run::{PairRun, PhasePing};
use crate::ping;
use endtoend_core::{Clock, Config, Phase};
use endtoend_orchestrator_client::{Operate, OrchestratorClient};
use endtoend_probe_client::ProbeClient;

pub async fn drive<O, P, C>(
    orchestrator: &O,
    probe: &P,
    clock: &C,
    config: &Config,
    run: &mut PairRun,
) -> Result<(), EngineError>
where
    O: OrchestratorClient,
    P: ProbeClient,
    C: Clock,
{
    let si_uuid = run
        .instance_id
        .clone()
        .ok_or_else(|| EngineError::Other("reprovision: no instance id".to_string()))?;

    let status = orchestrator.instance_get_status(&si_uuid).await.map_err(|err| {
        run.phase_errors_mut(Phase::Reprovision).error = err.to_string();
        EngineError::from(err)
    })?;

    if !status.contains("CANCEL") {
        let err = EngineError::CannotReprovision(status.raw.clone());
        run.phase_errors_mut(Phase::Reprovision).error = err.to_string();
        return Err(err);
    }

    if let Err(err) = orchestrator.instance_operate(Operate::Reprovision, &si_uuid, false, false, false).await {
        run.phase_errors_mut(Phase::Reprovision).error = err.to_string();
        return Err(err.into());
    }

    poll::poll_until_terminal(
        orchestrator,
        clock,
        &si_uuid,
        Phase::Reprovision,
        config.timeouts.reprovision,
        "REINSTATE - READY",
        "REINSTATE - FAILED",
        run,
    )
    .await
    .map_err(|err| {
        run.phase_errors_mut(Phase::Reprovision).error = err.to_string();
        err
    })?;

    fetch_manifest_and_validation(orchestrator, config, Phase::Reprovision, run, &si_uuid).await;
    if !config.ignoreping {
        if let Some(manifest) = run.manifest.clone() {
            let (outcomes, submit_errors) = ping::run_pings(probe, clock, &config.ping, &manifest, &run.site1).await;
            for err in submit_errors {
                tracing::warn!(phase = %Phase::Reprovision, "ping submission failed: {err}");
            }
            run.pings.extend(outcomes.into_iter().map(|outcome| PhasePing { phase: Phase::Reprovision, outcome }));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "reprovision_tests.rs"]
mod tests;
