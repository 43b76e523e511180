// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase driver: `cancel` / `cancelrep` / `cancelarch` (spec §4.2). All
//! three share the same pre-status check and `force` computation (spec
//! §9a, "cancelrep force symmetry" resolved yes); they differ only in
//! the post-success action.

use super::poll;
use crate::error::EngineError;
use crate::pair_run::PairRun;
use endtoend_core::{Clock, Config, Phase};
use endtoend_orchestrator_client::{Operate, OrchestratorClient};

const PRE_CANCEL_SUBSTRINGS: [&str; 3] = ["CREATE", "REINSTATE", "MODIFY"];

fn timeout_for(config: &Config, phase: Phase) -> i64 {
    match phase {
        Phase::Cancelrep | Phase::Cancelarch | Phase::Cancel => config.timeouts.cancel,
        _ => config.timeouts.cancel,
    }
}

pub async fn drive<O, C>(
    orchestrator: &O,
    phase: Phase,
    clock: &C,
    config: &Config,
    run: &mut PairRun,
) -> Result<(), EngineError>
where
    O: OrchestratorClient,
    C: Clock,
{
    debug_assert!(phase.is_cancel_family());

    let si_uuid = run
        .instance_id
        .clone()
        .ok_or_else(|| EngineError::Other(format!("{phase}: no instance id to cancel")))?;

    let status = orchestrator.instance_get_status(&si_uuid).await.map_err(|err| {
        run.phase_errors_mut(phase).error = err.to_string();
        EngineError::from(err)
    })?;

    if !PRE_CANCEL_SUBSTRINGS.iter().any(|needle| status.contains(needle)) {
        let err = EngineError::CannotCancel(status.raw.clone());
        run.phase_errors_mut(phase).error = err.to_string();
        return Err(err);
    }

    let force = !status.contains("READY");
    if let Err(err) = orchestrator.instance_operate(Operate::Cancel, &si_uuid, true, false, force).await {
        run.phase_errors_mut(phase).error = err.to_string();
        return Err(err.into());
    }

    poll::poll_until_terminal(
        orchestrator,
        clock,
        &si_uuid,
        phase,
        timeout_for(config, phase),
        "CANCEL - READY",
        "CANCEL - FAILED",
        run,
    )
    .await
    .map_err(|err| {
        run.phase_errors_mut(phase).error = err.to_string();
        err
    })?;

    match phase {
        Phase::Cancel => {
            // Delete/archive must never be requested simultaneously (spec
            // §4.2); the plain `cancel` phase never deletes on its own —
            // disposition of the instance afterward belongs entirely to
            // the archiver's decision table (spec §4.6), which this flag
            // feeds as a fallback safety net.
            run.cancel_finalstate = Some("OKARCHIVE".to_string());
        }
        Phase::Cancelarch => {
            if let Err(err) = orchestrator.instance_archive(&si_uuid).await {
                run.phase_errors_mut(phase).error = err.to_string();
                return Err(err.into());
            }
            if let Err(err) = orchestrator.instance_delete(&si_uuid).await {
                run.phase_errors_mut(phase).error = err.to_string();
                return Err(err.into());
            }
        }
        Phase::Cancelrep => {
            // No deletion: the instance must remain reusable by the
            // following `reprovision` phase (spec §4.2).
        }
        _ => unreachable!("cancel-family phase driver invoked with non-cancel phase"),
    }

    Ok(())
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
