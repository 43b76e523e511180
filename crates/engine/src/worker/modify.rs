// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase driver: `modify` / `modifycreate` (spec §4.2). Only
//! `guaranteedCapped` requests are eligible; ineligible intents are a
//! distinct, non-error outcome (spec §9a). `modifycreate` halves
//! `bandwidth.capacity`, the following `modify` doubles it back,
//! netting zero change to the pair over its full lifecycle.

use super::{fetch_manifest_and_validation, poll};
use crate::error::EngineError;
use crate::pair_run::{ModifyOutcome, PairRun, PhasePing};
use crate::ping;
use crate::templates::{apply_bandwidth_action, BandwidthAction};
use endtoend_core::{Clock, Config, Phase};
use endtoend_orchestrator_client::OrchestratorClient;
use endtoend_probe_client::ProbeClient;

fn bandwidth_action_for(phase: Phase) -> BandwidthAction {
    match phase {
        Phase::Modifycreate => BandwidthAction::Division,
        Phase::Modify => BandwidthAction::Multiply,
        other => unreachable!("modify phase driver invoked with {other}"),
    }
}

pub async fn drive<O, P, C>(
    orchestrator: &O,
    probe: &P,
    phase: Phase,
    clock: &C,
    config: &Config,
    run: &mut PairRun,
) -> Result<(), EngineError>
where
    O: OrchestratorClient,
    P: ProbeClient,
    C: Clock,
{
    if !run.request_type.modify_eligible() {
        run.modify_outcome = Some(ModifyOutcome::Skipped);
        return Ok(());
    }

    let si_uuid = run
        .instance_id
        .clone()
        .ok_or_else(|| EngineError::Other(format!("{phase}: no instance id")))?;

    let mut intent = run
        .submitted_intent
        .clone()
        .ok_or_else(|| EngineError::Other(format!("{phase}: no submitted intent to modify")))?;
    apply_bandwidth_action(&mut intent, bandwidth_action_for(phase));

    if let Err(err) = orchestrator.instance_modify(intent.clone(), &si_uuid).await {
        run.phase_errors_mut(phase).error = err.to_string();
        return Err(err.into());
    }

    poll::poll_until_terminal(
        orchestrator,
        clock,
        &si_uuid,
        phase,
        config.timeouts.modify,
        "MODIFY - READY",
        "MODIFY - FAILED",
        run,
    )
    .await
    .map_err(|err| {
        run.phase_errors_mut(phase).error = err.to_string();
        err
    })?;

    run.submitted_intent = Some(intent);
    run.modify_outcome = Some(ModifyOutcome::Applied);

    fetch_manifest_and_validation(orchestrator, config, phase, run, &si_uuid).await;
    if !config.ignoreping {
        if let Some(manifest) = run.manifest.clone() {
            let (outcomes, submit_errors) = ping::run_pings(probe, clock, &config.ping, &manifest, &run.site1).await;
            for err in submit_errors {
                tracing::warn!(%phase, "ping submission failed: {err}");
            }
            run.pings.extend(outcomes.into_iter().map(|outcome| PhasePing { phase, outcome }));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "modify_tests.rs"]
mod tests;
