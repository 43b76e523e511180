// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase driver: `create` (spec §4.2). Tries each submission template in
//! turn, falling back from `guaranteedCapped` to `bestEffort` only on a
//! path-finding failure; on terminal success, fetches the manifest and
//! validation report and (unless `ignoreping`) collects ping results.

use super::{fetch_manifest_and_validation, poll};
use crate::error::EngineError;
use crate::pair_run::{PairRun, PhasePing};
use crate::{ping, templates as intent_templates};
use endtoend_core::{Clock, Config, Phase, RequestType, SubmissionTemplate};
use endtoend_orchestrator_client::{Operate, OrchestratorClient, OrchestratorError};
use endtoend_probe_client::ProbeClient;

fn ipv6_prefix_for<'a>(config: &'a Config, urn: &str) -> Option<&'a str> {
    config.entries.as_ref()?.get(urn)?.ipv6_prefix.as_deref()
}

/// The templates attempted, in order, for one `create` phase (spec
/// §4.2: `submissiontemplate` pins a single template family; otherwise
/// the default `guaranteedCapped` → `bestEffort` fallback order runs).
fn template_order(config: &Config) -> Vec<RequestType> {
    match config.submissiontemplate {
        Some(SubmissionTemplate::Nettest) => vec![RequestType::Nettest],
        Some(SubmissionTemplate::L3Request) => vec![RequestType::L3Request],
        None => intent_templates::DEFAULT_TEMPLATE_ORDER.to_vec(),
    }
}

/// True when a `PathInfeasible` error on this template should trigger a
/// fallback to the next one (spec §4.2: "not applied for
/// `nettest`/`l3_request`").
fn retries_on_path_infeasible(request_type: RequestType, has_next: bool) -> bool {
    has_next && matches!(request_type, RequestType::GuaranteedCapped)
}

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
    let templates = template_order(config);

    for (i, request_type) in templates.iter().copied().enumerate() {
        let has_next = i + 1 < templates.len();
        run.request_type = request_type;

        let intent = intent_templates::build_intent(
            request_type,
            &run.pair.port1,
            &run.pair.port2,
            &run.pair.vlan,
            ipv6_prefix_for(config, &run.pair.port1),
            ipv6_prefix_for(config, &run.pair.port2),
        );

        let _minted = orchestrator.instance_new().await?;
        let created = match orchestrator.instance_create(intent.clone()).await {
            Ok(response) => response,
            Err(OrchestratorError::PathInfeasible) if retries_on_path_infeasible(request_type, has_next) => {
                run.pathfindissue = true;
                tracing::warn!(%request_type, "create: no feasible path, falling back to next template");
                continue;
            }
            Err(err) => {
                run.phase_errors_mut(Phase::Create).error = err.to_string();
                return Err(err.into());
            }
        };
        let si_uuid = created.service_uuid;

        if let Err(err) = orchestrator.instance_operate(Operate::Provision, &si_uuid, true, false, false).await {
            match err {
                OrchestratorError::PathInfeasible if retries_on_path_infeasible(request_type, has_next) => {
                    run.pathfindissue = true;
                    let _ = orchestrator.instance_delete(&si_uuid).await;
                    tracing::warn!(%request_type, "create: no feasible path at provision, falling back");
                    continue;
                }
                other => {
                    run.phase_errors_mut(Phase::Create).error = other.to_string();
                    return Err(other.into());
                }
            }
        }

        run.instance_id = Some(si_uuid.clone());
        run.submitted_intent = Some(intent);

        match poll::poll_until_terminal(
            orchestrator,
            clock,
            &si_uuid,
            Phase::Create,
            config.timeouts.create,
            "CREATE - READY",
            "CREATE - FAILED",
            run,
        )
        .await
        {
            Ok(()) => {
                run.pathfindissue = false;
                fetch_manifest_and_validation(orchestrator, config, Phase::Create, run, &si_uuid).await;
                if !config.ignoreping {
                    if let Some(manifest) = run.manifest.clone() {
                        let (outcomes, submit_errors) =
                            ping::run_pings(probe, clock, &config.ping, &manifest, &run.site1).await;
                        for err in submit_errors {
                            tracing::warn!(phase = %Phase::Create, "ping submission failed: {err}");
                        }
                        run.pings.extend(outcomes.into_iter().map(|outcome| PhasePing { phase: Phase::Create, outcome }));
                    }
                }
                return Ok(());
            }
            Err(EngineError::Orchestrator(OrchestratorError::PathInfeasible)) if retries_on_path_infeasible(request_type, has_next) => {
                run.pathfindissue = true;
                let _ = orchestrator.instance_delete(&si_uuid).await;
                tracing::warn!(%request_type, "create: no feasible path while polling, falling back");
                continue;
            }
            Err(err) => {
                run.phase_errors_mut(Phase::Create).error = err.to_string();
                return Err(err);
            }
        }
    }

    Err(EngineError::Other("create: all submission templates exhausted".to_string()))
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
