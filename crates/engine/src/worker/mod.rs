// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker pool and per-pair phase drivers (spec §4.2): the CORE of this
//! crate. A [`PairRun`](crate::pair_run::PairRun) is constructed fresh
//! at the start of [`Engine::run`] and threaded by `&mut` reference
//! through each phase driver; a worker holds only its configuration, its
//! id, and a handle to the shared queue — no phase driver reads or
//! writes state held on the worker itself (spec §4.2, §9 REDESIGN
//! FLAGS).

mod cancel;
mod create;
mod modify;
mod poll;
pub mod pool;
mod reprovision;

use crate::enumerator::PairCandidate;
use crate::error::EngineError;
use crate::pair_run::PairRun;
use endtoend_core::{Clock, Config, Phase, RequestType};
use endtoend_orchestrator_client::OrchestratorClient;
use endtoend_probe_client::ProbeClient;
use endtoend_storage::{ArtifactError, ArtifactPaths};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use pool::WorkQueue;

/// Retry a fallible async operation up to `retries` additional times,
/// sleeping `sleep_secs` between attempts (spec §7: "retry up to
/// `httpretries.retries` with fixed back-off; on exhaustion, store the
/// error text in the result and continue").
pub(crate) async fn retry_with_backoff<T, E, F, Fut>(retries: u32, sleep_secs: u64, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= retries {
                    return Err(err);
                }
                tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
                attempt += 1;
            }
        }
    }
}

/// Fetch the manifest and validation report for a just-activated
/// instance (spec §4.2's shared create/reprovision post-success step).
/// A transient failure on either call is recorded into `run`'s
/// per-phase error fields rather than failing the phase (spec §7).
pub(crate) async fn fetch_manifest_and_validation<O: OrchestratorClient>(
    client: &O,
    config: &Config,
    phase: Phase,
    run: &mut PairRun,
    si_uuid: &str,
) {
    let manifest = retry_with_backoff(config.httpretries.retries, config.httpretries.timeout, || {
        client.manifest_create(endtoend_orchestrator_client::templates::port_host_template())
    })
    .await;
    match manifest {
        Ok(manifest) => run.manifest = Some(manifest),
        Err(err) => run.phase_errors_mut(phase).manifest_error = err.to_string(),
    }

    let validation = retry_with_backoff(config.httpretries.retries, config.httpretries.timeout, || {
        client.instance_verify(si_uuid)
    })
    .await;
    match validation {
        Ok(report) => {
            run.validation = Some(report);
            run.validation_phase = Some(phase);
        }
        Err(err) => run.phase_errors_mut(phase).validation_error = err.to_string(),
    }
}

/// The three external collaborators + shared config a worker needs to
/// drive one pair's lifecycle (spec §4.2's `Engine<O, P, C>` generic
/// structure, retained from the teacher's own `Runtime<S, A, N, C>`
/// adapter-generic pattern while the effect-queue machinery it used is
/// shed — phases here are strictly serialised, not effect-driven).
#[derive(Clone)]
pub struct Engine<O, P, C> {
    pub orchestrator: O,
    pub probe: P,
    pub clock: C,
    pub config: Arc<Config>,
}

impl<O, P, C> Engine<O, P, C>
where
    O: OrchestratorClient,
    P: ProbeClient,
    C: Clock,
{
    pub fn new(orchestrator: O, probe: P, clock: C, config: Arc<Config>) -> Self {
        Self { orchestrator, probe, clock, config }
    }

    /// Drive one `(urn_a, urn_b, vlan)` triple through its configured
    /// phase sequence (spec §4.2's "Per-triple procedure (`run`)").
    ///
    /// Returns `Ok(None)` when the pair was skipped because an artifact
    /// already exists for it, `Ok(Some(run))` once a result has been
    /// written, or `Err` only for I/O failures on the artifact itself —
    /// a phase-level failure is always captured inside the returned
    /// `PairRun`, never propagated as an `Err` (spec §4.2/§7a: "a worker
    /// never raises out of its `run`").
    pub async fn run(
        &self,
        worker_id: &str,
        candidate: &PairCandidate,
    ) -> Result<Option<PairRun>, ArtifactError> {
        let paths = ArtifactPaths::new(&self.config.workdir, &candidate.pair);
        if paths.any_exists() {
            tracing::debug!(stem = %candidate.pair.stem(), "skipping: artifact already present");
            return Ok(None);
        }

        match paths.acquire_lock(worker_id, self.clock.now_utc()) {
            Ok(()) => {}
            Err(ArtifactError::AlreadyPresent) => return Ok(None),
            Err(err) => return Err(err),
        }

        let mut run = PairRun::new(
            candidate.pair.clone(),
            candidate.site1.clone(),
            candidate.site2.clone(),
            RequestType::GuaranteedCapped,
            self.clock.now_utc(),
        );

        let span = tracing::info_span!("pair_run", stem = %run.pair.stem());
        let _enter = span.enter();

        self.drive_phases(&mut run).await;

        let contents = serde_json::to_vec_pretty(&run).unwrap_or_else(|err| {
            tracing::error!(%err, "failed to serialize pair run, writing empty object");
            b"{}".to_vec()
        });
        paths.finish(&contents)?;

        Ok(Some(run))
    }

    /// Phase sequencing + recovery branch (spec §4.2 steps 3–4).
    async fn drive_phases(&self, run: &mut PairRun) {
        if let Err(err) = create::drive(&self.orchestrator, &self.probe, &self.clock, &self.config, run).await {
            tracing::warn!(%err, "create phase failed, entering recovery");
            self.recover(run).await;
            return;
        }

        if self.config.modifycreate {
            if let Err(err) =
                modify::drive(&self.orchestrator, &self.probe, Phase::Modifycreate, &self.clock, &self.config, run).await
            {
                tracing::warn!(%err, "modifycreate phase failed, entering recovery");
                self.recover(run).await;
                return;
            }
        }

        if self.config.reprovision {
            if let Err(err) = cancel::drive(&self.orchestrator, Phase::Cancelrep, &self.clock, &self.config, run).await {
                tracing::warn!(%err, "cancelrep phase failed, entering recovery");
                self.recover(run).await;
                return;
            }
            if let Err(err) =
                reprovision::drive(&self.orchestrator, &self.probe, &self.clock, &self.config, run).await
            {
                tracing::warn!(%err, "reprovision phase failed, entering recovery");
                self.recover(run).await;
                return;
            }
        }

        if self.config.modify {
            if let Err(err) =
                modify::drive(&self.orchestrator, &self.probe, Phase::Modify, &self.clock, &self.config, run).await
            {
                tracing::warn!(%err, "modify phase failed, entering recovery");
                self.recover(run).await;
                return;
            }
        }

        if let Err(err) = cancel::drive(&self.orchestrator, Phase::Cancel, &self.clock, &self.config, run).await {
            tracing::warn!(%err, "cancel phase failed, entering recovery");
            self.recover(run).await;
            return;
        }

        run.cancelled = true;
        run.finalstate = true;
    }

    /// Recovery branch (spec §4.2 step 4): if the instance was not
    /// already cancelled, issue `cancelarch` when `archive_if_failure`
    /// is enabled; otherwise leave the instance for manual review (the
    /// recorder will detect it as "locked").
    async fn recover(&self, run: &mut PairRun) {
        if run.cancelled {
            return;
        }
        if !self.config.archive_if_failure {
            tracing::warn!("recovery: archive_if_failure disabled, leaving instance for manual review");
            return;
        }
        if let Err(err) = cancel::drive(&self.orchestrator, Phase::Cancelarch, &self.clock, &self.config, run).await {
            tracing::warn!(%err, "cancelarch recovery attempt also failed");
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
