// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One outer-loop round (spec §4.1/§5, `tester.py::main`): wait out the
//! pause sentinel, enumerate this round's pairs, drain them through the
//! worker pool while writing the heartbeat every 30 s, then write the
//! final "drained" heartbeat.

use crate::config_refresh::any_site_unknown;
use crate::error::TesterError;
use crate::heartbeat::write_heartbeat;
use endtoend_core::{Clock, Config, RunnerInfo};
use endtoend_engine::enumerator::{dynamic_entries, static_entries};
use endtoend_engine::{build_pairs, Endpoint, Engine, WorkQueue};
use endtoend_orchestrator_client::OrchestratorClient;
use endtoend_probe_client::ProbeClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const PAUSE_SENTINEL_NAME: &str = "pause-endtoend-testing";
const PAUSE_POLL_SECS: u64 = 30;
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

fn is_paused(config: &Config) -> bool {
    config.workdir.join(PAUSE_SENTINEL_NAME).exists()
}

/// Block until the pause sentinel is gone, writing an `alive: false`
/// heartbeat every 30 s while waiting (spec §4.1's "Seems Flag to Pause
/// testing is set" loop).
async fn wait_while_paused(config: &Config, starttime: i64, nextrun: i64) -> Result<(), TesterError> {
    while is_paused(config) {
        info!("pause sentinel present, postponing round for 30s");
        write_heartbeat(
            &config.workdir,
            &RunnerInfo {
                alive: false,
                totalworkers: config.total_threads as i64,
                totalqueue: 0,
                remainingqueue: 0,
                lockedrequests: 0,
                starttime,
                nextrun,
            },
        )?;
        tokio::time::sleep(Duration::from_secs(PAUSE_POLL_SECS)).await;
    }
    Ok(())
}

async fn collect_endpoints<O: OrchestratorClient>(orchestrator: &O, config: &Config) -> Result<Vec<Endpoint>, TesterError> {
    if config.entriesdynamic.is_some() {
        Ok(dynamic_entries(config, orchestrator).await?)
    } else {
        Ok(static_entries(config))
    }
}

/// Drive one full round to completion (spec §5's scheduling model).
/// Returns whether any endpoint enumerated this round resolved to the
/// literal site `"UNKNOWN"`, the signal the outer loop uses to shorten
/// the remote-config refresh interval (spec §5, §9a).
pub async fn run_round<O, P, C>(
    engine: Arc<Engine<O, P, C>>,
    config: &Config,
    starttime: i64,
    nextrun: i64,
) -> Result<bool, TesterError>
where
    O: OrchestratorClient,
    P: ProbeClient,
    C: Clock,
{
    wait_while_paused(config, starttime, nextrun).await?;

    info!("building this round's work queue");
    let endpoints = collect_endpoints(&engine.orchestrator, config).await?;
    let any_unknown = any_site_unknown(&endpoints);
    let candidates = build_pairs(&endpoints, config)?;
    let total = candidates.len() as i64;
    info!(total, "enumerated pairs for this round");

    let queue = WorkQueue::new(candidates);
    let worker_count = config.total_threads;

    write_heartbeat(
        &config.workdir,
        &RunnerInfo {
            alive: true,
            totalworkers: worker_count as i64,
            totalqueue: total,
            remainingqueue: queue.remaining() as i64,
            lockedrequests: 0,
            starttime,
            nextrun,
        },
    )?;

    if worker_count == 1 && config.nothreading {
        info!("nothreading set, running inline on the current task");
        endtoend_engine::run_pool(Arc::clone(&engine), queue.clone(), 1).await;
    } else {
        info!(worker_count, "starting worker pool");
        let handle = tokio::spawn(endtoend_engine::run_pool(Arc::clone(&engine), queue.clone(), worker_count));
        tokio::pin!(handle);
        let mut ticker = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    info!(remaining = queue.remaining(), "remaining queue size");
                    write_heartbeat(
                        &config.workdir,
                        &RunnerInfo {
                            alive: true,
                            totalworkers: worker_count as i64,
                            totalqueue: total,
                            remainingqueue: queue.remaining() as i64,
                            lockedrequests: 0,
                            starttime,
                            nextrun,
                        },
                    )?;
                    if is_paused(config) {
                        info!("pause flag set; queue might not be decreasing");
                    }
                }
                result = &mut handle => {
                    if let Err(err) = result {
                        tracing::error!(%err, "worker pool task panicked");
                    }
                    break;
                }
            }
        }
    }

    write_heartbeat(
        &config.workdir,
        &RunnerInfo {
            alive: false,
            totalworkers: 0,
            totalqueue: 0,
            remainingqueue: 0,
            lockedrequests: 0,
            starttime,
            nextrun,
        },
    )?;
    info!("round finished");
    Ok(any_unknown)
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod tests;
