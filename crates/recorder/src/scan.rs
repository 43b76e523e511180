// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One recorder scan cycle (spec §4.7): walk the work directory,
//! parse-and-persist each unprocessed artifact once, then run the
//! runner heartbeat and locked-request reconciliation passes.

use crate::archiver::{self, Disposition};
use crate::error::RecorderError;
use crate::parser;
use endtoend_core::{Clock, Config, LockedRequest, Request, RequestUuid, RunnerInfo};
use endtoend_engine::PairRun;
use endtoend_orchestrator_client::OrchestratorClient;
use endtoend_db::SqlitePool;
use endtoend_storage::{is_artifact_path, ArtifactPaths};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Run one full scan: process every `.json`/`.json.dbdone` artifact,
/// then the heartbeat and reconciliation passes that follow every scan
/// (spec §4.7).
pub async fn run_cycle<O: OrchestratorClient, C: Clock>(
    pool: &SqlitePool,
    orchestrator: &O,
    clock: &C,
    config: &Config,
) -> Result<(), RecorderError> {
    let now = clock.now_utc();
    let candidates = list_candidates(&config.workdir)?;
    info!(count = candidates.len(), "recorder scan starting");

    for path in candidates {
        if let Err(err) = process_artifact(pool, orchestrator, &config.workdir, config, now, &path).await {
            warn!(path = %path.display(), %err, "failed to process artifact");
        }
    }

    record_heartbeat(pool, &config.workdir, now).await?;
    reconcile_locked_requests(pool).await?;
    Ok(())
}

fn is_dbdone(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(".json.dbdone"))
}

/// Every `.json`/`.json.dbdone` artifact under `workdir`, oldest first
/// by filename (§4.4: `.json.lock` files are never recorder input,
/// they belong to an in-flight worker).
fn list_candidates(workdir: &Path) -> Result<Vec<PathBuf>, RecorderError> {
    if !workdir.exists() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(workdir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_artifact_path(path))
        .filter(|path| !path.to_string_lossy().ends_with(".json.lock"))
        .collect();
    paths.sort();
    Ok(paths)
}

async fn process_artifact<O: OrchestratorClient>(
    pool: &SqlitePool,
    orchestrator: &O,
    workdir: &Path,
    config: &Config,
    now: i64,
    path: &Path,
) -> Result<(), RecorderError> {
    let contents = std::fs::read_to_string(path)?;
    let pair_run: PairRun = serde_json::from_str(&contents)
        .map_err(|source| RecorderError::MalformedArtifact { path: path.display().to_string(), source })?;

    let fileloc = path.to_string_lossy().to_string();
    let uuid = endtoend_db::get_request_by_natural_key(
        pool,
        &pair_run.pair.port1,
        &pair_run.pair.port2,
        &pair_run.pair.vlan,
        pair_run.request_type,
        &fileloc,
    )
    .await?
    .map(|existing| existing.uuid)
    .unwrap_or_else(RequestUuid::new);

    let request = parser::derive_request(&pair_run, uuid, &fileloc, now);
    endtoend_db::insert_request(pool, &request).await?;

    for action in parser::derive_actions(uuid, &pair_run) {
        endtoend_db::insert_action(pool, &action).await?;
    }
    for state in parser::derive_request_states(uuid, &pair_run) {
        endtoend_db::insert_request_state(pool, &state).await?;
    }
    for verification in parser::derive_verifications(uuid, &pair_run, &config.mappings) {
        endtoend_db::insert_verification(pool, &verification).await?;
    }
    for ping in parser::derive_ping_results(uuid, &pair_run) {
        endtoend_db::insert_ping_result(pool, &ping).await?;
    }

    apply_disposition(pool, orchestrator, workdir, &request, &pair_run, now, path).await
}

async fn apply_disposition<O: OrchestratorClient>(
    pool: &SqlitePool,
    orchestrator: &O,
    workdir: &Path,
    request: &Request,
    pair_run: &PairRun,
    now: i64,
    path: &Path,
) -> Result<(), RecorderError> {
    match archiver::decide(orchestrator, request, pair_run, now).await? {
        Disposition::Archive { delete_instance } => {
            let destination = archiver::apply_archive(
                orchestrator,
                workdir,
                request,
                pair_run.instance_id.as_deref(),
                now,
                delete_instance,
                path,
            )
            .await?;
            endtoend_db::update_request_fileloc(pool, request.uuid, &destination.to_string_lossy(), now).await?;
            endtoend_db::delete_locked_request(pool, request.uuid).await?;
        }
        Disposition::KeepPending => {
            if is_dbdone(path) {
                endtoend_db::insert_locked_request(
                    pool,
                    &LockedRequest { request_uuid: request.uuid, fileloc: request.fileloc.clone(), insertdate: request.insertdate },
                )
                .await?;
            } else {
                let paths = ArtifactPaths::new(workdir, &pair_run.pair);
                let destination = paths.mark_db_done()?;
                endtoend_db::update_request_fileloc(pool, request.uuid, &destination.to_string_lossy(), now).await?;
                endtoend_db::insert_locked_request(
                    pool,
                    &LockedRequest { request_uuid: request.uuid, fileloc: destination.to_string_lossy().to_string(), insertdate: request.insertdate },
                )
                .await?;
            }
        }
    }
    Ok(())
}

/// Read `testerinfo.run` and upsert the singleton heartbeat row; absent
/// or empty file is a skip, not a clear (spec §4.7).
async fn record_heartbeat(pool: &SqlitePool, workdir: &Path, now: i64) -> Result<(), RecorderError> {
    let path = workdir.join("testerinfo.run");
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    if contents.trim().is_empty() {
        return Ok(());
    }
    let info: RunnerInfo = match serde_json::from_str(&contents) {
        Ok(info) => info,
        Err(err) => {
            warn!(%err, "malformed testerinfo.run, skipping heartbeat update");
            return Ok(());
        }
    };
    endtoend_db::upsert_runner_info(pool, &info, now).await?;
    Ok(())
}

/// Insert locks for newly-pending requests happens inline in
/// [`apply_disposition`]; this pass only drops rows whose backing file
/// has disappeared (spec §4.7, "Locked-request reconciliation").
async fn reconcile_locked_requests(pool: &SqlitePool) -> Result<(), RecorderError> {
    for locked in endtoend_db::list_locked_requests(pool).await? {
        if !Path::new(&locked.fileloc).exists() {
            endtoend_db::delete_locked_request(pool, locked.request_uuid).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
