// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archiver: decides the disposition of each artifact file (spec §4.6).
//! The decision table is evaluated top to bottom; the first matching
//! row wins.

use crate::error::RecorderError;
use endtoend_core::Request;
use endtoend_engine::PairRun;
use endtoend_orchestrator_client::OrchestratorClient;
use endtoend_storage::STALE_AGE_SECONDS;
use std::path::Path;
use tracing::debug;

/// What to do with an artifact once its rows have been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Move to `archived/YYYY-MM-DD/`; `delete_instance` additionally
    /// removes the instance from the Orchestrator once the move
    /// succeeds (spec §4.6 rows 2 and 4).
    Archive { delete_instance: bool },
    /// Rename to `.json.dbdone` and keep tracking it via
    /// `LockedRequest` (spec §4.6's "otherwise" row).
    KeepPending,
}

/// Evaluate the six-row decision table (spec §4.6). `now` is the
/// current UTC clock reading used for the age check; `already_dbdone`
/// tells the caller whether the file is already a `.json.dbdone`
/// sentinel, relevant only for logging.
pub async fn decide<O: OrchestratorClient>(
    orchestrator: &O,
    request: &Request,
    pair_run: &PairRun,
    now: i64,
) -> Result<Disposition, RecorderError> {
    if request.finalstate {
        return Ok(Disposition::Archive { delete_instance: false });
    }
    if request.pathfindissue {
        return Ok(Disposition::Archive { delete_instance: true });
    }

    let Some(si_uuid) = pair_run.instance_id.as_deref() else {
        return Ok(Disposition::KeepPending);
    };

    match orchestrator.instance_get_status(si_uuid).await {
        Err(endtoend_orchestrator_client::OrchestratorError::NotFound) => {
            return Ok(Disposition::Archive { delete_instance: false });
        }
        Err(err) => {
            debug!(%err, "archiver status check failed, deferring disposition");
        }
        Ok(_) => {}
    }

    let age = now - request.insertdate;
    match orchestrator.instance_get_status_verbose(si_uuid).await {
        Ok(status)
            if status.super_state.as_deref() == Some("CANCEL")
                && status.sub_state.as_deref() == Some("READY")
                && status.config_state == "STABLE"
                && status.archived
                && !status.locked
                && age >= STALE_AGE_SECONDS =>
        {
            return Ok(Disposition::Archive { delete_instance: true });
        }
        Ok(_) => {}
        Err(err) => debug!(%err, "archiver verbose status check failed, deferring disposition"),
    }

    if pair_run.cancel_finalstate.as_deref() == Some("OKARCHIVE") && age >= STALE_AGE_SECONDS {
        return Ok(Disposition::Archive { delete_instance: false });
    }

    Ok(Disposition::KeepPending)
}

/// Carry out an [`Disposition::Archive`]: move the file and, if asked,
/// delete the Orchestrator instance. Returns the new `fileloc`.
pub async fn apply_archive<O: OrchestratorClient>(
    orchestrator: &O,
    workdir: &Path,
    request: &Request,
    instance_id: Option<&str>,
    now: i64,
    delete_instance: bool,
    original: &Path,
) -> Result<std::path::PathBuf, RecorderError> {
    let destination = endtoend_storage::archive_move(workdir, request.insertdate, now, original)?;
    if delete_instance {
        if let Some(si_uuid) = instance_id {
            orchestrator.instance_delete(si_uuid).await?;
        }
    }
    Ok(destination)
}

#[cfg(test)]
#[path = "archiver_tests.rs"]
mod tests;
