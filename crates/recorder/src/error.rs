// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error type for the recorder (spec §7a): one variant per
//! crate boundary the recorder reaches through, plus the artifact
//! parsing failures specific to this crate.

use endtoend_db::DbError;
use endtoend_orchestrator_client::OrchestratorError;
use endtoend_storage::{ArchiveError, ArtifactError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("malformed artifact {path}: {source}")]
    MalformedArtifact {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
