// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the pair-test orchestration engine.

use endtoend_core::CoreError;
use endtoend_orchestrator_client::OrchestratorError;
use endtoend_probe_client::ProbeError;
use endtoend_storage::ArtifactError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{phase} timed out after {elapsed}s (limit {limit}s)")]
    PhaseTimeout { phase: &'static str, elapsed: i64, limit: i64 },

    #[error("{phase} reached terminal failure state {state:?}")]
    PhaseFailed { phase: &'static str, state: String },

    #[error("cannot cancel in status {0:?}")]
    CannotCancel(String),

    #[error("cannot reprovision in status {0:?}")]
    CannotReprovision(String),

    #[error("{0}")]
    Other(String),
}
