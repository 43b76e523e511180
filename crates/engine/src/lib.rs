// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pair-test orchestration engine (spec §4.1/§4.2): enumerates the
//! `(urn_a, urn_b, vlan)` work queue for one round, drives each triple
//! through its configured phase sequence against the Orchestrator and
//! edge-agent probe, and derives the state-transition history the
//! recorder later persists.

pub mod analyzer;
pub mod enumerator;
pub mod error;
pub mod pair_run;
pub mod ping;
pub mod templates;
pub mod worker;

pub use analyzer::analyze;
pub use enumerator::{build_pairs, Endpoint, PairCandidate};
pub use error::EngineError;
pub use pair_run::{ModifyOutcome, ObservedTransition, PairRun, PhaseErrors, PhasePing};
pub use worker::pool::{run_pool, WorkQueue};
pub use worker::Engine;
