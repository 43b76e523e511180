// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PairRun`: the explicit value type threaded through one pair's
//! lifecycle (spec §4.2). Constructed fresh at the start of `run` and
//! passed by `&mut` reference to every phase driver; no phase driver
//! reads or writes state held on the worker itself.

use crate::ping::PingOutcome;
use endtoend_core::{Pair, RequestType};
use endtoend_orchestrator_client::{InstanceId, Manifest, ValidationReport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use endtoend_core::Phase;

/// One `(state, configstate)` transition observed while polling a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedTransition {
    pub phase: Phase,
    pub state: String,
    pub configstate: endtoend_core::ConfigState,
    pub entertime: i64,
}

/// `error`/`validation-error`/`manifest-error` text observed for one
/// phase (spec §4.7, failure-text assembly). Never merged across phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseErrors {
    pub error: String,
    pub validation_error: String,
    pub manifest_error: String,
}

impl PhaseErrors {
    pub fn is_empty(&self) -> bool {
        self.error.is_empty() && self.validation_error.is_empty() && self.manifest_error.is_empty()
    }
}

/// Outcome of a `modify`/`modifycreate` phase driver invocation (spec
/// §9a): non-eligible intents are a distinct success variant, not an
/// error and not silent absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyOutcome {
    Applied,
    Skipped,
}

/// One ping result tagged with the phase that collected it (spec §4.7:
/// `PingResult` rows carry `action`, restricted to
/// [`Phase::records_pings`]-true phases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePing {
    pub phase: Phase,
    pub outcome: PingOutcome,
}

/// Everything accumulated while driving one `(urn_a, urn_b, vlan)`
/// triple through its configured phase sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRun {
    pub pair: Pair,
    pub site1: String,
    pub site2: String,
    pub request_type: RequestType,
    pub instance_id: Option<InstanceId>,
    /// The exact intent body submitted on `create`, kept so `modify`/
    /// `modifycreate` can clone-and-adjust it (spec §4.2).
    pub submitted_intent: Option<serde_json::Value>,
    pub observations: Vec<ObservedTransition>,
    pub manifest: Option<Manifest>,
    pub validation: Option<ValidationReport>,
    /// Which phase's `instance_verify` call produced [`Self::validation`]
    /// (spec §4.7: verification rows are attributed to a single phase,
    /// not fanned out across every phase that happened to run).
    pub validation_phase: Option<Phase>,
    pub pings: Vec<PhasePing>,
    pub phase_errors: HashMap<Phase, PhaseErrors>,
    pub modify_outcome: Option<ModifyOutcome>,
    /// Set when a `guaranteedCapped` create hit "no feasible path" and
    /// fell back to `bestEffort` (spec §4.2/§4.6).
    pub pathfindissue: bool,
    /// Set once the lifecycle reaches a disposition the archiver treats
    /// as terminal (spec §4.6: `finalstate == 1`).
    pub finalstate: bool,
    /// `cancel`'s own terminal disposition string, consulted by the
    /// archiver decision table (`cancel.finalstate == "OKARCHIVE"`).
    pub cancel_finalstate: Option<String>,
    pub cancelled: bool,
    pub insertdate: i64,
}

impl PairRun {
    pub fn new(pair: Pair, site1: String, site2: String, request_type: RequestType, insertdate: i64) -> Self {
        Self {
            pair,
            site1,
            site2,
            request_type,
            instance_id: None,
            submitted_intent: None,
            observations: Vec::new(),
            manifest: None,
            validation: None,
            validation_phase: None,
            pings: Vec::new(),
            phase_errors: HashMap::new(),
            modify_outcome: None,
            pathfindissue: false,
            finalstate: false,
            cancel_finalstate: None,
            cancelled: false,
            insertdate,
        }
    }

    pub fn record_transition(&mut self, phase: Phase, state: &str, configstate: endtoend_core::ConfigState, entertime: i64) {
        self.observations.push(ObservedTransition { phase, state: state.to_string(), configstate, entertime });
    }

    pub fn phase_errors_mut(&mut self, phase: Phase) -> &mut PhaseErrors {
        self.phase_errors.entry(phase).or_default()
    }

    /// Assembles the `Request.failure` text (spec §4.7): per phase,
    /// `ERROR_<PHASE>:`, `VALIDATION_<PHASE>:`, `MANIFEST_<PHASE>:`
    /// prefixes for whichever fields are non-empty, in phase-enumeration
    /// order.
    pub fn failure_text(&self) -> String {
        let mut parts = Vec::new();
        for phase in Phase::ALL {
            let Some(errors) = self.phase_errors.get(&phase) else { continue };
            let tag = phase.as_str().to_uppercase();
            if !errors.error.is_empty() {
                parts.push(format!("ERROR_{tag}:{}", errors.error));
            }
            if !errors.validation_error.is_empty() {
                parts.push(format!("VALIDATION_{tag}:{}", errors.validation_error));
            }
            if !errors.manifest_error.is_empty() {
                parts.push(format!("MANIFEST_{tag}:{}", errors.manifest_error));
            }
        }
        parts.join(";")
    }
}

#[cfg(test)]
#[path = "pair_run_tests.rs"]
mod tests;
