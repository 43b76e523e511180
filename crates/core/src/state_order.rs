// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical `StateOrder` reference data (spec §3a): the fixed
//! `(state, action)` progression and the `configstate` progression that
//! together define the transition graph the state-transition analyzer
//! (spec §4.3) walks. This is seed data, not computed; it must not be
//! reordered or re-derived.

use crate::action::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six config-state values a request can be observed in, in
/// canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigState {
    Create,
    Unknown,
    Pending,
    Scheduled,
    Unstable,
    Stable,
}

impl ConfigState {
    pub const ALL: [ConfigState; 6] = [
        ConfigState::Create,
        ConfigState::Unknown,
        ConfigState::Pending,
        ConfigState::Scheduled,
        ConfigState::Unstable,
        ConfigState::Stable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigState::Create => "create",
            ConfigState::Unknown => "UNKNOWN",
            ConfigState::Pending => "PENDING",
            ConfigState::Scheduled => "SCHEDULED",
            ConfigState::Unstable => "UNSTABLE",
            ConfigState::Stable => "STABLE",
        }
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConfigState {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigState::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::error::CoreError::UnknownConfigState(s.to_string()))
    }
}

/// One seeded row of the `StateOrder` table: a canonical `(state,
/// action, configstate)` triple with its monotonic `orderid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateOrderEntry {
    pub state: &'static str,
    pub phase: Phase,
    pub configstate: ConfigState,
    pub orderid: u32,
}

/// The literal `(state, action)` progression, transcribed verbatim from
/// the reference data this design continues (65 entries, one per
/// legitimate `(state, action)` pair across the seven phases). Crossed
/// with `ConfigState::ALL` at bootstrap time to produce the full
/// `StateOrder` table (see `crates/bootstrap`).
pub const STATE_ACTION_SEQUENCE: &[(&str, Phase)] = &[
    ("CREATE", Phase::Create),
    ("CREATE - PENDING", Phase::Create),
    ("CREATE - COMPILED", Phase::Create),
    ("CREATE - PROPAGATED", Phase::Create),
    ("CREATE - COMMITTING", Phase::Create),
    ("CREATE - COMMITTED", Phase::Create),
    ("CREATE - READY", Phase::Create),
    ("CREATE - FAILED", Phase::Create),
    ("CREATE", Phase::Modifycreate),
    ("MODIFY - PENDING", Phase::Modifycreate),
    ("MODIFY - COMPILED", Phase::Modifycreate),
    ("MODIFY - PROPAGATED", Phase::Modifycreate),
    ("MODIFY - COMMITTING", Phase::Modifycreate),
    ("MODIFY - COMMITTED", Phase::Modifycreate),
    ("MODIFY - READY", Phase::Modifycreate),
    ("MODIFY - FAILED", Phase::Modifycreate),
    ("CREATE - PENDING", Phase::Modifycreate),
    ("CREATE - COMPILED", Phase::Modifycreate),
    ("CREATE - PROPAGATED", Phase::Modifycreate),
    ("CREATE - COMMITTING", Phase::Modifycreate),
    ("CREATE - COMMITTED", Phase::Modifycreate),
    ("CREATE - READY", Phase::Modifycreate),
    ("CREATE - FAILED", Phase::Modifycreate),
    ("CREATE", Phase::Cancelrep),
    ("CANCEL - PENDING", Phase::Cancelrep),
    ("CANCEL - COMPILED", Phase::Cancelrep),
    ("CANCEL - PROPAGATED", Phase::Cancelrep),
    ("CANCEL - COMMITTING", Phase::Cancelrep),
    ("CANCEL - COMMITTED", Phase::Cancelrep),
    ("CANCEL - READY", Phase::Cancelrep),
    ("CANCEL - FAILED", Phase::Cancelrep),
    ("CREATE", Phase::Reprovision),
    ("REINSTATE - PENDING", Phase::Reprovision),
    ("REINSTATE - COMPILED", Phase::Reprovision),
    ("REINSTATE - PROPAGATED", Phase::Reprovision),
    ("REINSTATE - COMMITTING", Phase::Reprovision),
    ("REINSTATE - COMMITTED", Phase::Reprovision),
    ("REINSTATE - READY", Phase::Reprovision),
    ("REINSTATE - FAILED", Phase::Reprovision),
    ("CREATE", Phase::Modify),
    ("MODIFY - PENDING", Phase::Modify),
    ("MODIFY - COMPILED", Phase::Modify),
    ("MODIFY - PROPAGATED", Phase::Modify),
    ("MODIFY - COMMITTING", Phase::Modify),
    ("MODIFY - COMMITTED", Phase::Modify),
    ("MODIFY - READY", Phase::Modify),
    ("MODIFY - FAILED", Phase::Modify),
    ("REINSTATE - READY", Phase::Modify),
    ("REINSTATE - FAILED", Phase::Modify),
    ("CREATE", Phase::Cancel),
    ("CANCEL - PENDING", Phase::Cancel),
    ("CANCEL - COMPILED", Phase::Cancel),
    ("CANCEL - PROPAGATED", Phase::Cancel),
    ("CANCEL - COMMITTING", Phase::Cancel),
    ("CANCEL - COMMITTED", Phase::Cancel),
    ("CANCEL - READY", Phase::Cancel),
    ("CANCEL - FAILED", Phase::Cancel),
    ("CREATE", Phase::Cancelarch),
    ("CANCEL - PENDING", Phase::Cancelarch),
    ("CANCEL - COMPILED", Phase::Cancelarch),
    ("CANCEL - PROPAGATED", Phase::Cancelarch),
    ("CANCEL - COMMITTING", Phase::Cancelarch),
    ("CANCEL - COMMITTED", Phase::Cancelarch),
    ("CANCEL - READY", Phase::Cancelarch),
    ("CANCEL - FAILED", Phase::Cancelarch),
];

/// The full seeded `StateOrder` sequence: `STATE_ACTION_SEQUENCE` crossed
/// with every `ConfigState`, in nested order (state/action outer, then
/// configstate inner), each assigned a monotonically increasing
/// `orderid`. This is what `crates/bootstrap` writes into the database
/// and what the state-transition analyzer (spec §4.3) iterates.
pub fn state_order_sequence() -> Vec<StateOrderEntry> {
    let mut out = Vec::with_capacity(STATE_ACTION_SEQUENCE.len() * ConfigState::ALL.len());
    let mut orderid = 0u32;
    for &(state, phase) in STATE_ACTION_SEQUENCE {
        for configstate in ConfigState::ALL {
            out.push(StateOrderEntry {
                state,
                phase,
                configstate,
                orderid,
            });
            orderid += 1;
        }
    }
    out
}

#[cfg(test)]
#[path = "state_order_tests.rs"]
mod tests;
