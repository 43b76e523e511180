// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Pair`: an ordered tuple of two endpoint URNs plus a VLAN label,
//! produced by the pair enumerator (spec §4.1) and consumed by the
//! worker pool (spec §4.2).

use serde::{Deserialize, Serialize};

/// One candidate endpoint pair to drive through the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub port1: String,
    pub port2: String,
    /// Numeric VLAN id as a string, or the literal `"any"`.
    pub vlan: String,
}

impl Pair {
    pub fn new(port1: impl Into<String>, port2: impl Into<String>, vlan: impl Into<String>) -> Self {
        Self {
            port1: port1.into(),
            port2: port2.into(),
            vlan: vlan.into(),
        }
    }

    /// Filename stem identity: `port1-port2-vlan`, normalised so that
    /// `(a,b,v)` and `(b,a,v)` collide on the same stem (spec §4.2 step 1).
    pub fn stem(&self) -> String {
        let (a, b) = if self.port1 <= self.port2 {
            (self.port1.as_str(), self.port2.as_str())
        } else {
            (self.port2.as_str(), self.port1.as_str())
        };
        format!("{a}-{b}-{}", self.vlan)
    }
}

#[cfg(test)]
#[path = "pair_tests.rs"]
mod tests;
