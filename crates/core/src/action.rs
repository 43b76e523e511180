// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase boundaries within a `Request` lifecycle.

use crate::ids::{ActionUuid, RequestUuid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven lifecycle phases a `Request` can pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Create,
    Modifycreate,
    Cancelrep,
    Reprovision,
    Modify,
    Cancel,
    Cancelarch,
}

impl Phase {
    /// All phases, in the order the worker pool may enter them (spec §4.2).
    pub const ALL: [Phase; 7] = [
        Phase::Create,
        Phase::Modifycreate,
        Phase::Cancelrep,
        Phase::Reprovision,
        Phase::Modify,
        Phase::Cancel,
        Phase::Cancelarch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Create => "create",
            Phase::Modifycreate => "modifycreate",
            Phase::Cancelrep => "cancelrep",
            Phase::Reprovision => "reprovision",
            Phase::Modify => "modify",
            Phase::Cancel => "cancel",
            Phase::Cancelarch => "cancelarch",
        }
    }

    /// Whether ping results are recorded for this phase (spec §4.7: never
    /// for the cancel family, there is no post-action manifest to ping).
    pub fn records_pings(&self) -> bool {
        matches!(
            self,
            Phase::Create | Phase::Reprovision | Phase::Modify | Phase::Modifycreate
        )
    }

    /// Whether this phase belongs to the cancel family (shares the
    /// force-unless-READY computation, spec §9a).
    pub fn is_cancel_family(&self) -> bool {
        matches!(self, Phase::Cancel | Phase::Cancelrep | Phase::Cancelarch)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| crate::error::CoreError::UnknownPhase(s.to_string()))
    }
}

/// A phase boundary entered once per `Request`; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub uuid: ActionUuid,
    pub request_uuid: RequestUuid,
    pub phase: Phase,
    pub starttime: i64,
}

impl Action {
    pub fn new(request_uuid: RequestUuid, phase: Phase, starttime: i64) -> Self {
        Self {
            uuid: ActionUuid::new(),
            request_uuid,
            phase,
            starttime,
        }
    }

    /// Natural key used for idempotent inserts (spec §4.7): everything
    /// except the generated uuid and audit timestamps.
    pub fn natural_key(&self) -> (RequestUuid, Phase, i64) {
        (self.request_uuid, self.phase, self.starttime)
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
