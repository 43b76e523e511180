// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Verification`: one per-site per-URN verified/unverified outcome for
//! one phase (spec §4.7, "Recorder").

use crate::action::Phase;
use crate::ids::{RequestUuid, VerificationUuid};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub uuid: VerificationUuid,
    pub request_uuid: RequestUuid,
    pub phase: Phase,
    pub site: String,
    pub urn: String,
    pub netstatus: String,
    pub verified: bool,
}

impl Verification {
    /// Natural key for idempotent inserts (spec §4.7).
    pub fn natural_key(&self) -> (RequestUuid, Phase, &str, &str, &str) {
        (
            self.request_uuid,
            self.phase,
            self.site.as_str(),
            self.urn.as_str(),
            self.netstatus.as_str(),
        )
    }
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
