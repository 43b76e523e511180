// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PingResult`: one ping probe outcome, parsed from `rapid-ping` debug
//! action output (spec §4.5/§4.7).

use crate::action::Phase;
use crate::ids::{PingResultUuid, RequestUuid};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RttStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub mdev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    pub uuid: PingResultUuid,
    pub request_uuid: RequestUuid,
    pub phase: Phase,
    pub ipfrom: String,
    pub ipto: String,
    pub vlanfrom: String,
    pub vlanto: String,
    pub transmitted: u32,
    pub received: u32,
    pub packetloss: f64,
    pub rtt: Option<RttStats>,
    /// `true` if `transmitted == 0 || received == 0 || packetloss > 0.0`
    /// (spec §4.5).
    pub failed: bool,
}

impl PingResult {
    /// Recompute `failed` from the counters, per spec §4.5's rule.
    pub fn compute_failed(transmitted: u32, received: u32, packetloss: f64) -> bool {
        transmitted == 0 || received == 0 || packetloss > 0.0
    }

    /// Natural key for idempotent inserts (spec §4.7).
    pub fn natural_key(&self) -> (RequestUuid, Phase, &str, &str) {
        (
            self.request_uuid,
            self.phase,
            self.ipfrom.as_str(),
            self.ipto.as_str(),
        )
    }
}

#[cfg(test)]
#[path = "ping_result_tests.rs"]
mod tests;
