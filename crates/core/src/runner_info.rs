// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RunnerInfo` (singleton process heartbeat) and `LockedRequest` (a
//! pair currently stuck, tracked for reconciliation) — spec §4.7.

use crate::ids::RequestUuid;
use serde::{Deserialize, Serialize};

/// Singleton heartbeat row, upserted once per polling tick (spec §4.7,
/// "Runner heartbeat").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerInfo {
    pub alive: bool,
    pub totalworkers: i64,
    pub totalqueue: i64,
    pub remainingqueue: i64,
    pub lockedrequests: i64,
    pub starttime: i64,
    pub nextrun: i64,
}

/// A `Request` whose artifact is non-terminal and not yet archivable
/// (spec §4.7, "Locked-request reconciliation").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedRequest {
    pub request_uuid: RequestUuid,
    pub fileloc: String,
    pub insertdate: i64,
}

#[cfg(test)]
#[path = "runner_info_tests.rs"]
mod tests;
