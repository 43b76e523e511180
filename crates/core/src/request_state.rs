// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RequestState`: one (state, config-state) dwell record, produced by
//! the state-transition analyzer (spec §4.3).

use crate::action::Phase;
use crate::ids::RequestUuid;
use crate::state_order::ConfigState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestState {
    pub request_uuid: RequestUuid,
    pub phase: Phase,
    /// e.g. `"CREATE - PENDING"`.
    pub state: String,
    pub configstate: ConfigState,
    pub entertime: i64,
    /// Dwell time in the *previous* emitted row's state; assigned by the
    /// analyzer when this row's transition is matched, never by the row
    /// that reports it (spec §4.3 step 2).
    pub totaltime: i64,
    /// Elapsed time from the first observed state of the run.
    pub sincestart: i64,
}

#[cfg(test)]
#[path = "request_state_tests.rs"]
mod tests;
