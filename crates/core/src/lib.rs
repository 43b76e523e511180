// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! endtoend-core: shared domain types for the end-to-end SENSE validator.

pub mod action;
pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod pair;
pub mod ping_result;
pub mod request;
pub mod request_state;
pub mod runner_info;
pub mod state_order;
pub mod verification;

pub use action::{Action, Phase};
pub use clock::{Clock, SystemClock};
pub use config::{
    expand_vlans, parse_vlan_range, Config, ConfigError, EntryConfig, FilterConfig, HttpRetries,
    PingConfig, SubmissionTemplate, Timeouts, VlanId,
};
pub use error::CoreError;
pub use ids::{ActionUuid, PingResultUuid, RequestUuid, VerificationUuid};
pub use pair::Pair;
pub use ping_result::{PingResult, RttStats};
pub use request::{Request, RequestType};
pub use request_state::RequestState;
pub use runner_info::{LockedRequest, RunnerInfo};
pub use state_order::{state_order_sequence, ConfigState, StateOrderEntry, STATE_ACTION_SEQUENCE};
pub use verification::Verification;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
