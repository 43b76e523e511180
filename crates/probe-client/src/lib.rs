// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `ProbeClient`: the async trait boundary to the edge agent's debug API
//! (spec §6.2), used by the ping orchestrator to discover, dedup, and
//! submit `rapid-ping` debug actions and then poll them to completion.
//!
//! Every call site reaches the edge agent exclusively through this
//! trait; no call site holds a concrete HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProbeClient, ProbeCall};

/// `new`/`active` are the two non-terminal debug-action states the ping
/// orchestrator dedups and monitors against (spec §6.2); any other value
/// reported by `get_debug` is treated as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugState {
    New,
    Active,
}

impl DebugState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebugState::New => "new",
            DebugState::Active => "active",
        }
    }
}

/// One `sense-rtmon` debug action, as returned by `get_debug` (spec §6.2).
/// `requestdict` is the action's own request parameters, compared field
/// by field against a freshly-built ping request to dedup resubmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugAction {
    pub id: String,
    pub state: String,
    pub insertdate: i64,
    pub requestdict: PingRequest,
    /// Captured `stdout` lines once the probe has run; empty while `new`
    /// or `active` (spec §4.5/§4.7: parsed by the ping orchestrator once
    /// the action leaves `{new, active}`).
    #[serde(default)]
    pub output: Vec<String>,
}

/// The parameters of one `rapid-ping` debug action (spec §6.2), matched
/// field-for-field against existing debug actions before submission to
/// avoid resubmitting an already-running probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingRequest {
    pub hostname: String,
    #[serde(rename = "type")]
    pub probe_type: String,
    pub sitename: String,
    pub ip: String,
    pub packetsize: u32,
    pub onetime: bool,
    pub interval: u32,
    pub interface: String,
    pub time: u32,
}

impl PingRequest {
    /// `type`/`onetime` are always `rapid-ping`/`true`; the remaining
    /// fields come from the caller (spec §6.2 defaults: packetsize 56,
    /// interval 5, time 60).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hostname: impl Into<String>,
        sitename: impl Into<String>,
        ip: impl Into<String>,
        interface: impl Into<String>,
        packetsize: u32,
        interval: u32,
        time: u32,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            probe_type: "rapid-ping".to_string(),
            sitename: sitename.into(),
            ip: ip.into(),
            packetsize,
            onetime: true,
            interval,
            interface: interface.into(),
            time,
        }
    }
}

/// Result of a `submit_ping` call: the submission response body plus
/// whether the agent accepted the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub id: String,
    pub status: String,
    pub accepted: bool,
}

/// Tagged error set at the probe-client boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("debug action not found")]
    NotFound,

    #[error("transient error: {0}")]
    Transient(String),

    #[error("probe error: {0}")]
    Other(String),
}

/// The async trait boundary to the edge agent's debug API (spec §6.2).
#[async_trait]
pub trait ProbeClient: Clone + Send + Sync + 'static {
    /// List debug actions for a site/hostname in the given state
    /// (`new` or `active`); the caller issues this once per state.
    async fn get_all_debug_hostname(
        &self,
        sitename: &str,
        hostname: &str,
        state: DebugState,
    ) -> Result<Vec<DebugAction>, ProbeError>;

    /// Fetch a single debug action by id, used both to resolve a listed
    /// action's `requestdict` and to poll a submitted probe to
    /// completion.
    async fn get_debug(&self, sitename: &str, id: &str) -> Result<DebugAction, ProbeError>;

    /// Submit a new `rapid-ping` debug action.
    async fn submit_ping(&self, request: PingRequest) -> Result<SubmitOutcome, ProbeError>;
}
