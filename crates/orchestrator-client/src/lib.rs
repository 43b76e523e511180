// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `OrchestratorClient`: the async trait boundary to the wide-area
//! network-service Orchestrator (spec §6.1).
//!
//! Every call site elsewhere in this workspace reaches the Orchestrator
//! exclusively through this trait; no call site holds a concrete HTTP
//! client. Errors crossing this boundary are a tagged enum
//! (`OrchestratorError`), not a raw string — the
//! `"cannot find feasible path for connection"` / `NOT_FOUND` substring
//! matches named in spec §6.1/§9 happen once, inside a concrete client's
//! response-mapping code, and nowhere else in this crate's callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOrchestratorClient, OrchestratorCall};

pub mod templates;

/// The instance identifier minted by `instance_new` and threaded through
/// every subsequent operation against one service instance.
pub type InstanceId = String;

/// Operations accepted by `instance_operate` (spec §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operate {
    Provision,
    Cancel,
    Reprovision,
}

impl Operate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operate::Provision => "provision",
            Operate::Cancel => "cancel",
            Operate::Reprovision => "reprovision",
        }
    }
}

/// Non-verbose status: the Orchestrator's single status string, the form
/// phase drivers substring-match against before issuing a cancel/reprovision
/// (spec §4.2, "refuse with a hard error").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub raw: String,
}

impl StatusReport {
    pub fn contains(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }
}

/// Verbose status: `state`/`configState` for the create-family poll loops,
/// plus the archival fields (`superState`/`subState`/`archived`/`locked`)
/// the archiver's decision table (spec §4.6) reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerboseStatus {
    pub state: String,
    pub config_state: String,
    pub super_state: Option<String>,
    pub sub_state: Option<String>,
    pub archived: bool,
    pub locked: bool,
}

/// Response from `instance_create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub service_uuid: InstanceId,
}

/// One row of a `manifest_create` SPARQL result (spec §4.5): a port/host
/// entry with its non-placeholder addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestPort {
    pub port_name: String,
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub ipv6: Option<String>,
    #[serde(default)]
    pub vlan: Option<String>,
    #[serde(default)]
    pub hosts: Vec<ManifestHost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestHost {
    pub hostname: String,
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub ipv6: Option<String>,
}

/// The manifest fetched after a phase reaches terminal success (spec §4.2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub ports: Vec<ManifestPort>,
}

/// One entry of an `instance_verify` validation report (spec §6.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub site: String,
    pub urn: String,
    pub netstatus: String,
}

/// Per-phase validation report: `additionVerified`/`additionUnverified`/
/// `reductionVerified`/`reductionUnverified` (spec §6.1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub addition_verified: Vec<ValidationEntry>,
    pub addition_unverified: Vec<ValidationEntry>,
    pub reduction_verified: Vec<ValidationEntry>,
    pub reduction_unverified: Vec<ValidationEntry>,
}

impl ValidationReport {
    /// All entries tagged with their verified/unverified outcome, in a
    /// flat shape convenient for the recorder (spec §4.7, one
    /// `Verification` row per entry).
    pub fn entries(&self) -> impl Iterator<Item = (&ValidationEntry, bool)> {
        self.addition_verified
            .iter()
            .map(|e| (e, true))
            .chain(self.addition_unverified.iter().map(|e| (e, false)))
            .chain(self.reduction_verified.iter().map(|e| (e, true)))
            .chain(self.reduction_unverified.iter().map(|e| (e, false)))
    }
}

/// Tagged error set at the Orchestrator-client boundary (spec §9
/// REDESIGN FLAGS, "Loose error typing").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// The literal token `NOT_FOUND` was observed on a status call
    /// (spec §6.1: matched case-sensitively, semantic meaning for §4.6).
    #[error("instance not found")]
    NotFound,

    /// `"cannot find feasible path for connection"` observed during a
    /// `guaranteedCapped` create attempt (spec §4.2).
    #[error("no feasible path for connection")]
    PathInfeasible,

    /// A terminal `*_FAILED` state was observed (spec §4.2/§6.1: `CREATE
    /// - FAILED`, `CANCEL - FAILED`, `REINSTATE - FAILED`, `MODIFY -
    /// FAILED`).
    #[error("terminal failure: {0}")]
    TerminalFailure(String),

    /// A transient remote error (timeout, 5xx, connection reset); the
    /// caller may retry per spec §7.
    #[error("transient error: {0}")]
    Transient(String),

    /// Any other error not covered by the tags above.
    #[error("orchestrator error: {0}")]
    Other(String),
}

/// The async trait boundary to the Orchestrator (spec §6.1).
#[async_trait]
pub trait OrchestratorClient: Clone + Send + Sync + 'static {
    /// Mint a fresh instance id.
    async fn instance_new(&self) -> Result<InstanceId, OrchestratorError>;

    /// Submit a JSON intent document; returns the minted `service_uuid`.
    async fn instance_create(
        &self,
        intent: serde_json::Value,
    ) -> Result<CreateResponse, OrchestratorError>;

    /// Issue `provision`/`cancel`/`reprovision` against an instance.
    async fn instance_operate(
        &self,
        op: Operate,
        si_uuid: &str,
        async_req: bool,
        sync: bool,
        force: bool,
    ) -> Result<(), OrchestratorError>;

    /// Submit a modified intent against an existing instance.
    async fn instance_modify(
        &self,
        intent: serde_json::Value,
        si_uuid: &str,
    ) -> Result<(), OrchestratorError>;

    /// Non-verbose status: a single status string.
    async fn instance_get_status(&self, si_uuid: &str) -> Result<StatusReport, OrchestratorError>;

    /// Verbose status: `state`/`configState` plus archival fields.
    async fn instance_get_status_verbose(
        &self,
        si_uuid: &str,
    ) -> Result<VerboseStatus, OrchestratorError>;

    async fn instance_delete(&self, si_uuid: &str) -> Result<(), OrchestratorError>;

    async fn instance_archive(&self, si_uuid: &str) -> Result<(), OrchestratorError>;

    /// SPARQL-templated manifest query (spec §4.2/§6.1); `template` is
    /// passed through verbatim, never reformatted.
    async fn manifest_create(
        &self,
        template: serde_json::Value,
    ) -> Result<Manifest, OrchestratorError>;

    async fn instance_verify(&self, si_uuid: &str) -> Result<ValidationReport, OrchestratorError>;
}
