// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake `OrchestratorClient` for deterministic testing (spec §10.4),
//! grounded on the teacher's `FakeAgentAdapter` shape: `Arc<Mutex<State>>`,
//! a recorded call log, and scriptable per-instance behavior.

use crate::{
    CreateResponse, Manifest, Operate, OrchestratorClient, OrchestratorError, StatusReport,
    ValidationReport, VerboseStatus,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One recorded call against the fake, for assertions in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorCall {
    InstanceNew,
    InstanceCreate,
    InstanceOperate { op: &'static str, si_uuid: String, force: bool },
    InstanceModify { si_uuid: String },
    InstanceGetStatus { si_uuid: String },
    InstanceGetStatusVerbose { si_uuid: String },
    InstanceDelete { si_uuid: String },
    InstanceArchive { si_uuid: String },
    ManifestCreate,
    InstanceVerify { si_uuid: String },
}

#[derive(Debug, Clone)]
struct FakeInstance {
    status: StatusReport,
    verbose: VerboseStatus,
}

struct Inner {
    instances: HashMap<String, FakeInstance>,
    deleted: Vec<String>,
    archived: Vec<String>,
    calls: Vec<OrchestratorCall>,
    manifest: Manifest,
    validation: ValidationReport,
    create_error: Option<OrchestratorError>,
    status_error: Option<OrchestratorError>,
    operate_error: Option<OrchestratorError>,
    /// Number of leading `instance_create` calls to fail with
    /// `scripted_create_failure` before calls succeed normally; mirrors
    /// `FakeProbeClient::fail_submits_before_success` and lets tests
    /// script a path-find fallback that actually succeeds on retry,
    /// unlike the sticky `create_error`.
    fail_creates_before_success: u32,
    scripted_create_failure: Option<OrchestratorError>,
}

/// Scriptable, recording fake for `OrchestratorClient`.
#[derive(Clone)]
pub struct FakeOrchestratorClient {
    inner: Arc<Mutex<Inner>>,
    next_id: Arc<AtomicU64>,
}

impl Default for FakeOrchestratorClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeOrchestratorClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                instances: HashMap::new(),
                deleted: Vec::new(),
                archived: Vec::new(),
                calls: Vec::new(),
                manifest: Manifest::default(),
                validation: ValidationReport::default(),
                create_error: None,
                status_error: None,
                operate_error: None,
                fail_creates_before_success: 0,
                scripted_create_failure: None,
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn calls(&self) -> Vec<OrchestratorCall> {
        self.inner.lock().calls.clone()
    }

    pub fn was_deleted(&self, si_uuid: &str) -> bool {
        self.inner.lock().deleted.iter().any(|u| u == si_uuid)
    }

    pub fn was_archived(&self, si_uuid: &str) -> bool {
        self.inner.lock().archived.iter().any(|u| u == si_uuid)
    }

    /// Script the `(state, configState)` an instance reports on the next
    /// verbose-status poll (tests drive timeouts/terminal states this way).
    pub fn set_status(&self, si_uuid: &str, state: &str, config_state: &str) {
        let mut inner = self.inner.lock();
        let entry = inner
            .instances
            .entry(si_uuid.to_string())
            .or_insert_with(|| FakeInstance {
                status: StatusReport { raw: state.to_string() },
                verbose: VerboseStatus {
                    state: state.to_string(),
                    config_state: config_state.to_string(),
                    super_state: None,
                    sub_state: None,
                    archived: false,
                    locked: false,
                },
            });
        entry.status = StatusReport { raw: state.to_string() };
        entry.verbose.state = state.to_string();
        entry.verbose.config_state = config_state.to_string();
    }

    pub fn set_archival_status(
        &self,
        si_uuid: &str,
        super_state: &str,
        sub_state: &str,
        config_state: &str,
        archived: bool,
        locked: bool,
    ) {
        let mut inner = self.inner.lock();
        let entry = inner.instances.entry(si_uuid.to_string()).or_insert_with(|| FakeInstance {
            status: StatusReport { raw: String::new() },
            verbose: VerboseStatus {
                state: String::new(),
                config_state: config_state.to_string(),
                super_state: None,
                sub_state: None,
                archived,
                locked,
            },
        });
        entry.verbose.super_state = Some(super_state.to_string());
        entry.verbose.sub_state = Some(sub_state.to_string());
        entry.verbose.config_state = config_state.to_string();
        entry.verbose.archived = archived;
        entry.verbose.locked = locked;
    }

    pub fn set_manifest(&self, manifest: Manifest) {
        self.inner.lock().manifest = manifest;
    }

    pub fn set_validation(&self, validation: ValidationReport) {
        self.inner.lock().validation = validation;
    }

    pub fn set_create_error(&self, error: OrchestratorError) {
        self.inner.lock().create_error = Some(error);
    }

    pub fn set_status_error(&self, error: OrchestratorError) {
        self.inner.lock().status_error = Some(error);
    }

    pub fn set_operate_error(&self, error: OrchestratorError) {
        self.inner.lock().operate_error = Some(error);
    }

    /// Fail the next `count` `instance_create` calls with `error`, then
    /// let subsequent calls through — for scripting a submission
    /// template that genuinely succeeds after a path-find fallback.
    pub fn fail_next_creates(&self, count: u32, error: OrchestratorError) {
        let mut inner = self.inner.lock();
        inner.fail_creates_before_success = count;
        inner.scripted_create_failure = Some(error);
    }
}

#[async_trait]
impl OrchestratorClient for FakeOrchestratorClient {
    async fn instance_new(&self) -> Result<String, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(OrchestratorCall::InstanceNew);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("urn:ogf:network:fake:instance:{id}"))
    }

    async fn instance_create(
        &self,
        _intent: serde_json::Value,
    ) -> Result<CreateResponse, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(OrchestratorCall::InstanceCreate);
        if inner.fail_creates_before_success > 0 {
            inner.fail_creates_before_success -= 1;
            let err = inner.scripted_create_failure.clone().unwrap_or(OrchestratorError::PathInfeasible);
            return Err(err);
        }
        if let Some(err) = inner.create_error.clone() {
            return Err(err);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let service_uuid = format!("urn:ogf:network:fake:service:{id}");
        inner.instances.insert(
            service_uuid.clone(),
            FakeInstance {
                status: StatusReport { raw: "CREATE".to_string() },
                verbose: VerboseStatus {
                    state: "CREATE".to_string(),
                    config_state: "create".to_string(),
                    super_state: None,
                    sub_state: None,
                    archived: false,
                    locked: false,
                },
            },
        );
        Ok(CreateResponse { service_uuid })
    }

    async fn instance_operate(
        &self,
        op: Operate,
        si_uuid: &str,
        _async_req: bool,
        _sync: bool,
        force: bool,
    ) -> Result<(), OrchestratorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(OrchestratorCall::InstanceOperate {
            op: op.as_str(),
            si_uuid: si_uuid.to_string(),
            force,
        });
        if let Some(err) = inner.operate_error.clone() {
            return Err(err);
        }
        Ok(())
    }

    async fn instance_modify(
        &self,
        _intent: serde_json::Value,
        si_uuid: &str,
    ) -> Result<(), OrchestratorError> {
        self.inner
            .lock()
            .calls
            .push(OrchestratorCall::InstanceModify { si_uuid: si_uuid.to_string() });
        Ok(())
    }

    async fn instance_get_status(&self, si_uuid: &str) -> Result<StatusReport, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(OrchestratorCall::InstanceGetStatus { si_uuid: si_uuid.to_string() });
        if let Some(err) = inner.status_error.clone() {
            return Err(err);
        }
        inner
            .instances
            .get(si_uuid)
            .map(|i| i.status.clone())
            .ok_or(OrchestratorError::NotFound)
    }

    async fn instance_get_status_verbose(
        &self,
        si_uuid: &str,
    ) -> Result<VerboseStatus, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(OrchestratorCall::InstanceGetStatusVerbose { si_uuid: si_uuid.to_string() });
        if let Some(err) = inner.status_error.clone() {
            return Err(err);
        }
        inner
            .instances
            .get(si_uuid)
            .map(|i| i.verbose.clone())
            .ok_or(OrchestratorError::NotFound)
    }

    async fn instance_delete(&self, si_uuid: &str) -> Result<(), OrchestratorError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(OrchestratorCall::InstanceDelete { si_uuid: si_uuid.to_string() });
        inner.instances.remove(si_uuid);
        inner.deleted.push(si_uuid.to_string());
        Ok(())
    }

    async fn instance_archive(&self, si_uuid: &str) -> Result<(), OrchestratorError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(OrchestratorCall::InstanceArchive { si_uuid: si_uuid.to_string() });
        inner.archived.push(si_uuid.to_string());
        Ok(())
    }

    async fn manifest_create(
        &self,
        _template: serde_json::Value,
    ) -> Result<Manifest, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(OrchestratorCall::ManifestCreate);
        Ok(inner.manifest.clone())
    }

    async fn instance_verify(&self, si_uuid: &str) -> Result<ValidationReport, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(OrchestratorCall::InstanceVerify { si_uuid: si_uuid.to_string() });
        Ok(inner.validation.clone())
    }
}
