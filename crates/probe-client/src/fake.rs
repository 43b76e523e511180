// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake `ProbeClient` for deterministic testing, grounded on the same
//! `Arc<Mutex<State>>` plus recorded-call-log shape as
//! `FakeOrchestratorClient`.

use crate::{DebugAction, DebugState, PingRequest, ProbeClient, ProbeError, SubmitOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One recorded call against the fake, for assertions in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeCall {
    GetAllDebugHostname { sitename: String, hostname: String, state: &'static str },
    GetDebug { sitename: String, id: String },
    SubmitPing { request: PingRequest },
}

struct Inner {
    actions: HashMap<String, DebugAction>,
    calls: Vec<ProbeCall>,
    submit_error: Option<ProbeError>,
    get_debug_error: Option<ProbeError>,
    /// Number of leading `submit_ping` calls to fail before one succeeds;
    /// mirrors the source's 3-attempt retry loop.
    fail_submits_before_success: u32,
}

/// Scriptable, recording fake for `ProbeClient`.
#[derive(Clone)]
pub struct FakeProbeClient {
    inner: Arc<Mutex<Inner>>,
    next_id: Arc<AtomicU64>,
}

impl Default for FakeProbeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProbeClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                actions: HashMap::new(),
                calls: Vec::new(),
                submit_error: None,
                get_debug_error: None,
                fail_submits_before_success: 0,
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn calls(&self) -> Vec<ProbeCall> {
        self.inner.lock().calls.clone()
    }

    /// Seed an existing debug action (so `get_all_debug_hostname`/
    /// `get_debug` can return it without a prior `submit_ping`).
    pub fn seed_action(&self, action: DebugAction) {
        self.inner.lock().actions.insert(action.id.clone(), action);
    }

    /// Move a seeded or submitted action to a new state, e.g. to make
    /// `monitorping`-equivalent polling observe completion.
    pub fn set_state(&self, id: &str, state: &str) {
        if let Some(action) = self.inner.lock().actions.get_mut(id) {
            action.state = state.to_string();
        }
    }

    /// Script the `stdout` lines a completed action reports (spec §4.5).
    pub fn set_output(&self, id: &str, lines: Vec<String>) {
        if let Some(action) = self.inner.lock().actions.get_mut(id) {
            action.output = lines;
        }
    }

    pub fn set_submit_error(&self, error: ProbeError) {
        self.inner.lock().submit_error = Some(error);
    }

    pub fn set_get_debug_error(&self, error: ProbeError) {
        self.inner.lock().get_debug_error = Some(error);
    }

    pub fn fail_submits_before_success(&self, count: u32) {
        self.inner.lock().fail_submits_before_success = count;
    }
}

#[async_trait]
impl ProbeClient for FakeProbeClient {
    async fn get_all_debug_hostname(
        &self,
        sitename: &str,
        hostname: &str,
        state: DebugState,
    ) -> Result<Vec<DebugAction>, ProbeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProbeCall::GetAllDebugHostname {
            sitename: sitename.to_string(),
            hostname: hostname.to_string(),
            state: state.as_str(),
        });
        Ok(inner
            .actions
            .values()
            .filter(|a| {
                a.state == state.as_str()
                    && a.requestdict.sitename == sitename
                    && a.requestdict.hostname == hostname
            })
            .cloned()
            .collect())
    }

    async fn get_debug(&self, sitename: &str, id: &str) -> Result<DebugAction, ProbeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProbeCall::GetDebug { sitename: sitename.to_string(), id: id.to_string() });
        if let Some(err) = inner.get_debug_error.clone() {
            return Err(err);
        }
        inner.actions.get(id).cloned().ok_or(ProbeError::NotFound)
    }

    async fn submit_ping(&self, request: PingRequest) -> Result<SubmitOutcome, ProbeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProbeCall::SubmitPing { request: request.clone() });
        if inner.fail_submits_before_success > 0 {
            inner.fail_submits_before_success -= 1;
            return Err(ProbeError::Transient("fake: scripted submit failure".to_string()));
        }
        if let Some(err) = inner.submit_error.clone() {
            return Err(err);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        inner.actions.insert(
            id.clone(),
            DebugAction {
                id: id.clone(),
                state: "new".to_string(),
                insertdate: 0,
                requestdict: request,
                output: Vec::new(),
            },
        );
        Ok(SubmitOutcome { id, status: "OK".to_string(), accepted: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PingRequest {
        PingRequest::new("host-a", "site-a", "10.0.0.1", "vlan.100", 56, 5, 60)
    }

    #[tokio::test]
    async fn submit_then_get_debug_round_trips() {
        let client = FakeProbeClient::new();
        let outcome = client.submit_ping(request()).await.unwrap();
        assert!(outcome.accepted);
        let action = client.get_debug("site-a", &outcome.id).await.unwrap();
        assert_eq!(action.requestdict, request());
    }

    #[tokio::test]
    async fn listed_by_state_matches_site_and_host() {
        let client = FakeProbeClient::new();
        let outcome = client.submit_ping(request()).await.unwrap();
        let listed = client
            .get_all_debug_hostname("site-a", "host-a", DebugState::New)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, outcome.id);
        let none = client
            .get_all_debug_hostname("site-a", "host-a", DebugState::Active)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn unknown_action_is_not_found() {
        let client = FakeProbeClient::new();
        let err = client.get_debug("site-a", "missing").await.unwrap_err();
        assert_eq!(err, ProbeError::NotFound);
    }

    #[tokio::test]
    async fn retries_can_be_scripted_to_fail_then_succeed() {
        let client = FakeProbeClient::new();
        client.fail_submits_before_success(2);
        assert!(client.submit_ping(request()).await.is_err());
        assert!(client.submit_ping(request()).await.is_err());
        assert!(client.submit_ping(request()).await.is_ok());
    }
}
