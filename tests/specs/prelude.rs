// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the workspace-level scenario suite: a base
//! `Config` over a fresh work directory, a bootstrapped SQLite pool,
//! and a background task that plays the Orchestrator's side of a
//! status-polling conversation so a full `create`/`modify`/`cancel`
//! lifecycle can run to completion without a real wire client.

use endtoend_core::{Config, EntryConfig};
use endtoend_db::{bootstrap_schema, connect, SqlitePool};
use endtoend_orchestrator_client::{FakeOrchestratorClient, OrchestratorCall};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A `Config` with two static entries (`urn:a`@`site-a`, `urn:b`@`site-b`),
/// `ignoreping` on so scenarios don't need a `ProbeClient` fixture, and
/// every other field at its default. Callers override the fields their
/// scenario cares about.
pub fn base_config(workdir: PathBuf) -> Config {
    let mut entries = HashMap::new();
    entries.insert("urn:a".to_string(), EntryConfig { site: "site-a".to_string(), ipv6_prefix: None, disabled: false });
    entries.insert("urn:b".to_string(), EntryConfig { site: "site-b".to_string(), ipv6_prefix: None, disabled: false });
    Config { entries: Some(entries), workdir, total_threads: 1, maxpairs: 10, ignoreping: true, ..Config::default() }
}

/// A freshly connected, schema-bootstrapped SQLite pool at `path`.
pub async fn bootstrapped_pool(path: &std::path::Path) -> SqlitePool {
    let pool = connect(path.to_str().expect("utf8 temp path")).await.expect("connect");
    bootstrap_schema(&pool).await.expect("bootstrap schema");
    pool
}

/// Spawn a task that watches `orchestrator`'s call log and answers every
/// `instance_operate`/`instance_modify` the way a well-behaved
/// Orchestrator would: provisioning, cancelling, and modifying all
/// report their matching `* - READY` / `STABLE` state on the next
/// status poll. Scenarios that need a stalled or failing Orchestrator
/// skip this and script `FakeOrchestratorClient` directly instead.
pub fn spawn_status_advancer(orchestrator: FakeOrchestratorClient) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut seen = 0usize;
        loop {
            let calls = orchestrator.calls();
            for call in &calls[seen..] {
                match call {
                    OrchestratorCall::InstanceOperate { op: "provision", si_uuid, .. } => {
                        orchestrator.set_status(si_uuid, "CREATE - READY", "STABLE");
                    }
                    OrchestratorCall::InstanceOperate { op: "cancel", si_uuid, .. } => {
                        orchestrator.set_status(si_uuid, "CANCEL - READY", "STABLE");
                    }
                    OrchestratorCall::InstanceOperate { op: "reprovision", si_uuid, .. } => {
                        orchestrator.set_status(si_uuid, "REINSTATE - READY", "STABLE");
                    }
                    OrchestratorCall::InstanceModify { si_uuid } => {
                        orchestrator.set_status(si_uuid, "MODIFY - READY", "STABLE");
                    }
                    _ => {}
                }
            }
            seen = calls.len();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
}
