// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level end-to-end scenarios (spec §8): each test drives the
//! `engine`/`recorder`/`db`/`storage` crates together the way the
//! `tester` and recorder binaries do, without a real wire client.

mod specs {
    include!("specs/prelude.rs");
}

use endtoend_core::{Clock, FakeClock, Pair, RequestType};
use endtoend_engine::enumerator::PairCandidate;
use endtoend_engine::{Engine, PairRun};
use endtoend_orchestrator_client::{FakeOrchestratorClient, OrchestratorCall, OrchestratorError};
use endtoend_probe_client::FakeProbeClient;
use endtoend_storage::{ArtifactPaths, ArtifactSuffix};
use serial_test::serial;
use specs::{base_config, bootstrapped_pool, spawn_status_advancer};
use std::sync::Arc;
use tempfile::TempDir;

/// S1 — happy path: a single pair with every optional phase disabled
/// produces one `finalstate=1` request, exactly two actions
/// (`create`/`cancel`), and an archived artifact under today's date
/// bucket.
#[tokio::test]
#[serial]
async fn s1_happy_path_archives_and_records_a_terminal_request() {
    let workdir = TempDir::new().expect("tempdir");
    let config = base_config(workdir.path().to_path_buf());
    let clock = FakeClock::new(1_700_000_000);
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();

    let advancer = spawn_status_advancer(orchestrator.clone());

    let engine = Engine::new(orchestrator.clone(), probe, clock.clone(), Arc::new(config.clone()));
    let candidate = PairCandidate {
        pair: Pair::new("urn:a", "urn:b", "any"),
        site1: "site-a".to_string(),
        site2: "site-b".to_string(),
    };
    let run = engine
        .run("worker-0", &candidate)
        .await
        .expect("artifact io")
        .expect("pair was not skipped");

    advancer.abort();

    assert!(run.finalstate, "happy path should reach finalstate=1");
    assert!(!run.pathfindissue);
    assert_eq!(run.request_type, RequestType::GuaranteedCapped);

    let db_path = workdir.path().join("endtoend.sqlite");
    let pool = bootstrapped_pool(&db_path).await;
    endtoend_recorder::run_cycle(&pool, &orchestrator, &clock, &config).await.expect("recorder cycle");

    let fileloc: String = sqlx::query_scalar("SELECT fileloc FROM requests LIMIT 1")
        .fetch_one(&pool)
        .await
        .expect("one request row");
    assert!(fileloc.contains("archived/"), "fileloc should point at the archive: {fileloc}");

    let today = chrono::DateTime::from_timestamp(clock.now_utc(), 0)
        .expect("valid timestamp")
        .format("%Y-%m-%d")
        .to_string();
    assert!(fileloc.contains(&today), "archive bucket should be today's UTC date: {fileloc}");

    let action_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM actions a JOIN requests r ON a.uuid = r.uuid WHERE r.fileloc = ?",
    )
    .bind(&fileloc)
    .fetch_one(&pool)
    .await
    .expect("count actions");
    assert_eq!(action_count, 2, "create + cancel, no optional phases");

    let pingresult_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pingresults")
        .fetch_one(&pool)
        .await
        .expect("count pingresults");
    assert_eq!(pingresult_count, 0, "ignoreping=true: zero PingResult rows");
}

/// S2 — path-find fallback: the first `guaranteedCapped` submission
/// fails with the path-infeasible error; the worker falls through to
/// `bestEffort`, which succeeds and is cancelled cleanly.
#[tokio::test]
#[serial]
async fn s2_path_find_fallback_completes_on_best_effort() {
    let workdir = TempDir::new().expect("tempdir");
    let config = base_config(workdir.path().to_path_buf());
    let clock = FakeClock::new(1_700_000_000);
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.fail_next_creates(1, OrchestratorError::PathInfeasible);
    let probe = FakeProbeClient::new();

    let advancer = spawn_status_advancer(orchestrator.clone());

    let engine = Engine::new(orchestrator.clone(), probe, clock, Arc::new(config));
    let candidate = PairCandidate {
        pair: Pair::new("urn:a", "urn:b", "any"),
        site1: "site-a".to_string(),
        site2: "site-b".to_string(),
    };
    let run = engine
        .run("worker-0", &candidate)
        .await
        .expect("artifact io")
        .expect("pair was not skipped");

    advancer.abort();

    assert_eq!(run.request_type, RequestType::BestEffort, "second template took over after the first failed");
    assert!(run.finalstate, "the accepted bestEffort run should still reach finalstate=1");

    let creates = orchestrator
        .calls()
        .iter()
        .filter(|c| matches!(c, OrchestratorCall::InstanceCreate))
        .count();
    assert_eq!(creates, 2, "one failed guaranteedCapped attempt, one successful bestEffort attempt");
}

/// Testable property 2 — queue-once: K candidates through N workers
/// produce exactly K artifact files, each dequeued exactly once.
#[tokio::test]
#[serial]
async fn queue_once_produces_one_artifact_per_candidate() {
    let workdir = TempDir::new().expect("tempdir");
    let mut config = base_config(workdir.path().to_path_buf());
    config.total_threads = 4;
    let clock = FakeClock::new(1_700_000_000);
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let advancer = spawn_status_advancer(orchestrator.clone());

    let candidates: Vec<PairCandidate> = (0..9)
        .map(|i| PairCandidate {
            pair: Pair::new(format!("urn:a{i}"), format!("urn:b{i}"), "any"),
            site1: "site-a".to_string(),
            site2: "site-b".to_string(),
        })
        .collect();

    let engine = Arc::new(Engine::new(orchestrator.clone(), probe, clock, Arc::new(config.clone())));
    let queue = endtoend_engine::WorkQueue::new(candidates.clone());
    endtoend_engine::run_pool(engine, queue, config.total_threads).await;
    advancer.abort();

    let produced = std::fs::read_dir(workdir.path())
        .expect("read workdir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .count();
    assert_eq!(produced, candidates.len(), "exactly one artifact per candidate");

    for candidate in &candidates {
        let paths = ArtifactPaths::new(workdir.path(), &candidate.pair);
        assert!(!paths.path(ArtifactSuffix::Lock).exists(), "no dangling lock files");
    }
}

/// S6 — recorder reconciliation: a `LockedRequest` row whose backing
/// `.json.dbdone` file has since been deleted is dropped on the next
/// scan.
#[tokio::test]
#[serial]
async fn s6_locked_request_row_is_dropped_once_its_file_disappears() {
    let workdir = TempDir::new().expect("tempdir");
    let config = base_config(workdir.path().to_path_buf());
    let clock = FakeClock::new(1_700_000_000);
    let orchestrator = FakeOrchestratorClient::new();

    let db_path = workdir.path().join("endtoend.sqlite");
    let pool = bootstrapped_pool(&db_path).await;

    let uuid = endtoend_core::RequestUuid::new();
    endtoend_db::insert_locked_request(
        &pool,
        &endtoend_core::LockedRequest {
            request_uuid: uuid,
            fileloc: workdir.path().join("urn-a-urn-b-any.json.dbdone").to_string_lossy().to_string(),
            insertdate: clock.now_utc(),
        },
    )
    .await
    .expect("insert locked request");

    assert_eq!(endtoend_db::list_locked_requests(&pool).await.expect("list").len(), 1);

    // The administrator clears the stuck file out from under the lock
    // row; no `.json`/`.dbdone` exists for this pair any more.
    endtoend_recorder::run_cycle(&pool, &orchestrator, &clock, &config).await.expect("recorder cycle");

    assert!(endtoend_db::list_locked_requests(&pool).await.expect("list").is_empty(), "stale lock row should be gone");
}

/// Testable property 6 — recorder idempotence: running the recorder
/// twice over the same artifact produces the same row counts as once.
#[tokio::test]
#[serial]
async fn recorder_is_idempotent_across_reruns() {
    let workdir = TempDir::new().expect("tempdir");
    let config = base_config(workdir.path().to_path_buf());
    let clock = FakeClock::new(1_700_000_000);
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let advancer = spawn_status_advancer(orchestrator.clone());

    // Force a non-terminal outcome (create times out) so the artifact
    // stays a `.json.dbdone` sentinel across repeated recorder scans
    // instead of being archived away after the first one.
    let mut timeout_config = config.clone();
    timeout_config.timeouts.create = 0;

    let engine = Engine::new(orchestrator.clone(), probe, clock.clone(), Arc::new(timeout_config.clone()));
    let candidate = PairCandidate {
        pair: Pair::new("urn:a", "urn:b", "any"),
        site1: "site-a".to_string(),
        site2: "site-b".to_string(),
    };
    let _run: Option<PairRun> = engine.run("worker-0", &candidate).await.expect("artifact io");
    advancer.abort();

    let db_path = workdir.path().join("endtoend.sqlite");
    let pool = bootstrapped_pool(&db_path).await;

    endtoend_recorder::run_cycle(&pool, &orchestrator, &clock, &timeout_config).await.expect("first cycle");
    let first_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests").fetch_one(&pool).await.expect("count");

    endtoend_recorder::run_cycle(&pool, &orchestrator, &clock, &timeout_config).await.expect("second cycle");
    let second_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests").fetch_one(&pool).await.expect("count");

    assert_eq!(first_count, 1);
    assert_eq!(first_count, second_count, "re-scanning the same dbdone artifact must not duplicate rows");
}
