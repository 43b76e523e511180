use super::*;
use crate::pool::{bootstrap_schema, connect};
use endtoend_core::{
    Action, LockedRequest, Phase, PingResult, Request, RequestState, RequestType, RequestUuid,
    RunnerInfo, Verification,
};
use tempfile::tempdir;

async fn test_pool() -> sqlx::SqlitePool {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db").to_str().unwrap().to_string();
    std::mem::forget(dir);
    let pool = connect(&path).await.unwrap();
    bootstrap_schema(&pool).await.unwrap();
    pool
}

fn sample_request() -> Request {
    Request {
        uuid: RequestUuid::new(),
        port1: "urn:ogf:network:a".to_string(),
        port2: "urn:ogf:network:b".to_string(),
        vlan: "100".to_string(),
        site1: "site-a".to_string(),
        site2: "site-b".to_string(),
        request_type: RequestType::GuaranteedCapped,
        finalstate: true,
        pathfindissue: false,
        failure: String::new(),
        fileloc: "archived/2026-01-01/1-a-b-100.json".to_string(),
        insertdate: 1_700_000_000,
        updatedate: 1_700_000_100,
    }
}

#[tokio::test]
async fn insert_then_get_request_round_trips() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();

    let fetched = get_request(&pool, request.uuid).await.unwrap().unwrap();
    assert_eq!(fetched, request);
}

#[tokio::test]
async fn insert_request_is_idempotent_by_natural_key() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();
    // Same natural key, different uuid: should be ignored, not duplicated.
    let mut duplicate = request.clone();
    duplicate.uuid = RequestUuid::new();
    insert_request(&pool, &duplicate).await.unwrap();

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requests").fetch_one(&pool).await.unwrap();
    assert_eq!(row.0, 1);
}

#[tokio::test]
async fn get_request_by_natural_key_finds_the_reusable_uuid() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();

    let found = get_request_by_natural_key(
        &pool,
        &request.port1,
        &request.port2,
        &request.vlan,
        request.request_type,
        &request.fileloc,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(found.uuid, request.uuid);

    let missing = get_request_by_natural_key(&pool, &request.port1, &request.port2, &request.vlan, request.request_type, "nope.json")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn update_request_fileloc_changes_only_fileloc_and_updatedate() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();

    update_request_fileloc(&pool, request.uuid, "archived/2026-01-02/1-a-b-100.json", 1_700_000_200)
        .await
        .unwrap();

    let fetched = get_request(&pool, request.uuid).await.unwrap().unwrap();
    assert_eq!(fetched.fileloc, "archived/2026-01-02/1-a-b-100.json");
    assert_eq!(fetched.updatedate, 1_700_000_200);
    assert_eq!(fetched.port1, request.port1);
}

#[tokio::test]
async fn insert_action_verification_and_ping_result_round_trip() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();

    let action = Action::new(request.uuid, Phase::Create, request.insertdate);
    insert_action(&pool, &action).await.unwrap();
    // Re-inserting the same natural key is a no-op.
    insert_action(&pool, &action).await.unwrap();

    let verification = Verification {
        uuid: endtoend_core::VerificationUuid::new(),
        request_uuid: request.uuid,
        phase: Phase::Create,
        site: "site-a".to_string(),
        urn: "urn:ogf:network:a".to_string(),
        netstatus: "ok".to_string(),
        verified: true,
    };
    insert_verification(&pool, &verification).await.unwrap();

    let ping = PingResult {
        uuid: endtoend_core::PingResultUuid::new(),
        request_uuid: request.uuid,
        phase: Phase::Create,
        ipfrom: "10.0.0.1".to_string(),
        ipto: "10.0.0.2".to_string(),
        vlanfrom: "vlan.100".to_string(),
        vlanto: "vlan.100".to_string(),
        transmitted: 5,
        received: 5,
        packetloss: 0.0,
        rtt: Some(endtoend_core::RttStats { min: 1.0, avg: 1.2, max: 1.5, mdev: 0.1 }),
        failed: false,
    };
    insert_ping_result(&pool, &ping).await.unwrap();

    let actions: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM actions").fetch_one(&pool).await.unwrap();
    assert_eq!(actions.0, 1);
    let verifications: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM verification").fetch_one(&pool).await.unwrap();
    assert_eq!(verifications.0, 1);
    let pings: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pingresults").fetch_one(&pool).await.unwrap();
    assert_eq!(pings.0, 1);
}

#[tokio::test]
async fn request_state_rows_are_appended_not_deduplicated() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();

    let state = RequestState {
        request_uuid: request.uuid,
        phase: Phase::Create,
        state: "CREATE - PENDING".to_string(),
        configstate: endtoend_core::ConfigState::Pending,
        entertime: request.insertdate,
        totaltime: 0,
        sincestart: 0,
    };
    insert_request_state(&pool, &state).await.unwrap();
    insert_request_state(&pool, &state).await.unwrap();

    let rows: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM requeststates").fetch_one(&pool).await.unwrap();
    assert_eq!(rows.0, 2);
}

#[tokio::test]
async fn runner_info_upsert_keeps_singleton_row() {
    let pool = test_pool().await;
    let info = RunnerInfo {
        alive: true,
        totalworkers: 4,
        totalqueue: 10,
        remainingqueue: 6,
        lockedrequests: 1,
        starttime: 1_700_000_000,
        nextrun: 1_700_000_060,
    };
    upsert_runner_info(&pool, &info, 1_700_000_000).await.unwrap();
    upsert_runner_info(&pool, &info, 1_700_000_060).await.unwrap();

    let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM runnerinfo").fetch_one(&pool).await.unwrap();
    assert_eq!(rows.0, 1);
}

#[tokio::test]
async fn locked_request_insert_list_and_delete() {
    let pool = test_pool().await;
    let request = sample_request();
    insert_request(&pool, &request).await.unwrap();

    let locked = LockedRequest {
        request_uuid: request.uuid,
        fileloc: request.fileloc.clone(),
        insertdate: request.insertdate,
    };
    insert_locked_request(&pool, &locked).await.unwrap();

    let listed = list_locked_requests(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].request_uuid, request.uuid);

    delete_locked_request(&pool, request.uuid).await.unwrap();
    assert!(list_locked_requests(&pool).await.unwrap().is_empty());
}
