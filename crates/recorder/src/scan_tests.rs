use super::*;
use endtoend_core::{FakeClock, Pair, RequestType};
use endtoend_db::{bootstrap_schema, connect};
use endtoend_orchestrator_client::FakeOrchestratorClient;
use tempfile::tempdir;

fn sample_config(workdir: std::path::PathBuf) -> Config {
    Config { workdir, ..Config::default() }
}

async fn test_pool(path: &std::path::Path) -> SqlitePool {
    let pool = connect(path.to_str().unwrap()).await.unwrap();
    bootstrap_schema(&pool).await.unwrap();
    pool
}

fn write_artifact(workdir: &std::path::Path, run: &PairRun) -> std::path::PathBuf {
    let path = workdir.join(format!("{}.json", run.pair.stem()));
    std::fs::write(&path, serde_json::to_vec(run).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn finalstate_artifact_is_parsed_and_archived() {
    let dir = tempdir().unwrap();
    let workdir = dir.path().join("workdir");
    std::fs::create_dir_all(&workdir).unwrap();
    let db_path = dir.path().join("test.db");
    let pool = test_pool(&db_path).await;

    let mut run = PairRun::new(Pair::new("urn:a", "urn:b", "100"), "site-a".to_string(), "site-b".to_string(), RequestType::GuaranteedCapped, 1_700_000_000);
    run.finalstate = true;
    write_artifact(&workdir, &run);

    let orchestrator = FakeOrchestratorClient::new();
    let clock = FakeClock::new(1_700_000_100);
    let config = sample_config(workdir.clone());

    run_cycle(&pool, &orchestrator, &clock, &config).await.unwrap();

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requests").fetch_one(&pool).await.unwrap();
    assert_eq!(row.0, 1);

    let fileloc: (String,) = sqlx::query_as("SELECT fileloc FROM requests").fetch_one(&pool).await.unwrap();
    assert!(fileloc.0.contains("archived"));
    assert!(!workdir.join(format!("{}.json", run.pair.stem())).exists());
}

#[tokio::test]
async fn non_terminal_artifact_is_renamed_to_dbdone_and_locked() {
    let dir = tempdir().unwrap();
    let workdir = dir.path().join("workdir");
    std::fs::create_dir_all(&workdir).unwrap();
    let db_path = dir.path().join("test.db");
    let pool = test_pool(&db_path).await;

    let run = PairRun::new(Pair::new("urn:a", "urn:b", "100"), "site-a".to_string(), "site-b".to_string(), RequestType::GuaranteedCapped, 1_700_000_000);
    write_artifact(&workdir, &run);

    let orchestrator = FakeOrchestratorClient::new();
    let clock = FakeClock::new(1_700_000_100);
    let config = sample_config(workdir.clone());

    run_cycle(&pool, &orchestrator, &clock, &config).await.unwrap();

    assert!(workdir.join(format!("{}.json.dbdone", run.pair.stem())).exists());
    let locked = endtoend_db::list_locked_requests(&pool).await.unwrap();
    assert_eq!(locked.len(), 1);
}

#[tokio::test]
async fn reconciliation_drops_locked_rows_whose_file_is_gone() {
    let dir = tempdir().unwrap();
    let workdir = dir.path().join("workdir");
    std::fs::create_dir_all(&workdir).unwrap();
    let db_path = dir.path().join("test.db");
    let pool = test_pool(&db_path).await;

    let run = PairRun::new(Pair::new("urn:a", "urn:b", "100"), "site-a".to_string(), "site-b".to_string(), RequestType::GuaranteedCapped, 1_700_000_000);
    write_artifact(&workdir, &run);

    let orchestrator = FakeOrchestratorClient::new();
    let clock = FakeClock::new(1_700_000_100);
    let config = sample_config(workdir.clone());

    run_cycle(&pool, &orchestrator, &clock, &config).await.unwrap();
    std::fs::remove_file(workdir.join(format!("{}.json.dbdone", run.pair.stem()))).unwrap();

    run_cycle(&pool, &orchestrator, &clock, &config).await.unwrap();

    let locked = endtoend_db::list_locked_requests(&pool).await.unwrap();
    assert!(locked.is_empty());
}

#[tokio::test]
async fn rerunning_a_cycle_is_idempotent_by_natural_key() {
    let dir = tempdir().unwrap();
    let workdir = dir.path().join("workdir");
    std::fs::create_dir_all(&workdir).unwrap();
    let db_path = dir.path().join("test.db");
    let pool = test_pool(&db_path).await;

    let mut run = PairRun::new(Pair::new("urn:a", "urn:b", "100"), "site-a".to_string(), "site-b".to_string(), RequestType::GuaranteedCapped, 1_700_000_000);
    run.finalstate = true;
    write_artifact(&workdir, &run);

    let orchestrator = FakeOrchestratorClient::new();
    let clock = FakeClock::new(1_700_000_100);
    let config = sample_config(workdir.clone());

    run_cycle(&pool, &orchestrator, &clock, &config).await.unwrap();
    // The artifact has already moved; a second cycle finds nothing new to process.
    run_cycle(&pool, &orchestrator, &clock, &config).await.unwrap();

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requests").fetch_one(&pool).await.unwrap();
    assert_eq!(row.0, 1);
}
