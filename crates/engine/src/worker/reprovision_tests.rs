use super::*;
use endtoend_core::{FakeClock, Pair, RequestType};
use endtoend_orchestrator_client::{FakeOrchestratorClient, OrchestratorCall};
use endtoend_probe_client::FakeProbeClient;

fn run_fixture() -> PairRun {
    PairRun::new(Pair::new("urn:a", "urn:b", "any"), "site-a".to_string(), "site-b".to_string(), RequestType::GuaranteedCapped, 1_700_000_000)
}

fn cfg() -> Config {
    let mut c = Config { workdir: std::env::temp_dir(), ..Config::default() };
    c.timeouts.reprovision = 0; // the fake never reports a REINSTATE-ready state, so fail fast
    c
}

#[tokio::test]
async fn missing_instance_id_errors_without_any_orchestrator_call() {
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::Other(_)));
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn status_without_cancel_is_refused() {
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.set_status("urn:instance:1", "CREATE - READY", "STABLE");
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();
    run.instance_id = Some("urn:instance:1".to_string());

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::CannotReprovision(state) if state == "CREATE - READY"));
    assert!(!orchestrator.calls().iter().any(|c| matches!(c, OrchestratorCall::InstanceOperate { .. })));
}

#[tokio::test]
async fn cancelled_status_issues_a_reprovision_operate_and_polls() {
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.set_status("urn:instance:1", "CANCEL - READY", "STABLE");
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();
    run.instance_id = Some("urn:instance:1".to_string());

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::PhaseTimeout { .. }));
    assert!(orchestrator
        .calls()
        .iter()
        .any(|c| matches!(c, OrchestratorCall::InstanceOperate { op: "reprovision", si_uuid, .. } if si_uuid == "urn:instance:1")));
    assert!(!run.phase_errors_mut(endtoend_core::Phase::Reprovision).error.is_empty());
    assert!(run.manifest.is_none(), "a failed poll never reaches manifest collection");
}
