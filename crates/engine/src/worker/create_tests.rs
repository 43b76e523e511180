use super::*;
use endtoend_core::{FakeClock, Pair, RequestType};
use endtoend_orchestrator_client::{FakeOrchestratorClient, OrchestratorCall, OrchestratorError};
use endtoend_probe_client::FakeProbeClient;

fn run_fixture() -> PairRun {
    PairRun::new(Pair::new("urn:a", "urn:b", "any"), "site-a".to_string(), "site-b".to_string(), RequestType::GuaranteedCapped, 1_700_000_000)
}

fn cfg() -> Config {
    Config { workdir: std::env::temp_dir(), ..Config::default() }
}

#[test]
fn template_order_defaults_to_guaranteed_then_best_effort() {
    let order = template_order(&cfg());
    assert_eq!(order, vec![RequestType::GuaranteedCapped, RequestType::BestEffort]);
}

#[test]
fn template_order_pins_a_single_family_when_configured() {
    let mut c = cfg();
    c.submissiontemplate = Some(endtoend_core::SubmissionTemplate::Nettest);
    assert_eq!(template_order(&c), vec![RequestType::Nettest]);

    let mut c = cfg();
    c.submissiontemplate = Some(endtoend_core::SubmissionTemplate::L3Request);
    assert_eq!(template_order(&c), vec![RequestType::L3Request]);
}

#[test]
fn retries_on_path_infeasible_only_applies_to_guaranteed_capped_with_a_next_template() {
    assert!(retries_on_path_infeasible(RequestType::GuaranteedCapped, true));
    assert!(!retries_on_path_infeasible(RequestType::GuaranteedCapped, false));
    assert!(!retries_on_path_infeasible(RequestType::BestEffort, true));
    assert!(!retries_on_path_infeasible(RequestType::Nettest, true));
    assert!(!retries_on_path_infeasible(RequestType::L3Request, true));
}

#[tokio::test]
async fn create_error_falls_back_then_exhausts_all_templates() {
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.set_create_error(OrchestratorError::PathInfeasible);
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(run.pathfindissue);
    assert!(matches!(err, EngineError::Orchestrator(OrchestratorError::PathInfeasible)));
    let create_calls = orchestrator.calls().iter().filter(|c| matches!(c, OrchestratorCall::InstanceCreate)).count();
    assert_eq!(create_calls, 2, "both guaranteedCapped and bestEffort should have been attempted");
}

#[tokio::test]
async fn provision_path_infeasible_falls_back_and_deletes_the_failed_instance() {
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.set_operate_error(OrchestratorError::PathInfeasible);
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(run.pathfindissue);
    assert!(matches!(err, EngineError::Orchestrator(OrchestratorError::PathInfeasible)));
    assert!(orchestrator.calls().iter().any(|c| matches!(c, OrchestratorCall::InstanceDelete { .. })));
}

#[tokio::test]
async fn status_path_infeasible_during_poll_falls_back_and_deletes() {
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.set_status_error(OrchestratorError::PathInfeasible);
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(run.pathfindissue);
    assert!(matches!(err, EngineError::Orchestrator(OrchestratorError::PathInfeasible)));
    assert!(orchestrator.calls().iter().any(|c| matches!(c, OrchestratorCall::InstanceDelete { .. })));
}

#[tokio::test]
async fn non_path_infeasible_create_error_does_not_retry_the_next_template() {
    let orchestrator = FakeOrchestratorClient::new();
    orchestrator.set_create_error(OrchestratorError::Transient("timeout".to_string()));
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture();

    let err = drive(&orchestrator, &probe, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(!run.pathfindissue);
    assert!(matches!(err, EngineError::Orchestrator(OrchestratorError::Transient(_))));
    let create_calls = orchestrator.calls().iter().filter(|c| matches!(c, OrchestratorCall::InstanceCreate)).count();
    assert_eq!(create_calls, 1);
}

#[tokio::test]
async fn create_timeout_records_the_phase_error_and_propagates() {
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut c = cfg();
    c.timeouts.create = 0;
    let mut run = run_fixture();

    let err = drive(&orchestrator, &probe, &clock, &c, &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::PhaseTimeout { .. }));
    assert!(!run.phase_errors_mut(endtoend_core::Phase::Create).error.is_empty());
}
