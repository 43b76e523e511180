use super::*;
use endtoend_core::{FakeClock, Pair, RequestType};
use endtoend_orchestrator_client::{FakeOrchestratorClient, OrchestratorCall};
use endtoend_probe_client::FakeProbeClient;
use serde_json::json;

fn run_fixture(request_type: RequestType) -> PairRun {
    let mut run = PairRun::new(Pair::new("urn:a", "urn:b", "any"), "site-a".to_string(), "site-b".to_string(), request_type, 1_700_000_000);
    run.instance_id = Some("urn:instance:1".to_string());
    run.submitted_intent = Some(json!({ "requesttype": "guaranteedCapped", "bandwidth": { "capacity": 2000 } }));
    run
}

fn cfg() -> Config {
    let mut c = Config { workdir: std::env::temp_dir(), ..Config::default() };
    c.timeouts.modify = 0; // the fake never reports a MODIFY-ready state, so fail fast and deterministically
    c
}

#[tokio::test]
async fn non_modify_eligible_request_type_is_skipped_without_any_orchestrator_call() {
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture(RequestType::BestEffort);

    let result = drive(&orchestrator, &probe, Phase::Modify, &clock, &cfg(), &mut run).await;

    assert!(result.is_ok());
    assert_eq!(run.modify_outcome, Some(ModifyOutcome::Skipped));
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn missing_instance_id_errors() {
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture(RequestType::GuaranteedCapped);
    run.instance_id = None;

    let err = drive(&orchestrator, &probe, Phase::Modify, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::Other(_)));
}

#[tokio::test]
async fn missing_submitted_intent_errors() {
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture(RequestType::GuaranteedCapped);
    run.submitted_intent = None;

    let err = drive(&orchestrator, &probe, Phase::Modify, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::Other(_)));
}

#[tokio::test]
async fn modify_eligible_request_submits_a_modify_and_polls() {
    let orchestrator = FakeOrchestratorClient::new();
    let probe = FakeProbeClient::new();
    let clock = FakeClock::new(1_700_000_000);
    let mut run = run_fixture(RequestType::GuaranteedCapped);

    let err = drive(&orchestrator, &probe, Phase::Modify, &clock, &cfg(), &mut run).await.unwrap_err();

    assert!(matches!(err, EngineError::PhaseTimeout { .. }));
    assert!(orchestrator.calls().iter().any(|c| matches!(c, OrchestratorCall::InstanceModify { si_uuid } if si_uuid == "urn:instance:1")));
    assert!(!run.phase_errors_mut(Phase::Modify).error.is_empty());
    // a failed poll never reaches the post-success bookkeeping
    assert_eq!(run.modify_outcome, None);
}

#[test]
fn modifycreate_divides_and_modify_multiplies_the_submitted_capacity() {
    let mut intent = json!({ "bandwidth": { "capacity": 2000 } });
    crate::templates::apply_bandwidth_action(&mut intent, crate::templates::BandwidthAction::Division);
    assert_eq!(crate::templates::capacity_of(&intent), Some(1000));
    crate::templates::apply_bandwidth_action(&mut intent, crate::templates::BandwidthAction::Multiply);
    assert_eq!(crate::templates::capacity_of(&intent), Some(2000));
}
