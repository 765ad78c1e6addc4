//! End-to-end network run tests — full orchestrator runs against the default
//! configuration, status-log persistence, and the serialized report shape
//! external collaborators consume.

use cascade_core::EngineConfig;
use cascade_registry::StatusLog;
use cascade_runtime::{NetworkOrchestrator, NetworkRunResult};

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn test_network_run_is_deterministic_across_orchestrators() {
    let first = NetworkOrchestrator::new(EngineConfig::default()).unwrap();
    let second = NetworkOrchestrator::new(EngineConfig::default()).unwrap();

    let targets = ids(&["node-1", "node-2"]);
    let a = first.run_network(&targets, 20).await.unwrap();
    let b = second.run_network(&targets, 20).await.unwrap();

    let a_json = serde_json::to_string(&a).unwrap();
    let b_json = serde_json::to_string(&b).unwrap();
    assert_eq!(a_json, b_json);
}

#[tokio::test]
async fn test_outcomes_land_in_status_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = StatusLog::open(dir.path()).unwrap();
    let orchestrator = NetworkOrchestrator::new(EngineConfig::default())
        .unwrap()
        .with_status_log(log);

    let targets = ids(&["node-1", "node-2", "node-3"]);
    orchestrator.run_network(&targets, 20).await.unwrap();
    orchestrator.retry_actor("node-1", 20).unwrap();

    // Reopen the same directory to read what was persisted
    let log = StatusLog::open(dir.path()).unwrap();
    assert_eq!(log.run_count().unwrap(), 4);

    let runs = log.outcomes_for_actor("node-1").unwrap();
    assert_eq!(runs.len(), 2);
    for run in &runs {
        assert!(run.reached_terminal);
        assert_eq!(run.ticks_used, 13);
        assert_eq!(run.transitions.len(), 3);
    }
    // Both runs replay the same transition ticks
    let ticks: Vec<u32> = runs[0].transitions.iter().map(|t| t.tick).collect();
    assert_eq!(ticks, vec![2, 7, 13]);
}

/// Verify the report shape consumed by external dashboards:
/// { ready, coherenceFraction, perActor: [{actorId, reachedTerminal,
///   finalState, finalCoherence, ticksUsed, eventLog}] }
#[tokio::test]
async fn test_run_result_report_shape() {
    let orchestrator = NetworkOrchestrator::new(EngineConfig::default()).unwrap();
    let result = orchestrator.run_network(&ids(&["node-1"]), 20).await.unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["ready"].is_boolean());
    assert!(json["coherenceFraction"].is_number());
    assert!(json["perActor"].is_array());

    let actor = &json["perActor"][0];
    assert_eq!(actor["actorId"], "node-1");
    assert!(actor["reachedTerminal"].is_boolean());
    assert!(actor["finalState"].is_string());
    assert!(actor["finalCoherence"].is_number());
    assert!(actor["ticksUsed"].is_number());
    assert!(actor["eventLog"].is_array());

    let event = &actor["eventLog"][0];
    assert!(event["tick"].is_number());
    assert!(event["fromState"].is_string());
    assert!(event["toState"].is_string());
    assert!(event["coherence"].is_number());

    // And the report round-trips
    let back: NetworkRunResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[tokio::test]
async fn test_partial_then_retry_upgrades_readiness() {
    let orchestrator = NetworkOrchestrator::new(EngineConfig::default()).unwrap();

    let short = orchestrator.run_network(&ids(&["node-1", "node-2"]), 6).await.unwrap();
    assert!(!short.ready);
    assert_eq!(short.coherence_fraction, 0.0);

    // Partial actors are retried only on explicit request, one at a time
    orchestrator.retry_actor("node-1", 20).unwrap();
    let status = orchestrator.network_status();
    assert!(!status.ready());
    assert!((status.coherence_fraction - 0.5).abs() < 1e-12);

    orchestrator.retry_actor("node-2", 20).unwrap();
    assert!(orchestrator.network_status().ready());
}
