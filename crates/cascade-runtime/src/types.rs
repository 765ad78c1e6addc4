//! Network-level run reports.

use cascade_engine::RunOutcome;
use serde::{Deserialize, Serialize};

/// Aggregate readiness snapshot for a target set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStatus {
    #[serde(rename = "targetActorIds")]
    pub target_actor_ids: Vec<String>,
    #[serde(rename = "completedActorIds")]
    pub completed_actor_ids: Vec<String>,
    #[serde(rename = "coherenceFraction")]
    pub coherence_fraction: f64,
}

impl NetworkStatus {
    /// Ready iff every target actor reached terminal.
    pub fn ready(&self) -> bool {
        self.coherence_fraction == 1.0
    }
}

/// Serializable result of a full network run.
///
/// Always complete: a non-ready network is reported, never raised as an
/// error, and partial actors appear alongside full ones in `per_actor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRunResult {
    pub ready: bool,
    #[serde(rename = "coherenceFraction")]
    pub coherence_fraction: f64,
    #[serde(rename = "perActor")]
    pub per_actor: Vec<RunOutcome>,
}

impl NetworkRunResult {
    /// Fold per-actor outcomes into the aggregate readiness signal.
    ///
    /// An empty target set is vacuously ready. Ordering of `per_actor` is
    /// preserved as given, so completion order never shows through.
    pub fn from_outcomes(per_actor: Vec<RunOutcome>) -> Self {
        let completed = per_actor.iter().filter(|o| o.reached_terminal).count();
        let coherence_fraction = if per_actor.is_empty() {
            1.0
        } else {
            completed as f64 / per_actor.len() as f64
        };
        Self {
            ready: coherence_fraction == 1.0,
            coherence_fraction,
            per_actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use cascade_engine::SecondaryMetrics;

    use super::*;

    fn outcome(actor_id: &str, reached: bool) -> RunOutcome {
        RunOutcome {
            actor_id: actor_id.to_string(),
            reached_terminal: reached,
            final_state: if reached { "terminal" } else { "syncing" }.to_string(),
            final_coherence: 0.9,
            ticks_used: 7,
            event_log: Vec::new(),
            secondary: SecondaryMetrics::default(),
        }
    }

    #[test]
    fn test_all_reached_terminal_is_ready() {
        let result = NetworkRunResult::from_outcomes(vec![
            outcome("a", true),
            outcome("b", true),
        ]);
        assert!(result.ready);
        assert_eq!(result.coherence_fraction, 1.0);
    }

    #[test]
    fn test_two_of_three_is_not_ready() {
        let result = NetworkRunResult::from_outcomes(vec![
            outcome("a", true),
            outcome("b", false),
            outcome("c", true),
        ]);
        assert!(!result.ready);
        assert!((result.coherence_fraction - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_target_set_is_vacuously_ready() {
        let result = NetworkRunResult::from_outcomes(Vec::new());
        assert!(result.ready);
        assert_eq!(result.coherence_fraction, 1.0);
    }

    #[test]
    fn test_status_ready_requires_full_fraction() {
        let status = NetworkStatus {
            target_actor_ids: vec!["a".to_string(), "b".to_string()],
            completed_actor_ids: vec!["a".to_string()],
            coherence_fraction: 0.5,
        };
        assert!(!status.ready());
    }
}
