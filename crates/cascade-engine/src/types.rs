//! Actor-run data types: state, transitions, outcomes.

use serde::{Deserialize, Serialize};

/// One entry in an actor's append-only event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Tick at which the transition fired (1-based).
    pub tick: u32,
    #[serde(rename = "fromState")]
    pub from_state: String,
    #[serde(rename = "toState")]
    pub to_state: String,
    /// Coherence at the moment of transition.
    pub coherence: f64,
}

/// Bounded descriptive metrics in [0, 1].
///
/// Reporting only — gating decisions never consult these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryMetrics {
    /// Coherence relative to the final activation threshold, clamped.
    pub saturation: f64,
    /// Fraction of the chain traversed.
    pub stability: f64,
}

/// Mutable per-actor run state, exclusively owned by its machine.
#[derive(Debug, Clone)]
pub struct ActorState {
    pub actor_id: String,
    /// Index into the chain; equals the chain length once terminal is reached.
    pub state_index: usize,
    pub coherence: f64,
    pub secondary: SecondaryMetrics,
    pub event_log: Vec<TransitionRecord>,
    pub ticks_used: u32,
}

/// Frozen end-of-run record, copied into the registry when a run ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    #[serde(rename = "reachedTerminal")]
    pub reached_terminal: bool,
    #[serde(rename = "finalState")]
    pub final_state: String,
    #[serde(rename = "finalCoherence")]
    pub final_coherence: f64,
    #[serde(rename = "ticksUsed")]
    pub ticks_used: u32,
    #[serde(rename = "eventLog")]
    pub event_log: Vec<TransitionRecord>,
    pub secondary: SecondaryMetrics,
}

impl RunOutcome {
    /// Human-readable full/partial description for status surfaces.
    pub fn classification(&self) -> String {
        if self.reached_terminal {
            "full activation".to_string()
        } else {
            format!(
                "partial activation (stability {:.2}, saturation {:.2})",
                self.secondary.stability, self.secondary.saturation
            )
        }
    }
}
