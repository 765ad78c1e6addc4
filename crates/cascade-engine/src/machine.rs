//! Per-actor activation machine — coherence-gated forward transitions.

use std::sync::Arc;

use cascade_core::{AccumulatorConfig, CancelFlag, EngineConfig, Result, StateChain};
use tracing::debug;

use crate::accumulator::CoherenceAccumulator;
use crate::types::{ActorState, RunOutcome, SecondaryMetrics, TransitionRecord};

/// Result of a single tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// The transition taken this tick, if any.
    pub transitioned: Option<TransitionRecord>,
    /// Whether the run has reached the terminal state.
    pub reached_terminal: bool,
}

/// Drives one actor through the state chain, one tick at a time.
///
/// Each machine exclusively owns its [`ActorState`]; multiple actors (and
/// multiple test runs) never share mutable state.
pub struct ActivationMachine {
    chain: Arc<StateChain>,
    accumulator: CoherenceAccumulator,
    state: ActorState,
}

impl ActivationMachine {
    /// Create a fresh machine for `actor_id` at the chain's initial state.
    pub fn initialize(config: &EngineConfig, actor_id: &str) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_shared_chain(
            Arc::new(config.chain.clone()),
            &config.accumulator,
            config.seed_coherence,
            actor_id,
        ))
    }

    /// Create a machine over an already-validated shared chain.
    ///
    /// Used by the orchestrator, which validates once and then builds one
    /// machine per target actor.
    pub fn with_shared_chain(
        chain: Arc<StateChain>,
        accumulator: &AccumulatorConfig,
        seed_coherence: f64,
        actor_id: &str,
    ) -> Self {
        let mut machine = Self {
            chain,
            accumulator: CoherenceAccumulator::new(accumulator.clone()),
            state: ActorState {
                actor_id: actor_id.to_string(),
                state_index: 0,
                coherence: seed_coherence,
                secondary: SecondaryMetrics::default(),
                event_log: Vec::new(),
                ticks_used: 0,
            },
        };
        machine.update_secondary();
        machine
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    pub fn current_state_name(&self) -> &str {
        self.chain.state_name(self.state.state_index)
    }

    pub fn reached_terminal(&self) -> bool {
        self.state.state_index >= self.chain.len()
    }

    /// Advance one tick: pull the next coherence value and take at most one
    /// forward transition if the active threshold is met.
    ///
    /// A tick that adds less than the base increment is normal — only the
    /// threshold comparison matters, never tick-to-tick monotonicity.
    pub fn advance_one_tick(&mut self) -> TickOutcome {
        if self.reached_terminal() {
            return TickOutcome {
                transitioned: None,
                reached_terminal: true,
            };
        }

        self.state.ticks_used += 1;
        let tick = self.state.ticks_used;
        self.state.coherence = self.accumulator.next(tick, self.state.coherence);

        let mut transitioned = None;
        let def = &self.chain.states()[self.state.state_index];
        if self.state.coherence >= def.activation_threshold {
            let record = TransitionRecord {
                tick,
                from_state: def.name.clone(),
                to_state: self.chain.state_name(self.state.state_index + 1).to_string(),
                coherence: self.state.coherence,
            };
            debug!(
                "Actor {} transition {} -> {} at tick {} ({})",
                self.state.actor_id, record.from_state, record.to_state, tick, def.side_effect_tag
            );
            self.state.event_log.push(record.clone());
            self.state.state_index += 1;
            transitioned = Some(record);
        }

        self.update_secondary();
        TickOutcome {
            transitioned,
            reached_terminal: self.reached_terminal(),
        }
    }

    /// Tick up to `max_ticks` times or until terminal, whichever comes first.
    ///
    /// Budget exhaustion is a partial outcome, not an error.
    pub fn run_to_completion(&mut self, max_ticks: u32) -> RunOutcome {
        self.run_until(max_ticks, &CancelFlag::new())
    }

    /// Like [`ActivationMachine::run_to_completion`], stopping at the next
    /// tick boundary once `cancel` is raised. A cancelled run reports as
    /// partial with however many ticks it completed.
    pub fn run_until(&mut self, max_ticks: u32, cancel: &CancelFlag) -> RunOutcome {
        while self.state.ticks_used < max_ticks && !self.reached_terminal() {
            if cancel.is_cancelled() {
                break;
            }
            self.advance_one_tick();
        }
        self.freeze()
    }

    /// Copy the current state into a frozen outcome record.
    fn freeze(&self) -> RunOutcome {
        RunOutcome {
            actor_id: self.state.actor_id.clone(),
            reached_terminal: self.reached_terminal(),
            final_state: self.current_state_name().to_string(),
            final_coherence: self.state.coherence,
            ticks_used: self.state.ticks_used,
            event_log: self.state.event_log.clone(),
            secondary: self.state.secondary,
        }
    }

    fn update_secondary(&mut self) {
        let final_threshold = self.chain.final_threshold();
        self.state.secondary = SecondaryMetrics {
            saturation: (self.state.coherence / final_threshold).clamp(0.0, 1.0),
            stability: self.state.state_index as f64 / self.chain.len() as f64,
        };
    }
}
