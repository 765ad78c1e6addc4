//! Cascade Engine — coherence accumulation and the per-actor activation machine.

pub mod accumulator;
pub mod machine;
pub mod types;

pub use accumulator::CoherenceAccumulator;
pub use machine::{ActivationMachine, TickOutcome};
pub use types::{ActorState, RunOutcome, SecondaryMetrics, TransitionRecord};
