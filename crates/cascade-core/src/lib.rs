//! Cascade Core — configuration, state-chain model, errors, cancellation.

pub mod cancel;
pub mod chain;
pub mod config;
pub mod error;

pub use cancel::CancelFlag;
pub use chain::{StateChain, StateDefinition, DEFAULT_SIDE_EFFECT_TAG, TERMINAL_STATE};
pub use config::{AccumulatorConfig, EngineConfig};
pub use error::{Error, Result};
