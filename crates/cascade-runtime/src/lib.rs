//! Cascade Runtime — network orchestration and readiness aggregation.

pub mod orchestrator;
pub mod types;

pub use orchestrator::NetworkOrchestrator;
pub use types::{NetworkRunResult, NetworkStatus};
