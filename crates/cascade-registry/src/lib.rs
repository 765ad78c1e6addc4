//! Cascade Registry — actor target set, run outcomes, and the status log.

pub mod registry;
pub mod schema;
pub mod sqlite;

pub use registry::{ActorRegistry, ActorStatus};
pub use sqlite::{LoggedRun, StatusLog};
