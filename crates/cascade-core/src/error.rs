//! Error types for Cascade.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate actor: {0}")]
    DuplicateActor(String),

    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
