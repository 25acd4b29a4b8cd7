//! Error types for introtrack-core

use thiserror::Error;

/// Main error type for the introtrack-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure (network unreachable, non-success status)
    #[error("transport error: {0}")]
    Transport(String),

    /// Logical failure reported by the collector, or a response the
    /// collector sent that we cannot make sense of
    #[error("collector error: {0}")]
    Collector(String),
}

/// Result type alias for introtrack-core
pub type Result<T> = std::result::Result<T, Error>;
