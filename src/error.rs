//! Error types for the anomaly detection engine.

use thiserror::Error;

/// Result type alias for detection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for anomaly detection operations
#[derive(Debug, Error)]
pub enum Error {
    /// Input failed boundary validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
