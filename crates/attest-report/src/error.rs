//! Report emission errors

use thiserror::Error;

/// Errors raised while emitting a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Writing the report failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the report failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
