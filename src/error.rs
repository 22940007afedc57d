//! Error types for pollconf

use std::io;
use thiserror::Error;

/// Result type for pollconf operations
pub type Result<T> = std::result::Result<T, PollconfError>;

/// Errors that can occur in pollconf
#[derive(Debug, Error)]
pub enum PollconfError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Poller count rejected by the engine
    #[error("Invalid number of loops: {0} (must be > 0)")]
    InvalidLoopCount(i32),

    /// Tuning attempted after the event loop started
    #[error("Poller tuning is closed: the event loop has already started")]
    TuningClosed,

    /// Engine failure surfaced while applying file-based tuning
    #[error("Tuning failed: {0}")]
    Tuning(String),
}
