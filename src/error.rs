//! Error types for codestep.
//!
//! Library functions return `Result<T, SimError>` instead of panicking.
//! Only [`SimError::InvalidMove`] is produced while a script runs, and the
//! stepper recovers from it locally; the remaining variants belong to
//! configuration loading and CLI plumbing.

use thiserror::Error;

/// Result type alias for codestep operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all codestep operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Run-time violations =====
    /// A movement would take the turtle off the board.
    #[error("invalid move: turtle would leave the board at ({x:.3}, {y:.3})")]
    InvalidMove {
        /// Rejected x coordinate.
        x: f64,
        /// Rejected y coordinate.
        y: f64,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
