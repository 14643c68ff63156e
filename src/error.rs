//! Error types for the virtual agent face control loop.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Named input is not exposed by the state machine
    #[error(
        "Input '{input}' not found in '{machine}'. Available: {}",
        .available.join(", ")
    )]
    InputNotFound {
        /// Requested input name
        input: String,
        /// State machine that was queried
        machine: String,
        /// Inputs the state machine actually exposes (may be empty)
        available: Vec<String>,
    },

    /// Layout is incomplete or the canvas is not loaded yet
    #[error("Transform unavailable: {0}")]
    TransformUnavailable(String),

    /// Animation host rejected a pointer or input update
    #[error("Forwarding error: {0}")]
    Forwarding(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

impl Error {
    /// Whether a scheduling loop should retry after this error
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::TransformUnavailable(_) | Self::Forwarding(_))
    }
}

/// Application-specific error type (alias for main Error type)
pub type AppError = Error;

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
