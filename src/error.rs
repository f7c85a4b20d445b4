//! Error types for the ladder engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("Malformed match line: {reason}")]
    MalformedMatch { reason: String },

    #[error("Unknown win type: {token}")]
    UnknownWinType { token: String },

    #[error("Malformed command: {reason}")]
    MalformedCommand { reason: String },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("Player already exists: {name}")]
    DuplicatePlayer { name: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
