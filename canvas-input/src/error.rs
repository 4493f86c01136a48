//! Error types for input configuration.

use thiserror::Error;

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Errors that can occur when configuring input handling.
///
/// Classification itself never fails; these only arise at the
/// configuration surface.
#[derive(Debug, Error)]
pub enum InputError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
