//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// A configuration value was rejected, e.g. an unknown reward policy name.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An action outside of the action space was given to an environment.
    #[error("Invalid action: {0}")]
    InvalidAction(i64),

    /// An operation was called in a state that does not allow it,
    /// e.g. stepping an environment that has not been reset.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A replay buffer was asked for more transitions than it holds.
    #[error("Insufficient data: requested {requested}, available {available}")]
    InsufficientData {
        /// Number of requested items.
        requested: usize,

        /// Number of stored items.
        available: usize,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
