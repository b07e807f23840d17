//! Model-level error taxonomy.
//!
//! These errors are returned synchronously from model mutations and record
//! loads. Presentation code decides how to surface them to the user.

use thiserror::Error;

/// Errors raised by keymap, macro library and persisted-record operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Input rejected before any mutation took place (e.g. bad macro name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not permitted in the current state (e.g. removing the last layer).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A persisted record could not be read or did not have the expected shape.
    #[error("Malformed {record} record: {message}")]
    PersistedState {
        /// Which record failed (e.g. "configuration", "macro library")
        record: &'static str,
        /// What was wrong with it
        message: String,
    },
}

impl ModelError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an invalid-operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Creates a persisted-state error for the named record.
    pub fn persisted(record: &'static str, message: impl Into<String>) -> Self {
        Self::PersistedState {
            record,
            message: message.into(),
        }
    }
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
