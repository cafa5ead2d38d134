//! Session store error types

use thiserror::Error;

/// Errors that can occur while reading or writing the session
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored session could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
