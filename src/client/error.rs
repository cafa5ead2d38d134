//! Client error types
//!
//! Every failure a caller can observe from the HTTP client, grouped by
//! [`ErrorKind`] so views can decide between re-login, an inline error with
//! a retry button, or a validation message.

use crate::session::SessionError;
use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) and the layers above it
#[derive(Error, Debug)]
pub enum ClientError {
    /// Refresh failed or was impossible; the session has been cleared
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Refresh attempted without a stored refresh token
    #[error("No refresh token available")]
    NoRefreshToken,

    /// Server still rejected the request after one refresh-and-retry
    #[error("Request unauthorized after credential refresh")]
    Unauthorized,

    /// Login rejected by the authentication service
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Request rejected before or by the server as malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-success HTTP status other than the handled 401
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),
}

/// Coarse classification used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable credentials; send the user back to login
    Unauthenticated,
    /// Network or server failure; show inline error, allow manual retry
    Transport,
    /// Bad user input such as wrong credentials
    Validation,
    /// Local failure (session persistence)
    Internal,
}

impl ClientError {
    /// Map a transport-level failure, separating timeouts and refused connections
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::SessionExpired
            | ClientError::NoRefreshToken
            | ClientError::Unauthorized => ErrorKind::Unauthenticated,
            ClientError::InvalidCredentials | ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Api { .. }
            | ClientError::Timeout
            | ClientError::Unavailable
            | ClientError::Request(_)
            | ClientError::Decode(_) => ErrorKind::Transport,
            ClientError::Session(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn requires_login(&self) -> bool {
        self.kind() == ErrorKind::Unauthenticated
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
