//! Application error types

use paragon_domain::{AuthError, ValidationError};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Everything an API call can fail with, for UI-level display.
///
/// Validation errors never reach the network layer; auth errors imply
/// the session was already cleared; transport and server errors are
/// surfaced untouched for the caller to interpret.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side input shape violation, raised before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication failure after a failed or impossible refresh.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network-level failure; no response was received.
    #[error(transparent)]
    Transport(#[from] HttpClientError),

    /// Non-2xx response other than 401, body preserved for the caller.
    #[error("server returned {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns the HTTP status for server-side failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
