//! Kitchen API error types.

use thiserror::Error;

/// Errors returned by the kitchen endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No session token is stored; the caller must log in first.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Server answered 401. The stored token has already been cleared.
    #[error("session expired")]
    Unauthorized,

    /// Non-2xx response other than 401.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response carrying `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// No response: connection refused, DNS failure, reset.
    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("client setup error: {0}")]
    Client(String),
}

/// Coarse failure classes used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal to the session; redirect to login.
    Authentication,
    /// Recoverable; the next scheduled poll retries.
    Transport,
    /// Recoverable; the server explained what went wrong.
    Application,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotAuthenticated | ApiError::Unauthorized => ErrorKind::Authentication,
            ApiError::Transport(_) | ApiError::Timeout { .. } | ApiError::Client(_) => {
                ErrorKind::Transport
            }
            ApiError::Status { .. } | ApiError::Rejected(_) | ApiError::Decode(_) => {
                ErrorKind::Application
            }
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}

/// Convenience alias for kitchen API results.
pub type ApiResult<T> = Result<T, ApiError>;
