//! Transport-level errors from the backend.

use neraca_shared::AppError;
use thiserror::Error;

use crate::retry::RequestKind;

/// Errors talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The connection was never established; the request was not sent.
    #[error("Could not connect to the server: {0}")]
    Connect(String),

    /// No response within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection failed after the request may have been sent.
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered 5xx.
    #[error("Server error ({status})")]
    Server {
        /// HTTP status.
        status: u16,
        /// Backend message, if any.
        message: Option<String>,
    },

    /// The backend refused the request with a 4xx business-rule failure.
    #[error("Request rejected ({status})")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Backend message, if any.
        message: Option<String>,
    },

    /// The backend answered 401.
    #[error("Authentication required")]
    Unauthorized {
        /// Backend message, if any.
        message: Option<String>,
    },

    /// The backend answered 403.
    #[error("Access denied")]
    Forbidden {
        /// Backend message, if any.
        message: Option<String>,
    },

    /// The response could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The backend answered 2xx with `success: false`.
    #[error("Request was not successful")]
    Unsuccessful {
        /// Backend message, if any.
        message: Option<String>,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl ClientError {
    /// Returns the error code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect(_) => "CONNECT_FAILED",
            Self::Timeout(_) => "TIMEOUT",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Server { .. } => "SERVER_ERROR",
            Self::Rejected { .. } => "REJECTED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Unsuccessful { .. } => "UNSUCCESSFUL",
        }
    }

    /// Returns true if a request of `kind` may be sent again after this error.
    ///
    /// Reads retry on any connectivity failure or 5xx. Writes retry only
    /// when the request provably never left the client.
    #[must_use]
    pub fn is_retryable(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Read => matches!(
                self,
                Self::Connect(_) | Self::Timeout(_) | Self::Transport(_) | Self::Server { .. }
            ),
            RequestKind::Write => matches!(self, Self::Connect(_)),
        }
    }

    /// The backend's own message, if it sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. }
            | Self::Rejected { message, .. }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Unsuccessful { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty()),
            Self::Connect(_) | Self::Timeout(_) | Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Converts into an operator-facing error, preferring the backend message
    /// and otherwise using `fallback`.
    #[must_use]
    pub fn into_app_error(self, fallback: &str) -> AppError {
        let notice = self.backend_message().unwrap_or(fallback).to_string();
        match self {
            Self::Connect(_) | Self::Timeout(_) | Self::Transport(_) | Self::Server { .. } => {
                AppError::Unavailable(notice)
            }
            Self::Rejected { .. } | Self::Unsuccessful { .. } => AppError::Rejected(notice),
            Self::Unauthorized { .. } => AppError::Unauthorized(notice),
            Self::Forbidden { .. } => AppError::Forbidden(notice),
            Self::Decode(detail) => AppError::Internal(format!("{fallback}: {detail}")),
        }
    }
}
