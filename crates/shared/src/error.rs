//! Errors surfaced to the operator.
//!
//! Every operator action ends in either a result or exactly one `AppError`.
//! Domain crates keep their own structured errors and convert into this
//! taxonomy at the controller boundary.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Outcome of a failed operator action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Structural validation failed before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Debits and credits do not balance.
    #[error("{0}")]
    Unbalanced(String),

    /// The action is not available yet (missing calculation, stage order, busy).
    #[error("Prerequisite not met: {0}")]
    PrerequisiteNotMet(String),

    /// No authenticated session.
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// The session role lacks the capability for this action.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The backend refused the request (business rule, already posted, ...).
    #[error("{0}")]
    Rejected(String),

    /// Network or server failure after the retry policy gave up.
    #[error("{0}")]
    Unavailable(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for notices and logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unbalanced(_) => "UNBALANCED_BATCH",
            Self::PrerequisiteNotMet(_) => "PREREQUISITE_NOT_MET",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Rejected(_) => "REJECTED",
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the error was raised locally and no request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Unbalanced(_)
                | Self::PrerequisiteNotMet(_)
                | Self::Unauthorized(_)
                | Self::Forbidden(_)
        )
    }

    /// Returns true if retrying the same action later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
