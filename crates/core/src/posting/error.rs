//! Posting workflow error types.

use neraca_shared::AppError;
use thiserror::Error;

use super::stage::PostingStage;
use crate::ledger::LedgerError;

/// Errors raised locally before a posting request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// Date text does not match the expected layout.
    #[error("Invalid date '{input}', expected {expected}")]
    InvalidDate {
        /// What the operator entered.
        input: String,
        /// Expected layout, e.g. `YYYY-MM-DD`.
        expected: &'static str,
    },

    /// No date was chosen.
    #[error("A date is required")]
    MissingDate,

    /// A later stage was requested before the stages ahead of it.
    #[error("{stage} cannot be posted before {required}")]
    OutOfOrder {
        /// The stage requested.
        stage: PostingStage,
        /// The stage that has to be posted first.
        required: PostingStage,
    },

    /// The stage is already posted for this period.
    #[error("{stage} is already posted for this period")]
    AlreadyPosted {
        /// The stage requested.
        stage: PostingStage,
    },

    /// Unpost requested for a stage that is not posted.
    #[error("{stage} is not posted for this period")]
    NotPosted {
        /// The stage requested.
        stage: PostingStage,
    },

    /// Unpost requested while a later stage is still posted.
    #[error("Cannot unpost {stage} while {dependent} is posted")]
    DependentStagePosted {
        /// The stage requested.
        stage: PostingStage,
        /// The later stage that depends on it.
        dependent: PostingStage,
    },

    /// The stage has no unpost operation.
    #[error("{stage} cannot be unposted")]
    UnpostNotSupported {
        /// The stage requested.
        stage: PostingStage,
    },

    /// Neraca Akhir is posted; the period accepts no further changes.
    #[error("The accounting period is closed")]
    PeriodClosed,

    /// Neraca Balance needs a calculation before it can be posted.
    #[error("Calculate Neraca Balance for the selected date before posting")]
    CalculationUnavailable,

    /// The calculation returned by the backend cannot be used.
    #[error("Neraca Balance calculation is invalid: {0}")]
    InvalidCalculation(String),

    /// A request for the stage is already in flight.
    #[error("{stage} is already being processed")]
    StageBusy {
        /// The busy stage.
        stage: PostingStage,
    },
}

impl PostingError {
    /// Returns the error code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::MissingDate => "MISSING_DATE",
            Self::OutOfOrder { .. } => "OUT_OF_ORDER",
            Self::AlreadyPosted { .. } => "ALREADY_POSTED",
            Self::NotPosted { .. } => "NOT_POSTED",
            Self::DependentStagePosted { .. } => "DEPENDENT_STAGE_POSTED",
            Self::UnpostNotSupported { .. } => "UNPOST_NOT_SUPPORTED",
            Self::PeriodClosed => "PERIOD_CLOSED",
            Self::CalculationUnavailable => "CALCULATION_UNAVAILABLE",
            Self::InvalidCalculation(_) => "INVALID_CALCULATION",
            Self::StageBusy { .. } => "STAGE_BUSY",
        }
    }
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::InvalidDate { .. }
            | PostingError::MissingDate
            | PostingError::UnpostNotSupported { .. } => Self::Validation(err.to_string()),
            PostingError::InvalidCalculation(_) => Self::Internal(err.to_string()),
            PostingError::OutOfOrder { .. }
            | PostingError::AlreadyPosted { .. }
            | PostingError::NotPosted { .. }
            | PostingError::DependentStagePosted { .. }
            | PostingError::PeriodClosed
            | PostingError::CalculationUnavailable
            | PostingError::StageBusy { .. } => Self::PrerequisiteNotMet(err.to_string()),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unbalanced { .. } | LedgerError::AmountOverflow => {
                Self::Unbalanced(err.to_string())
            }
            LedgerError::InsufficientEntries { .. }
            | LedgerError::MissingField { .. }
            | LedgerError::InvalidField { .. }
            | LedgerError::NonPositiveAmount { .. } => Self::Validation(err.to_string()),
        }
    }
}
