//! Ledger error types for batch validation.

use neraca_shared::types::Money;
use thiserror::Error;

/// Errors that can occur while validating a ledger batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Batch must have at least 2 entries.
    #[error("A ledger batch must have at least 2 entries, got {count}")]
    InsufficientEntries {
        /// Number of entries in the batch.
        count: usize,
    },

    /// A required field is absent on a line.
    #[error("Line {line}: {field} is required")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Wire name of the field.
        field: &'static str,
    },

    /// A field violates its length or format rule.
    #[error("Line {line}: {field} {message}")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Wire name of the field.
        field: String,
        /// What is wrong with the value.
        message: String,
    },

    /// Entry amount must be greater than zero.
    #[error("Line {line}: amount must be greater than zero")]
    NonPositiveAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Batch is not balanced (debits != credits, or both zero).
    #[error(
        "Ledger batch is not balanced. Debit: {debit}, Credit: {credit}, Difference: {}",
        difference(.debit, .credit)
    )]
    Unbalanced {
        /// Total debit amount.
        debit: Money,
        /// Total credit amount.
        credit: Money,
    },

    /// Debit or credit total does not fit in the amount range.
    #[error("Ledger batch totals exceed the supported amount range")]
    AmountOverflow,
}

fn difference(debit: &Money, credit: &Money) -> Money {
    debit.abs_diff(*credit)
}

impl LedgerError {
    /// Returns the error code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientEntries { .. } => "INSUFFICIENT_ENTRIES",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_BATCH",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
        }
    }

    /// Returns the 1-based line the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingField { line, .. }
            | Self::InvalidField { line, .. }
            | Self::NonPositiveAmount { line } => Some(*line),
            Self::InsufficientEntries { .. } | Self::Unbalanced { .. } | Self::AmountOverflow => {
                None
            }
        }
    }
}
