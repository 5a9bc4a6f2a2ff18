//! Double-entry ledger capture.
//!
//! This module implements the client side of ledger entry:
//! - Ledger entries as the backend returns them
//! - Draft lines and submission inputs
//! - Debit/credit balance calculation
//! - Batch validation (cardinality, line structure, balance)
//! - Pending/posted aggregates for the posting dashboard

pub mod balance;
pub mod batch;
pub mod entry;
pub mod error;
pub mod summary;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{BalanceLine, BalanceSummary, compute_balance};
pub use batch::LedgerBatch;
pub use entry::{EntryType, LedgerEntry, PostingStatus};
pub use error::LedgerError;
pub use summary::PostingSummary;
pub use types::{LedgerEntryInput, LedgerLineDraft};
pub use validation::{MIN_ENTRIES, validate_entries, validate_line};
