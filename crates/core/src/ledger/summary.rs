//! Pending/posted aggregates shown on the posting dashboard.

use chrono::NaiveDate;
use neraca_shared::types::Money;
use serde::Serialize;

use super::entry::{EntryType, LedgerEntry};

/// Counts and debit-side volume of pending and posted entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingSummary {
    /// Entries still waiting for Buku Besar.
    pub pending_count: usize,
    /// Entries already posted.
    pub posted_count: usize,
    /// Sum of pending debit amounts.
    pub pending_debit: Money,
    /// Sum of posted debit amounts.
    pub posted_debit: Money,
}

impl PostingSummary {
    /// Aggregates `entries`, keeping only those on `ledger_date` when given.
    pub fn from_entries<'a, I>(entries: I, ledger_date: Option<NaiveDate>) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| ledger_date.is_none_or(|date| entry.ledger_date == date))
            .fold(Self::default(), |mut acc, entry| {
                let debit = match entry.transaction_type {
                    EntryType::Debit => entry.amount,
                    EntryType::Credit => Money::ZERO,
                };
                if entry.is_posted() {
                    acc.posted_count += 1;
                    acc.posted_debit = acc.posted_debit.saturating_add(debit);
                } else {
                    acc.pending_count += 1;
                    acc.pending_debit = acc.pending_debit.saturating_add(debit);
                }
                acc
            })
    }

    /// Total number of entries counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pending_count + self.posted_count
    }

    /// Returns true if there is something for Buku Besar to post.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_count > 0
    }

    /// Returns true if entries exist and all of them are posted.
    #[must_use]
    pub fn is_fully_posted(&self) -> bool {
        self.pending_count == 0 && self.posted_count > 0
    }
}
