//! Editable ledger batch with a running balance.

use neraca_shared::types::{DraftLineId, Money};

use super::balance::{BalanceSummary, compute_balance};
use super::entry::EntryType;
use super::error::LedgerError;
use super::types::{LedgerEntryInput, LedgerLineDraft};
use super::validation::validate_entries;

/// An ordered set of draft lines being composed for one submission.
///
/// The balance summary is recomputed after every mutation, so `summary()`
/// always reflects the current lines.
#[derive(Debug, Clone, Default)]
pub struct LedgerBatch {
    lines: Vec<LedgerLineDraft>,
    summary: BalanceSummary,
}

impl LedgerBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a batch from existing lines.
    #[must_use]
    pub fn from_lines(lines: Vec<LedgerLineDraft>) -> Self {
        let summary = compute_balance(&lines);
        Self { lines, summary }
    }

    /// Returns the lines in order.
    #[must_use]
    pub fn lines(&self) -> &[LedgerLineDraft] {
        &self.lines
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the batch has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the current debit/credit totals.
    #[must_use]
    pub fn summary(&self) -> BalanceSummary {
        self.summary
    }

    /// Looks up a line by id.
    #[must_use]
    pub fn line(&self, id: DraftLineId) -> Option<&LedgerLineDraft> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Appends a line and returns its id.
    pub fn push(&mut self, line: LedgerLineDraft) -> DraftLineId {
        let id = line.id;
        self.lines.push(line);
        self.refresh();
        id
    }

    /// Removes a line, returning it if it existed.
    pub fn remove(&mut self, id: DraftLineId) -> Option<LedgerLineDraft> {
        let index = self.lines.iter().position(|line| line.id == id)?;
        let removed = self.lines.remove(index);
        self.refresh();
        Some(removed)
    }

    /// Edits a line in place. Returns false if no line has `id`.
    pub fn update<F>(&mut self, id: DraftLineId, edit: F) -> bool
    where
        F: FnOnce(&mut LedgerLineDraft),
    {
        let Some(line) = self.lines.iter_mut().find(|line| line.id == id) else {
            return false;
        };
        edit(line);
        self.refresh();
        true
    }

    /// Sets or clears a line's amount.
    pub fn set_amount(&mut self, id: DraftLineId, amount: Option<Money>) -> bool {
        self.update(id, |line| line.amount = amount)
    }

    /// Sets or clears a line's transaction type.
    pub fn set_transaction_type(&mut self, id: DraftLineId, entry_type: Option<EntryType>) -> bool {
        self.update(id, |line| line.transaction_type = entry_type)
    }

    /// Runs the full submission check and returns the inputs to send.
    ///
    /// # Errors
    ///
    /// Returns the first cardinality, structural or balance violation.
    pub fn validate(&self) -> Result<Vec<LedgerEntryInput>, LedgerError> {
        validate_entries(&self.lines)
    }

    /// Returns true if the batch would pass `validate`.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Empties the batch, e.g. after a successful submission.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.summary = compute_balance(&self.lines);
    }
}
