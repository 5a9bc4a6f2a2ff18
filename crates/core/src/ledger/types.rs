//! Draft and submission types for ledger batches.

use chrono::NaiveDate;
use neraca_shared::types::{AccountDetailId, AccountGeneralId, DraftLineId, Money, money};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entry::EntryType;

/// A ledger line as the operator is composing it. Every field may be absent
/// or invalid until the batch is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLineDraft {
    /// Local row identifier.
    #[serde(default)]
    pub id: DraftLineId,
    /// Ledger date.
    #[serde(default)]
    pub ledger_date: Option<NaiveDate>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Backend ledger classification.
    #[serde(default)]
    pub ledger_type: String,
    /// Debit or credit.
    #[serde(default)]
    pub transaction_type: Option<EntryType>,
    /// General account.
    #[serde(default)]
    pub account_general_id: Option<AccountGeneralId>,
    /// Detail account.
    #[serde(default)]
    pub account_detail_id: Option<AccountDetailId>,
    /// Amount; absent counts as zero for the running totals.
    #[serde(default)]
    pub amount: Option<Money>,
    /// Business reference number.
    #[serde(default)]
    pub reference_number: Option<String>,
}

impl LedgerLineDraft {
    /// Creates an empty draft line with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transaction type and amount.
    #[must_use]
    pub fn with_amount(mut self, transaction_type: EntryType, amount: Money) -> Self {
        self.transaction_type = Some(transaction_type);
        self.amount = Some(amount);
        self
    }
}

/// A validated ledger line, serialized as one element of the `POST /ledgers` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryInput {
    /// Ledger date, `YYYY-MM-DD` on the wire.
    pub ledger_date: NaiveDate,
    /// Free-text description.
    #[validate(length(min = 3, max = 500, message = "must be between 3 and 500 characters"))]
    pub description: String,
    /// Backend ledger classification.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub ledger_type: String,
    /// Debit or credit.
    pub transaction_type: EntryType,
    /// Detail account.
    pub account_detail_id: AccountDetailId,
    /// General account.
    pub account_general_id: AccountGeneralId,
    /// Amount, a JSON number on the wire.
    #[serde(with = "money::as_number")]
    pub amount: Money,
    /// Business reference number, sent only when given.
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
}
