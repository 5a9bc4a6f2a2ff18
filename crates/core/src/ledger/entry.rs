//! Ledger entries as the backend stores and lists them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use neraca_shared::types::{AccountDetailId, AccountGeneralId, LedgerEntryId, Money};
use serde::{Deserialize, Deserializer, Serialize, de};

/// Side of a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl EntryType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBIT" | "D" => Ok(Self::Debit),
            "CREDIT" | "K" | "C" => Ok(Self::Credit),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// Posting status of a persisted ledger entry. Set by the backend only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostingStatus {
    /// Captured but not yet posted to the general ledger.
    #[default]
    Pending,
    /// Posted by a Buku Besar posting.
    Posted,
}

impl PostingStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Posted => "POSTED",
        }
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "POSTED" => Ok(Self::Posted),
            _ => Err(format!("Unknown posting status: {s}")),
        }
    }
}

/// A persisted ledger entry as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Backend identifier.
    pub id: LedgerEntryId,
    /// Ledger date; posting groups entries by this day.
    #[serde(deserialize_with = "ledger_date")]
    pub ledger_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Backend ledger classification.
    #[serde(default)]
    pub ledger_type: Option<String>,
    /// Debit or credit.
    pub transaction_type: EntryType,
    /// Detail account posted to.
    pub account_detail_id: AccountDetailId,
    /// General account the detail account belongs to.
    pub account_general_id: AccountGeneralId,
    /// Amount as the backend reports it. Batches from this client only
    /// submit positive amounts; listings are not re-checked.
    pub amount: Money,
    /// Business reference number.
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Posting status.
    #[serde(default)]
    pub posting_status: PostingStatus,
    /// When the entry was posted by Buku Besar.
    #[serde(default)]
    pub posting_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Amount with credits negated.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.transaction_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => Money::from_minor(-self.amount.minor_units()),
        }
    }

    /// Returns true if the entry has been posted to the general ledger.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.posting_status == PostingStatus::Posted
    }
}

/// Accepts both `2025-08-25` and full timestamps such as `2025-08-25T00:00:00.000Z`.
fn ledger_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_json(posting_status: &str) -> serde_json::Value {
        json!({
            "id": "0190f1a2-7b3c-7d4e-8f90-a1b2c3d4e5f6",
            "ledgerDate": "2025-08-25T00:00:00.000Z",
            "description": "Setoran kas",
            "ledgerType": "KAS",
            "transactionType": "CREDIT",
            "accountDetailId": "0190f1a2-7b3c-7d4e-8f90-a1b2c3d4e5f7",
            "accountGeneralId": "0190f1a2-7b3c-7d4e-8f90-a1b2c3d4e5f8",
            "amount": "100000.00",
            "postingStatus": posting_status,
        })
    }

    #[test]
    fn test_listing_amount_taken_as_reported() {
        let mut value = entry_json("PENDING");
        value["amount"] = json!("-2500.00");
        let entry: LedgerEntry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.amount, Money::from_minor(-250_000));
        assert_eq!(entry.signed_amount(), Money::from_minor(250_000));
    }

    #[test]
    fn test_deserialize_backend_entry() {
        let entry: LedgerEntry = serde_json::from_value(entry_json("POSTED")).unwrap();
        assert_eq!(entry.ledger_date, NaiveDate::from_ymd_opt(2025, 8, 25).unwrap());
        assert_eq!(entry.transaction_type, EntryType::Credit);
        assert_eq!(entry.amount, Money::from_minor(10_000_000));
        assert!(entry.is_posted());
        assert!(entry.reference_number.is_none());
    }

    #[test]
    fn test_signed_amount() {
        let credit: LedgerEntry = serde_json::from_value(entry_json("PENDING")).unwrap();
        assert_eq!(credit.signed_amount(), Money::from_minor(-10_000_000));

        let debit = LedgerEntry {
            transaction_type: EntryType::Debit,
            ..credit
        };
        assert_eq!(debit.signed_amount(), Money::from_minor(10_000_000));
        assert!(!debit.is_posted());
    }

    #[test]
    fn test_entry_type_parse() {
        assert_eq!("debit".parse::<EntryType>().unwrap(), EntryType::Debit);
        assert_eq!("CREDIT".parse::<EntryType>().unwrap(), EntryType::Credit);
        assert!("transfer".parse::<EntryType>().is_err());
        assert_eq!(serde_json::to_string(&EntryType::Debit).unwrap(), "\"DEBIT\"");
    }
}
