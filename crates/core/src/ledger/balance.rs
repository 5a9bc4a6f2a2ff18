//! Debit/credit totals for a set of ledger lines.

use neraca_shared::types::Money;
use serde::Serialize;

use super::entry::{EntryType, LedgerEntry};
use super::types::{LedgerEntryInput, LedgerLineDraft};

/// Anything that contributes to debit/credit totals.
pub trait BalanceLine {
    /// Debit or credit; `None` contributes to neither total.
    fn entry_type(&self) -> Option<EntryType>;
    /// Amount; absent amounts count as zero.
    fn amount(&self) -> Money;
}

impl BalanceLine for LedgerLineDraft {
    fn entry_type(&self) -> Option<EntryType> {
        self.transaction_type
    }

    fn amount(&self) -> Money {
        self.amount.unwrap_or(Money::ZERO)
    }
}

impl BalanceLine for LedgerEntryInput {
    fn entry_type(&self) -> Option<EntryType> {
        Some(self.transaction_type)
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl BalanceLine for LedgerEntry {
    fn entry_type(&self) -> Option<EntryType> {
        Some(self.transaction_type)
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl<T: BalanceLine + ?Sized> BalanceLine for &T {
    fn entry_type(&self) -> Option<EntryType> {
        (**self).entry_type()
    }

    fn amount(&self) -> Money {
        (**self).amount()
    }
}

/// Debit/credit totals and the balance verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Sum of debit amounts.
    pub total_debit: Money,
    /// Sum of credit amounts.
    pub total_credit: Money,
    /// Debits equal credits and are non-zero.
    pub is_balanced: bool,
    /// A total does not fit in the amount range; the totals shown are clamped.
    pub out_of_range: bool,
}

impl BalanceSummary {
    /// Builds a summary from totals.
    #[must_use]
    pub fn new(total_debit: Money, total_credit: Money) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit && total_debit.is_positive(),
            out_of_range: false,
        }
    }

    /// Builds a summary from exact totals, which may exceed the amount range.
    fn from_exact(debit: i128, credit: i128) -> Self {
        match (i64::try_from(debit), i64::try_from(credit)) {
            (Ok(debit), Ok(credit)) => Self::new(Money::from_minor(debit), Money::from_minor(credit)),
            _ => Self {
                total_debit: clamp(debit),
                total_credit: clamp(credit),
                is_balanced: false,
                out_of_range: true,
            },
        }
    }

    /// Absolute difference between the debit and credit totals.
    #[must_use]
    pub fn difference(&self) -> Money {
        self.total_debit.abs_diff(self.total_credit)
    }

    /// One-line indicator text for the batch footer.
    #[must_use]
    pub fn indicator(&self) -> String {
        if self.out_of_range {
            "Not balanced: totals exceed the supported amount range".to_string()
        } else if self.is_balanced {
            format!("Balanced ({})", self.total_debit)
        } else {
            format!(
                "Not balanced: debit {}, credit {}, difference {}",
                self.total_debit,
                self.total_credit,
                self.difference()
            )
        }
    }
}

fn clamp(total: i128) -> Money {
    let minor = i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX });
    Money::from_minor(minor)
}

/// Computes debit and credit totals in a single pass.
///
/// Lines without a transaction type contribute to neither total. The result
/// does not depend on line order. Totals are summed exactly; a total outside
/// the amount range marks the summary `out_of_range` and never balanced.
pub fn compute_balance<L: BalanceLine>(lines: &[L]) -> BalanceSummary {
    let (debit, credit) = lines
        .iter()
        .fold((0_i128, 0_i128), |(debit, credit), line| {
            let minor = i128::from(line.amount().minor_units());
            match line.entry_type() {
                Some(EntryType::Debit) => (debit + minor, credit),
                Some(EntryType::Credit) => (debit, credit + minor),
                None => (debit, credit),
            }
        });
    BalanceSummary::from_exact(debit, credit)
}
