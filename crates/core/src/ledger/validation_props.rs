//! Property-based tests for the balance validator.

use chrono::NaiveDate;
use neraca_shared::types::{AccountDetailId, AccountGeneralId, Money};
use proptest::prelude::*;

use super::balance::compute_balance;
use super::entry::EntryType;
use super::error::LedgerError;
use super::types::LedgerLineDraft;
use super::validation::validate_entries;

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_minor() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn make_line(entry_type: EntryType, minor: i64) -> LedgerLineDraft {
    LedgerLineDraft {
        ledger_date: NaiveDate::from_ymd_opt(2025, 8, 25),
        description: "Jurnal umum".to_string(),
        ledger_type: "UMUM".to_string(),
        account_general_id: Some(AccountGeneralId::new()),
        account_detail_id: Some(AccountDetailId::new()),
        ..LedgerLineDraft::default()
    }
    .with_amount(entry_type, Money::from_minor(minor))
}

fn lines_strategy(min: usize) -> impl Strategy<Value = Vec<LedgerLineDraft>> {
    prop::collection::vec((entry_type_strategy(), positive_minor()), min..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(entry_type, minor)| make_line(entry_type, minor))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A batch of 2+ valid lines passes iff debit total == credit total > 0.
    #[test]
    fn prop_balanced_iff_equal_positive_totals(lines in lines_strategy(2)) {
        let debit: i64 = lines
            .iter()
            .filter(|l| l.transaction_type == Some(EntryType::Debit))
            .filter_map(|l| l.amount)
            .map(Money::minor_units)
            .sum();
        let credit: i64 = lines
            .iter()
            .filter(|l| l.transaction_type == Some(EntryType::Credit))
            .filter_map(|l| l.amount)
            .map(Money::minor_units)
            .sum();

        let expected = debit == credit && debit > 0;
        prop_assert_eq!(compute_balance(&lines).is_balanced, expected);
        prop_assert_eq!(validate_entries(&lines).is_ok(), expected);
    }

    /// Mirroring every debit with an equal credit always balances.
    #[test]
    fn prop_mirrored_batch_balances(amounts in prop::collection::vec(positive_minor(), 1..6)) {
        let lines: Vec<_> = amounts
            .iter()
            .flat_map(|&minor| [make_line(EntryType::Debit, minor), make_line(EntryType::Credit, minor)])
            .collect();
        prop_assert!(compute_balance(&lines).is_balanced);
        prop_assert_eq!(validate_entries(&lines).map(|inputs| inputs.len()), Ok(lines.len()));
    }

    /// Fewer than 2 lines is rejected for cardinality regardless of balance.
    #[test]
    fn prop_small_batches_rejected(lines in lines_strategy(0).prop_map(|mut l| { l.truncate(1); l })) {
        prop_assert_eq!(
            validate_entries(&lines),
            Err(LedgerError::InsufficientEntries { count: lines.len() })
        );
    }

    /// The summary does not depend on line order.
    #[test]
    fn prop_order_independent(lines in lines_strategy(0)) {
        let mut reversed = lines.clone();
        reversed.reverse();
        let mut rotated = lines.clone();
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }
        let summary = compute_balance(&lines);
        prop_assert_eq!(compute_balance(&reversed), summary);
        prop_assert_eq!(compute_balance(&rotated), summary);
    }

    /// Computing twice gives the same result and leaves the lines untouched.
    #[test]
    fn prop_idempotent(lines in lines_strategy(0)) {
        let before = lines.clone();
        let first = compute_balance(&lines);
        let second = compute_balance(&lines);
        prop_assert_eq!(first, second);
        prop_assert_eq!(lines, before);
    }
}
