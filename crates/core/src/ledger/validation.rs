//! Business rule validation for ledger batches.
//!
//! Checks run in a fixed order: cardinality, then each line's structure,
//! then the debit/credit balance. The first failure wins.

use validator::{Validate, ValidationErrors};

use super::balance::compute_balance;
use super::error::LedgerError;
use super::types::{LedgerEntryInput, LedgerLineDraft};

/// Minimum number of lines in a batch.
pub const MIN_ENTRIES: usize = 2;

/// Validates a single draft line and converts it into a submission input.
///
/// `line` is the 1-based position used in error messages.
///
/// # Errors
///
/// Returns the first missing or invalid field.
pub fn validate_line(line: usize, draft: &LedgerLineDraft) -> Result<LedgerEntryInput, LedgerError> {
    let missing = |field| LedgerError::MissingField { line, field };

    let ledger_date = draft.ledger_date.ok_or_else(|| missing("ledgerDate"))?;
    let transaction_type = draft
        .transaction_type
        .ok_or_else(|| missing("transactionType"))?;
    let account_general_id = draft
        .account_general_id
        .ok_or_else(|| missing("accountGeneralId"))?;
    let account_detail_id = draft
        .account_detail_id
        .ok_or_else(|| missing("accountDetailId"))?;
    let amount = draft.amount.ok_or_else(|| missing("amount"))?;
    if !amount.is_positive() {
        return Err(LedgerError::NonPositiveAmount { line });
    }

    let input = LedgerEntryInput {
        ledger_date,
        description: draft.description.trim().to_string(),
        ledger_type: draft.ledger_type.trim().to_string(),
        transaction_type,
        account_detail_id,
        account_general_id,
        amount,
        reference_number: draft
            .reference_number
            .as_deref()
            .map(|reference| reference.trim().to_string()),
    };
    input
        .validate()
        .map_err(|errors| field_error(line, &errors))?;

    Ok(input)
}

/// Validates a whole batch and returns the submission inputs in line order.
///
/// # Errors
///
/// Returns an error if the batch has fewer than 2 lines, any line is
/// structurally invalid, a total exceeds the amount range, or debits and
/// credits do not balance.
pub fn validate_entries(drafts: &[LedgerLineDraft]) -> Result<Vec<LedgerEntryInput>, LedgerError> {
    if drafts.len() < MIN_ENTRIES {
        return Err(LedgerError::InsufficientEntries {
            count: drafts.len(),
        });
    }

    let inputs = drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| validate_line(index + 1, draft))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = compute_balance(&inputs);
    if summary.out_of_range {
        return Err(LedgerError::AmountOverflow);
    }
    if !summary.is_balanced {
        return Err(LedgerError::Unbalanced {
            debit: summary.total_debit,
            credit: summary.total_credit,
        });
    }

    Ok(inputs)
}

/// Picks a deterministic field error out of the validator report.
fn field_error(line: usize, errors: &ValidationErrors) -> LedgerError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.first() {
        Some((field, field_errors)) => LedgerError::InvalidField {
            line,
            field: wire_name(field),
            message: field_errors
                .iter()
                .find_map(|error| error.message.as_ref())
                .map_or_else(|| "is invalid".to_string(), ToString::to_string),
        },
        None => LedgerError::InvalidField {
            line,
            field: "entry".to_string(),
            message: errors.to_string(),
        },
    }
}

fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
