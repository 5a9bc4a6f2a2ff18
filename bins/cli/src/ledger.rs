//! `neraca ledger ...`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use neraca_client::LedgerQuery;
use neraca_core::ledger::{LedgerBatch, LedgerLineDraft, PostingStatus};
use neraca_core::posting::parse_iso;
use neraca_shared::types::PageRequest;

use crate::{App, emit};

#[derive(Subcommand, Debug)]
pub(crate) enum LedgerCommands {
    /// Validate a batch file (JSON array of lines) without sending it
    Check {
        /// Batch file
        file: PathBuf,
    },

    /// Validate and submit a batch file
    Submit {
        /// Batch file
        file: PathBuf,
    },

    /// List ledger entries
    #[command(alias = "ls")]
    List {
        /// Ledger date, YYYY-MM-DD
        #[arg(long, value_parser = parse_iso)]
        date: Option<NaiveDate>,

        /// PENDING or POSTED
        #[arg(long)]
        status: Option<PostingStatus>,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Entries per page
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Pending and posted totals
    Summary {
        /// Ledger date, YYYY-MM-DD
        #[arg(long, value_parser = parse_iso)]
        date: Option<NaiveDate>,
    },
}

fn read_batch(path: &Path) -> Result<LedgerBatch> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let lines: Vec<LedgerLineDraft> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of ledger lines", path.display()))?;
    Ok(LedgerBatch::from_lines(lines))
}

/// Validates a batch locally and prints its balance.
pub(crate) fn check(file: &Path, json: bool) -> Result<()> {
    let batch = read_batch(file)?;
    let summary = batch.summary();
    let result = batch.validate();

    let text = match &result {
        Ok(entries) => format!("{}\n{} entries ready to submit", summary.indicator(), entries.len()),
        Err(err) => format!("{}\n{err}", summary.indicator()),
    };
    emit(
        json,
        &json!({
            "summary": summary,
            "valid": result.is_ok(),
            "error": result.as_ref().err().map(|err| json!({"code": err.error_code(), "message": err.to_string()})),
        }),
        text,
    )?;

    result.map(|_| ()).map_err(Into::into)
}

pub(crate) async fn run(app: &App, command: LedgerCommands, json: bool) -> Result<()> {
    match command {
        LedgerCommands::Check { file } => check(&file, json),
        LedgerCommands::Submit { file } => {
            let mut batch = read_batch(&file)?;
            let outcome = app.ledger.submit(&mut batch).await?;
            emit(json, &outcome, &outcome.message)
        }
        LedgerCommands::List {
            date,
            status,
            page,
            limit,
        } => {
            let query = LedgerQuery {
                ledger_date: date,
                posting_status: status,
                page: PageRequest::new(page, limit),
            };
            let response = app.ledger.list(&query).await?;

            let mut text = String::new();
            for entry in &response.data {
                text.push_str(&format!(
                    "{}  {:<6}  {:>20}  {:<7}  {}\n",
                    entry.ledger_date,
                    entry.transaction_type,
                    entry.signed_amount().to_string(),
                    entry.posting_status,
                    entry.description
                ));
            }
            text.push_str(&format!(
                "page {} of {} ({} entries)",
                response.meta.page, response.meta.total_pages, response.meta.total
            ));
            emit(json, &response, text)
        }
        LedgerCommands::Summary { date } => {
            let summary = app.ledger.posting_summary(date).await?;
            let mut text = format!(
                "Pending: {} entries, debit {}\nPosted:  {} entries, debit {}",
                summary.pending_count,
                summary.pending_debit,
                summary.posted_count,
                summary.posted_debit
            );
            if summary.total() == 0 {
                text.push_str("\nNo ledger entries");
            } else if summary.is_fully_posted() {
                text.push_str("\nBuku Besar posted for every entry");
            } else if summary.has_pending() {
                text.push_str("\nPending entries are waiting for Buku Besar");
            }
            emit(json, &summary, text)
        }
    }
}
