//! `neraca posting ...`

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use neraca_client::{PostingController, PostingGateway, PostingOutcome};
use neraca_core::posting::{
    NeracaBalanceForm, PeriodState, PostingAction, PostingCommand, PostingService, PostingStage,
    parse_iso,
};

use crate::{App, emit};

#[derive(Subcommand, Debug)]
pub(crate) enum PostingCommands {
    /// Post a stage: buku-besar, neraca-detail, neraca-balance, neraca-akhir
    Post {
        /// Stage to post
        stage: PostingStage,

        /// Ledger or period date, YYYY-MM-DD
        #[arg(value_parser = parse_iso)]
        date: NaiveDate,

        /// Known period state, e.g. from the posting dashboard
        #[arg(long)]
        state: Option<PeriodState>,

        /// Confirm an irreversible stage
        #[arg(long)]
        yes: bool,
    },

    /// Unpost Buku Besar or Neraca Detail
    Unpost {
        /// Stage to unpost
        stage: PostingStage,

        /// Ledger or period date, YYYY-MM-DD
        #[arg(value_parser = parse_iso)]
        date: NaiveDate,

        /// Known period state
        #[arg(long)]
        state: Option<PeriodState>,
    },

    /// Show the Neraca Balance calculation for a date
    Calculate {
        /// Period date, YYYY-MM-DD
        #[arg(value_parser = parse_iso)]
        date: NaiveDate,
    },

    /// List the actions allowed from a period state
    Actions {
        /// Period state, e.g. not_started or neraca-detail
        state: PeriodState,
    },
}

/// Stops unless an irreversible stage was confirmed.
fn confirm(stage: PostingStage, yes: bool) -> Result<()> {
    if let Some(warning) = stage.warning() {
        eprintln!("Warning: {warning}");
        if !yes {
            bail!("{stage} was not posted; pass --yes to confirm");
        }
    }
    Ok(())
}

pub(crate) fn actions(state: PeriodState, json: bool) -> Result<()> {
    let available = PostingService::available_actions(state);
    let text = if available.is_empty() {
        format!("{state}: no actions available")
    } else {
        available
            .iter()
            .map(|(stage, action)| format!("{action} {stage}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let value: Vec<_> = available
        .iter()
        .map(|(stage, action)| json!({"stage": stage, "action": action}))
        .collect();
    emit(json, &value, text)
}

/// Posts `stage` for `date`. Irreversible stages go out only when `yes` is set.
async fn post<G: PostingGateway>(
    controller: &PostingController<G>,
    stage: PostingStage,
    date: NaiveDate,
    yes: bool,
) -> Result<PostingOutcome> {
    let outcome = match stage {
        PostingStage::BukuBesar => controller.post_buku_besar(date).await?,
        PostingStage::NeracaDetail => controller.post_neraca_detail(date).await?,
        PostingStage::NeracaBalance => {
            let mut form = NeracaBalanceForm::new(date);
            let amount = controller.calculate_neraca_balance(&mut form).await?;
            eprintln!("Sisa Hasil Usaha for {date}: {amount}");
            confirm(stage, yes)?;
            controller.post_neraca_balance(&form).await?
        }
        PostingStage::NeracaAkhir => {
            confirm(stage, yes)?;
            controller.post_neraca_akhir(date).await?
        }
    };
    Ok(outcome)
}

pub(crate) async fn run(app: &App, command: PostingCommands, json: bool) -> Result<()> {
    let controller = &app.posting;
    match command {
        PostingCommands::Post {
            stage,
            date,
            state,
            yes,
        } => {
            if let Some(state) = state {
                controller.record_state(date, state);
            }
            let outcome = post(controller, stage, date, yes).await?;
            let text = format!("{} (period state: {})", outcome.message, outcome.state);
            emit(json, &outcome, text)
        }
        PostingCommands::Unpost { stage, date, state } => {
            if let Some(state) = state {
                controller.record_state(date, state);
            }
            let command = PostingCommand::new(stage, PostingAction::Unpost, date)?;
            let outcome = controller.execute(command).await?;
            let text = format!("{} (period state: {})", outcome.message, outcome.state);
            emit(json, &outcome, text)
        }
        PostingCommands::Calculate { date } => {
            let mut form = NeracaBalanceForm::new(date);
            let amount = controller.calculate_neraca_balance(&mut form).await?;
            let mut text = format!("Sisa Hasil Usaha for {date}: {amount}");
            if let Some(details) = form.calculation().and_then(|calc| calc.calculation_details.as_ref()) {
                if let Some(revenue) = &details.total_pendapatan {
                    text.push_str(&format!("\nTotal pendapatan: {revenue}"));
                }
                if let Some(expenses) = &details.total_biaya {
                    text.push_str(&format!("\nTotal biaya: {expenses}"));
                }
            }
            emit(json, &form.calculation(), text)
        }
        PostingCommands::Actions { state } => actions(state, json),
    }
}
