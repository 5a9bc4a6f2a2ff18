//! Neraca operator CLI
//!
//! Captures ledger batches and drives the period-close posting stages
//! against the accounting backend.

use std::fmt::Display;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neraca_client::{
    ApiClient, HttpGateway, Invalidator, LedgerController, OrderingPolicy, PostingController,
    Session,
};
use neraca_shared::{AppConfig, AppError};

mod ledger;
mod posting;

/// neraca - ledger capture and period-close posting
#[derive(Parser, Debug)]
#[command(name = "neraca")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Refuse out-of-order posting locally, whatever the configuration says
    #[arg(long, global = true)]
    enforce_order: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ledger batches and listings
    #[command(subcommand)]
    Ledger(ledger::LedgerCommands),

    /// Period-close posting
    #[command(subcommand)]
    Posting(posting::PostingCommands),

    /// End the backend session
    Logout,
}

/// Everything a command needs to talk to the backend.
pub(crate) struct App {
    client: ApiClient,
    pub(crate) ledger: LedgerController<HttpGateway>,
    pub(crate) posting: PostingController<HttpGateway>,
}

impl App {
    fn connect(config: &AppConfig, enforce_order: bool) -> Result<Self> {
        let session = Arc::new(Session::from_config(&config.auth)?);
        let client = ApiClient::new(&config.api, Arc::clone(&session))
            .context("Failed to build HTTP client")?;
        let gateway = HttpGateway::new(client.clone());
        let invalidator = Invalidator::default();

        let policy = if enforce_order {
            OrderingPolicy::Enforce
        } else {
            OrderingPolicy::from(&config.posting)
        };

        info!(base_url = %client.base_url(), ?policy, "Backend configured");

        Ok(Self {
            ledger: LedgerController::new(gateway.clone(), Arc::clone(&session), invalidator.clone()),
            posting: PostingController::new(gateway, session, invalidator, policy),
            client,
        })
    }
}

/// Prints `value` as JSON, or `text` otherwise.
pub(crate) fn emit<T: Serialize>(json: bool, value: &T, text: impl Display) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neraca=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Local-only commands run without configuration
    match &cli.command {
        Commands::Ledger(ledger::LedgerCommands::Check { file }) => {
            return ledger::check(file, cli.json);
        }
        Commands::Posting(posting::PostingCommands::Actions { state }) => {
            return posting::actions(*state, cli.json);
        }
        _ => {}
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    let app = App::connect(&config, cli.enforce_order)?;

    let result = match cli.command {
        Commands::Ledger(command) => ledger::run(&app, command, cli.json).await,
        Commands::Posting(command) => posting::run(&app, command, cli.json).await,
        Commands::Logout => {
            app.client.logout().await;
            Ok(())
        }
    };

    if let Err(err) = &result {
        report(err);
    }
    result
}

/// Logs the code of an application error before anyhow prints its message.
fn report(err: &anyhow::Error) {
    let Some(app_err) = err.downcast_ref::<AppError>() else {
        return;
    };
    error!(
        code = app_err.error_code(),
        sent = !app_err.is_local(),
        "Command failed"
    );
    if app_err.is_transient() {
        eprintln!("The backend did not respond in time; check the posting dashboard before retrying.");
    }
}
