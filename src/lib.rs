pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{CurrencyCode, DayCount, QuoteProvider, TargetCurrency};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// A single user-triggered operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Rate {
        currency: CurrencyCode,
    },
    Convert {
        amount: f64,
        target: TargetCurrency,
    },
    History {
        currency: CurrencyCode,
        days: DayCount,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(base_url = %config.provider.base_url, "Loaded config");

    let api_key = config.api_key()?;
    let provider = providers::CurrencyLayerProvider::new(&config.provider.base_url, &api_key)?;

    run_with_provider(command, &provider, Local::now().date_naive()).await
}

/// Dispatches `command` against `provider`. `today` anchors the historical window
/// of a one-shot `History`; an interactive session reads the local clock per action.
pub async fn run_with_provider(
    command: AppCommand,
    provider: &dyn QuoteProvider,
    today: NaiveDate,
) -> Result<()> {
    debug!(?command, %today, "Running command");
    match command {
        AppCommand::Rate { currency } => cli::rate::run(provider, &currency).await,
        AppCommand::Convert { amount, target } => {
            cli::convert::run(provider, amount, target).await
        }
        AppCommand::History { currency, days } => {
            cli::history::run(provider, &currency, days, today).await
        }
        AppCommand::Interactive => cli::interactive::run(provider).await?,
    }
    Ok(())
}
