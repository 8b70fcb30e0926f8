use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::conversion::parse_amount;
use xrate::core::log::init_logging;
use xrate::core::{CurrencyCode, DayCount, TargetCurrency};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Rate { currency } => xrate::AppCommand::Rate { currency },
            Commands::Convert { amount, to } => xrate::AppCommand::Convert { amount, target: to },
            Commands::History { currency, days } => xrate::AppCommand::History { currency, days },
            Commands::Interactive => xrate::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current USD exchange rate for a currency
    Rate {
        /// 3-letter currency code, e.g. EUR, JPY, GBP
        #[arg(default_value = "EUR")]
        currency: CurrencyCode,
    },
    /// Convert a USD amount at the current rate
    Convert {
        /// Amount in USD
        #[arg(default_value_t = 100.0, value_parser = parse_amount)]
        amount: f64,
        /// Target currency
        #[arg(short, long, value_enum, ignore_case = true, default_value_t = TargetCurrency::Eur)]
        to: TargetCurrency,
    },
    /// Chart the USD exchange rate over the last days
    History {
        /// 3-letter currency code, e.g. EUR, JPY, GBP
        #[arg(default_value = "EUR")]
        currency: CurrencyCode,
        /// Number of days: 5, 10, 20 or 30
        #[arg(short, long, default_value = "5")]
        days: DayCount,
    },
    /// Start an interactive session
    Interactive,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
