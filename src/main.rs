use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use dolarmon::core::log::init_logging;
use dolarmon::core::{Conversion, Source};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log to stderr; repeat for more detail (-vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Currency {
    Clp,
    Usd,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current quote of one source
    Quote {
        /// mindicador, central-bank, investing, banks or historical
        #[arg(short, long, value_parser = parse_source)]
        source: Option<Source>,
    },
    /// Compare all live sources
    Dashboard,
    /// Show the synthetic history, or a single day of it
    History {
        /// Day to look up (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Convert between USD and CLP
    Convert {
        /// Amount in the source currency
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Currency to convert to
        #[arg(short, long, value_enum)]
        to: Currency,
        /// Rate to use instead of fetching a quote
        #[arg(short, long, conflicts_with = "source")]
        rate: Option<f64>,
        /// Source of the rate when no rate is given
        #[arg(short, long, value_parser = parse_source)]
        source: Option<Source>,
    },
}

fn parse_source(value: &str) -> Result<Source, String> {
    value.parse::<Source>().map_err(|e| e.to_string())
}

impl Commands {
    fn into_app_command(self) -> Option<dolarmon::AppCommand> {
        Some(match self {
            Commands::Setup => return None,
            Commands::Quote { source } => dolarmon::AppCommand::Quote { source },
            Commands::Dashboard => dolarmon::AppCommand::Dashboard,
            Commands::History { date } => dolarmon::AppCommand::History { date },
            Commands::Convert {
                amount,
                to,
                rate,
                source,
            } => dolarmon::AppCommand::Convert {
                conversion: match to {
                    Currency::Clp => Conversion::UsdToClp,
                    Currency::Usd => Conversion::ClpToUsd,
                },
                amount,
                rate,
                source,
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.map(Commands::into_app_command) {
        Some(Some(cmd)) => dolarmon::run_command(cmd, cli.config_path.as_deref()).await,
        Some(None) => match cli.config_path.as_deref() {
            Some(path) => dolarmon::cli::setup::setup_at_path(path),
            None => dolarmon::cli::setup::setup(),
        },
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
