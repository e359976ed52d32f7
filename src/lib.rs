pub mod cli;
pub mod core;
pub mod dashboard;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Clock, Conversion, Source, SystemClock};
use crate::dashboard::Dashboard;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Quote {
        source: Option<Source>,
    },
    Dashboard,
    History {
        date: Option<NaiveDate>,
    },
    Convert {
        conversion: Conversion,
        amount: f64,
        rate: Option<f64>,
        source: Option<Source>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_with_clock(command, config_path, Arc::new(SystemClock)).await
}

/// Runs `command` with an explicit clock for "today" and "now".
pub async fn run_command_with_clock(
    command: AppCommand,
    config_path: Option<&str>,
    clock: Arc<dyn Clock>,
) -> Result<()> {
    info!("Dolar monitor starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let dashboard = Dashboard::new(config, clock);

    match command {
        AppCommand::Quote { source } => {
            let source = source.unwrap_or(dashboard.config().default_source);
            cli::quote::run(&dashboard, source).await
        }
        AppCommand::Dashboard => cli::board::run(&dashboard).await,
        AppCommand::History { date } => cli::history::run(&dashboard, date).await,
        AppCommand::Convert {
            conversion,
            amount,
            rate,
            source,
        } => cli::convert::run(&dashboard, conversion, amount, rate, source).await,
    }
}
