// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evm_balance_checker::blockchain::NETWORKS;
use evm_balance_checker::checker::RunSummary;
use evm_balance_checker::cli::{Cli, LogFormat};
use evm_balance_checker::config::{load_env_file, AppConfig, Selection, ALL_NETWORKS, ENV_FILE};
use evm_balance_checker::error::CheckerError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Before parsing, so flags see variables set in the file
    let env_file = load_env_file(Path::new(ENV_FILE));
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match env_file {
        Ok(true) => tracing::debug!(path = ENV_FILE, "Loaded environment file"),
        Ok(false) => {}
        Err(e) => tracing::warn!(path = ENV_FILE, error = %e, "Could not load environment file"),
    }

    match run(cli).await {
        Ok(summary) => {
            tracing::info!(
                networks = summary.networks,
                accounts_with_balance = summary.accounts_with_balance,
                checks = summary.total_checks,
                errors = summary.failed_checks,
                duration_ms = summary.duration.as_millis() as u64,
                "Balance check finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Balance check failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary, CheckerError> {
    let config = AppConfig::from_cli(&cli, std::env::vars())?;

    let selection = match cli.selector.as_deref() {
        Some(selector) => config.select(selector)?,
        None => match config.default_selection()? {
            Some(selection) => selection,
            None => prompt_selection(&config)?,
        },
    };

    evm_balance_checker::run(&config, selection).await
}

/// Ask which network to check.
fn prompt_selection(config: &AppConfig) -> Result<Selection, CheckerError> {
    let options: Vec<&str> = std::iter::once(ALL_NETWORKS)
        .chain(NETWORKS.iter().map(|n| n.id))
        .collect();

    let choice = inquire::Select::new("Select network:", options)
        .prompt()
        .map_err(|e| CheckerError::Prompt(e.to_string()))?;

    Ok(config.select(choice)?)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
