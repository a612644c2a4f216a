//! op-dedupe - Archive duplicate items in a 1Password vault.
//!
//! Usage:
//!   op-dedupe MyVault        - Archive duplicates in MyVault
//!   op-dedupe                - Prompt for account and vault first
//!   op-dedupe MyVault --dry  - Show what would be archived

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use op_dedupe::cli::commands::{self, EXIT_SETUP_FAILURE};
use op_dedupe::cli::Cli;
use op_dedupe::{Config, OpClient, TerminalPrompter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("op_dedupe={}", log_level))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match try_main(&cli) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("{} {:#}", "✗".red(), err);
            ExitCode::from(EXIT_SETUP_FAILURE)
        }
    }
}

fn try_main(cli: &Cli) -> Result<u8> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let client = OpClient::from_config(&config);
    let outcome = commands::run(&client, &TerminalPrompter, &cli.run_options(&config))?;

    Ok(outcome.exit_status())
}
