//! CLI definitions and the run flow for op-dedupe.

pub mod commands;

use crate::config::Config;
use clap::Parser;
use commands::RunOptions;
use std::path::PathBuf;

/// op-dedupe - Find and archive duplicate items in a 1Password vault.
///
/// Items sharing a title (ignoring case and surrounding whitespace) are
/// duplicates. The most recently updated one is kept; the rest are archived.
#[derive(Parser, Debug)]
#[command(name = "op-dedupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Vault to scan (prompts for account and vault when omitted)
    pub vault: Option<String>,

    /// Account to use: user uuid, email or sign-in address
    #[arg(short, long)]
    pub account: Option<String>,

    /// Dry run: print the commands that would be run, without executing them
    #[arg(long)]
    pub dry: bool,

    /// Archive without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (default: ~/.config/op-dedupe/op-dedupe.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path of the op binary
    #[arg(long)]
    pub op_path: Option<PathBuf>,

    /// Seconds before an op call is abandoned
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Command-line flags take precedence over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.op_path {
            config.op_path = path.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if self.account.is_some() {
            config.account = self.account.clone();
        }
    }

    pub fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            vault_name: self.vault.clone(),
            account: config.account.clone(),
            dry_run: self.dry,
            assume_yes: self.yes,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vault_and_flags() {
        let cli = Cli::parse_from(["op-dedupe", "Private", "--dry", "-y", "--timeout", "5"]);
        assert_eq!(cli.vault.as_deref(), Some("Private"));
        assert!(cli.dry);
        assert!(cli.yes);
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_vault_is_optional() {
        let cli = Cli::parse_from(["op-dedupe"]);
        assert!(cli.vault.is_none());
        assert!(!cli.dry);
    }

    #[test]
    fn test_overrides_beat_config() {
        let cli = Cli::parse_from([
            "op-dedupe",
            "--account",
            "alice@example.com",
            "--op-path",
            "/opt/op",
        ]);
        let mut config = Config {
            account: Some("bob@example.com".to_string()),
            ..Config::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(config.account.as_deref(), Some("alice@example.com"));
        assert_eq!(config.op_path, PathBuf::from("/opt/op"));
        assert_eq!(config.timeout_secs, 30);

        let options = cli.run_options(&config);
        assert_eq!(options.account.as_deref(), Some("alice@example.com"));
        assert!(options.vault_name.is_none());
    }

    #[test]
    fn test_config_account_used_without_flag() {
        let cli = Cli::parse_from(["op-dedupe", "Private"]);
        let mut config = Config {
            account: Some("bob@example.com".to_string()),
            ..Config::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(
            cli.run_options(&config).account.as_deref(),
            Some("bob@example.com")
        );
    }
}
