//! Interactive prompts - Account/vault pickers and the archive confirmation.

use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

/// User interaction needed by the run flow.
pub trait Prompter {
    /// Pick one of `options`, returning its index
    fn select(&self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Yes/no question, defaulting to no
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&self, prompt: &str, options: &[String]) -> Result<usize> {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()
            .context("Interactive selection failed (pass VAULT and --account when not on a terminal)")
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Confirmation failed (pass --yes when not on a terminal)")
    }
}
