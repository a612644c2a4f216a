//! Run flow for op-dedupe.
//!
//! Steps:
//! - select account and vault (from arguments or interactively)
//! - list items and group duplicates
//! - summarize and ask for confirmation
//! - archive all but the retained item of each group

use crate::archive::{ArchiveOutcome, ArchiveReport, Archiver};
use crate::dedupe::{find_duplicates, total_duplicates, DuplicateGroup};
use crate::op::{valid_items, Account, Vault, VaultCli};
use crate::prompt::Prompter;
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

/// Exit status for setup/authentication failures
pub const EXIT_SETUP_FAILURE: u8 = 1;

/// Exit status when at least one archive request failed
pub const EXIT_ARCHIVE_FAILURES: u8 = 2;

/// Options of a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Vault name or id; `None` prompts for account and vault
    pub vault_name: Option<String>,
    /// Account selector (user uuid, email or url)
    pub account: Option<String>,
    /// Print archive commands instead of running them
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Show spinner and progress bar
    pub show_progress: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Vault has no duplicates
    NoDuplicates,
    /// User declined the confirmation
    Declined,
    /// Archive loop ran (or was simulated)
    Completed(ArchiveReport),
}

impl RunOutcome {
    pub fn exit_status(&self) -> u8 {
        match self {
            RunOutcome::Completed(report) if report.has_failures() => EXIT_ARCHIVE_FAILURES,
            _ => 0,
        }
    }
}

/// Find and archive duplicates in one vault
pub fn run<C, P>(cli: &C, prompter: &P, options: &RunOptions) -> Result<RunOutcome>
where
    C: VaultCli + ?Sized,
    P: Prompter + ?Sized,
{
    println!("\n{}", "--- 1Password Duplicate Archiver ---".cyan().bold());
    if options.dry_run {
        println!("{}\n", "Dry run: no items will be archived.".yellow());
    } else {
        println!(
            "{}\n",
            "Use --dry to preview archiving actions without executing them.".green()
        );
    }

    let account = select_account(cli, prompter, options)?;
    let vault = select_vault(cli, prompter, &account, options.vault_name.as_deref())?;
    println!("{} {}", "Selected Vault:".bold(), vault.name.yellow());

    let groups = scan(cli, &account, &vault, options.show_progress)?;
    if groups.is_empty() {
        println!("{}", "No duplicates found in this vault.".green());
        return Ok(RunOutcome::NoDuplicates);
    }

    print_summary(&groups);

    if !options.dry_run && !options.assume_yes {
        let proceed = prompter.confirm("Would you like to archive these duplicates now?")?;
        if !proceed {
            println!("{}", "Aborting: No items were archived.".red());
            return Ok(RunOutcome::Declined);
        }
    }

    println!();
    let report = Archiver::new(cli, &account.user_uuid, &vault.id)
        .dry_run(options.dry_run)
        .show_progress(options.show_progress)
        .run(&groups);
    print_report(&report, options.dry_run);

    Ok(RunOutcome::Completed(report))
}

/// Resolve the account: explicit selector, the only account, or a prompt
fn select_account<C, P>(cli: &C, prompter: &P, options: &RunOptions) -> Result<Account>
where
    C: VaultCli + ?Sized,
    P: Prompter + ?Sized,
{
    let accounts = cli
        .list_accounts()
        .context("Cannot list 1Password accounts")?;
    if accounts.is_empty() {
        bail!("No accounts found. Please ensure you are signed in to 1Password CLI.");
    }

    if let Some(selector) = options.account.as_deref() {
        return accounts
            .into_iter()
            .find(|a| a.matches(selector))
            .ok_or_else(|| anyhow!("Account '{}' is not signed in", selector));
    }

    if accounts.len() == 1 {
        return Ok(accounts[0].clone());
    }

    let prompt = if options.vault_name.is_some() {
        "Multiple accounts found. Select one"
    } else {
        "Select an account"
    };
    let labels: Vec<String> = accounts.iter().map(Account::label).collect();
    let idx = prompter.select(prompt, &labels)?;
    accounts
        .get(idx)
        .cloned()
        .ok_or_else(|| anyhow!("Invalid account selection"))
}

/// Resolve the vault by name/id, or prompt when none was given
fn select_vault<C, P>(cli: &C, prompter: &P, account: &Account, name: Option<&str>) -> Result<Vault>
where
    C: VaultCli + ?Sized,
    P: Prompter + ?Sized,
{
    let vaults = cli
        .list_vaults(&account.user_uuid)
        .with_context(|| format!("Cannot list vaults for {}", account.email))?;
    if vaults.is_empty() {
        bail!("No vaults found for this account.");
    }

    match name {
        Some(name) => find_vault(&vaults, name).cloned().ok_or_else(|| {
            let known: Vec<&str> = vaults.iter().map(|v| v.name.as_str()).collect();
            anyhow!(
                "Vault '{}' not found. Available vaults: {}",
                name,
                known.join(", ")
            )
        }),
        None => {
            let labels: Vec<String> = vaults.iter().map(|v| v.name.clone()).collect();
            let idx = prompter.select("Select a vault", &labels)?;
            vaults
                .get(idx)
                .cloned()
                .ok_or_else(|| anyhow!("Invalid vault selection"))
        }
    }
}

/// Exact name, then id, then case-insensitive name
fn find_vault<'a>(vaults: &'a [Vault], name: &str) -> Option<&'a Vault> {
    let name = name.trim();
    vaults
        .iter()
        .find(|v| v.name == name)
        .or_else(|| vaults.iter().find(|v| v.id == name))
        .or_else(|| {
            let lower = name.to_lowercase();
            vaults.iter().find(|v| v.name.to_lowercase() == lower)
        })
}

/// List the vault's items and group duplicates
fn scan<C>(cli: &C, account: &Account, vault: &Vault, show_progress: bool) -> Result<Vec<DuplicateGroup>>
where
    C: VaultCli + ?Sized,
{
    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Scanning for duplicates...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let raw = cli.list_items(&account.user_uuid, &vault.id);
    spinner.finish_and_clear();
    let raw = raw.with_context(|| format!("Cannot list items in vault '{}'", vault.name))?;

    let listed = raw.len();
    let items = valid_items(raw);
    info!("Scanned {} items in '{}' ({} usable)", listed, vault.name, items.len());

    Ok(find_duplicates(&items))
}

fn print_summary(groups: &[DuplicateGroup]) {
    let total = total_duplicates(groups);
    println!(
        "\n{} were found across {} titles.\n",
        format!("{} duplicate items", total).yellow(),
        groups.len()
    );
    for group in groups {
        println!(
            " • {}: {} duplicates (of {})",
            group.title().blue(),
            group.duplicates.len(),
            group.member_count()
        );
    }
    println!();
}

fn print_report(report: &ArchiveReport, dry_run: bool) {
    if dry_run {
        println!(
            "\n{} {} items would be archived.",
            "Dry run complete:".green(),
            report.skipped().to_string().cyan()
        );
        return;
    }

    if report.has_failures() {
        println!(
            "\n{} Archived {} of {} duplicates, {} failed:",
            "!".yellow(),
            report.archived().to_string().green(),
            report.results.len(),
            report.failed().to_string().red()
        );
        for result in report.failures() {
            if let ArchiveOutcome::Failed(reason) = &result.outcome {
                println!(
                    "  {} {} ({}): {}",
                    "✗".red(),
                    result.title,
                    result.item_id.dimmed(),
                    reason
                );
            }
        }
    } else {
        println!(
            "\n{} The duplicates have been archived ({}).",
            "✓ Done!".green().bold(),
            report.archived().to_string().cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveResult;

    fn vault(id: &str, name: &str) -> Vault {
        Vault {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_find_vault_precedence() {
        let vaults = vec![
            vault("v1", "Private"),
            vault("v2", "private"),
            vault("Shared", "Team"),
        ];
        assert_eq!(find_vault(&vaults, "private").unwrap().id, "v2");
        assert_eq!(find_vault(&vaults, " Private ").unwrap().id, "v1");
        assert_eq!(find_vault(&vaults, "Shared").unwrap().name, "Team");
        assert_eq!(find_vault(&vaults, "TEAM").unwrap().id, "Shared");
        assert!(find_vault(&vaults, "Archive").is_none());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(RunOutcome::NoDuplicates.exit_status(), 0);
        assert_eq!(RunOutcome::Declined.exit_status(), 0);

        let ok = ArchiveReport {
            results: vec![ArchiveResult {
                item_id: "a".to_string(),
                title: "Bank".to_string(),
                outcome: ArchiveOutcome::Archived,
            }],
        };
        assert_eq!(RunOutcome::Completed(ok.clone()).exit_status(), 0);

        let mut failed = ok;
        failed.results.push(ArchiveResult {
            item_id: "b".to_string(),
            title: "Bank".to_string(),
            outcome: ArchiveOutcome::Failed("denied".to_string()),
        });
        assert_eq!(
            RunOutcome::Completed(failed).exit_status(),
            EXIT_ARCHIVE_FAILURES
        );
    }
}
