//! Archiver - Best-effort archival of duplicate items.
//!
//! One archive request per non-retained item. A failed request is recorded
//! and the loop moves on; there is no grouping or rollback.

use crate::dedupe::{total_duplicates, DuplicateGroup};
use crate::op::VaultCli;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    Failed(String),
    /// Not attempted (dry run)
    Skipped(String),
}

/// Per-item record of an archive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    pub item_id: String,
    pub title: String,
    pub outcome: ArchiveOutcome,
}

/// Outcome of a whole archive run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    pub results: Vec<ArchiveResult>,
}

impl ArchiveReport {
    pub fn archived(&self) -> usize {
        self.count(|o| matches!(o, ArchiveOutcome::Archived))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ArchiveOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ArchiveOutcome::Skipped(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Results that failed, for the final warning list
    pub fn failures(&self) -> impl Iterator<Item = &ArchiveResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ArchiveOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ArchiveOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Issues archive requests for every duplicate in a set of groups.
pub struct Archiver<'a, C: VaultCli + ?Sized> {
    cli: &'a C,
    account: &'a str,
    vault: &'a str,
    dry_run: bool,
    show_progress: bool,
}

impl<'a, C: VaultCli + ?Sized> Archiver<'a, C> {
    pub fn new(cli: &'a C, account: &'a str, vault: &'a str) -> Self {
        Self {
            cli,
            account,
            vault,
            dry_run: false,
            show_progress: true,
        }
    }

    /// Print the commands instead of running them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("  {spinner} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb.set_message("Archiving duplicates...");
        pb
    }

    /// Archive every non-retained member of every group.
    pub fn run(&self, groups: &[DuplicateGroup]) -> ArchiveReport {
        let pb = self.progress_bar(total_duplicates(groups));
        let mut report = ArchiveReport::default();

        for group in groups {
            for item in &group.duplicates {
                let outcome = self.archive_one(&pb, &item.id, &item.title);
                report.results.push(ArchiveResult {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    outcome,
                });
                pb.inc(1);
            }
        }

        pb.finish_and_clear();
        report
    }

    fn archive_one(&self, pb: &ProgressBar, item_id: &str, title: &str) -> ArchiveOutcome {
        if self.dry_run {
            let command = self.cli.archive_command(self.account, self.vault, item_id);
            pb.suspend(|| {
                println!(
                    "{} {} {}",
                    "[DRY RUN]".yellow(),
                    "Would run:".bold(),
                    command
                )
            });
            return ArchiveOutcome::Skipped("dry run".to_string());
        }

        match self.cli.archive_item(self.account, self.vault, item_id) {
            Ok(()) => {
                debug!("Archived {} ({})", item_id, title);
                ArchiveOutcome::Archived
            }
            Err(e) => {
                warn!("Failed to archive {} ({}): {}", item_id, title, e);
                ArchiveOutcome::Failed(e.to_string())
            }
        }
    }
}
