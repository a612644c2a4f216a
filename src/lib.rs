//! op-dedupe Core Library
//!
//! Finds duplicate items in a 1Password vault and archives all but one of
//! each, driving the `op` CLI as a subprocess. Provides:
//! - Access to accounts, vaults and items through `op` (VaultCli trait)
//! - Duplicate detection by normalized title
//! - Retention of the most recently modified item per group
//! - Best-effort archival with per-item outcomes

pub mod archive;
pub mod cli;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod op;
pub mod prompt;

// Re-export main types
pub use archive::{ArchiveOutcome, ArchiveReport, Archiver};
pub use config::Config;
pub use dedupe::{find_duplicates, normalize_title, DuplicateGroup};
pub use error::{ItemError, OpError};
pub use op::{Item, OpClient, VaultCli};
pub use prompt::{Prompter, TerminalPrompter};
