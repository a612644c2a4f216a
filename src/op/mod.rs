//! Op module - Access to the vault through the 1Password `op` CLI.
//!
//! This module contains:
//! - VaultCli trait, the seam between the run flow and the external tool
//! - OpClient, the subprocess-backed implementation
//! - Serde models of the JSON `op` prints

pub mod client;
pub mod types;

pub use client::{archive_args, OpClient};
pub use types::{valid_items, Account, Item, RawItem, Vault, VaultRef};

use crate::error::OpError;

/// Operations this tool needs from the vault CLI.
///
/// `account` is always the account's `user_uuid`; `vault` is a vault name or id.
pub trait VaultCli {
    /// List signed-in accounts
    fn list_accounts(&self) -> Result<Vec<Account>, OpError>;

    /// List vaults visible to an account
    fn list_vaults(&self, account: &str) -> Result<Vec<Vault>, OpError>;

    /// List the items of one vault, unvalidated
    fn list_items(&self, account: &str, vault: &str) -> Result<Vec<RawItem>, OpError>;

    /// Move an item to the archive
    fn archive_item(&self, account: &str, vault: &str, item_id: &str) -> Result<(), OpError>;

    /// Command line `archive_item` would run, for dry-run output
    fn archive_command(&self, account: &str, vault: &str, item_id: &str) -> String {
        format!("op {}", archive_args(account, vault, item_id).join(" "))
    }
}
