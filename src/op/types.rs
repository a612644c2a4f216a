//! Models of the JSON printed by `op ... --format json`.
//!
//! Only the fields this tool needs are modelled; unknown fields are ignored.

use crate::error::ItemError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A signed-in account (`op account list`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Sign-in address (e.g., "my.1password.com")
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub email: String,
    /// Value passed to `--account`
    pub user_uuid: String,
}

impl Account {
    /// Label shown in the account picker.
    pub fn label(&self) -> String {
        format!("{} - {} - {}", self.url, self.email, self.user_uuid)
    }

    /// Whether `selector` names this account by user uuid, email or url.
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        self.user_uuid == selector
            || self.email.eq_ignore_ascii_case(selector)
            || self.url.eq_ignore_ascii_case(selector)
    }
}

/// A vault visible to an account (`op vault list`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vault {
    pub id: String,
    pub name: String,
}

/// Vault reference embedded in every item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// An entry of `op item list` before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vault: Option<VaultRef>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A validated item, eligible for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub vault: VaultRef,
    pub category: Option<String>,
    /// Last modification time, drives the retention rule
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RawItem> for Item {
    type Error = ItemError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let id = non_empty(raw.id).ok_or(ItemError::MissingField("id"))?;
        let title = non_empty(raw.title).ok_or(ItemError::MissingField("title"))?;
        let vault = raw.vault.ok_or(ItemError::MissingField("vault"))?;
        let updated_at = raw
            .updated_at
            .ok_or(ItemError::MissingField("updated_at"))?;
        let updated_at = parse_timestamp(&updated_at)
            .ok_or_else(|| ItemError::InvalidTimestamp(updated_at.clone()))?;

        Ok(Item {
            id,
            title,
            vault,
            category: raw.category,
            updated_at,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Keep the items that validate, warning about the rest.
pub fn valid_items(raw: Vec<RawItem>) -> Vec<Item> {
    let mut items = Vec::with_capacity(raw.len());
    for entry in raw {
        let label = entry
            .id
            .clone()
            .or_else(|| entry.title.clone())
            .unwrap_or_else(|| "<unknown>".to_string());
        match Item::try_from(entry) {
            Ok(item) => items.push(item),
            Err(e) => warn!("Skipping item {}: {}", label, e),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM_LIST: &str = r#"[
        {
            "id": "k3xq7pbbeyl5yfdsyhfmyp7xjy",
            "title": "Bank",
            "version": 4,
            "vault": {"id": "vwzsfkltl7fmocuegvzkcw35ca", "name": "Private"},
            "category": "LOGIN",
            "last_edited_by": "ABCDEFGHIJ",
            "created_at": "2022-11-02T09:12:44Z",
            "updated_at": "2023-06-01T10:00:00Z",
            "additional_information": "alice"
        },
        {
            "id": "a7hc6bgjtbtu2s4hm4lq3pqaxe",
            "title": "",
            "vault": {"id": "vwzsfkltl7fmocuegvzkcw35ca"},
            "updated_at": "2023-01-01T00:00:00Z"
        },
        {
            "id": "7vdsxh3mxbxzl4fc5f4bd3a6ny",
            "title": "Email",
            "vault": {"id": "vwzsfkltl7fmocuegvzkcw35ca"},
            "updated_at": "not a date"
        }
    ]"#;

    #[test]
    fn test_parse_item_list() {
        let raw: Vec<RawItem> = serde_json::from_str(ITEM_LIST).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].title.as_deref(), Some("Bank"));
        assert_eq!(
            raw[0].vault.as_ref().and_then(|v| v.name.as_deref()),
            Some("Private")
        );
    }

    #[test]
    fn test_valid_items_skips_incomplete_entries() {
        let raw: Vec<RawItem> = serde_json::from_str(ITEM_LIST).unwrap();
        let items = valid_items(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "k3xq7pbbeyl5yfdsyhfmyp7xjy");
        assert_eq!(items[0].category.as_deref(), Some("LOGIN"));
    }

    #[test]
    fn test_try_from_reports_reason() {
        let raw = RawItem {
            id: Some("x".to_string()),
            title: Some("Bank".to_string()),
            vault: Some(VaultRef {
                id: "v".to_string(),
                name: None,
            }),
            category: None,
            updated_at: Some("yesterday".to_string()),
        };
        assert_eq!(
            Item::try_from(raw),
            Err(ItemError::InvalidTimestamp("yesterday".to_string()))
        );

        let missing = RawItem {
            title: Some("Bank".to_string()),
            ..Default::default()
        };
        assert_eq!(Item::try_from(missing), Err(ItemError::MissingField("id")));
    }

    #[test]
    fn test_parse_timestamp_accepts_bare_date() {
        let ts = parse_timestamp("2023-06-01").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-06-01T00:00:00+00:00");

        let offset = parse_timestamp("2023-06-01T12:00:00+02:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2023-06-01T10:00:00+00:00");
    }

    #[test]
    fn test_account_matching() {
        let account: Account = serde_json::from_str(
            r#"{"url": "my.1password.com", "email": "alice@example.com",
                "user_uuid": "QWERTYUIOP", "account_uuid": "ASDFGHJKL"}"#,
        )
        .unwrap();
        assert!(account.matches("QWERTYUIOP"));
        assert!(account.matches("Alice@Example.com"));
        assert!(account.matches("my.1password.com"));
        assert!(!account.matches("bob@example.com"));
        assert_eq!(
            account.label(),
            "my.1password.com - alice@example.com - QWERTYUIOP"
        );
    }
}
