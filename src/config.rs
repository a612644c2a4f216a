//! Config module - Optional settings file (op-dedupe.toml).
//!
//! Configuration file contains:
//! - Path of the op binary
//! - Timeout for each op call
//! - Default account selector
//!
//! The file is only ever read; a run never writes to disk.

use crate::op::client::{DEFAULT_OP_PATH, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main op-dedupe configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Path of the op binary (default: "op" from PATH)
    pub op_path: PathBuf,
    /// Seconds before an op call is killed
    pub timeout_secs: u64,
    /// Account user uuid, email or url used when none is given on the command line
    pub account: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            op_path: PathBuf::from(DEFAULT_OP_PATH),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            account: None,
        }
    }
}

/// Default config directory (~/.config/op-dedupe/)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("op-dedupe"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default config file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("op-dedupe.toml")
}

impl Config {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load an explicit config file, or the default one when it exists.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Time limit for a single op call (at least one second)
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.op_path, PathBuf::from("op"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.account.is_none());
    }

    #[test]
    fn test_load_partial_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("op-dedupe.toml");
        std::fs::write(&path, "account = \"alice@example.com\"\n")?;

        let config = Config::load(&path)?;
        assert_eq!(config.account.as_deref(), Some("alice@example.com"));
        assert_eq!(config.op_path, PathBuf::from("op"));
        assert_eq!(config.timeout_secs, 30);

        Ok(())
    }

    #[test]
    fn test_load_full_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "op_path = \"/opt/1password/op\"\ntimeout_secs = 5\naccount = \"QWERTY\"\n",
        )?;

        let config = Config::resolve(Some(&path))?;
        assert_eq!(config.op_path, PathBuf::from("/opt/1password/op"));
        assert_eq!(config.timeout(), Duration::from_secs(5));

        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");
        assert!(Config::resolve(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Cannot parse config file"));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
