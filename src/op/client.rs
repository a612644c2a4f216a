//! OpClient - Runs the `op` binary as a subprocess.
//!
//! Every call is synchronous and bounded by a timeout. Output is drained on
//! helper threads so a large `item list` cannot fill the pipe while we poll.

use super::types::{Account, RawItem, Vault};
use super::VaultCli;
use crate::config::Config;
use crate::error::OpError;
use serde::de::DeserializeOwned;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default binary name, resolved through PATH
pub const DEFAULT_OP_PATH: &str = "op";

/// Default time limit for a single `op` call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Arguments of the archive call (`op item delete --archive`).
pub fn archive_args(account: &str, vault: &str, item_id: &str) -> Vec<String> {
    [
        "item", "delete", item_id, "--vault", vault, "--archive", "--account", account,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// `op` CLI client
#[derive(Debug, Clone)]
pub struct OpClient {
    /// Path of the op binary
    program: PathBuf,
    /// Time limit per call
    timeout: Duration,
}

impl OpClient {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.op_path.clone(), config.timeout())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run op and return stdout
    fn run(&self, args: &[&str]) -> Result<String, OpError> {
        let command = self.command_line(args);
        debug!("Running {}", command);

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                let program = self.program.display().to_string();
                if source.kind() == ErrorKind::NotFound {
                    OpError::NotFound { program }
                } else {
                    OpError::Spawn { program, source }
                }
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = thread::spawn(move || drain(stdout));
        let stderr_reader = thread::spawn(move || drain(stderr));

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() > self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(OpError::Timeout {
                            command,
                            secs: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(source) => return Err(OpError::Io { command, source }),
            }
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(OpError::Failed {
                command,
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout).to_string())
    }

    /// Run op and decode a JSON array; empty output means an empty list
    fn run_json_list<T: DeserializeOwned>(&self, args: &[&str]) -> Result<Vec<T>, OpError> {
        let output = self.run(args)?;
        if output.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&output).map_err(|source| OpError::Decode {
            command: self.command_line(args),
            source,
        })
    }

    /// Whether the binary runs at all
    pub fn check_available(&self) -> bool {
        self.run(&["--version"]).is_ok()
    }
}

impl Default for OpClient {
    fn default() -> Self {
        Self::new(DEFAULT_OP_PATH, DEFAULT_TIMEOUT)
    }
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

impl VaultCli for OpClient {
    fn list_accounts(&self) -> Result<Vec<Account>, OpError> {
        self.run_json_list(&["account", "list", "--format", "json"])
    }

    fn list_vaults(&self, account: &str) -> Result<Vec<Vault>, OpError> {
        self.run_json_list(&["vault", "list", "--account", account, "--format", "json"])
    }

    fn list_items(&self, account: &str, vault: &str) -> Result<Vec<RawItem>, OpError> {
        self.run_json_list(&[
            "item",
            "list",
            "--vault",
            vault,
            "--account",
            account,
            "--format",
            "json",
        ])
    }

    fn archive_item(&self, account: &str, vault: &str, item_id: &str) -> Result<(), OpError> {
        let args = archive_args(account, vault, item_id);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).map(|_| ())
    }

    fn archive_command(&self, account: &str, vault: &str, item_id: &str) -> String {
        let args = archive_args(account, vault, item_id);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.command_line(&args)
    }
}
