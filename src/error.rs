//! Error types - Failures of calls to the `op` CLI.
//!
//! `OpError` describes one failed subprocess run. `ItemError` describes why an
//! entry of `op item list` was skipped.

use thiserror::Error;

/// Failure of a single external vault CLI invocation.
#[derive(Debug, Error)]
pub enum OpError {
    /// Binary is not on PATH (or op_path points nowhere)
    #[error("`{program}` not found. Install the 1Password CLI or set op_path in the config")]
    NotFound { program: String },

    /// Spawning failed for another reason
    #[error("cannot execute `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a non-zero status
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Process exceeded its time limit and was killed
    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    /// I/O error while waiting on the process
    #[error("i/o error while running `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Output was not the JSON we expected
    #[error("cannot parse output of `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reason an item is left out of duplicate detection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid updated_at `{0}`")]
    InvalidTimestamp(String),
}
