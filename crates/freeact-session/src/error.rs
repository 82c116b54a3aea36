//! Session-store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`crate::store::SessionStore`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The JSONL file could not be read or written.
    #[error("I/O error on session file {path}: {source}")]
    Io {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line failed to deserialize and was not the final (truncated) line.
    #[error("malformed JSONL line {line} in {path}")]
    MalformedLine {
        /// 1-indexed line number.
        line: usize,
        /// Session file containing the bad line.
        path: PathBuf,
    },

    /// An envelope's `v` field was not `1`.
    #[error("unsupported session envelope version on line {line} in {path}")]
    UnsupportedVersion {
        /// 1-indexed line number.
        line: usize,
        /// Session file containing the bad line.
        path: PathBuf,
    },

    /// An envelope's `meta` carried a forbidden `agent_id` key.
    #[error("invalid session envelope on line {line} in {path}: meta.agent_id is forbidden")]
    ForbiddenAgentId {
        /// 1-indexed line number.
        line: usize,
        /// Session file containing the bad line.
        path: PathBuf,
    },

    /// Serializing a message to its envelope representation failed.
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for `freeact-session` operations.
pub type SessionResult<T> = Result<T, SessionError>;
