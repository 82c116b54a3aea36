//! Permission-manager error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`crate::permission::PermissionManager`].
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Reading or writing `permissions.json` failed.
    #[error("I/O error on permissions file {path}: {source}")]
    Io {
        /// The permissions file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `permissions.json` existed but was not valid JSON in the expected shape.
    #[error("malformed permissions file {path}: {source}")]
    Malformed {
        /// The permissions file path.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for `freeact-approval` operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
