//! Shared error vocabulary for the freeact agent runtime.
//!
//! Each crate in the workspace defines its own `thiserror` enum at its own
//! boundary (see `DESIGN.md`); this one covers errors that cross crate
//! boundaries at the core-types level, e.g. malformed identifiers.

use thiserror::Error;

/// Errors surfaced by `freeact-core`'s own types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value that should have been a well-formed identifier was not.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type for `freeact-core` operations.
pub type CoreResult<T> = Result<T, CoreError>;
