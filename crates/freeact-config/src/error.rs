//! Errors surfaced while loading and validating a [`crate::RuntimeConfig`].

use thiserror::Error;

/// Errors from loading or validating the runtime's TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file's contents are not valid TOML, or don't match
    /// [`crate::RuntimeConfig`]'s shape.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path that was parsed.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A field parsed successfully but holds a value validation rejects.
    #[error("invalid config field '{field}': {message}")]
    ValidationError {
        /// Dotted field name.
        field: String,
        /// Human-readable explanation.
        message: String,
    },

    /// An `mcp_servers` entry doesn't match a known server shape.
    #[error(transparent)]
    McpServers(#[from] freeact_mcp::McpError),
}

/// Result type for `freeact-config` operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
