//! Error vocabulary for the MCP server manager (C7).

use thiserror::Error;

/// Errors raised while configuring, connecting to, or calling an MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// A server entry in the config map has an invalid or ambiguous shape.
    #[error("MCP server '{server}': {reason}")]
    Configuration {
        /// The offending server name.
        server: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Failed to start or hand-shake with a server.
    #[error("MCP server '{server}' failed to connect: {reason}")]
    Connect {
        /// The server name.
        server: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A call was made to a server that was never registered or has been
    /// shut down.
    #[error("MCP server '{name}' is not running")]
    ServerNotRunning {
        /// The server name.
        name: String,
    },

    /// No server exposes a tool under this (prefixed) name.
    #[error("unknown MCP tool '{name}'")]
    UnknownTool {
        /// The prefixed tool name that was looked up.
        name: String,
    },

    /// The tool call itself failed on the server side.
    #[error("MCP tool call {server}/{tool} failed: {reason}")]
    ToolCallFailed {
        /// The owning server.
        server: String,
        /// The unprefixed tool name.
        tool: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Convenience alias for this crate's `Result`.
pub type McpResult<T> = Result<T, McpError>;
