//! MCP server manager for the freeact agent runtime (C7), plus the
//! server-discovery half of the tool registry (C6).
//!
//! Given a `{name: config}` map, this crate instantiates one client per
//! entry (stdio child process or streamable HTTP, via `rmcp`), enumerates
//! each server's tools under a `<server>_<tool>` prefix, applies
//! `excluded_tools` filtering, and merges everything into a single
//! [`McpRegistry`] the turn engine dispatches through by prefixed name.
//!
//! Resource lifecycle (starting/stopping every server concurrently
//! alongside the kernel) is the runtime's resource supervisor's job, not
//! this crate's; [`McpServerHandle::connect`]/[`McpServerHandle::shutdown`]
//! are the hooks it calls.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod client;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use client::McpServerHandle;
pub use config::{McpServersConfig, RawServerEntry, ServerConfig, RESERVED_SERVER_NAMES};
pub use error::{McpError, McpResult};
pub use registry::McpRegistry;
pub use types::ToolDefinition;
