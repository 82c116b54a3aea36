//! The runtime's configuration surface (supplement, §6).

use std::collections::HashMap;
use std::path::PathBuf;

use freeact_mcp::RawServerEntry;
use serde::{Deserialize, Serialize};

/// Every knob named throughout §4-§5, gathered so none of them is a hidden
/// constant. Every field carries a [`Default`], so a bare `[runtime]` TOML
/// header (or an entirely empty document) is valid input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Materializer threshold (C3): payloads at or under this size stay
    /// inline; larger ones spill to disk with a notice.
    pub inline_max_bytes: u64,

    /// Execution-output cap (C9): formatted tool output longer than this is
    /// truncated, keeping 80% head / 20% tail.
    pub max_output_chars: usize,

    /// Wall-clock budget for a single kernel cell execution (§5).
    pub execution_timeout_secs: u64,

    /// Upper bound on subagents running concurrently under one parent (C10).
    pub max_concurrent_subagents: usize,

    /// Upper bound on subagent nesting depth. Subagents may not nest past
    /// this (§9 "Cyclic graphs"); the default of 1 means a subagent may not
    /// itself spawn a subagent.
    pub max_subagent_depth: usize,

    /// Directory holding one `<session-id>/` subdirectory per session (C2).
    pub sessions_root: PathBuf,

    /// Path to the persisted permission grants (§4.5).
    pub permissions_path: PathBuf,

    /// MCP server configuration, keyed by server name (C7). Each entry is
    /// validated against the stdio/HTTP shapes when the registry connects.
    pub mcp_servers: HashMap<String, RawServerEntry>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let working = std::env::current_dir().unwrap_or_default();
        Self {
            inline_max_bytes: default_inline_max_bytes(),
            max_output_chars: default_max_output_chars(),
            execution_timeout_secs: default_execution_timeout_secs(),
            max_concurrent_subagents: default_max_concurrent_subagents(),
            max_subagent_depth: default_max_subagent_depth(),
            sessions_root: working.join(".freeact").join("sessions"),
            permissions_path: working.join(".freeact").join("permissions.json"),
            mcp_servers: HashMap::new(),
        }
    }
}

const fn default_inline_max_bytes() -> u64 {
    4096
}

const fn default_max_output_chars() -> usize {
    5000
}

const fn default_execution_timeout_secs() -> u64 {
    300
}

const fn default_max_concurrent_subagents() -> usize {
    8
}

const fn default_max_subagent_depth() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_output_chars, 5000);
        assert_eq!(config.execution_timeout_secs, 300);
        assert_eq!(config.max_concurrent_subagents, 8);
        assert_eq!(config.max_subagent_depth, 1);
        assert!(config.mcp_servers.is_empty());
    }

    #[test]
    fn bare_runtime_header_deserializes_to_defaults() {
        let config: RuntimeConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_output_chars, 5000);
    }

    #[test]
    fn partial_document_keeps_unset_fields_at_default() {
        let config: RuntimeConfig = toml::from_str("max_output_chars = 1000\n").unwrap();
        assert_eq!(config.max_output_chars, 1000);
        assert_eq!(config.execution_timeout_secs, 300);
    }
}
