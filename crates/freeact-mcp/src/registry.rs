//! Aggregated tool registry over every connected MCP server (C6/C7): one
//! `list_tools()` / `call_tool()` surface, dispatching a prefixed tool name
//! (`<server>_<tool>`) back to its owning server with the prefix stripped.

use std::collections::HashMap;

use serde_json::Value;

use freeact_core::ToolOutputContent;

use crate::client::McpServerHandle;
use crate::error::{McpError, McpResult};
use crate::types::ToolDefinition;

/// Merges every connected [`McpServerHandle`] into one dispatch surface.
#[derive(Default)]
pub struct McpRegistry {
    servers: HashMap<String, McpServerHandle>,
    tools: HashMap<String, ToolDefinition>,
}

impl McpRegistry {
    /// An empty registry with no servers connected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected server, enumerating and caching its tools under
    /// their prefixed names.
    ///
    /// # Errors
    ///
    /// Returns an error if the server's tools cannot be listed.
    pub async fn register(&mut self, handle: McpServerHandle) -> McpResult<()> {
        for tool in handle.list_tools().await? {
            self.tools.insert(tool.name.clone(), tool);
        }
        self.servers.insert(handle.name().to_string(), handle);
        Ok(())
    }

    /// Remove and shut down a server, dropping its tools from the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to shut down cleanly.
    pub async fn unregister(&mut self, server_name: &str) -> McpResult<()> {
        self.tools.retain(|_, tool| tool.server != server_name);
        if let Some(handle) = self.servers.remove(server_name) {
            handle.shutdown().await?;
        }
        Ok(())
    }

    /// All enumerated tools, server-prefixed, across every registered
    /// server.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Dispatch a call by its prefixed name.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::UnknownTool`] if no server offers `prefixed_name`;
    /// [`McpError::ServerNotRunning`] if the owning server was registered but
    /// has since been removed; otherwise whatever the server call returns.
    pub async fn call_tool(&self, prefixed_name: &str, args: Value) -> McpResult<ToolOutputContent> {
        let tool = self.tools.get(prefixed_name).ok_or_else(|| McpError::UnknownTool {
            name: prefixed_name.to_string(),
        })?;

        let server = self.servers.get(&tool.server).ok_or_else(|| McpError::ServerNotRunning {
            name: tool.server.clone(),
        })?;

        server.call_tool(&tool.unprefixed_name, args).await
    }

    /// Whether `prefixed_name` is a known MCP tool.
    #[must_use]
    pub fn contains(&self, prefixed_name: &str) -> bool {
        self.tools.contains_key(prefixed_name)
    }

    /// Consume the registry, handing back every connected server so a
    /// caller can shut them down (e.g. a resource supervisor tearing down
    /// an agent). Tool definitions are dropped along with `self`.
    #[must_use]
    pub fn into_servers(self) -> Vec<McpServerHandle> {
        self.servers.into_values().collect()
    }
}

impl std::fmt::Debug for McpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpRegistry")
            .field("servers", &self.servers.keys().collect::<Vec<_>>())
            .field("tool_count", &self.tools.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_registry_has_no_tools() {
        let registry = McpRegistry::new();
        assert!(registry.list_tools().is_empty());
        assert!(!registry.contains("filesystem_read_file"));
    }

    #[tokio::test]
    async fn call_tool_on_unknown_name_is_unknown_tool() {
        let registry = McpRegistry::new();
        let err = registry
            .call_tool("filesystem_read_file", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::UnknownTool { name } if name == "filesystem_read_file"));
    }
}
