//! A single connected MCP server (C7): spawns or dials the transport,
//! enumerates tools with the server-key prefix applied, and dispatches
//! calls by unprefixed name.
//!
//! Transport construction is handed off entirely to `rmcp` — stdio framing
//! and the streamable-HTTP wire protocol are an external collaborator's
//! contract, not this crate's concern.

use std::collections::HashSet;
use std::process::Stdio;

use rmcp::model::CallToolRequestParams;
use rmcp::service::{RoleClient, RunningService, ServiceExt};
use rmcp::transport::sse_client::SseClientTransport;
use rmcp::transport::TokioChildProcess;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info};

use freeact_core::ToolOutputContent;

use crate::config::ServerConfig;
use crate::error::{McpError, McpResult};
use crate::types::{content_from_rmcp, ToolDefinition};

/// One connected MCP server.
pub struct McpServerHandle {
    name: String,
    excluded_tools: HashSet<String>,
    service: RunningService<RoleClient, ()>,
}

impl McpServerHandle {
    /// Start the server (spawning a child process for [`ServerConfig::Stdio`]
    /// or dialing the URL for [`ServerConfig::Http`]) and complete the MCP
    /// handshake.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connect`] if the process cannot be spawned, the
    /// URL cannot be dialed, or the handshake fails.
    pub async fn connect(name: &str, config: &ServerConfig) -> McpResult<Self> {
        let service = match config {
            ServerConfig::Stdio { command, args, env, .. } => {
                let mut cmd = Command::new(command);
                cmd.args(args).envs(env).stdin(Stdio::piped()).stdout(Stdio::piped());
                let transport = TokioChildProcess::new(cmd).map_err(|e| McpError::Connect {
                    server: name.to_string(),
                    reason: format!("failed to spawn '{command}': {e}"),
                })?;
                ().serve(transport).await.map_err(|e| McpError::Connect {
                    server: name.to_string(),
                    reason: format!("handshake failed: {e}"),
                })?
            }
            ServerConfig::Http { url, .. } => {
                let transport =
                    SseClientTransport::start(url.clone())
                        .await
                        .map_err(|e| McpError::Connect {
                            server: name.to_string(),
                            reason: format!("failed to connect to '{url}': {e}"),
                        })?;
                ().serve(transport).await.map_err(|e| McpError::Connect {
                    server: name.to_string(),
                    reason: format!("handshake failed: {e}"),
                })?
            }
        };

        info!(server = name, "MCP server connected");

        Ok(Self {
            name: name.to_string(),
            excluded_tools: config.excluded_tools().iter().cloned().collect(),
            service,
        })
    }

    /// Enumerate this server's tools, applying the server-key prefix and
    /// dropping anything named in `excluded_tools`.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connect`] if the server cannot be reached.
    pub async fn list_tools(&self) -> McpResult<Vec<ToolDefinition>> {
        let result = self
            .service
            .peer()
            .list_all_tools()
            .await
            .map_err(|e| McpError::Connect {
                server: self.name.clone(),
                reason: format!("list_tools failed: {e}"),
            })?;

        Ok(result
            .iter()
            .filter(|tool| !self.excluded_tools.contains(tool.name.as_ref()))
            .map(|tool| ToolDefinition::from_rmcp(tool, &self.name))
            .collect())
    }

    /// Call `tool` (the server's own, unprefixed name) with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::ToolCallFailed`] if the server rejects or fails
    /// the call.
    pub async fn call_tool(&self, tool: &str, args: Value) -> McpResult<ToolOutputContent> {
        debug!(server = %self.name, tool, "calling MCP tool");

        let arguments = match args {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                Some(map)
            }
        };

        let result = self
            .service
            .peer()
            .call_tool(CallToolRequestParams {
                meta: None,
                name: std::borrow::Cow::Owned(tool.to_string()),
                arguments,
                task: None,
            })
            .await
            .map_err(|e| McpError::ToolCallFailed {
                server: self.name.clone(),
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;

        Ok(content_from_rmcp(result))
    }

    /// Shut down the connection.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connect`] if the server does not shut down
    /// cleanly.
    pub async fn shutdown(self) -> McpResult<()> {
        self.service.cancel().await.map_err(|e| McpError::Connect {
            server: self.name.clone(),
            reason: format!("shutdown failed: {e}"),
        })?;
        Ok(())
    }

    /// This server's configured name (the tool-name prefix).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for McpServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServerHandle").field("name", &self.name).finish_non_exhaustive()
    }
}
