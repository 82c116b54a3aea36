//! Unified prelude for the freeact agent runtime.
//!
//! This crate provides a single import to bring in the commonly used types
//! from across the workspace. Use this when you need types from multiple
//! crates without managing individual imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use freeact_prelude::*;
//!
//! // Now you have access to types from:
//! // - freeact-core (Message, Event, ids)
//! // - freeact-llm (LlmProvider, StreamEvent)
//! // - freeact-mcp (McpRegistry, McpServersConfig)
//! // - freeact-approval (PermissionManager, ApprovalDecision)
//! // - freeact-session (SessionStore, ToolResultMaterializer)
//! // - freeact-runtime (Agent, AgentConfig)
//! // - freeact-telemetry (LogConfig, RequestContext)
//! // - freeact-config (RuntimeConfig)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use freeact_prelude::*;
//!
//! # fn example() -> RuntimeResult<()> {
//! let config: RuntimeConfig = freeact_config::load(std::path::Path::new("freeact.toml"))
//!     .map_err(RuntimeError::Config)?;
//!
//! let permissions = PermissionManager::load(
//!     config.sessions_root.join(".freeact/permissions.json"),
//!     &config.sessions_root,
//! )
//! .map_err(RuntimeError::Approval)?;
//!
//! let sessions = SessionStore::new(&config.sessions_root, SessionId::new());
//! # let _ = sessions;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub use freeact_core::{
    AgentId, ApprovalRequest, CorrId, CoreError, CoreResult, Event, Message, RequestPart,
    ResponsePart, SessionId, ToolCallPart, ToolOutputContent, ToolResultContent, ToolReturnPart,
    UserContent, UserContentItem,
};

pub use freeact_llm::{LlmError, LlmProvider, LlmResult, LlmToolDefinition, ProviderConfig, StreamBox, StreamEvent};

pub use freeact_mcp::{McpError, McpRegistry, McpResult, McpServerHandle, McpServersConfig, RawServerEntry, ServerConfig};

pub use freeact_approval::{is_ptc_rejection, resolve, ApprovalDecision, ApprovalError, ApprovalResult, PermissionManager};

pub use freeact_session::{SessionError, SessionResult, SessionStore, ToolResultMaterializer};

pub use freeact_config::{ConfigError, ConfigResult, RuntimeConfig};

pub use freeact_runtime::prelude::*;

pub use freeact_telemetry::prelude::*;
