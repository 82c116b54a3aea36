//! Error vocabulary for the turn engine, tool executor, subagent runner,
//! and agent facade (C8–C11).

use thiserror::Error;

/// Errors raised while starting, driving, or tearing down an agent.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The LLM provider failed to stream a completion.
    #[error(transparent)]
    Llm(#[from] freeact_llm::LlmError),

    /// An MCP server or tool call failed.
    #[error(transparent)]
    Mcp(#[from] freeact_mcp::McpError),

    /// The session log could not be read or written.
    #[error(transparent)]
    Session(#[from] freeact_session::SessionError),

    /// The permission manager could not be loaded or updated.
    #[error(transparent)]
    Approval(#[from] freeact_approval::ApprovalError),

    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] freeact_config::ConfigError),

    /// A resource supervisor (C1) failed to start.
    #[error("resource '{resource}' failed to start: {reason}")]
    ResourceStartFailed {
        /// The resource's name, as passed to [`crate::supervisor::start_all`].
        resource: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The kernel executor reported an error outside normal code-execution
    /// output (§7 taxonomy 1: this is a configuration/startup failure, not
    /// a transient tool failure — those are folded into tool-return text
    /// instead, see [`crate::executor`]).
    #[error("kernel error: {0}")]
    Kernel(String),

    /// `max_concurrent_subagents` is already saturated.
    #[error("subagent concurrency limit ({limit}) reached")]
    SubagentConcurrencyExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// Spawning this subagent would exceed `max_subagent_depth`.
    #[error("subagent depth limit ({limit}) exceeded at depth {depth}")]
    SubagentDepthExceeded {
        /// The configured limit.
        limit: usize,
        /// The depth that would have resulted.
        depth: usize,
    },
}

/// Convenience alias for this crate's `Result`.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
