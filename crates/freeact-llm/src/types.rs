//! LLM-facing types: tool definitions offered to the model and the
//! streaming event shape providers yield.
//!
//! The message history itself is [`freeact_core::Message`] — providers
//! translate to/from it rather than owning their own message model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition offered to the model alongside a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmToolDefinition {
    /// Tool name, already server-prefixed for MCP tools.
    pub name: String,
    /// Description shown to the model.
    pub description: Option<String>,
    /// Input JSON schema.
    pub input_schema: Value,
}

impl LlmToolDefinition {
    /// Create a new tool definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: serde_json::json!({"type": "object"}),
        }
    }

    /// Set description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Set input schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }
}

/// An incremental event from a provider's streamed completion.
///
/// Providers yield `TextDelta`/`ThoughtDelta` as the model generates visible
/// text and thinking content, `ToolCallStart`/`ToolCallDelta`/`ToolCallEnd`
/// as it streams a tool call's JSON arguments incrementally, and `Done` once
/// the turn engine should stop reading and aggregate what it collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamEvent {
    /// Partial visible text.
    TextDelta(String),
    /// Partial thinking content.
    ThoughtDelta(String),
    /// A tool call has started; its arguments arrive as subsequent deltas.
    ToolCallStart {
        /// Provider-assigned call id.
        id: String,
        /// Tool name.
        name: String,
    },
    /// Partial tool-call arguments JSON.
    ToolCallDelta {
        /// Call id this delta belongs to.
        id: String,
        /// Partial arguments JSON fragment.
        args_delta: String,
    },
    /// A tool call's arguments are complete.
    ToolCallEnd {
        /// Call id that completed.
        id: String,
    },
    /// Token usage, if the provider reports it.
    Usage {
        /// Input tokens.
        input_tokens: usize,
        /// Output tokens.
        output_tokens: usize,
    },
    /// The stream is complete.
    Done,
    /// The provider reported an error mid-stream.
    Error(String),
}
