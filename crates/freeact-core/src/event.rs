//! The agent-facing event stream (`stream()`'s item type).
//!
//! Every event carries the producing agent's id so a caller consuming a
//! merged parent+subagent stream can tell events apart (§3, §9 "Cyclic
//! graphs": agent → subagent is a tree, never a cycle, so `agent_id` alone
//! disambiguates). `corr_id` threads a tool call through its approval
//! request, any intermediate execution output, and its final tool output.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::ids::{AgentId, CorrId};

/// One item of the stream returned by an agent's `stream()` call.
#[derive(Debug)]
pub enum Event {
    /// A streamed chunk of visible model text.
    ResponseChunk {
        /// Producing agent.
        agent_id: AgentId,
        /// Text delta.
        content: String,
    },
    /// The final aggregated visible model text for a turn.
    Response {
        /// Producing agent.
        agent_id: AgentId,
        /// Full aggregated text.
        content: String,
    },
    /// A streamed chunk of model "thinking" content.
    ThoughtsChunk {
        /// Producing agent.
        agent_id: AgentId,
        /// Text delta.
        content: String,
    },
    /// The final aggregated thinking content for a turn.
    Thoughts {
        /// Producing agent.
        agent_id: AgentId,
        /// Full aggregated text.
        content: String,
    },
    /// A pending tool invocation awaiting the consumer's decision. The
    /// consumer MUST call [`ApprovalRequest::approve`] exactly once, or the
    /// turn blocks indefinitely (§3 invariant).
    ApprovalRequest(ApprovalRequest),
    /// A streamed chunk of kernel stdout/stderr.
    CodeExecutionOutputChunk {
        /// Producing agent.
        agent_id: AgentId,
        /// Correlates to the originating tool call.
        corr_id: CorrId,
        /// Output delta.
        text: String,
    },
    /// The final kernel execution result.
    CodeExecutionOutput {
        /// Producing agent.
        agent_id: AgentId,
        /// Correlates to the originating tool call.
        corr_id: CorrId,
        /// Full stdout/stderr text.
        text: String,
        /// Any images the kernel produced, as `(media_type, bytes)` pairs.
        images: Vec<(String, Vec<u8>)>,
    },
    /// A non-kernel tool's final result (MCP call, subagent task).
    ToolOutput {
        /// Producing agent.
        agent_id: AgentId,
        /// Correlates to the originating tool call.
        corr_id: CorrId,
        /// The tool's result content.
        content: ToolOutputContent,
    },
}

impl Event {
    /// The id of the agent that produced this event.
    #[must_use]
    pub fn agent_id(&self) -> &AgentId {
        match self {
            Self::ResponseChunk { agent_id, .. }
            | Self::Response { agent_id, .. }
            | Self::ThoughtsChunk { agent_id, .. }
            | Self::Thoughts { agent_id, .. }
            | Self::CodeExecutionOutputChunk { agent_id, .. }
            | Self::CodeExecutionOutput { agent_id, .. }
            | Self::ToolOutput { agent_id, .. } => agent_id,
            Self::ApprovalRequest(req) => &req.agent_id,
        }
    }
}

/// The content carried by a [`Event::ToolOutput`]: either plain text or a
/// structured (JSON) value, per §3's "string or structured" payload note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutputContent {
    /// Plain text.
    Text(String),
    /// A structured JSON value.
    Structured(serde_json::Value),
}

/// A pending tool invocation. Dropping this without calling [`Self::approve`]
/// leaves the executor awaiting forever — there is no implicit default.
#[derive(Debug)]
pub struct ApprovalRequest {
    /// Producing agent.
    pub agent_id: AgentId,
    /// Correlates this request with its tool call, execution output, and
    /// eventual tool-return part.
    pub corr_id: CorrId,
    /// Name the model used to invoke the tool (already server-prefixed for
    /// MCP tools).
    pub tool_name: String,
    /// Tool arguments, as decoded from the model's tool-call part.
    pub tool_args: serde_json::Value,
    resolver: oneshot::Sender<bool>,
}

impl ApprovalRequest {
    /// Construct a request together with the `oneshot::Receiver` the
    /// executor awaits for the decision.
    #[must_use]
    pub fn new(
        agent_id: AgentId,
        corr_id: CorrId,
        tool_name: impl Into<String>,
        tool_args: serde_json::Value,
    ) -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            agent_id,
            corr_id,
            tool_name: tool_name.into(),
            tool_args,
            resolver: tx,
        };
        (request, rx)
    }

    /// Resolve this request: `true` approves the call, `false` rejects it.
    /// Consumes `self` by value, so a second call on the same request is a
    /// compile-time error rather than a runtime one.
    pub fn approve(self, decision: bool) {
        // The receiver may already be gone if the executor's await was
        // cancelled (e.g. the enclosing turn was dropped); that is not this
        // caller's problem to report.
        let _ = self.resolver.send(decision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn approve_resolves_the_paired_receiver() {
        let (req, rx) = ApprovalRequest::new(
            AgentId::main(),
            CorrId::new(),
            "ipybox_execute_ipython_cell",
            serde_json::json!({"code": "1+1"}),
        );
        req.approve(true);
        assert_eq!(rx.await, Ok(true));
    }

    #[test]
    fn agent_id_reaches_into_approval_request() {
        let (req, _rx) = ApprovalRequest::new(
            AgentId::new_subagent(),
            CorrId::new(),
            "database_query",
            serde_json::json!({}),
        );
        let event = Event::ApprovalRequest(req);
        assert!(event.agent_id().is_subagent());
    }
}
