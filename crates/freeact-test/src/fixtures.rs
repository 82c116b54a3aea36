//! Test fixtures for the core id/message/event types.

use freeact_core::{
    AgentId, CorrId, Event, Message, ResponsePart, SessionId, ToolCallPart, ToolReturnPart,
    ToolResultContent,
};

/// The root agent id, `"main"`.
#[must_use]
pub fn test_agent_id() -> AgentId {
    AgentId::main()
}

/// A fresh subagent id, `"sub-<4 hex>"`.
#[must_use]
pub fn test_subagent_id() -> AgentId {
    AgentId::new_subagent()
}

/// A fresh random session id.
#[must_use]
pub fn test_session_id() -> SessionId {
    SessionId::new()
}

/// A session id wrapping a fixed, human-readable string, for tests that
/// assert on the session directory name.
#[must_use]
pub fn test_session_id_fixed() -> SessionId {
    SessionId::from_string("test-session")
}

/// A plain user-prompt request message.
#[must_use]
pub fn test_user_prompt(text: impl Into<String>) -> Message {
    Message::user_prompt(text.into())
}

/// A response message consisting of a single tool call.
#[must_use]
pub fn test_tool_call_response(id: impl Into<String>, name: impl Into<String>, args: serde_json::Value) -> Message {
    Message::Response(vec![ResponsePart::ToolCall(ToolCallPart { id: id.into(), name: name.into(), args })])
}

/// A response message consisting of plain text.
#[must_use]
pub fn test_text_response(text: impl Into<String>) -> Message {
    Message::Response(vec![ResponsePart::Text(text.into())])
}

/// A tool-return request message for one successful call.
#[must_use]
pub fn test_tool_return(tool_call_id: impl Into<String>, tool_name: impl Into<String>, text: impl Into<String>) -> Message {
    Message::tool_returns(vec![ToolReturnPart {
        tool_call_id: tool_call_id.into(),
        tool_name: tool_name.into(),
        content: ToolResultContent::text(text),
        rejected: false,
    }])
}

/// A tool-return request message for a rejected call.
#[must_use]
pub fn test_rejected_tool_return(tool_call_id: impl Into<String>, tool_name: impl Into<String>) -> Message {
    Message::tool_returns(vec![ToolReturnPart {
        tool_call_id: tool_call_id.into(),
        tool_name: tool_name.into(),
        content: ToolResultContent::text("Tool call rejected"),
        rejected: true,
    }])
}

/// A pending approval request together with its paired receiver, wired to
/// `test_agent_id()`.
#[must_use]
pub fn test_approval_request(tool_name: impl Into<String>, tool_args: serde_json::Value) -> (Event, tokio::sync::oneshot::Receiver<bool>) {
    let (req, rx) = freeact_core::ApprovalRequest::new(test_agent_id(), CorrId::new(), tool_name, tool_args);
    (Event::ApprovalRequest(req), rx)
}
