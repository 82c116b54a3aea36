//! The provider-neutral message/part model.
//!
//! A [`Message`] is either a *request* (parts the host sends the model: a
//! system prompt, a user prompt, or tool-return results) or a *response*
//! (parts the model sends back: text, thoughts, or tool calls). This is the
//! shape the session log (`freeact-session`) persists and the turn engine
//! builds up turn by turn; it is deliberately a superset of what any single
//! LLM wire format needs, so `freeact-llm` providers translate to/from it
//! rather than the core adapting to each provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", content = "parts", rename_all = "snake_case")]
pub enum Message {
    /// A request sent to the model.
    Request(Vec<RequestPart>),
    /// A response received from the model.
    Response(Vec<ResponsePart>),
}

impl Message {
    /// Construct a request containing a single user-prompt part.
    #[must_use]
    pub fn user_prompt(content: impl Into<UserContent>) -> Self {
        Self::Request(vec![RequestPart::UserPrompt(content.into())])
    }

    /// Construct a request containing a system-prompt part followed by a
    /// user-prompt part.
    #[must_use]
    pub fn system_and_user_prompt(system: impl Into<String>, user: impl Into<UserContent>) -> Self {
        Self::Request(vec![
            RequestPart::SystemPrompt(system.into()),
            RequestPart::UserPrompt(user.into()),
        ])
    }

    /// Construct a request containing only tool-return parts (§4.8 step f).
    #[must_use]
    pub fn tool_returns(parts: Vec<ToolReturnPart>) -> Self {
        Self::Request(parts.into_iter().map(RequestPart::ToolReturn).collect())
    }

    /// Tool-call parts present in this message, if it is a response.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&ToolCallPart> {
        match self {
            Self::Response(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ResponsePart::ToolCall(tc) => Some(tc),
                    _ => None,
                })
                .collect(),
            Self::Request(_) => Vec::new(),
        }
    }
}

/// A part of a [`Message::Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RequestPart {
    /// The system prompt, prepended only to the first request of a session.
    SystemPrompt(String),
    /// What the user asked for: plain text or a mixed text/attachment sequence.
    UserPrompt(UserContent),
    /// The result of a previously requested tool call.
    ToolReturn(ToolReturnPart),
}

/// A part of a [`Message::Response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponsePart {
    /// Visible model text.
    Text(String),
    /// Model "thinking" content, shown separately from the final answer.
    Thought(String),
    /// A tool the model wants invoked.
    ToolCall(ToolCallPart),
}

/// User-submitted content: a plain prompt or an ordered mix of text and
/// binary attachments (§6: "string or an ordered mixed sequence of text
/// strings and binary attachment blobs").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    /// A plain-text prompt.
    Text(String),
    /// Text interleaved with tagged binary attachments.
    Mixed(Vec<UserContentItem>),
}

impl From<String> for UserContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for UserContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One item of a [`UserContent::Mixed`] sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UserContentItem {
    /// A text span.
    Text(String),
    /// A binary attachment, tagged with its media type (e.g. `image/png`).
    Attachment {
        /// Raw attachment bytes.
        data: Vec<u8>,
        /// The attachment's media (MIME) type.
        media_type: String,
    },
}

/// A tool call the model wants dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallPart {
    /// Provider-assigned call id; echoed back on the tool-return part and
    /// used as the wire-level twin of the core's own [`crate::CorrId`].
    pub id: String,
    /// Tool name as the model sees it (already includes any MCP server
    /// prefix, e.g. `"filesystem_read_file"`).
    pub name: String,
    /// Tool arguments, as decoded from the provider's streamed JSON.
    pub args: Value,
}

/// The result of dispatching one [`ToolCallPart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReturnPart {
    /// Echoes [`ToolCallPart::id`].
    pub tool_call_id: String,
    /// The tool that was (or would have been) invoked.
    pub tool_name: String,
    /// The content returned to the model. Always text by the time it
    /// reaches the model — materialization (C3) happens before this is
    /// constructed — but kept as [`ToolResultContent`] so a session-log
    /// reader can distinguish a spilled notice from genuine tool output.
    pub content: ToolResultContent,
    /// Per §7 taxonomy 3: set when this tool-return resulted from an
    /// explicit rejection (user `approve(false)`, or PTC-rejection match).
    pub rejected: bool,
}

/// The four shapes a tool result (or tool-call content) can take, per the
/// "dynamic typing → tagged unions" design note: text, a binary blob with
/// a media type, or a structured (JSON-like) value. This is also the input
/// domain of the tool-result materializer (C3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ToolResultContent {
    /// Plain text (the common case: tool-return strings, materializer notices).
    Text(String),
    /// A binary blob tagged with its media type.
    Binary {
        /// Raw bytes.
        data: Vec<u8>,
        /// The blob's media (MIME) type.
        media_type: String,
    },
    /// A structured (JSON) value.
    Structured(Value),
}

impl ToolResultContent {
    /// Construct a text result.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_calls_extracts_only_from_responses() {
        let req = Message::user_prompt("hi");
        assert!(req.tool_calls().is_empty());

        let resp = Message::Response(vec![
            ResponsePart::Text("ok".into()),
            ResponsePart::ToolCall(ToolCallPart {
                id: "1".into(),
                name: "ipybox_execute_ipython_cell".into(),
                args: serde_json::json!({"code": "1+1"}),
            }),
        ]);
        assert_eq!(resp.tool_calls().len(), 1);
    }

    #[test]
    fn user_content_from_str_is_plain_text() {
        let content: UserContent = "hello".into();
        assert_eq!(content, UserContent::Text("hello".to_string()));
    }

    #[test]
    fn message_roundtrips_through_json() {
        let msg = Message::tool_returns(vec![ToolReturnPart {
            tool_call_id: "abc".into(),
            tool_name: "ipybox_execute_ipython_cell".into(),
            content: ToolResultContent::text("42"),
            rejected: false,
        }]);
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
