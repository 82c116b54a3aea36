//! MCP tool types: definitions as enumerated from a connected server, and
//! the conversion from an rmcp tool-call result into the runtime's
//! [`freeact_core::ToolOutputContent`].

use freeact_core::ToolOutputContent;
use rmcp::model::{self as rmcp_model, RawContent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool as enumerated from a server, with its name already prefixed
/// `<server>_<tool>` (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Prefixed name, as offered to the model.
    pub name: String,
    /// Owning server (the prefix, before the underscore).
    pub server: String,
    /// The server's own, unprefixed tool name — used to dispatch the call.
    pub unprefixed_name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// JSON Schema for input parameters.
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Build from an rmcp `Tool`, applying the server-key prefix.
    #[must_use]
    pub fn from_rmcp(tool: &rmcp_model::Tool, server: &str) -> Self {
        let unprefixed_name = tool.name.to_string();
        Self {
            name: format!("{server}_{unprefixed_name}"),
            server: server.to_string(),
            unprefixed_name,
            description: tool.description.as_deref().map(String::from),
            input_schema: serde_json::to_value(&*tool.input_schema)
                .unwrap_or_else(|_| serde_json::json!({"type": "object"})),
        }
    }
}

/// Convert a completed rmcp tool call into the content the turn engine
/// attaches to a tool-return part (§4.9 item 4, MCP dispatch branch).
///
/// A single text block is returned verbatim; anything richer (a mix of
/// content types, images, embedded resources) is folded into a
/// [`ToolOutputContent::Structured`] JSON value so no information is
/// silently dropped.
#[must_use]
pub fn content_from_rmcp(result: rmcp_model::CallToolResult) -> ToolOutputContent {
    if let [only] = result.content.as_slice() {
        if let RawContent::Text(text) = &**only {
            return ToolOutputContent::Text(text.text.clone());
        }
    }

    let parts: Vec<Value> = result.content.iter().map(content_to_value).collect();
    ToolOutputContent::Structured(serde_json::json!({
        "is_error": result.is_error.unwrap_or(false),
        "content": parts,
    }))
}

fn content_to_value(content: &rmcp_model::Content) -> Value {
    match &**content {
        RawContent::Text(text) => serde_json::json!({"type": "text", "text": text.text}),
        RawContent::Image(image) => {
            serde_json::json!({"type": "image", "mime_type": image.mime_type, "data": image.data})
        }
        RawContent::Audio(_) => serde_json::json!({"type": "audio"}),
        RawContent::Resource(embedded) => match &embedded.resource {
            rmcp_model::ResourceContents::TextResourceContents { uri, mime_type, text, .. } => {
                serde_json::json!({"type": "resource", "uri": uri, "mime_type": mime_type, "text": text})
            }
            rmcp_model::ResourceContents::BlobResourceContents { uri, mime_type, .. } => {
                serde_json::json!({"type": "resource", "uri": uri, "mime_type": mime_type})
            }
        },
        RawContent::ResourceLink(link) => {
            serde_json::json!({"type": "resource_link", "uri": link.uri})
        }
    }
}

