//! Shared helpers for draining an agent's event stream in tests.

use freeact_core::Event;
use serde_json::Value;
use tokio::sync::mpsc;

/// An owned, assertable summary of one [`Event`] — `Event` itself can't
/// derive `PartialEq`/`Clone` because `ApprovalRequest` carries a live
/// `oneshot::Sender`.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    ResponseChunk(String),
    Response(String),
    ThoughtsChunk(String),
    Thoughts(String),
    Approval { tool_name: String, tool_args: Value },
    CodeExecutionOutputChunk(String),
    CodeExecutionOutput(String),
    ToolOutput(String),
}

/// Drain every event from `rx`, resolving each `ApprovalRequest` with
/// `decision` as it arrives, and returning an owned log of what was seen.
pub async fn drain_auto_deciding(mut rx: mpsc::UnboundedReceiver<Event>, decision: bool) -> Vec<Observed> {
    let mut observed = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            Event::ResponseChunk { content, .. } => observed.push(Observed::ResponseChunk(content)),
            Event::Response { content, .. } => observed.push(Observed::Response(content)),
            Event::ThoughtsChunk { content, .. } => observed.push(Observed::ThoughtsChunk(content)),
            Event::Thoughts { content, .. } => observed.push(Observed::Thoughts(content)),
            Event::ApprovalRequest(req) => {
                observed.push(Observed::Approval { tool_name: req.tool_name.clone(), tool_args: req.tool_args.clone() });
                req.approve(decision);
            }
            Event::CodeExecutionOutputChunk { text, .. } => observed.push(Observed::CodeExecutionOutputChunk(text)),
            Event::CodeExecutionOutput { text, .. } => observed.push(Observed::CodeExecutionOutput(text)),
            Event::ToolOutput { content, .. } => {
                let text = match content {
                    freeact_core::ToolOutputContent::Text(t) => t,
                    freeact_core::ToolOutputContent::Structured(v) => v.to_string(),
                };
                observed.push(Observed::ToolOutput(text));
            }
        }
    }
    observed
}
