//! Tool executor (C9): resolves one tool call to a tool-return part —
//! unknown-name lookup, pre-approval / approval-request gating, then
//! dispatch to the kernel, an MCP server, or a subagent.

use std::sync::Arc;
use std::time::Duration;

use freeact_core::{AgentId, ApprovalRequest, CorrId, Event, ToolCallPart, ToolOutputContent, ToolResultContent, ToolReturnPart};
use freeact_approval::{is_ptc_rejection, PermissionManager};
use freeact_mcp::McpRegistry;
use freeact_session::ToolResultMaterializer;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use crate::agent::Agent;
use crate::kernel::{KernelError, KernelEvent, KernelExecutor};
use crate::registry;
use crate::subagent::SubagentRunner;

/// Resolves tool calls for one agent. The kernel lock held by this executor
/// is process-wide for the agent: a single writer for the whole duration of
/// a code execution (including any nested PTC approval dialogues) or a
/// reset, per §5.
pub struct ToolExecutor {
    agent_id: AgentId,
    kernel: Arc<dyn KernelExecutor>,
    kernel_lock: Arc<Mutex<()>>,
    mcp: Arc<McpRegistry>,
    permissions: Arc<PermissionManager>,
    materializer: ToolResultMaterializer,
    subagents: Arc<SubagentRunner>,
    max_output_chars: usize,
    execution_timeout_secs: u64,
}

impl ToolExecutor {
    /// Assemble an executor over already-connected collaborators.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_id: AgentId,
        kernel: Arc<dyn KernelExecutor>,
        mcp: Arc<McpRegistry>,
        permissions: Arc<PermissionManager>,
        materializer: ToolResultMaterializer,
        subagents: Arc<SubagentRunner>,
        max_output_chars: usize,
        execution_timeout_secs: u64,
    ) -> Self {
        Self {
            agent_id,
            kernel,
            kernel_lock: Arc::new(Mutex::new(())),
            mcp,
            permissions,
            materializer,
            subagents,
            max_output_chars,
            execution_timeout_secs,
        }
    }

    /// Resolve `call` to a tool-return part, emitting whatever intermediate
    /// events (approval requests, execution output chunks, tool output)
    /// belong to this call onto `events`. `depth` is this agent's subagent
    /// depth, needed only if `call` is a `subagent_task` dispatch.
    pub async fn execute(
        &self,
        parent: &Agent,
        depth: usize,
        call: &ToolCallPart,
        events: &mpsc::UnboundedSender<Event>,
    ) -> ToolReturnPart {
        let corr_id = CorrId::new();

        if !registry::is_builtin(&call.name) && !self.mcp.contains(&call.name) {
            return ToolReturnPart {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                content: ToolResultContent::text(format!("Unknown tool name: {}", call.name)),
                rejected: false,
            };
        }

        if !self.permissions.is_allowed(&call.name, &call.args) {
            let (request, rx) =
                ApprovalRequest::new(self.agent_id.clone(), corr_id.clone(), call.name.clone(), call.args.clone());
            if events.send(Event::ApprovalRequest(request)).is_err() {
                return self.rejected_return(call);
            }
            let approved = rx.await.unwrap_or(false);
            if !approved {
                return self.rejected_return(call);
            }
        }

        let is_execute = call.name.as_str() == registry::EXECUTE_IPYTHON_CELL;

        let (content, rejected) = match call.name.as_str() {
            registry::EXECUTE_IPYTHON_CELL => self.dispatch_execute(&corr_id, &call.args, events).await,
            registry::RESET_KERNEL => (self.dispatch_reset().await, false),
            registry::SUBAGENT_TASK => {
                let text = self.dispatch_subagent(parent, depth, &call.args, events).await;
                (ToolResultContent::text(text), false)
            }
            _ => self.dispatch_mcp(&corr_id, call, events).await,
        };

        let content = self.materializer.materialize(content).await;

        // Capping is specific to the kernel-execute path and applied after
        // C3 formatting, so a spill notice is itself subject to capping
        // rather than the (potentially huge) pre-spill payload.
        let content = if is_execute {
            match content {
                ToolResultContent::Text(text) => ToolResultContent::text(cap_output(&text, self.max_output_chars)),
                other => other,
            }
        } else {
            content
        };

        ToolReturnPart {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content,
            rejected,
        }
    }

    fn rejected_return(&self, call: &ToolCallPart) -> ToolReturnPart {
        ToolReturnPart {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content: ToolResultContent::text("Tool call rejected"),
            rejected: true,
        }
    }

    async fn dispatch_execute(
        &self,
        corr_id: &CorrId,
        args: &Value,
        events: &mpsc::UnboundedSender<Event>,
    ) -> (ToolResultContent, bool) {
        let Some(code) = args.get("code").and_then(Value::as_str) else {
            return (ToolResultContent::text("Invalid arguments: missing 'code'"), false);
        };

        let _guard = self.kernel_lock.lock().await;

        let handle = match self.kernel.execute(code).await {
            Ok(handle) => handle,
            Err(e) => return (ToolResultContent::text(format!("Kernel error: {e}")), false),
        };

        let outcome = tokio::time::timeout(
            Duration::from_secs(self.execution_timeout_secs),
            self.drain_kernel_stream(corr_id, handle, events),
        )
        .await;

        match outcome {
            Ok(text) => {
                let rejected = is_ptc_rejection(&text);
                (ToolResultContent::text(text), rejected)
            }
            Err(_elapsed) => (
                ToolResultContent::text(format!(
                    "Code execution timed out after {}s",
                    self.execution_timeout_secs
                )),
                false,
            ),
        }
    }

    async fn drain_kernel_stream(
        &self,
        corr_id: &CorrId,
        mut handle: crate::kernel::KernelStreamHandle,
        events: &mpsc::UnboundedSender<Event>,
    ) -> String {
        let mut final_text = String::new();

        while let Some(event) = handle.next().await {
            match event {
                KernelEvent::OutputChunk(text) => {
                    let _ = events.send(Event::CodeExecutionOutputChunk {
                        agent_id: self.agent_id.clone(),
                        corr_id: corr_id.clone(),
                        text,
                    });
                }
                KernelEvent::PtcApprovalRequest { tool_name, tool_args, resolver } => {
                    let approved = if self.permissions.is_allowed(&tool_name, &tool_args) {
                        true
                    } else {
                        let (request, rx) =
                            ApprovalRequest::new(self.agent_id.clone(), CorrId::new(), tool_name, tool_args);
                        if events.send(Event::ApprovalRequest(request)).is_err() {
                            false
                        } else {
                            rx.await.unwrap_or(false)
                        }
                    };
                    let _ = resolver.send(approved);
                }
                KernelEvent::Result { text, images } => {
                    let _ = events.send(Event::CodeExecutionOutput {
                        agent_id: self.agent_id.clone(),
                        corr_id: corr_id.clone(),
                        text: text.clone(),
                        images,
                    });
                    final_text = text;
                }
            }
        }

        final_text
    }

    async fn dispatch_reset(&self) -> ToolResultContent {
        let _guard = self.kernel_lock.lock().await;
        match self.kernel.reset().await {
            Ok(()) => ToolResultContent::text("Kernel reset."),
            Err(e) => ToolResultContent::text(format!("Kernel error: {e}")),
        }
    }

    async fn dispatch_subagent(
        &self,
        parent: &Agent,
        depth: usize,
        args: &Value,
        events: &mpsc::UnboundedSender<Event>,
    ) -> String {
        let Some(prompt) = args.get("prompt").and_then(Value::as_str) else {
            return "Subagent error: missing 'prompt' argument".to_string();
        };
        let max_turns = args.get("max_turns").and_then(Value::as_u64).map(|n| n as usize);

        self.subagents
            .run(parent, depth, prompt.to_string(), max_turns, events.clone())
            .await
    }

    async fn dispatch_mcp(
        &self,
        corr_id: &CorrId,
        call: &ToolCallPart,
        events: &mpsc::UnboundedSender<Event>,
    ) -> (ToolResultContent, bool) {
        match self.mcp.call_tool(&call.name, call.args.clone()).await {
            Ok(output) => {
                let _ = events.send(Event::ToolOutput {
                    agent_id: self.agent_id.clone(),
                    corr_id: corr_id.clone(),
                    content: output.clone(),
                });
                (tool_output_to_result(output), false)
            }
            Err(e) => (ToolResultContent::text(format!("MCP tool call failed: {e}")), false),
        }
    }
}

fn tool_output_to_result(content: ToolOutputContent) -> ToolResultContent {
    match content {
        ToolOutputContent::Text(text) => ToolResultContent::Text(text),
        ToolOutputContent::Structured(value) => ToolResultContent::Structured(value),
    }
}

/// Cap `text` at `max_output_chars` bytes, keeping the first 80% and the
/// last 20% (minus the joining ellipsis) when it exceeds that budget. This
/// is distinct from the materializer's line-based preview split: this cap
/// bounds what the model sees in its context, the materializer separately
/// decides whether the (already capped) text fits inline in the session log.
fn cap_output(text: &str, max_output_chars: usize) -> String {
    if text.len() <= max_output_chars || max_output_chars == 0 {
        return text.to_string();
    }

    let head_len = max_output_chars * 8 / 10;
    let tail_len = (max_output_chars * 2 / 10).saturating_sub(3);

    let head_end = floor_char_boundary(text, head_len);
    let tail_start = ceil_char_boundary(text, text.len().saturating_sub(tail_len));

    format!("{}...{}", &text[..head_end], &text[tail_start..])
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_output_is_unchanged() {
        assert_eq!(cap_output("hello", 5000), "hello");
    }

    #[test]
    fn long_output_keeps_head_and_tail() {
        let text = "a".repeat(6000) + "TAIL";
        let capped = cap_output(&text, 100);
        assert!(capped.starts_with(&"a".repeat(80)));
        assert!(capped.contains("..."));
        assert!(capped.len() < text.len());
    }

    #[test]
    fn unknown_tool_detection_matches_registry() {
        assert!(registry::is_builtin(registry::EXECUTE_IPYTHON_CELL));
    }
}
