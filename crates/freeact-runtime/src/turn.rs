//! Turn engine (C8): the main model/tool loop driving one `stream()` call.
//!
//! Each iteration opens one model stream, aggregates it into a response
//! message, and — if the model asked for tools — dispatches every tool call
//! concurrently before looping. Tool-call dispatch already writes its events
//! onto the shared channel as they happen, so concurrent dispatch naturally
//! interleaves in arrival order; there is no separate merge step.

use std::collections::HashMap;

use freeact_core::{Event, Message, ResponsePart, ToolCallPart};
use freeact_llm::StreamEvent;
use freeact_telemetry::RequestContext;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::agent::Agent;
use crate::error::{RuntimeError, RuntimeResult};

/// Drive `prompt` to completion for `agent`, emitting every event onto `tx`.
/// Never lets an internal error escape silently: any failure becomes a
/// final `Response` describing it, so the caller's stream always terminates
/// cleanly. Wrapped in a [`RequestContext`] span so every log line emitted
/// while the turn runs (by this crate or a collaborator) is correlated by
/// agent id.
pub async fn run(agent: &Agent, prompt: String, max_turns: Option<usize>, tx: mpsc::UnboundedSender<Event>) {
    let ctx = RequestContext::new("freeact-runtime")
        .with_operation("turn")
        .with_metadata("agent_id", agent.agent_id().as_str());
    let span = ctx.span();

    async {
        if let Err(e) = run_inner(agent, prompt, max_turns, &tx).await {
            tracing::warn!(error = %e, "turn ended with an error");
            let _ = tx.send(Event::Response {
                agent_id: agent.agent_id().clone(),
                content: format!("Agent error: {e}"),
            });
        }
    }
    .instrument(span)
    .await;
}

async fn run_inner(
    agent: &Agent,
    prompt: String,
    max_turns: Option<usize>,
    tx: &mpsc::UnboundedSender<Event>,
) -> RuntimeResult<()> {
    let max_turns = max_turns.unwrap_or_else(|| agent.max_turns_default());
    let executor = agent.executor()?;
    let mcp = agent.mcp()?;
    let tool_defs = crate::registry::all_definitions(agent.enable_subagents(), &mcp);

    let mut first_llm_call = {
        let mut history = agent.history().lock().await;
        let is_first = history.is_empty();
        let request = if is_first {
            Message::system_and_user_prompt(agent.system_prompt(), prompt)
        } else {
            Message::user_prompt(prompt)
        };
        history.push(request.clone());
        agent.session_store().append(agent.agent_id(), &[request]).await?;
        is_first
    };

    for _ in 0..max_turns {
        let messages = agent.history().lock().await.clone();
        let system = if first_llm_call { agent.system_prompt() } else { "" };
        first_llm_call = false;

        let response = aggregate_response(agent, &messages, &tool_defs, system, tx).await?;
        let tool_calls: Vec<ToolCallPart> = response.tool_calls().into_iter().cloned().collect();

        {
            let mut history = agent.history().lock().await;
            history.push(response.clone());
            agent.session_store().append(agent.agent_id(), &[response.clone()]).await?;
        }

        let (final_text, final_thoughts) = split_text_and_thoughts(&response);
        if !final_thoughts.is_empty() {
            let _ = tx.send(Event::Thoughts {
                agent_id: agent.agent_id().clone(),
                content: final_thoughts,
            });
        }

        if tool_calls.is_empty() {
            if !final_text.is_empty() {
                let _ = tx.send(Event::Response {
                    agent_id: agent.agent_id().clone(),
                    content: final_text,
                });
            }
            return Ok(());
        }

        if !final_text.is_empty() {
            let _ = tx.send(Event::Response {
                agent_id: agent.agent_id().clone(),
                content: final_text,
            });
        }

        let depth = agent.depth();
        let returns = futures::future::join_all(tool_calls.iter().map(|call| {
            let tx = tx.clone();
            let executor = &executor;
            async move { executor.execute(agent, depth, call, &tx).await }
        }))
        .await;

        let any_rejected = returns.iter().any(|r| r.rejected);

        let tool_returns = Message::tool_returns(returns);
        {
            let mut history = agent.history().lock().await;
            history.push(tool_returns.clone());
            agent.session_store().append(agent.agent_id(), &[tool_returns]).await?;
        }

        if any_rejected {
            let _ = tx.send(Event::Response {
                agent_id: agent.agent_id().clone(),
                content: "Tool call rejected".to_string(),
            });
            return Ok(());
        }
    }

    Ok(())
}

async fn aggregate_response(
    agent: &Agent,
    messages: &[Message],
    tool_defs: &[freeact_llm::LlmToolDefinition],
    system: &str,
    tx: &mpsc::UnboundedSender<Event>,
) -> RuntimeResult<Message> {
    let mut stream = agent.llm().stream(messages, tool_defs, system).await?;

    let mut text = String::new();
    let mut thoughts = String::new();
    let mut calls: Vec<(String, String)> = Vec::new();
    let mut args_by_id: HashMap<String, String> = HashMap::new();

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::TextDelta(delta) => {
                text.push_str(&delta);
                let _ = tx.send(Event::ResponseChunk {
                    agent_id: agent.agent_id().clone(),
                    content: delta,
                });
            }
            StreamEvent::ThoughtDelta(delta) => {
                thoughts.push_str(&delta);
                let _ = tx.send(Event::ThoughtsChunk {
                    agent_id: agent.agent_id().clone(),
                    content: delta,
                });
            }
            StreamEvent::ToolCallStart { id, name } => {
                calls.push((id.clone(), name));
                args_by_id.insert(id, String::new());
            }
            StreamEvent::ToolCallDelta { id, args_delta } => {
                args_by_id.entry(id).or_default().push_str(&args_delta);
            }
            StreamEvent::ToolCallEnd { .. } => {}
            StreamEvent::Usage { .. } | StreamEvent::Done => {}
            StreamEvent::Error(reason) => {
                return Err(RuntimeError::Llm(freeact_llm::LlmError::StreamingError(reason)));
            }
        }
    }

    let mut parts = Vec::new();
    if !text.is_empty() {
        parts.push(ResponsePart::Text(text));
    }
    if !thoughts.is_empty() {
        parts.push(ResponsePart::Thought(thoughts));
    }
    for (id, name) in calls {
        let raw_args = args_by_id.remove(&id).unwrap_or_default();
        let args = serde_json::from_str(&raw_args).unwrap_or(serde_json::Value::Null);
        parts.push(ResponsePart::ToolCall(ToolCallPart { id, name, args }));
    }

    Ok(Message::Response(parts))
}

fn split_text_and_thoughts(message: &Message) -> (String, String) {
    let Message::Response(parts) = message else {
        return (String::new(), String::new());
    };

    let mut text = String::new();
    let mut thoughts = String::new();
    for part in parts {
        match part {
            ResponsePart::Text(t) => text.push_str(t),
            ResponsePart::Thought(t) => thoughts.push_str(t),
            ResponsePart::ToolCall(_) => {}
        }
    }
    (text, thoughts)
}
