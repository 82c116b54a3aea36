//! Subagent runner (C10): spawns isolated child agents under a global
//! concurrency limit, forwards their events unchanged, and reports a single
//! summarizing tool-return to the parent turn.

use std::sync::Arc;

use freeact_core::{AgentId, Event};
use tokio::sync::{mpsc, Semaphore};

use crate::agent::Agent;
use crate::error::RuntimeError;

/// Bounds how many subagents may run concurrently across the whole process
/// (§4.10) and enforces `max_subagent_depth` as defense-in-depth — spawned
/// agents already run with `enable_subagents = false`, so in practice depth
/// never exceeds 1, but the check stays in case that invariant is ever
/// relaxed upstream.
pub struct SubagentRunner {
    semaphore: Arc<Semaphore>,
    max_depth: usize,
}

impl SubagentRunner {
    /// `max_concurrent` seeds the shared permit pool; `max_depth` is the
    /// configured `max_subagent_depth`.
    #[must_use]
    pub fn new(max_concurrent: usize, max_depth: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_depth,
        }
    }

    /// Run `prompt` to completion in a fresh subagent spawned from `parent`,
    /// forwarding every event it emits onto `events` unchanged, and returning
    /// the text that should become the parent's tool-return content.
    ///
    /// Never returns an error: construction failures, start failures, and
    /// mid-turn crashes are all folded into the `"Subagent error: …"` string
    /// per §7 taxonomy 2, so the parent turn always gets a tool-return.
    pub async fn run(
        &self,
        parent: &Agent,
        depth: usize,
        prompt: String,
        max_turns: Option<usize>,
        events: mpsc::UnboundedSender<Event>,
    ) -> String {
        if depth + 1 > self.max_depth {
            return format!(
                "Subagent error: {}",
                RuntimeError::SubagentDepthExceeded {
                    limit: self.max_depth,
                    depth: depth + 1,
                }
            );
        }

        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return "Subagent error: subagent runner is shutting down".to_string(),
        };

        let outcome = self.drive(parent, prompt, max_turns, events).await;
        drop(permit);
        outcome
    }

    async fn drive(
        &self,
        parent: &Agent,
        prompt: String,
        max_turns: Option<usize>,
        events: mpsc::UnboundedSender<Event>,
    ) -> String {
        let child = match parent.spawn_child() {
            Ok(child) => child,
            Err(e) => return format!("Subagent error: {e}"),
        };

        if let Err(e) = child.start().await {
            return format!("Subagent error: {e}");
        }

        let child_id = child.agent_id().clone();
        let mut rx = child.stream(prompt, max_turns);
        let mut last_response: Option<String> = None;

        while let Some(event) = rx.recv().await {
            if let Event::Response { content, .. } = &event {
                last_response = Some(content.clone());
            }
            if events.send(event).is_err() {
                break;
            }
        }

        if let Err(e) = child.stop().await {
            tracing::warn!(subagent = %child_id, error = %e, "subagent stop reported an error");
        }

        last_response.unwrap_or_else(|| "Subagent error: no response produced".to_string())
    }
}
