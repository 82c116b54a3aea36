//! Scripted [`LlmProvider`] double: each `stream()` call pops one queued
//! turn and replays it verbatim, so a test controls exactly what the model
//! "said" without touching the network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use freeact_core::Message;
use freeact_llm::{LlmError, LlmProvider, LlmResult, LlmToolDefinition, StreamBox, StreamEvent};
use futures::stream;

/// A provider that replays a queue of canned turns.
///
/// Each turn is a `Vec<StreamEvent>` yielded in order by one `stream()` call.
/// Once the queue is empty, every further call yields `default_turn`
/// (a plain empty text response, by default).
pub struct ScriptedLlmProvider {
    name: String,
    model: String,
    turns: Mutex<VecDeque<Vec<StreamEvent>>>,
    default_turn: Vec<StreamEvent>,
    max_context_length: usize,
    /// Every request this provider was asked to stream, in call order —
    /// lets a test assert on what history/tools/system it was given.
    requests: Mutex<Vec<(Vec<Message>, Vec<LlmToolDefinition>, String)>>,
}

impl ScriptedLlmProvider {
    /// An empty double that answers every call with `default_turn` until
    /// turns are queued with [`Self::push_turn`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "scripted".to_string(),
            model: "scripted-model".to_string(),
            turns: Mutex::new(VecDeque::new()),
            default_turn: vec![StreamEvent::Done],
            max_context_length: 200_000,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue one turn of events, consumed by the next `stream()` call.
    #[must_use]
    pub fn push_turn(self, events: Vec<StreamEvent>) -> Self {
        self.turns.lock().unwrap_or_else(|e| e.into_inner()).push_back(events);
        self
    }

    /// Queue a plain text response turn: one `TextDelta` plus `Done`.
    #[must_use]
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.push_turn(vec![StreamEvent::TextDelta(text.into()), StreamEvent::Done])
    }

    /// Queue a single tool-call turn: the full arguments JSON arrives as one
    /// delta, which is how real providers behave for short argument lists.
    #[must_use]
    pub fn with_tool_call(self, id: impl Into<String>, name: impl Into<String>, args_json: impl Into<String>) -> Self {
        let id = id.into();
        self.push_turn(vec![
            StreamEvent::ToolCallStart { id: id.clone(), name: name.into() },
            StreamEvent::ToolCallDelta { id: id.clone(), args_delta: args_json.into() },
            StreamEvent::ToolCallEnd { id },
            StreamEvent::Done,
        ])
    }

    /// Queue a turn that errors mid-stream.
    #[must_use]
    pub fn with_error(self, reason: impl Into<String>) -> Self {
        self.push_turn(vec![StreamEvent::Error(reason.into())])
    }

    /// Every request this provider has been asked to stream so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(Vec<Message>, Vec<LlmToolDefinition>, String)> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many turns remain queued.
    #[must_use]
    pub fn remaining_turns(&self) -> usize {
        self.turns.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for ScriptedLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlmProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(&self, messages: &[Message], tools: &[LlmToolDefinition], system: &str) -> LlmResult<StreamBox> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((messages.to_vec(), tools.to_vec(), system.to_string()));

        let turn = self
            .turns
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default_turn.clone());

        if let Some(StreamEvent::Error(reason)) = turn.first() {
            return Err(LlmError::StreamingError(reason.clone()));
        }

        Ok(Box::pin(stream::iter(turn.into_iter().map(Ok))))
    }

    fn max_context_length(&self) -> usize {
        self.max_context_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_queued_turns_in_order() {
        let provider = ScriptedLlmProvider::new().with_text_response("first").with_text_response("second");

        let mut stream = provider.stream(&[], &[], "").await.unwrap();
        let first = futures::StreamExt::next(&mut stream).await.unwrap().unwrap();
        assert!(matches!(first, StreamEvent::TextDelta(t) if t == "first"));

        let mut stream = provider.stream(&[], &[], "").await.unwrap();
        let first = futures::StreamExt::next(&mut stream).await.unwrap().unwrap();
        assert!(matches!(first, StreamEvent::TextDelta(t) if t == "second"));
    }

    #[tokio::test]
    async fn empty_queue_yields_default_turn() {
        let provider = ScriptedLlmProvider::new();
        let mut stream = provider.stream(&[], &[], "").await.unwrap();
        let event = futures::StreamExt::next(&mut stream).await.unwrap().unwrap();
        assert!(matches!(event, StreamEvent::Done));
    }

    #[tokio::test]
    async fn records_every_request() {
        let provider = ScriptedLlmProvider::new().with_text_response("ok");
        let _ = provider.stream(&[Message::user_prompt("hi")], &[], "sys").await.unwrap();
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].2, "sys");
    }
}
