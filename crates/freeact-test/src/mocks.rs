//! Scripted [`KernelExecutor`] double: replays a canned sequence of output
//! chunks, PTC approval requests, and a final result, so a test exercises
//! the tool executor's dispatch path without a real IPython kernel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use freeact_runtime::kernel::{KernelError, KernelEvent, KernelExecutor, KernelResult, KernelStreamHandle};
use futures::stream;
use serde_json::Value;
use tokio::sync::oneshot;

/// One scripted event, pre-canned as static data.
///
/// This mirrors [`KernelEvent`] except for `PtcApproval`, which carries no
/// `oneshot::Sender` — a real channel is created fresh each time the event
/// is emitted, since a live sender can't be scripted ahead of time.
#[derive(Debug, Clone)]
pub enum KernelScriptEvent {
    /// A chunk of stdout/stderr.
    Output(String),
    /// The code wants to call an MCP tool; the stream blocks until the
    /// approval is resolved before continuing.
    PtcApproval { tool_name: String, tool_args: Value },
    /// The final result.
    Result { text: String, images: Vec<(String, Vec<u8>)> },
}

/// A kernel that replays one queued script per `execute()` call.
///
/// Scripts are queued with [`Self::push_script`] and consumed in order;
/// once the queue is empty, `execute` returns [`KernelError::Unavailable`].
pub struct ScriptedKernel {
    scripts: Mutex<VecDeque<Vec<KernelScriptEvent>>>,
    reset_count: AtomicUsize,
    /// Every PTC approval decision observed, in the order it resolved.
    approvals: Mutex<Vec<bool>>,
}

impl ScriptedKernel {
    /// A kernel with no scripts queued.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            reset_count: AtomicUsize::new(0),
            approvals: Mutex::new(Vec::new()),
        }
    }

    /// Queue one script, consumed by the next `execute()` call.
    #[must_use]
    pub fn push_script(self, events: Vec<KernelScriptEvent>) -> Self {
        self.scripts.lock().unwrap_or_else(|e| e.into_inner()).push_back(events);
        self
    }

    /// Queue a script that just prints `output` and returns it as the result.
    #[must_use]
    pub fn with_output(self, output: impl Into<String>) -> Self {
        let output = output.into();
        self.push_script(vec![
            KernelScriptEvent::Output(output.clone()),
            KernelScriptEvent::Result { text: output, images: Vec::new() },
        ])
    }

    /// Queue a script that requests one PTC approval before returning `result`.
    #[must_use]
    pub fn with_ptc_call(self, tool_name: impl Into<String>, tool_args: Value, result: impl Into<String>) -> Self {
        self.push_script(vec![
            KernelScriptEvent::PtcApproval { tool_name: tool_name.into(), tool_args },
            KernelScriptEvent::Result { text: result.into(), images: Vec::new() },
        ])
    }

    /// How many times `reset()` has been called.
    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.reset_count.load(Ordering::SeqCst)
    }

    /// Every PTC approval decision observed so far, in resolution order.
    #[must_use]
    pub fn approvals(&self) -> Vec<bool> {
        self.approvals.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for ScriptedKernel {
    fn default() -> Self {
        Self::new()
    }
}

type KernelState = (VecDeque<KernelScriptEvent>, Option<oneshot::Receiver<bool>>);

#[async_trait]
impl KernelExecutor for ScriptedKernel {
    async fn execute(&self, _code: &str) -> KernelResult<KernelStreamHandle> {
        let script = self
            .scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| KernelError::Unavailable("no script queued".to_string()))?;

        let approvals = &self.approvals;
        let state: KernelState = (VecDeque::from(script), None);
        let stream = stream::unfold(state, move |(mut queue, pending)| async move {
            if let Some(rx) = pending {
                let approved = rx.await.unwrap_or(false);
                approvals.lock().unwrap_or_else(|e| e.into_inner()).push(approved);
            }

            let next = queue.pop_front()?;
            match next {
                KernelScriptEvent::Output(text) => Some((KernelEvent::OutputChunk(text), (queue, None))),
                KernelScriptEvent::Result { text, images } => Some((KernelEvent::Result { text, images }, (queue, None))),
                KernelScriptEvent::PtcApproval { tool_name, tool_args } => {
                    let (tx, rx) = oneshot::channel();
                    Some((
                        KernelEvent::PtcApprovalRequest { tool_name, tool_args, resolver: tx },
                        (queue, Some(rx)),
                    ))
                }
            }
        });

        Ok(Box::pin(stream))
    }

    async fn reset(&self) -> KernelResult<()> {
        self.reset_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn replays_output_then_result() {
        let kernel = ScriptedKernel::new().with_output("hello");
        let mut stream = kernel.execute("print('hello')").await.unwrap();

        let first = stream.next().await.unwrap();
        assert!(matches!(first, KernelEvent::OutputChunk(t) if t == "hello"));

        let second = stream.next().await.unwrap();
        assert!(matches!(second, KernelEvent::Result { text, .. } if text == "hello"));
    }

    #[tokio::test]
    async fn ptc_approval_blocks_until_resolved() {
        let kernel = ScriptedKernel::new().with_ptc_call("fs_read", serde_json::json!({"path": "a.txt"}), "done");
        let mut stream = kernel.execute("fs_read('a.txt')").await.unwrap();

        let event = stream.next().await.unwrap();
        let KernelEvent::PtcApprovalRequest { resolver, .. } = event else {
            panic!("expected a PTC approval request");
        };
        resolver.send(true).unwrap();

        let result = stream.next().await.unwrap();
        assert!(matches!(result, KernelEvent::Result { text, .. } if text == "done"));
    }

    #[tokio::test]
    async fn empty_queue_errors() {
        let kernel = ScriptedKernel::new();
        let err = kernel.execute("1 + 1").await.unwrap_err();
        assert!(matches!(err, KernelError::Unavailable(_)));
    }

    #[tokio::test]
    async fn reset_increments_counter() {
        let kernel = ScriptedKernel::new();
        kernel.reset().await.unwrap();
        kernel.reset().await.unwrap();
        assert_eq!(kernel.reset_count(), 2);
    }
}
