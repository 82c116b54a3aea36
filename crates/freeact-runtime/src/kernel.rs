//! The IPython kernel executor contract (§1 item ii, out of scope as a
//! concrete transport): submit a code block, stream output chunks, surface
//! nested programmatic-tool-call (PTC) approval requests, and yield a final
//! result with any images. No production implementation ships in this
//! crate — only the trait, its event shape, and (behind `test-support`)
//! the scripted double from `freeact-test` that exercises C9's dispatch
//! path without a real kernel.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors a kernel executor can raise outside the normal output stream:
/// process-level failures (the kernel died, the transport dropped) rather
/// than a Python-level exception, which surfaces as ordinary output text.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The kernel could not be reached or crashed mid-execution.
    #[error("kernel unavailable: {0}")]
    Unavailable(String),

    /// `execution_timeout_secs` elapsed before the kernel produced a result.
    #[error("code execution timed out after {secs}s")]
    Timeout {
        /// The configured timeout.
        secs: u64,
    },
}

/// Convenience alias for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;

/// One event from a running code execution.
#[derive(Debug)]
pub enum KernelEvent {
    /// A chunk of stdout/stderr as it's produced.
    OutputChunk(String),
    /// The running code wants to invoke an MCP tool (a PTC) and is waiting
    /// for the host's approval before doing so.
    PtcApprovalRequest {
        /// Name of the MCP tool the code wants to call, already
        /// server-prefixed (`<server>_<tool>`).
        tool_name: String,
        /// Arguments the code passed to the call.
        tool_args: Value,
        /// The executor (C9) resolves this with the host's decision.
        resolver: oneshot::Sender<bool>,
    },
    /// The code finished executing.
    Result {
        /// Full accumulated stdout/stderr text.
        text: String,
        /// Any images the execution produced, as `(media_type, bytes)` pairs.
        images: Vec<(String, Vec<u8>)>,
    },
}

/// A running code execution's event stream.
pub type KernelStreamHandle = Pin<Box<dyn Stream<Item = KernelEvent> + Send>>;

/// The kernel transport contract. Implementations own one IPython kernel
/// process (or equivalent) per agent; state persists across calls to
/// [`Self::execute`] until [`Self::reset`] clears it.
#[async_trait]
pub trait KernelExecutor: Send + Sync {
    /// Submit `code` for execution, returning a handle streaming its output,
    /// any PTC approval requests it raises, and its final result.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError`] if the kernel cannot accept the submission at
    /// all (as opposed to the code itself raising, which surfaces as output
    /// text in the returned stream).
    async fn execute(&self, code: &str) -> KernelResult<KernelStreamHandle>;

    /// Clear all kernel-side state (variables, imports) without restarting
    /// the underlying process.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError`] if the reset itself fails.
    async fn reset(&self) -> KernelResult<()>;
}
