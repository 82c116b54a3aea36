//! Convenience re-exports for callers driving an agent end to end.

pub use crate::agent::{Agent, AgentConfig, KernelFactory};
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::kernel::{KernelError, KernelEvent, KernelExecutor, KernelResult, KernelStreamHandle};

pub use freeact_core::{
    AgentId, ApprovalRequest, CorrId, Event, Message, RequestPart, ResponsePart, SessionId,
    ToolCallPart, ToolOutputContent, ToolResultContent, ToolReturnPart, UserContent,
};
pub use freeact_llm::{LlmProvider, LlmToolDefinition, StreamEvent};
