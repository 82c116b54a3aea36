//! Core types shared across the freeact agent runtime: identifiers, the
//! provider-neutral message model, the agent-facing event stream, and the
//! error vocabulary that crosses crate boundaries.
//!
//! Everything else in the workspace — `freeact-llm`, `freeact-mcp`,
//! `freeact-approval`, `freeact-session`, `freeact-runtime` — depends on
//! this crate and builds its own boundary error type on top of
//! [`CoreError`] rather than this crate knowing about any of them.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod event;
pub mod ids;
pub mod message;

pub use error::{CoreError, CoreResult};
pub use event::{ApprovalRequest, Event, ToolOutputContent};
pub use ids::{AgentId, CorrId, SessionId};
pub use message::{
    Message, RequestPart, ResponsePart, ToolCallPart, ToolReturnPart, ToolResultContent,
    UserContent, UserContentItem,
};
