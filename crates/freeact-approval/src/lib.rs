//! Approval gate and permission manager for the freeact agent runtime
//! (C4, C5).
//!
//! Every tool invocation is gated by a pending [`freeact_core::ApprovalRequest`];
//! this crate is the consumer-facing half that turns a 4-valued
//! [`ApprovalDecision`] into the plain `bool` the core event's oneshot
//! carries, and tracks which tool names no longer need to ask at all.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod decision;
pub mod error;
pub mod gate;
pub mod path_scope;
pub mod permission;

pub use decision::ApprovalDecision;
pub use error::{ApprovalError, ApprovalResult};
pub use gate::{is_ptc_rejection, resolve, PTC_REJECTED_RE};
pub use permission::PermissionManager;
