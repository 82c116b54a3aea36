//! LLM provider abstraction with streaming support for the freeact agent
//! runtime.
//!
//! This crate defines the contract item (i) leaves external: a
//! provider-agnostic streaming call. It does not implement any concrete
//! provider — that is explicitly out of scope (Non-goals: "it does not
//! implement LLM providers") — so production binaries embedding this
//! runtime bring their own [`LlmProvider`] impl, and tests use the scripted
//! double from `freeact-test`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod provider;
pub mod types;

pub use error::{LlmError, LlmResult};
pub use provider::{LlmProvider, ProviderConfig, StreamBox};
pub use types::{LlmToolDefinition, StreamEvent};
