//! The freeact agent runtime: drives an LLM through a multi-turn
//! code-action loop, gates every tool invocation on human approval, and
//! isolates subagents in their own kernel and MCP connections.
//!
//! [`Agent`] is the facade most callers need: build an [`AgentConfig`] from
//! a loaded [`freeact_config::RuntimeConfig`] and its collaborators, call
//! [`Agent::start`], then [`Agent::stream`] a prompt and read [`freeact_core::Event`]s
//! off the returned channel until it closes.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod agent;
pub mod error;
pub mod executor;
pub mod kernel;
pub mod prelude;
pub mod registry;
pub mod subagent;
pub mod supervisor;
pub mod turn;

pub use agent::{Agent, AgentConfig, KernelFactory};
pub use error::{RuntimeError, RuntimeResult};
pub use executor::ToolExecutor;
pub use kernel::{KernelError, KernelEvent, KernelExecutor, KernelResult, KernelStreamHandle};
pub use subagent::SubagentRunner;
pub use supervisor::{start_all, stop_all, ManagedResource, OpenFuture};
