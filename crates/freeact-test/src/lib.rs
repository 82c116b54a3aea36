//! Shared test utilities for the freeact agent runtime: a scripted
//! [`LlmProvider`](freeact_llm::LlmProvider), a scripted
//! [`KernelExecutor`](freeact_runtime::kernel::KernelExecutor), fixtures for
//! the core id/message/event types, and a harness that assembles all three
//! into a ready-to-run [`Agent`](freeact_runtime::Agent).
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! freeact-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use freeact_test::prelude::*;
//!
//!     #[tokio::test]
//!     async fn plain_text_response() {
//!         let harness = TestHarness::new()
//!             .with_llm(ScriptedLlmProvider::new().with_text_response("hi there"));
//!         let agent = harness.build();
//!         agent.start().await.unwrap();
//!
//!         let mut rx = agent.stream("hello", None);
//!         while let Some(event) = rx.recv().await {
//!             // assert on events
//!             let _ = event;
//!         }
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mock_llm;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mock_llm::*;
pub use mocks::*;
