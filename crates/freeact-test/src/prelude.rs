//! Convenience re-exports for test code.
//!
//! Use `use freeact_test::prelude::*;` to import every fixture, double, and
//! the harness in one go.

pub use crate::fixtures::*;
pub use crate::harness::TestHarness;
pub use crate::mock_llm::ScriptedLlmProvider;
pub use crate::mocks::{KernelScriptEvent, ScriptedKernel};
