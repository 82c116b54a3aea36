//! Session log and tool-result materialization for the freeact agent
//! runtime (C2, C3).
//!
//! Not derived from a single teacher crate: grounded directly in the
//! original implementation's `agent/store.py` and `agent/tool_result_overflow.py`
//! (see `DESIGN.md`), expressed in the workspace's usual async-first,
//! builder-method idiom.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod materializer;
pub mod store;

pub use error::{SessionError, SessionResult};
pub use materializer::ToolResultMaterializer;
pub use store::SessionStore;
