#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration loading for the freeact agent runtime.
//!
//! This crate owns one type, [`RuntimeConfig`], and one algorithm: read a
//! single TOML document, fill every unset field from [`Default`], and
//! validate the result. There is no layered precedence chain, no
//! environment-variable fallback, and no `${VAR}` interpolation — a
//! deliberately smaller surface than a product-facing config system, since
//! every knob this runtime needs is named explicitly in one file.
//!
//! # Usage
//!
//! ```rust,no_run
//! use freeact_config::RuntimeConfig;
//!
//! let config = freeact_config::load(std::path::Path::new("freeact.toml")).unwrap();
//! println!("sessions root: {}", config.sessions_root.display());
//! ```
//!
//! # Design
//!
//! This crate depends on `freeact-mcp` only for [`freeact_mcp::RawServerEntry`]
//! and [`freeact_mcp::McpServersConfig`], so the `mcp_servers` section is
//! validated against the real stdio/HTTP shapes instead of a locally
//! mirrored copy of them going stale.

/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definition.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load, load_str};
pub use types::RuntimeConfig;
