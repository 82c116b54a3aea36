//! Single-pass config loading.
//!
//! Unlike a layered precedence chain, this loader reads exactly one TOML
//! document: no system/user/workspace overlay, no environment variable
//! fallback, and no `${VAR}` interpolation (§1 "Configuration"). A secret
//! that belongs in config — an MCP server's `env` map, say — goes in the
//! file verbatim; sourcing it from the environment is left to whatever
//! wraps this crate.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::RuntimeConfig;
use crate::validate;

/// Maximum allowed config file size (1 MB), guarding against a pathological
/// file being read fully into memory.
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load and validate the runtime configuration from a single TOML file.
///
/// A missing file is not an error: it yields [`RuntimeConfig::default`].
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but can't be read,
/// [`ConfigError::ParseError`] if its contents aren't valid TOML or don't
/// match [`RuntimeConfig`]'s shape, or a validation error (see
/// [`validate::validate`]) if the parsed document fails validation.
pub fn load(path: &Path) -> ConfigResult<RuntimeConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using defaults");
            let config = RuntimeConfig::default();
            validate::validate(&config)?;
            return Ok(config);
        }
        Err(e) => {
            return Err(ConfigError::ReadError { path: path.display().to_string(), source: e });
        }
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }

    let config: RuntimeConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError { path: path.display().to_string(), source: e })?;

    validate::validate(&config)?;
    debug!(path = %path.display(), "loaded runtime config");
    Ok(config)
}

/// Parse and validate a `RuntimeConfig` directly from a TOML string, without
/// touching the filesystem. Used by callers that already hold the document
/// (embedded defaults, a config fetched from elsewhere).
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] or a validation error, as in [`load`].
pub fn load_str(toml_str: &str) -> ConfigResult<RuntimeConfig> {
    let config: RuntimeConfig = toml::from_str(toml_str)
        .map_err(|e| ConfigError::ParseError { path: "<string>".to_owned(), source: e })?;
    validate::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load(Path::new("/nonexistent/freeact.toml")).unwrap();
        assert_eq!(config.max_output_chars, 5000);
    }

    #[test]
    fn load_from_tempfile_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freeact.toml");
        std::fs::write(&path, "max_output_chars = 2000\nmax_concurrent_subagents = 4\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.max_output_chars, 2000);
        assert_eq!(config.max_concurrent_subagents, 4);
        assert_eq!(config.execution_timeout_secs, 300);
    }

    #[test]
    fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&path, data).unwrap();

        assert!(matches!(load(&path), Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid toml = = =").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn no_dollar_brace_interpolation() {
        let config = load_str("sessions_root = \"${HOME}/sessions\"\n").unwrap();
        assert_eq!(config.sessions_root.to_string_lossy(), "${HOME}/sessions");
    }
}
