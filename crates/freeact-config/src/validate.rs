//! Validation rules applied after a [`crate::RuntimeConfig`] is parsed.

use freeact_mcp::McpServersConfig;

use crate::error::{ConfigError, ConfigResult};
use crate::types::RuntimeConfig;

/// Check field-level invariants and validate every `mcp_servers` entry
/// against the stdio/HTTP shape (§4.7): reserved names and malformed
/// entries are rejected fail-fast, naming the offending server key.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] for an out-of-range numeric
/// field, or [`ConfigError::McpServers`] for a malformed `mcp_servers` entry.
pub fn validate(config: &RuntimeConfig) -> ConfigResult<()> {
    if config.max_output_chars == 0 {
        return Err(ConfigError::ValidationError {
            field: "max_output_chars".to_owned(),
            message: "must be greater than zero".to_owned(),
        });
    }

    if config.execution_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "execution_timeout_secs".to_owned(),
            message: "must be greater than zero".to_owned(),
        });
    }

    if config.max_concurrent_subagents == 0 {
        return Err(ConfigError::ValidationError {
            field: "max_concurrent_subagents".to_owned(),
            message: "must be greater than zero".to_owned(),
        });
    }

    McpServersConfig::from_raw(config.mcp_servers.clone())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn zero_max_output_chars_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.max_output_chars = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { field, .. }) if field == "max_output_chars"
        ));
    }

    #[test]
    fn reserved_mcp_server_name_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.mcp_servers.insert("filesystem".to_owned(), Default::default());
        assert!(matches!(validate(&config), Err(ConfigError::McpServers(_))));
    }
}
