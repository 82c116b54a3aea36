//! MCP server configuration (§4.7): a name → config map, validated once at
//! load time so a malformed entry fails fast and names the offending key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};

/// Server names reserved for the runtime's built-in tool namespaces (§4.6);
/// a config map declaring a server under either name is rejected.
pub const RESERVED_SERVER_NAMES: [&str; 2] = ["pytools", "filesystem"];

/// Raw, unvalidated shape of one server entry as it appears in TOML/JSON:
/// either `{command, args?, env?, excluded_tools?}` (stdio) or
/// `{url, excluded_tools?}` (streamable HTTP).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawServerEntry {
    /// Present for a stdio server: the executable to spawn.
    pub command: Option<String>,
    /// Arguments passed to `command`.
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables set on the spawned process.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Present for an HTTP server: its base URL.
    pub url: Option<String>,
    /// Tool names to hide from enumeration (the server's own, unprefixed
    /// names).
    #[serde(default)]
    pub excluded_tools: Vec<String>,
}

/// A validated MCP server configuration, one of the two transports §4.7
/// allows.
#[derive(Debug, Clone)]
pub enum ServerConfig {
    /// Spawn `command` as a child process and speak MCP over its stdio.
    Stdio {
        /// The executable to spawn.
        command: String,
        /// Arguments passed to `command`.
        args: Vec<String>,
        /// Environment variables set on the spawned process.
        env: HashMap<String, String>,
        /// Tool names excluded from enumeration.
        excluded_tools: Vec<String>,
    },
    /// Connect to a streamable-HTTP MCP server at `url`.
    Http {
        /// The server's base URL.
        url: String,
        /// Tool names excluded from enumeration.
        excluded_tools: Vec<String>,
    },
}

impl ServerConfig {
    /// Validate a raw entry, naming `server` in any resulting error.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Configuration`] if the entry declares neither
    /// `command` nor `url`, or declares both.
    pub fn from_raw(server: &str, raw: RawServerEntry) -> McpResult<Self> {
        match (raw.command, raw.url) {
            (Some(command), None) => Ok(Self::Stdio {
                command,
                args: raw.args,
                env: raw.env,
                excluded_tools: raw.excluded_tools,
            }),
            (None, Some(url)) => Ok(Self::Http {
                url,
                excluded_tools: raw.excluded_tools,
            }),
            (None, None) => Err(McpError::Configuration {
                server: server.to_string(),
                reason: "entry declares neither 'command' nor 'url'".to_string(),
            }),
            (Some(_), Some(_)) => Err(McpError::Configuration {
                server: server.to_string(),
                reason: "entry declares both 'command' and 'url'; exactly one is required"
                    .to_string(),
            }),
        }
    }

    /// The tool names this server hides from enumeration.
    #[must_use]
    pub fn excluded_tools(&self) -> &[String] {
        match self {
            Self::Stdio { excluded_tools, .. } | Self::Http { excluded_tools, .. } => {
                excluded_tools
            }
        }
    }
}

/// The full `{name: config}` map, validated entry-by-entry.
#[derive(Debug, Clone, Default)]
pub struct McpServersConfig {
    servers: HashMap<String, ServerConfig>,
}

impl McpServersConfig {
    /// Validate a raw `{name: entry}` map loaded from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Configuration`] for the first reserved name or
    /// malformed entry found, naming the offending server key.
    pub fn from_raw(raw: HashMap<String, RawServerEntry>) -> McpResult<Self> {
        let mut servers = HashMap::with_capacity(raw.len());
        for (name, entry) in raw {
            if RESERVED_SERVER_NAMES.contains(&name.as_str()) {
                return Err(McpError::Configuration {
                    server: name,
                    reason: "server name is reserved for a built-in tool namespace".to_string(),
                });
            }
            let config = ServerConfig::from_raw(&name, entry)?;
            servers.insert(name, config);
        }
        Ok(Self { servers })
    }

    /// Iterate over the validated `(name, config)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServerConfig)> {
        self.servers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of configured servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether the config map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_map(pairs: Vec<(&str, RawServerEntry)>) -> HashMap<String, RawServerEntry> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn stdio_entry_parses() {
        let raw = raw_map(vec![(
            "search",
            RawServerEntry {
                command: Some("npx".to_string()),
                args: vec!["-y".to_string(), "mcp-search".to_string()],
                ..Default::default()
            },
        )]);
        let config = McpServersConfig::from_raw(raw).unwrap();
        assert_eq!(config.len(), 1);
        let (_, server) = config.iter().next().unwrap();
        assert!(matches!(server, ServerConfig::Stdio { command, .. } if command == "npx"));
    }

    #[test]
    fn http_entry_parses() {
        let raw = raw_map(vec![(
            "remote",
            RawServerEntry {
                url: Some("https://example.com/mcp".to_string()),
                ..Default::default()
            },
        )]);
        let config = McpServersConfig::from_raw(raw).unwrap();
        let (_, server) = config.iter().next().unwrap();
        assert!(matches!(server, ServerConfig::Http { url, .. } if url == "https://example.com/mcp"));
    }

    #[test]
    fn entry_with_neither_command_nor_url_is_rejected() {
        let raw = raw_map(vec![("broken", RawServerEntry::default())]);
        let err = McpServersConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, McpError::Configuration { server, .. } if server == "broken"));
    }

    #[test]
    fn entry_with_both_command_and_url_is_rejected() {
        let raw = raw_map(vec![(
            "ambiguous",
            RawServerEntry {
                command: Some("npx".to_string()),
                url: Some("https://example.com".to_string()),
                ..Default::default()
            },
        )]);
        let err = McpServersConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, McpError::Configuration { server, .. } if server == "ambiguous"));
    }

    #[test]
    fn reserved_server_name_is_rejected() {
        let raw = raw_map(vec![(
            "filesystem",
            RawServerEntry {
                command: Some("npx".to_string()),
                ..Default::default()
            },
        )]);
        let err = McpServersConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, McpError::Configuration { server, .. } if server == "filesystem"));
    }
}
