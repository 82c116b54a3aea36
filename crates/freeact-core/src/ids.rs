//! Identifiers shared across the agent runtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one session: the root agent plus any subagents it spawns
/// during its lifetime, all logging into the same `<session-root>/<session-id>/`
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id, e.g. one loaded from disk.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one agent within a session: `"main"` for the root agent,
/// `"sub-<4 hex>"` for a subagent. Used both as the session-log filename
/// stem and as the `agent_id` carried on every [`crate::event::Event`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    /// The fixed id of the root agent of a session.
    pub const MAIN: &'static str = "main";

    /// The root agent id.
    #[must_use]
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// Mint a fresh subagent id: `sub-<4 lowercase hex chars>`.
    #[must_use]
    pub fn new_subagent() -> Self {
        let suffix = &Uuid::new_v4().simple().to_string()[..4];
        Self(format!("sub-{suffix}"))
    }

    /// Whether this id identifies a subagent (as opposed to the root agent).
    #[must_use]
    pub fn is_subagent(&self) -> bool {
        self.0.starts_with("sub-")
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlates a tool-call part with its `ApprovalRequest`, any intermediate
/// execution output, and its eventual tool-return part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrId(String);

impl CorrId {
    /// Mint a fresh correlation id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_agent_is_not_a_subagent() {
        assert!(!AgentId::main().is_subagent());
        assert_eq!(AgentId::main().as_str(), "main");
    }

    #[test]
    fn subagent_ids_have_the_sub_prefix() {
        let id = AgentId::new_subagent();
        assert!(id.is_subagent());
        assert!(id.as_str().starts_with("sub-"));
        assert_eq!(id.as_str().len(), "sub-".len() + 4);
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
