//! In-memory + on-disk permission manager (C5).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::decision::ApprovalDecision;
use crate::error::{ApprovalError, ApprovalResult};
use crate::path_scope;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PermissionsFile {
    #[serde(default)]
    allowed_tools: Vec<String>,
}

/// Tracks which tool names are pre-approved, by two routes: an allow-list
/// (always / session) and the `.freeact/`-path-scope rule.
pub struct PermissionManager {
    allowed_always: RwLock<HashSet<String>>,
    allowed_session: RwLock<HashSet<String>>,
    permissions_path: PathBuf,
    working_dir: PathBuf,
}

impl PermissionManager {
    /// Load `allowed_always` from `permissions_path` (an empty set if the
    /// file does not exist). `working_dir` anchors the `.freeact/` path-scope
    /// rule and relative path arguments.
    pub fn load(permissions_path: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> ApprovalResult<Self> {
        let permissions_path = permissions_path.into();
        let allowed_always = match std::fs::read_to_string(&permissions_path) {
            Ok(contents) => {
                let file: PermissionsFile =
                    serde_json::from_str(&contents).map_err(|source| ApprovalError::Malformed {
                        path: permissions_path.clone(),
                        source,
                    })?;
                file.allowed_tools.into_iter().collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(source) => {
                return Err(ApprovalError::Io {
                    path: permissions_path,
                    source,
                });
            }
        };

        Ok(Self {
            allowed_always: RwLock::new(allowed_always),
            allowed_session: RwLock::new(HashSet::new()),
            permissions_path,
            working_dir: working_dir.into(),
        })
    }

    /// Whether `tool_name(tool_args)` is pre-approved: already in an
    /// allow-list, or covered by the `.freeact/` path-scope rule (§4.5).
    #[must_use]
    pub fn is_allowed(&self, tool_name: &str, tool_args: &serde_json::Value) -> bool {
        if self.in_allow_lists(tool_name) {
            return true;
        }

        if path_scope::is_scoped_filesystem_tool(tool_name) {
            let paths = path_scope::extract_paths(tool_args);
            let scope_root = self.working_dir.join(".freeact");
            return path_scope::all_within_scope(&paths, &self.working_dir, &scope_root);
        }

        false
    }

    fn in_allow_lists(&self, tool_name: &str) -> bool {
        let always = self.allowed_always.read().unwrap_or_else(|e| {
            tracing::warn!("PermissionManager allowed_always lock poisoned, recovering");
            e.into_inner()
        });
        if always.contains(tool_name) {
            return true;
        }
        drop(always);

        let session = self.allowed_session.read().unwrap_or_else(|e| {
            tracing::warn!("PermissionManager allowed_session lock poisoned, recovering");
            e.into_inner()
        });
        session.contains(tool_name)
    }

    /// Record the effect of `decision` for `tool_name`. Only
    /// [`ApprovalDecision::ApproveSession`] and [`ApprovalDecision::ApproveAlways`]
    /// change any state; [`ApprovalDecision::ApproveAlways`] additionally
    /// persists to `permissions.json`. Returns `decision.approved()`.
    pub fn record(&self, tool_name: &str, decision: ApprovalDecision) -> ApprovalResult<bool> {
        match decision {
            ApprovalDecision::Reject | ApprovalDecision::ApproveOnce => {}
            ApprovalDecision::ApproveSession => {
                let mut session = self.allowed_session.write().unwrap_or_else(|e| {
                    tracing::warn!("PermissionManager allowed_session lock poisoned, recovering");
                    e.into_inner()
                });
                session.insert(tool_name.to_string());
            }
            ApprovalDecision::ApproveAlways => {
                let mut always = self.allowed_always.write().unwrap_or_else(|e| {
                    tracing::warn!("PermissionManager allowed_always lock poisoned, recovering");
                    e.into_inner()
                });
                always.insert(tool_name.to_string());
                self.persist(&always)?;
            }
        }
        Ok(decision.approved())
    }

    fn persist(&self, allowed_always: &HashSet<String>) -> ApprovalResult<()> {
        if let Some(parent) = self.permissions_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ApprovalError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut tools: Vec<String> = allowed_always.iter().cloned().collect();
        tools.sort();
        let file = PermissionsFile { allowed_tools: tools };
        let json = serde_json::to_string_pretty(&file).unwrap_or_default();
        std::fs::write(&self.permissions_path, json).map_err(|source| ApprovalError::Io {
            path: self.permissions_path.clone(),
            source,
        })
    }

    /// The permissions file path this manager persists to.
    #[must_use]
    pub fn permissions_path(&self) -> &Path {
        &self.permissions_path
    }
}
