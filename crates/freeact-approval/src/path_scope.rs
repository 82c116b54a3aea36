//! The `.freeact/`-path-scope pre-approval rule (C5).
//!
//! A `filesystem_*` tool whose `path`/`paths` arguments all resolve inside
//! the working directory's `.freeact/` subtree is pre-approved without
//! consulting the allow-lists at all — that directory is the agent's own
//! scratch space, not part of the user's project.

use std::path::{Component, Path, PathBuf};

use regex::Regex;
use std::sync::LazyLock;

static FILESYSTEM_TOOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^filesystem_(read_|read_text_|read_multiple_|write_|edit_|list_)").unwrap()
});

/// Whether `tool_name` is one of the `filesystem_*` operations the
/// path-scope rule applies to.
#[must_use]
pub fn is_scoped_filesystem_tool(tool_name: &str) -> bool {
    FILESYSTEM_TOOL_RE.is_match(tool_name)
}

/// Extract every path named by the tool call's `path` or `paths` argument.
/// Any other argument key is ignored — the path-scope rule is deliberately
/// narrow, unlike a general-purpose path-argument sniffer.
#[must_use]
pub fn extract_paths(args: &serde_json::Value) -> Vec<PathBuf> {
    let Some(obj) = args.as_object() else {
        return Vec::new();
    };

    let mut paths = Vec::new();
    if let Some(s) = obj.get("path").and_then(serde_json::Value::as_str) {
        paths.push(PathBuf::from(s));
    }
    if let Some(list) = obj.get("paths").and_then(serde_json::Value::as_array) {
        for item in list {
            if let Some(s) = item.as_str() {
                paths.push(PathBuf::from(s));
            }
        }
    }
    paths
}

/// Whether every path in `paths` resolves inside `scope_root` (inclusive)
/// once normalized without touching the filesystem (so a non-existent path
/// is still checked correctly, and a `..` component cannot escape the scope
/// even if `path` itself is relative). Relative paths are resolved against
/// `working_dir`, matching how the kernel/MCP tools themselves interpret a
/// relative `path` argument. This deliberately does not call
/// `std::fs::canonicalize`, which would follow symlinks and require the
/// path to exist; the containment check instead normalizes lexically.
#[must_use]
pub fn all_within_scope(paths: &[PathBuf], working_dir: &Path, scope_root: &Path) -> bool {
    if paths.is_empty() {
        return false;
    }
    let scope = normalize(scope_root);
    paths.iter().all(|p| {
        let candidate = if p.is_absolute() {
            normalize(p)
        } else {
            normalize(&working_dir.join(p))
        };
        candidate.starts_with(&scope)
    })
}

/// Lexically resolve `.`/`..` components without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
