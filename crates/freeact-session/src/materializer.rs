//! Size-thresholded tool-result materializer (C3).
//!
//! The only component that knows all of [`ToolResultContent`]'s shapes;
//! downstream (the turn engine, the model) always sees either the original
//! tagged value (inline) or a plain text notice.

use std::path::{Path, PathBuf};

use freeact_core::ToolResultContent;

use crate::store::SessionStore;

struct Canonical {
    payload: Vec<u8>,
    extension: &'static str,
    preview_lines: Vec<String>,
}

/// Normalizes tool-result payloads to a canonical byte form and decides
/// whether to return them inline or spill them to disk with a notice.
#[derive(Debug, Clone)]
pub struct ToolResultMaterializer {
    session_store: SessionStore,
    inline_max_bytes: usize,
    preview_lines: usize,
    working_dir: PathBuf,
}

impl ToolResultMaterializer {
    /// Construct a materializer over `session_store`, spilling payloads
    /// larger than `inline_max_bytes` and previewing `preview_lines` lines
    /// from each end of oversized text payloads.
    #[must_use]
    pub fn new(
        session_store: SessionStore,
        inline_max_bytes: usize,
        preview_lines: usize,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session_store,
            inline_max_bytes,
            preview_lines,
            working_dir: working_dir.into(),
        }
    }

    /// Materialize `content`: return it unchanged if its canonical byte
    /// length is at most `inline_max_bytes`, otherwise spill it via the
    /// session store and return a textual notice. If the spill itself
    /// fails, the original payload is returned unchanged — a full turn
    /// must never fail just because its disk is full.
    pub async fn materialize(&self, content: ToolResultContent) -> ToolResultContent {
        let canonical = self.canonicalize(&content);
        let actual_size = canonical.payload.len();

        if actual_size <= self.inline_max_bytes {
            return content;
        }

        let stored_path = match self
            .session_store
            .save_tool_result(&canonical.payload, canonical.extension)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, size = actual_size, threshold = self.inline_max_bytes, "failed to persist oversized tool result; keeping inline payload");
                return content;
            }
        };

        ToolResultContent::text(self.build_notice(&canonical.preview_lines, actual_size, &stored_path))
    }

    fn build_notice(&self, preview_lines: &[String], actual_size: usize, stored_path: &Path) -> String {
        let mut lines = vec![
            format!(
                "Tool result exceeded configured inline threshold ({} bytes).",
                self.inline_max_bytes
            ),
            format!("Actual size: {actual_size} bytes."),
        ];
        if !preview_lines.is_empty() {
            lines.push(format!("Preview (first and last {} lines):", self.preview_lines));
            lines.extend(preview_lines.iter().cloned());
        }
        let relative = stored_path
            .strip_prefix(&self.working_dir)
            .unwrap_or(stored_path)
            .to_string_lossy()
            .replace('\\', "/");
        lines.push(format!("Full content saved to: {relative}"));
        lines.join("\n")
    }

    fn canonicalize(&self, content: &ToolResultContent) -> Canonical {
        match content {
            ToolResultContent::Text(text) => Canonical {
                payload: text.as_bytes().to_vec(),
                extension: "txt",
                preview_lines: self.take_preview_lines(text),
            },
            ToolResultContent::Binary { data, media_type } => Canonical {
                payload: data.clone(),
                extension: media_type_to_ext(media_type),
                preview_lines: Vec::new(),
            },
            ToolResultContent::Structured(value) => {
                let rendered = render_sorted_indented(value);
                Canonical {
                    payload: rendered.into_bytes(),
                    extension: "json",
                    preview_lines: Vec::new(),
                }
            }
        }
    }

    fn take_preview_lines(&self, text: &str) -> Vec<String> {
        if self.preview_lines == 0 {
            return Vec::new();
        }

        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return vec!["<empty>".to_string()];
        }

        let boundary = self.preview_lines;
        if lines.len() <= boundary * 2 {
            return lines.into_iter().map(str::to_string).collect();
        }

        let omitted = lines.len() - boundary * 2;
        let mut out: Vec<String> = lines[..boundary].iter().map(|s| (*s).to_string()).collect();
        out.push(format!("... ({omitted} lines omitted) ..."));
        out.extend(lines[lines.len() - boundary..].iter().map(|s| (*s).to_string()));
        out
    }
}

/// Sorted-keys, indent-2 JSON rendering with base64-encoded byte arrays,
/// matching the canonical structured-payload format (§4.3).
fn render_sorted_indented(value: &serde_json::Value) -> String {
    let sorted = sort_keys(value);
    serde_json::to_string_pretty(&sorted).unwrap_or_default()
}

fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut sorted = serde_json::Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Media type to file extension, per the well-known table in §4.3, falling
/// back to `bin` for anything not special-cased (no MIME-sniffing crate
/// needed for that fallback).
fn media_type_to_ext(media_type: &str) -> &'static str {
    match media_type {
        "text/plain" => "txt",
        "text/markdown" => "md",
        "text/csv" => "csv",
        "application/json" => "json",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freeact_core::SessionId;

    fn materializer(dir: &Path, inline_max_bytes: usize, preview_lines: usize) -> ToolResultMaterializer {
        let store = SessionStore::new(dir, SessionId::from_string("sess-1"));
        ToolResultMaterializer::new(store, inline_max_bytes, preview_lines, dir)
    }

    #[tokio::test]
    async fn small_payload_stays_inline() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 1024, 5);
        let content = ToolResultContent::text("small");
        let result = m.materialize(content.clone()).await;
        assert_eq!(result, content);
    }

    #[tokio::test]
    async fn oversized_text_spills_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 32, 2);
        let big = "x".repeat(5000);
        let result = m.materialize(ToolResultContent::text(&big)).await;
        match result {
            ToolResultContent::Text(notice) => {
                assert!(notice.starts_with("Tool result exceeded configured inline threshold (32 bytes)."));
                assert!(notice.contains("Actual size: 5000 bytes."));
                assert!(notice.contains("Full content saved to: "));
            }
            other => panic!("expected text notice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn binary_payload_has_no_preview() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 4, 3);
        let result = m
            .materialize(ToolResultContent::Binary {
                data: vec![0u8; 100],
                media_type: "image/png".to_string(),
            })
            .await;
        match result {
            ToolResultContent::Text(notice) => assert!(!notice.contains("Preview")),
            other => panic!("expected text notice, got {other:?}"),
        }
    }

    #[test]
    fn preview_keeps_everything_when_within_double_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 0, 3);
        let text = (1..=6).map(|n| format!("line{n}")).collect::<Vec<_>>().join("\n");
        let preview = m.take_preview_lines(&text);
        assert_eq!(preview.len(), 6);
        assert!(!preview.iter().any(|l| l.contains("omitted")));
    }

    #[test]
    fn preview_omits_middle_lines_past_double_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 0, 2);
        let text = (1..=10).map(|n| format!("line{n}")).collect::<Vec<_>>().join("\n");
        let preview = m.take_preview_lines(&text);
        assert_eq!(preview[0], "line1");
        assert!(preview[2].contains("6 lines omitted"));
        assert_eq!(preview.last().unwrap(), "line10");
    }

    #[test]
    fn empty_text_preview_is_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 0, 2);
        assert_eq!(m.take_preview_lines(""), vec!["<empty>".to_string()]);
    }

    #[test]
    fn zero_preview_lines_yields_no_preview() {
        let dir = tempfile::tempdir().unwrap();
        let m = materializer(dir.path(), 0, 0);
        assert!(m.take_preview_lines("a\nb\nc").is_empty());
    }

    #[test]
    fn media_type_mapping_covers_known_types() {
        assert_eq!(media_type_to_ext("image/png"), "png");
        assert_eq!(media_type_to_ext("application/octet-stream"), "bin");
    }
}
