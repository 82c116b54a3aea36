//! Append-only per-agent-id JSONL session log (C2).

use std::path::{Path, PathBuf};

use chrono::Utc;
use freeact_core::{AgentId, Message, SessionId};
use serde_json::Value;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};

const ENVELOPE_VERSION: u64 = 1;

/// Persists and restores one session's per-agent message history as JSONL,
/// and spills oversized tool-result payloads to `tool-results/<hex>.<ext>`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions_root: PathBuf,
    session_id: SessionId,
    flush_after_append: bool,
}

impl SessionStore {
    /// Create a store rooted at `sessions_root/<session_id>/`.
    #[must_use]
    pub fn new(sessions_root: impl Into<PathBuf>, session_id: SessionId) -> Self {
        Self {
            sessions_root: sessions_root.into(),
            session_id,
            flush_after_append: false,
        }
    }

    /// Force an `fsync` after every append.
    #[must_use]
    pub fn flush_after_append(mut self, flush: bool) -> Self {
        self.flush_after_append = flush;
        self
    }

    fn session_dir(&self) -> PathBuf {
        self.sessions_root.join(self.session_id.as_str())
    }

    fn session_file(&self, agent_id: &AgentId) -> PathBuf {
        self.session_dir().join(format!("{agent_id}.jsonl"))
    }

    /// Append each message as a versioned envelope with a fresh UTC
    /// timestamp, creating the session directory lazily.
    pub async fn append(&self, agent_id: &AgentId, messages: &[Message]) -> SessionResult<()> {
        let session_dir = self.session_dir();
        fs::create_dir_all(&session_dir)
            .await
            .map_err(|source| SessionError::Io {
                path: session_dir.clone(),
                source,
            })?;

        let path = self.session_file(agent_id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| SessionError::Io {
                path: path.clone(),
                source,
            })?;

        for message in messages {
            let envelope = serde_json::json!({
                "v": ENVELOPE_VERSION,
                "message": message,
                "meta": {"ts": Utc::now().to_rfc3339()},
            });
            let mut line = serde_json::to_vec(&envelope)?;
            line.push(b'\n');
            file.write_all(&line)
                .await
                .map_err(|source| SessionError::Io {
                    path: path.clone(),
                    source,
                })?;
        }

        if self.flush_after_append {
            file.flush().await.map_err(|source| SessionError::Io {
                path: path.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Load all persisted messages for `agent_id`, in append order.
    ///
    /// Returns an empty list if no session file exists. If the **final**
    /// line fails to parse (an interrupted write), it is silently dropped;
    /// any earlier malformed line is an error.
    pub async fn load(&self, agent_id: &AgentId) -> SessionResult<Vec<Message>> {
        let path = self.session_file(agent_id);
        let contents = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        let lines: Vec<&str> = contents.lines().collect();
        let mut messages = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let envelope: Value = match serde_json::from_str(line) {
                Ok(v) => v,
                Err(_) if index == lines.len() - 1 => break,
                Err(_) => {
                    return Err(SessionError::MalformedLine {
                        line: index + 1,
                        path,
                    });
                }
            };

            let message = Self::validate_envelope(&envelope, index + 1, &path)?;
            messages.push(message);
        }

        Ok(messages)
    }

    fn validate_envelope(envelope: &Value, line_no: usize, path: &Path) -> SessionResult<Message> {
        let malformed = || SessionError::MalformedLine {
            line: line_no,
            path: path.to_path_buf(),
        };

        let obj = envelope.as_object().ok_or_else(malformed)?;

        let v = obj.get("v").and_then(Value::as_u64).ok_or_else(malformed)?;
        if v != ENVELOPE_VERSION {
            return Err(SessionError::UnsupportedVersion {
                line: line_no,
                path: path.to_path_buf(),
            });
        }

        let message = obj.get("message").ok_or_else(malformed)?;
        let meta = obj.get("meta").and_then(Value::as_object).ok_or_else(malformed)?;

        if meta.contains_key("agent_id") {
            return Err(SessionError::ForbiddenAgentId {
                line: line_no,
                path: path.to_path_buf(),
            });
        }
        if !meta.contains_key("ts") {
            return Err(malformed());
        }

        serde_json::from_value(message.clone()).map_err(SessionError::Serialize)
    }

    /// Persist a tool-result payload under `tool-results/<8-hex>.<ext>`,
    /// retrying on the (astronomically unlikely) filename collision.
    pub async fn save_tool_result(&self, payload: &[u8], extension: &str) -> SessionResult<PathBuf> {
        let safe_ext = sanitize_extension(extension);
        let dir = self.session_dir().join("tool-results");
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| SessionError::Io {
                path: dir.clone(),
                source,
            })?;

        let path = loop {
            let file_id = &Uuid::new_v4().simple().to_string()[..8];
            let candidate = dir.join(format!("{file_id}.{safe_ext}"));
            if fs::metadata(&candidate).await.is_err() {
                break candidate;
            }
        };

        fs::write(&path, payload)
            .await
            .map_err(|source| SessionError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

fn sanitize_extension(extension: &str) -> String {
    let raw = extension.to_lowercase();
    let raw = raw.trim_start_matches('.');
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        raw.to_string()
    } else {
        "bin".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freeact_core::{Message, ToolResultContent, ToolReturnPart};

    fn tmp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), SessionId::from_string("sess-1"));
        (dir, store)
    }

    #[tokio::test]
    async fn append_then_load_roundtrips() {
        let (_dir, store) = tmp_store();
        let msg = Message::user_prompt("hello");
        store.append(&AgentId::main(), &[msg.clone()]).await.unwrap();

        let loaded = store.load(&AgentId::main()).await.unwrap();
        assert_eq!(loaded, vec![msg]);
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let (_dir, store) = tmp_store();
        let loaded = store.load(&AgentId::main()).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn truncated_final_line_is_dropped() {
        let (dir, store) = tmp_store();
        store
            .append(&AgentId::main(), &[Message::user_prompt("a")])
            .await
            .unwrap();

        let path = dir.path().join("sess-1").join("main.jsonl");
        let mut contents = fs::read_to_string(&path).await.unwrap();
        contents.push_str("{\"v\": 1, \"message\": {\"role\"");
        fs::write(&path, contents).await.unwrap();

        let loaded = store.load(&AgentId::main()).await.unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn malformed_middle_line_errors() {
        let (dir, store) = tmp_store();
        store
            .append(
                &AgentId::main(),
                &[Message::user_prompt("a"), Message::user_prompt("b")],
            )
            .await
            .unwrap();

        let path = dir.path().join("sess-1").join("main.jsonl");
        let good = fs::read_to_string(&path).await.unwrap();
        let mut lines: Vec<&str> = good.lines().collect();
        let broken = "not json at all";
        lines.insert(0, broken);
        fs::write(&path, lines.join("\n") + "\n").await.unwrap();

        let err = store.load(&AgentId::main()).await.unwrap_err();
        assert!(matches!(err, SessionError::MalformedLine { line: 1, .. }));
    }

    #[tokio::test]
    async fn forbidden_agent_id_in_meta_errors() {
        let (dir, store) = tmp_store();
        let session_dir = dir.path().join("sess-1");
        fs::create_dir_all(&session_dir).await.unwrap();
        let path = session_dir.join("main.jsonl");
        let line = serde_json::json!({
            "v": 1,
            "message": Message::tool_returns(vec![ToolReturnPart {
                tool_call_id: "1".into(),
                tool_name: "t".into(),
                content: ToolResultContent::text("x"),
                rejected: false,
            }]),
            "meta": {"ts": "2024-01-01T00:00:00Z", "agent_id": "main"},
        });
        fs::write(&path, serde_json::to_string(&line).unwrap() + "\n")
            .await
            .unwrap();

        let err = store.load(&AgentId::main()).await.unwrap_err();
        assert!(matches!(err, SessionError::ForbiddenAgentId { .. }));
    }

    #[tokio::test]
    async fn save_tool_result_sanitizes_extension() {
        let (_dir, store) = tmp_store();
        let path = store.save_tool_result(b"hello", "TXT..").await.unwrap();
        assert_eq!(path.extension().unwrap(), "txt");
    }

    #[tokio::test]
    async fn save_tool_result_falls_back_to_bin() {
        let (_dir, store) = tmp_store();
        let path = store.save_tool_result(b"hello", "../../etc").await.unwrap();
        assert_eq!(path.extension().unwrap(), "bin");
    }
}
