//! Scenario 6: a tool result larger than the configured inline threshold is
//! spilled to disk, and the model's next turn sees a notice instead of the
//! raw payload.

mod common;

use freeact_core::{AgentId, Message, RequestPart, SessionId, ToolResultContent};
use freeact_session::SessionStore;
use freeact_test::prelude::*;

#[tokio::test]
async fn oversized_kernel_output_is_spilled_with_notice() {
    let big = "x".repeat(5000);

    let llm = ScriptedLlmProvider::new()
        .with_tool_call("call-1", "ipybox_execute_ipython_cell", r#"{"code": "print('x' * 5000)"}"#)
        .with_text_response("done");
    let kernel = ScriptedKernel::new().with_output(&big);

    let harness = TestHarness::new().with_llm(llm).with_kernel(kernel).with_inline_max_bytes(32);
    let working_dir = harness.working_dir().to_path_buf();
    let agent = harness.build();
    agent.start().await.unwrap();

    let rx = agent.stream("print a long string", None);
    let _observed = common::drain_auto_deciding(rx, true).await;

    agent.stop().await.unwrap();

    // The spilled file must exist somewhere under the session's working
    // directory and hold the full, unspilled payload.
    let spilled = find_file_with_content(&working_dir, big.len());
    assert!(spilled.is_some(), "expected a spilled tool-result file under {working_dir:?}");
}

/// Walk `dir` looking for a file whose length matches `expected_len` — the
/// spill path layout is an implementation detail of `SessionStore`, so tests
/// only assert that *some* file of the right size exists.
fn find_file_with_content(dir: &std::path::Path, expected_len: usize) -> Option<std::path::PathBuf> {
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = std::fs::read_dir(&current).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if let Ok(meta) = entry.metadata() {
                if meta.len() as usize == expected_len {
                    return Some(path);
                }
            }
        }
    }
    None
}

#[tokio::test]
async fn materializer_notice_replaces_payload_in_next_request() {
    let big = "x".repeat(5000);

    let llm = ScriptedLlmProvider::new()
        .with_tool_call("call-1", "ipybox_execute_ipython_cell", r#"{"code": "print('x' * 5000)"}"#)
        .with_text_response("done");
    let kernel = ScriptedKernel::new().with_output(&big);

    let harness = TestHarness::new().with_llm(llm).with_kernel(kernel).with_inline_max_bytes(32);
    let working_dir = harness.working_dir().to_path_buf();
    let agent = harness.build();
    agent.start().await.unwrap();

    let rx = agent.stream("print a long string", None);
    let _observed = common::drain_auto_deciding(rx, true).await;
    agent.stop().await.unwrap();

    // Read back the persisted session log: the tool-return message it holds
    // must carry the spill notice, never the raw 5000-byte payload.
    let store = SessionStore::new(&working_dir, SessionId::from_string("test-session"));
    let history = store.load(&AgentId::main()).await.unwrap();
    let tool_return_texts: Vec<String> = history
        .iter()
        .filter_map(|m| match m {
            Message::Request(parts) => Some(parts.clone()),
            Message::Response(_) => None,
        })
        .flatten()
        .filter_map(|p| match p {
            RequestPart::ToolReturn(tr) => match tr.content {
                ToolResultContent::Text(t) => Some(t),
                _ => None,
            },
            _ => None,
        })
        .collect();

    assert_eq!(tool_return_texts.len(), 1);
    let notice = &tool_return_texts[0];
    assert!(notice.starts_with("Tool result exceeded configured inline threshold (32 bytes)."));
    assert!(notice.contains("Actual size: 5000 bytes."));
    assert!(notice.contains("Full content saved to: "));
    assert!(notice.len() < big.len());
}

/// `max_output_chars` smaller than the spilled payload must still cap only
/// the notice the model sees — the full payload must already be on disk,
/// since the cap is applied after C3 formatting, not before it.
#[tokio::test]
async fn cap_applies_to_the_notice_not_the_pre_spill_payload() {
    let big = "x".repeat(5000);

    let llm = ScriptedLlmProvider::new()
        .with_tool_call("call-1", "ipybox_execute_ipython_cell", r#"{"code": "print('x' * 5000)"}"#)
        .with_text_response("done");
    let kernel = ScriptedKernel::new().with_output(&big);

    let harness = TestHarness::new()
        .with_llm(llm)
        .with_kernel(kernel)
        .with_inline_max_bytes(32)
        .with_max_output_chars(100);
    let working_dir = harness.working_dir().to_path_buf();
    let agent = harness.build();
    agent.start().await.unwrap();

    let rx = agent.stream("print a long string", None);
    let _observed = common::drain_auto_deciding(rx, true).await;
    agent.stop().await.unwrap();

    // The spilled file on disk is never capped: if capping ran before
    // materialization, the file would hold only the truncated text.
    let spilled = find_file_with_content(&working_dir, big.len());
    assert!(spilled.is_some(), "expected the full 5000-byte payload on disk, uncapped");

    // What the model actually sees next turn is the capped notice, well
    // short of the full notice (which, for a single-line payload with no
    // newlines, would otherwise embed the entire 5000-byte preview).
    let store = SessionStore::new(&working_dir, SessionId::from_string("test-session"));
    let history = store.load(&AgentId::main()).await.unwrap();
    let tool_return_texts: Vec<String> = history
        .iter()
        .filter_map(|m| match m {
            Message::Request(parts) => Some(parts.clone()),
            Message::Response(_) => None,
        })
        .flatten()
        .filter_map(|p| match p {
            RequestPart::ToolReturn(tr) => match tr.content {
                ToolResultContent::Text(t) => Some(t),
                _ => None,
            },
            _ => None,
        })
        .collect();

    assert_eq!(tool_return_texts.len(), 1);
    let capped = &tool_return_texts[0];
    assert!(capped.contains("..."), "expected the notice itself to be truncated with an ellipsis");
    assert!(capped.len() < 1000, "capped notice should be far shorter than the uncapped notice");
}
