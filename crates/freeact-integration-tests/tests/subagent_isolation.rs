//! Scenario 5: the parent spawns a subagent; the child's events are
//! forwarded unchanged and its final answer becomes the parent's tool-return.

mod common;

use common::Observed;
use freeact_core::{AgentId, Event};
use freeact_test::prelude::*;

#[tokio::test]
async fn subagent_response_is_forwarded_and_returned_to_parent() {
    let llm = ScriptedLlmProvider::new()
        .with_tool_call(
            "call-1",
            "subagent_task",
            r#"{"prompt": "compute 6*7"}"#,
        )
        .with_text_response("The subagent says 42.")
        .with_text_response("The subagent answered: 42");

    let harness = TestHarness::new().with_llm(llm).with_subagents_enabled();
    let agent = harness.build();
    agent.start().await.unwrap();

    let mut rx = agent.stream("delegate this to a subagent", None);

    let mut child_chunk_seen = false;
    let mut child_response_seen = false;
    let mut child_agent_id: Option<AgentId> = None;
    let mut observed = Vec::new();

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ResponseChunk { agent_id, content } if agent_id.is_subagent() => {
                child_chunk_seen = true;
                assert_eq!(content, "The subagent says 42.");
            }
            Event::Response { agent_id, content } if agent_id.is_subagent() => {
                child_response_seen = true;
                child_agent_id = Some(agent_id.clone());
                assert_eq!(content, "The subagent says 42.");
            }
            Event::ApprovalRequest(req) => {
                let name = req.tool_name.clone();
                observed.push(Observed::Approval { tool_name: name, tool_args: req.tool_args.clone() });
                req.approve(true);
                continue;
            }
            Event::Response { agent_id, content } if !agent_id.is_subagent() => {
                observed.push(Observed::Response(content.clone()));
            }
            _ => {}
        }
    }

    assert!(child_chunk_seen, "expected to observe the child's own ResponseChunk event");
    assert!(child_response_seen, "expected to observe the child's own Response event");
    assert!(child_agent_id.unwrap().is_subagent());
    assert!(observed.contains(&Observed::Response("The subagent answered: 42".to_string())));

    agent.stop().await.unwrap();
}
