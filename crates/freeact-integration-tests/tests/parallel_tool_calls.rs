//! Scenario 4: the model issues two tool calls in one response; both are
//! approved and dispatched concurrently.

mod common;

use common::Observed;
use freeact_test::prelude::*;
use freeact_llm::StreamEvent;

#[tokio::test]
async fn two_parallel_tool_calls_both_complete() {
    let llm = ScriptedLlmProvider::new()
        .push_turn(vec![
            StreamEvent::ToolCallStart { id: "a".to_string(), name: "ipybox_execute_ipython_cell".to_string() },
            StreamEvent::ToolCallDelta { id: "a".to_string(), args_delta: r#"{"code": "1+1"}"#.to_string() },
            StreamEvent::ToolCallEnd { id: "a".to_string() },
            StreamEvent::ToolCallStart { id: "b".to_string(), name: "ipybox_reset".to_string() },
            StreamEvent::ToolCallDelta { id: "b".to_string(), args_delta: "{}".to_string() },
            StreamEvent::ToolCallEnd { id: "b".to_string() },
            StreamEvent::Done,
        ])
        .with_text_response("done");

    let kernel = ScriptedKernel::new().with_output("2");

    let harness = TestHarness::new().with_llm(llm).with_kernel(kernel);
    let agent = harness.build();
    agent.start().await.unwrap();

    let rx = agent.stream("compute 1+1 and reset", None);
    let observed = common::drain_auto_deciding(rx, true).await;

    let approvals: Vec<&str> = observed
        .iter()
        .filter_map(|o| match o {
            Observed::Approval { tool_name, .. } => Some(tool_name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(approvals.len(), 2);
    assert!(approvals.contains(&"ipybox_execute_ipython_cell"));
    assert!(approvals.contains(&"ipybox_reset"));

    assert!(observed.contains(&Observed::Response("done".to_string())));

    agent.stop().await.unwrap();
}
