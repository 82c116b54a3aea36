//! Scenario 2: one approved `ipybox_execute_ipython_cell` call, then a
//! final text answer referencing the result.

mod common;

use common::Observed;
use freeact_test::prelude::*;

#[tokio::test]
async fn approved_execution_then_final_text() {
    let llm = ScriptedLlmProvider::new()
        .with_tool_call("call-1", "ipybox_execute_ipython_cell", r#"{"code": "print(7*6)"}"#)
        .with_text_response("The answer is 42.");
    let kernel = ScriptedKernel::new().with_output("42\n");

    let harness = TestHarness::new().with_llm(llm).with_kernel(kernel);
    let agent = harness.build();
    agent.start().await.unwrap();

    let rx = agent.stream("what is 7*6?", None);
    let observed = common::drain_auto_deciding(rx, true).await;

    assert_eq!(
        observed,
        vec![
            Observed::Approval {
                tool_name: "ipybox_execute_ipython_cell".to_string(),
                tool_args: serde_json::json!({"code": "print(7*6)"}),
            },
            Observed::CodeExecutionOutputChunk("42\n".to_string()),
            Observed::CodeExecutionOutput("42\n".to_string()),
            Observed::ResponseChunk("The answer is 42.".to_string()),
            Observed::Response("The answer is 42.".to_string()),
        ]
    );

    agent.stop().await.unwrap();
}
