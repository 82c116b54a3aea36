//! Scenario 3: the caller rejects the one tool call offered, ending the
//! turn without a further model call.

mod common;

use common::Observed;
use freeact_test::prelude::*;

#[tokio::test]
async fn rejected_tool_call_ends_the_turn() {
    let llm = ScriptedLlmProvider::new().with_tool_call(
        "call-1",
        "ipybox_execute_ipython_cell",
        r#"{"code": "import os; os.system('rm -rf /')"}"#,
    );

    let harness = TestHarness::new().with_llm(llm);
    let agent = harness.build();
    agent.start().await.unwrap();

    let rx = agent.stream("clean up some files", None);
    let observed = common::drain_auto_deciding(rx, false).await;

    assert_eq!(
        observed,
        vec![
            Observed::Approval {
                tool_name: "ipybox_execute_ipython_cell".to_string(),
                tool_args: serde_json::json!({"code": "import os; os.system('rm -rf /')"}),
            },
            Observed::Response("Tool call rejected".to_string()),
        ]
    );

    agent.stop().await.unwrap();
}
