//! Tool registry (C6): the built-in tool definitions, composed with a
//! connected [`freeact_mcp::McpRegistry`] into the one list the turn engine
//! offers the model each iteration.

use freeact_llm::LlmToolDefinition;
use freeact_mcp::McpRegistry;

/// Submit a code block to the agent's kernel.
pub const EXECUTE_IPYTHON_CELL: &str = "ipybox_execute_ipython_cell";
/// Clear the agent's kernel state.
pub const RESET_KERNEL: &str = "ipybox_reset";
/// Spawn a subagent to carry out a sub-task.
pub const SUBAGENT_TASK: &str = "subagent_task";

/// Whether `name` is one of this runtime's built-in tools (as opposed to an
/// MCP tool or a subagent-originated one).
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    matches!(name, EXECUTE_IPYTHON_CELL | RESET_KERNEL | SUBAGENT_TASK)
}

/// The built-in tool definitions, loaded from fixed schemas (§4.6).
/// `subagent_task` is included only when `enable_subagents` is set — a
/// subagent is never offered it itself, since nesting is disabled for
/// spawned agents (§4.10).
#[must_use]
pub fn builtin_definitions(enable_subagents: bool) -> Vec<LlmToolDefinition> {
    let mut defs = vec![
        LlmToolDefinition::new(EXECUTE_IPYTHON_CELL)
            .with_description("Execute a Python code cell in the agent's persistent IPython kernel.")
            .with_schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "code": {"type": "string", "description": "Python source to execute."},
                },
                "required": ["code"],
            })),
        LlmToolDefinition::new(RESET_KERNEL)
            .with_description("Clear all variables and imports in the agent's kernel.")
            .with_schema(serde_json::json!({"type": "object", "properties": {}})),
    ];

    if enable_subagents {
        defs.push(
            LlmToolDefinition::new(SUBAGENT_TASK)
                .with_description("Spawn an isolated subagent to carry out a self-contained sub-task.")
                .with_schema(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "prompt": {"type": "string", "description": "The task to hand to the subagent."},
                        "max_turns": {"type": "integer", "description": "Turn budget for the subagent (default 100)."},
                    },
                    "required": ["prompt"],
                })),
        );
    }

    defs
}

/// All tool definitions the turn engine should offer the model this
/// iteration: the built-ins plus every tool enumerated from a connected MCP
/// server.
#[must_use]
pub fn all_definitions(enable_subagents: bool, mcp: &McpRegistry) -> Vec<LlmToolDefinition> {
    let mut defs = builtin_definitions(enable_subagents);
    defs.extend(mcp.list_tools().into_iter().map(|tool| {
        LlmToolDefinition::new(tool.name.clone())
            .with_description(tool.description.clone().unwrap_or_default())
            .with_schema(tool.input_schema.clone())
    }));
    defs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subagent_task_hidden_when_disabled() {
        let defs = builtin_definitions(false);
        assert!(!defs.iter().any(|d| d.name == SUBAGENT_TASK));
    }

    #[test]
    fn subagent_task_present_when_enabled() {
        let defs = builtin_definitions(true);
        assert!(defs.iter().any(|d| d.name == SUBAGENT_TASK));
    }

    #[test]
    fn builtin_names_recognized() {
        assert!(is_builtin(EXECUTE_IPYTHON_CELL));
        assert!(is_builtin(RESET_KERNEL));
        assert!(is_builtin(SUBAGENT_TASK));
        assert!(!is_builtin("filesystem_read_file"));
    }
}
