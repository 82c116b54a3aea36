//! A ready-to-use [`Agent`] wired with test doubles: a [`ScriptedLlmProvider`],
//! a [`ScriptedKernel`], and tempdir-backed session/permission state, so an
//! end-to-end scenario can be driven without any real model or kernel.

use std::sync::Arc;

use freeact_approval::PermissionManager;
use freeact_core::SessionId;
use freeact_mcp::McpServersConfig;
use freeact_runtime::{Agent, AgentConfig, SubagentRunner};
use freeact_session::SessionStore;
use tempfile::TempDir;

use crate::mock_llm::ScriptedLlmProvider;
use crate::mocks::ScriptedKernel;

/// Owns the tempdir a harness-built agent's session/permission state lives
/// in, plus the scripted collaborators a test configures before calling
/// [`TestAgent::build`].
pub struct TestHarness {
    _workdir: TempDir,
    working_dir: std::path::PathBuf,
    session_id: SessionId,
    llm: Arc<ScriptedLlmProvider>,
    kernel: Arc<ScriptedKernel>,
    system_prompt: String,
    max_turns_default: usize,
    enable_subagents: bool,
    inline_max_bytes: usize,
    max_output_chars: usize,
}

impl TestHarness {
    /// A harness with an empty LLM script, an empty kernel script, and a
    /// fresh tempdir for session/permission state.
    #[must_use]
    pub fn new() -> Self {
        let workdir = TempDir::new().expect("failed to create tempdir");
        let working_dir = workdir.path().to_path_buf();
        Self {
            _workdir: workdir,
            working_dir,
            session_id: SessionId::from_string("test-session"),
            llm: Arc::new(ScriptedLlmProvider::new()),
            kernel: Arc::new(ScriptedKernel::new()),
            system_prompt: "You are a helpful assistant.".to_string(),
            max_turns_default: 10,
            enable_subagents: false,
            inline_max_bytes: 4096,
            max_output_chars: 10_000,
        }
    }

    /// Replace the scripted model responses.
    #[must_use]
    pub fn with_llm(mut self, llm: ScriptedLlmProvider) -> Self {
        self.llm = Arc::new(llm);
        self
    }

    /// Replace the scripted kernel.
    #[must_use]
    pub fn with_kernel(mut self, kernel: ScriptedKernel) -> Self {
        self.kernel = Arc::new(kernel);
        self
    }

    /// Allow the built agent to spawn subagents via `subagent_task`.
    #[must_use]
    pub fn with_subagents_enabled(mut self) -> Self {
        self.enable_subagents = true;
        self
    }

    /// Cap the turn budget used when `stream()` is called without an
    /// explicit `max_turns`.
    #[must_use]
    pub fn with_max_turns_default(mut self, max_turns: usize) -> Self {
        self.max_turns_default = max_turns;
        self
    }

    /// Lower the inline-vs-spill threshold the built agent's materializer
    /// uses, so a test can trigger a spill with a small payload.
    #[must_use]
    pub fn with_inline_max_bytes(mut self, inline_max_bytes: usize) -> Self {
        self.inline_max_bytes = inline_max_bytes;
        self
    }

    /// Lower the executor's output cap, applied to kernel-execute results
    /// after C3 formatting.
    #[must_use]
    pub fn with_max_output_chars(mut self, max_output_chars: usize) -> Self {
        self.max_output_chars = max_output_chars;
        self
    }

    /// The tempdir backing this harness's session/permission state.
    #[must_use]
    pub fn working_dir(&self) -> &std::path::Path {
        &self.working_dir
    }

    /// The scripted kernel this harness's agent runs against, for
    /// post-hoc assertions (`reset_count()`, `approvals()`).
    #[must_use]
    pub fn kernel(&self) -> Arc<ScriptedKernel> {
        Arc::clone(&self.kernel)
    }

    /// Build the root [`Agent`]. Does not call [`Agent::start`] — callers
    /// still need to do that, since `start()` is where MCP servers connect
    /// (none are configured here, so it is a cheap no-op).
    ///
    /// # Panics
    ///
    /// Panics if the permission file cannot be created under the harness's
    /// tempdir — a test setup failure, not a condition callers should need
    /// to handle.
    #[must_use]
    pub fn build(&self) -> Agent {
        let permissions = PermissionManager::load(self.working_dir.join(".freeact/permissions.json"), &self.working_dir)
            .expect("failed to create permission manager");
        let session_store = SessionStore::new(&self.working_dir, self.session_id.clone());
        let kernel = Arc::clone(&self.kernel);

        let config = AgentConfig {
            agent_id: freeact_core::AgentId::main(),
            depth: 0,
            enable_subagents: self.enable_subagents,
            system_prompt: self.system_prompt.clone(),
            max_turns_default: self.max_turns_default,
            max_output_chars: self.max_output_chars,
            execution_timeout_secs: 30,
            inline_max_bytes: self.inline_max_bytes,
            preview_lines: 20,
            working_dir: self.working_dir.clone(),
            llm: Arc::clone(&self.llm),
            kernel_factory: Arc::new(move || Arc::clone(&kernel) as Arc<dyn freeact_runtime::kernel::KernelExecutor>),
            mcp_config: Arc::new(McpServersConfig::default()),
            permissions: Arc::new(permissions),
            session_store: Arc::new(session_store),
            subagents: Arc::new(SubagentRunner::new(4, 2)),
        };

        Agent::new(config)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_and_starts_an_agent_with_no_mcp_servers() {
        let harness = TestHarness::new().with_llm(ScriptedLlmProvider::new().with_text_response("hi"));
        let agent = harness.build();
        agent.start().await.unwrap();
        agent.stop().await.unwrap();
    }
}
