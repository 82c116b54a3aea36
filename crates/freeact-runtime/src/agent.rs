//! Agent facade (C11): the public entry point. Brings up the kernel and
//! every configured MCP server, drives turns through the turn engine (C8),
//! and tears everything back down.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use freeact_core::{AgentId, Event, Message};
use freeact_llm::LlmProvider;
use freeact_mcp::{McpRegistry, McpServerHandle, McpServersConfig};
use freeact_approval::PermissionManager;
use freeact_session::{SessionStore, ToolResultMaterializer};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::error::{RuntimeError, RuntimeResult};
use crate::executor::ToolExecutor;
use crate::kernel::KernelExecutor;
use crate::subagent::SubagentRunner;
use crate::supervisor::{self, ManagedResource};
use crate::turn;

/// A kernel factory: out-of-scope concrete kernels are injected this way so
/// each agent (main or subagent) gets its own independent instance (§4.10).
pub type KernelFactory = Arc<dyn Fn() -> Arc<dyn KernelExecutor> + Send + Sync>;

/// Everything needed to construct one agent: shared collaborators plus this
/// agent's own identity and tuning knobs. A subagent's config is derived
/// from its parent's via [`Agent::spawn_child`], not built by hand.
#[derive(Clone)]
pub struct AgentConfig {
    /// This agent's id (`"main"` for the root agent, `"sub-xxxx"` otherwise).
    pub agent_id: AgentId,
    /// This agent's subagent nesting depth (0 for the root agent).
    pub depth: usize,
    /// Whether this agent may itself spawn subagents via `subagent_task`.
    pub enable_subagents: bool,
    /// System prompt prepended to the session's very first request.
    pub system_prompt: String,
    /// Turn budget used when `stream()` is called with `max_turns = None`.
    pub max_turns_default: usize,
    /// Per-call cap on kernel output text surfaced to the model (§4.9).
    pub max_output_chars: usize,
    /// Wall-clock budget for one kernel code execution.
    pub execution_timeout_secs: u64,
    /// Inline-vs-spill threshold for the tool-result materializer (C3).
    pub inline_max_bytes: u64,
    /// Preview line count for the tool-result materializer (C3).
    pub preview_lines: usize,
    /// Working directory anchoring the permission manager's path-scope rule
    /// and the materializer's relative spill paths.
    pub working_dir: PathBuf,
    /// The model this agent talks to.
    pub llm: Arc<dyn LlmProvider>,
    /// Mints a fresh kernel for this agent at [`Agent::start`].
    pub kernel_factory: KernelFactory,
    /// MCP servers this agent connects to at start.
    pub mcp_config: Arc<McpServersConfig>,
    /// Shared permission manager (one per session, across main agent and
    /// every subagent it spawns).
    pub permissions: Arc<PermissionManager>,
    /// Shared session store (one per session).
    pub session_store: Arc<SessionStore>,
    /// Shared subagent concurrency/depth limiter (one per session).
    pub subagents: Arc<SubagentRunner>,
}

struct RunningState {
    mcp: Arc<McpRegistry>,
    executor: Arc<ToolExecutor>,
}

/// One running (or not-yet-started) agent.
pub struct Agent {
    config: AgentConfig,
    history: Arc<Mutex<Vec<Message>>>,
    state: Arc<RwLock<Option<RunningState>>>,
}

impl Agent {
    /// Construct an agent from `config`. Does not connect to anything —
    /// call [`Self::start`] before [`Self::stream`].
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            history: Arc::new(Mutex::new(Vec::new())),
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// This agent's id. Immutable for the agent's lifetime.
    #[must_use]
    pub fn agent_id(&self) -> &AgentId {
        &self.config.agent_id
    }

    /// Connect every configured MCP server concurrently (§4.1: rolling back
    /// anything already connected if one fails) and mint this agent's
    /// kernel. For the main agent, also restores prior history from the
    /// session log (§4.11) — subagents are ephemeral and always start
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ResourceStartFailed`] if any MCP server
    /// fails to connect, or a session error if loading prior history fails.
    pub async fn start(&self) -> RuntimeResult<()> {
        {
            let state = self.state.read().await;
            if state.is_some() {
                return Ok(());
            }
        }

        let kernel = (self.config.kernel_factory)();

        let opens: Vec<(String, supervisor::OpenFuture)> = self
            .config
            .mcp_config
            .iter()
            .map(|(name, server_config)| {
                let name = name.to_string();
                let server_config = server_config.clone();
                let boxed_name = name.clone();
                let future: supervisor::OpenFuture = Box::pin(async move {
                    McpServerHandle::connect(&boxed_name, &server_config)
                        .await
                        .map(|handle| Box::new(McpResource(handle)) as Box<dyn ManagedResource>)
                        .map_err(|e| e.to_string())
                });
                (name, future)
            })
            .collect();

        let opened = supervisor::start_all(opens).await?;

        let mut registry = McpRegistry::new();
        for resource in opened {
            let McpResource(handle) = *resource.into_any().downcast::<McpResource>().expect("only McpResource is opened here");
            registry.register(handle).await?;
        }
        let mcp = Arc::new(registry);

        let materializer = ToolResultMaterializer::new(
            (*self.config.session_store).clone(),
            self.config.inline_max_bytes as usize,
            self.config.preview_lines,
            self.config.working_dir.clone(),
        );

        let executor = Arc::new(ToolExecutor::new(
            self.config.agent_id.clone(),
            kernel,
            Arc::clone(&mcp),
            Arc::clone(&self.config.permissions),
            materializer,
            Arc::clone(&self.config.subagents),
            self.config.max_output_chars,
            self.config.execution_timeout_secs,
        ));

        if !self.config.agent_id.is_subagent() {
            let prior = self.config.session_store.load(&self.config.agent_id).await?;
            *self.history.lock().await = prior;
        }

        *self.state.write().await = Some(RunningState { mcp, executor });
        Ok(())
    }

    /// Disconnect every MCP server concurrently. Idempotent: stopping an
    /// agent that was never started, or stopping it twice, is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ResourceStartFailed`] if one or more MCP
    /// servers failed to shut down cleanly.
    pub async fn stop(&self) -> RuntimeResult<()> {
        let running = self.state.write().await.take();
        let Some(RunningState { mcp, executor }) = running else {
            return Ok(());
        };
        // Drop the executor's own registry clone first so the refcount
        // below can actually reach one; an in-flight turn still holding its
        // own executor clone means this agent can't be safely torn down
        // yet, so that case is left for the caller to retry.
        drop(executor);

        let mcp = match Arc::try_unwrap(mcp) {
            Ok(mcp) => mcp,
            Err(_) => return Ok(()),
        };

        let resources: Vec<Box<dyn ManagedResource>> = mcp
            .into_servers()
            .into_iter()
            .map(|handle| Box::new(McpResource(handle)) as Box<dyn ManagedResource>)
            .collect();

        supervisor::stop_all(resources).await
    }

    /// Run `prompt` to completion, returning a receiver fed by a spawned
    /// task. Dropping the receiver cancels the driving task (§6).
    #[must_use]
    pub fn stream(&self, prompt: impl Into<String>, max_turns: Option<usize>) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        let agent = self.clone_for_task();
        let prompt = prompt.into();
        tokio::spawn(async move {
            turn::run(&agent, prompt, max_turns, tx).await;
        });
        rx
    }

    /// Build a fresh child agent for `subagent_task`: a new id, depth
    /// incremented by one, `enable_subagents` forced off, an independent
    /// kernel, and (by default) fresh MCP server instances — sharing the
    /// model, permission manager, session store, and subagent limiter.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::SubagentDepthExceeded`] only in the sense
    /// that the caller ([`crate::subagent::SubagentRunner`]) checks depth
    /// before calling this; this constructor itself never fails.
    pub fn spawn_child(&self) -> RuntimeResult<Agent> {
        let mut child_config = self.config.clone();
        child_config.agent_id = AgentId::new_subagent();
        child_config.depth = self.config.depth + 1;
        child_config.enable_subagents = false;
        Ok(Agent::new(child_config))
    }

    pub(crate) fn depth(&self) -> usize {
        self.config.depth
    }

    pub(crate) fn enable_subagents(&self) -> bool {
        self.config.enable_subagents
    }

    pub(crate) fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    pub(crate) fn max_turns_default(&self) -> usize {
        self.config.max_turns_default
    }

    pub(crate) fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.config.llm
    }

    pub(crate) fn session_store(&self) -> &Arc<SessionStore> {
        &self.config.session_store
    }

    pub(crate) fn history(&self) -> &Arc<Mutex<Vec<Message>>> {
        &self.history
    }

    pub(crate) fn executor(&self) -> RuntimeResult<Arc<ToolExecutor>> {
        self.running(|s| Arc::clone(&s.executor))
    }

    pub(crate) fn mcp(&self) -> RuntimeResult<Arc<McpRegistry>> {
        self.running(|s| Arc::clone(&s.mcp))
    }

    fn running<T>(&self, f: impl FnOnce(&RunningState) -> T) -> RuntimeResult<T> {
        let state = self
            .state
            .try_read()
            .map_err(|_| RuntimeError::Kernel("agent state lock contended".to_string()))?;
        state
            .as_ref()
            .map(f)
            .ok_or_else(|| RuntimeError::Kernel("agent not started".to_string()))
    }

    /// A cheap clone sharing this agent's config, history, and running
    /// state — used to hand a `'static` copy to the task spawned by
    /// [`Self::stream`].
    fn clone_for_task(&self) -> Agent {
        Agent {
            config: self.config.clone(),
            history: Arc::clone(&self.history),
            state: Arc::clone(&self.state),
        }
    }
}

struct McpResource(McpServerHandle);

#[async_trait]
impl ManagedResource for McpResource {
    async fn close(self: Box<Self>) -> Result<(), String> {
        self.0.shutdown().await.map_err(|e| e.to_string())
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}
