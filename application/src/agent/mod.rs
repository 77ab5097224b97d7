//! Research agent
//!
//! A tool-calling loop around a stateless LLM gateway, with sub-agent
//! delegation and human-in-the-loop interrupts.
//!
//! ```text
//! invoke(thread, "Topic: …, Domain: …")
//!   │
//!   ▼
//! ┌───────────────────────────── loop ─────────────────────────────┐
//! │ model(system prompt, history, tool schemas)                    │
//! │   ├─ no tool calls ──────────────────────────▶ Completed(text) │
//! │   ├─ call covered by InterruptPolicy ─▶ save checkpoint        │
//! │   │                                     ─▶ Interrupted(payload)│
//! │   └─ otherwise: run calls concurrently, append results         │
//! │        └─ `task` ─▶ nested sub-agent loop                      │
//! │             └─ covered call ─▶ checkpoint ─▶ Interrupted       │
//! └────────────────────────────────────────────────────────────────┘
//!
//! resume(thread, decisions)
//!   load checkpoint ─▶ apply approve/edit/reject ─▶ run pending calls
//!   (or continue the paused sub-agents) ─▶ continue the loop
//! ```
//!
//! | Limit | Applies to | Error |
//! |-------|-----------|-------|
//! | `max_iterations` | model calls per invoke/resume | [`AgentError::MaxIterationsExceeded`] |
//! | `subagent_max_iterations` | model calls per delegated task | failed `task` result |

mod delegation;
mod preview;
mod types;

pub use types::{AgentError, AgentLimits, AgentRunResult};

use crate::ports::checkpoint::{Checkpoint, CheckpointStore, DelegatedPause};
use crate::ports::llm_gateway::{ChatRequest, LlmGateway};
use crate::ports::progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use futures::future::join_all;
use preview::{tool_args_preview, truncate_preview};
use research_domain::{
    Decision, DomainError, InterruptPolicy, LlmResponse, Message, Model, SubAgentSpec, TASK_TOOL,
    ToolCall, ToolError, ToolResult, ToolSpec,
};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Check if cancellation has been requested.
fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), AgentError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(AgentError::Cancelled);
    }
    Ok(())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Give every call an id so tool results can reference it.
fn assign_call_ids(calls: Vec<ToolCall>, iteration: usize) -> Vec<ToolCall> {
    calls
        .into_iter()
        .enumerate()
        .map(|(i, call)| match call.native_id {
            Some(_) => call,
            None => call.with_native_id(format!("call_{}_{}", iteration, i)),
        })
        .collect()
}

fn tool_message(call: &ToolCall, result: &ToolResult) -> Message {
    Message::tool(
        call.native_id.clone().unwrap_or_default(),
        result.to_model_content(),
    )
}

fn push_tool_results(messages: &mut Vec<Message>, calls: &[ToolCall], results: Vec<ToolResult>) {
    for (call, result) in calls.iter().zip(results) {
        messages.push(tool_message(call, &result));
    }
}

/// Append finished results; return the calls still waiting on a paused
/// sub-agent together with those pauses.
fn settle(
    messages: &mut Vec<Message>,
    calls: &[ToolCall],
    outcomes: Vec<CallOutcome>,
) -> (Vec<ToolCall>, Vec<DelegatedPause>) {
    let mut waiting = Vec::new();
    let mut delegated = Vec::new();
    for (call, outcome) in calls.iter().zip(outcomes) {
        match outcome {
            CallOutcome::Done(result) => messages.push(tool_message(call, &result)),
            CallOutcome::Paused(pause) => {
                waiting.push(call.clone());
                delegated.push(pause);
            }
        }
    }
    (waiting, delegated)
}

/// The paused assistant turn records what actually ran
fn record_actions(messages: &mut [Message], actions: &[PendingAction]) {
    if let Some(last) = messages.last_mut() {
        last.tool_calls = actions.iter().map(|a| a.call().clone()).collect();
    }
}

fn rejection(call: &ToolCall, message: Option<String>) -> ToolResult {
    ToolResult::failure(
        &call.tool_name,
        ToolError::rejected(
            message.unwrap_or_else(|| "The user rejected this tool call".to_string()),
        ),
    )
}

/// A paused call after the human decision has been applied
enum PendingAction {
    Run(ToolCall),
    Reject(ToolCall, Option<String>),
}

impl PendingAction {
    fn call(&self) -> &ToolCall {
        match self {
            PendingAction::Run(call) | PendingAction::Reject(call, _) => call,
        }
    }
}

/// Result of one call in a head researcher turn
enum CallOutcome {
    Done(ToolResult),
    /// A `task` whose sub-agent stopped for review
    Paused(DelegatedPause),
}

/// The head researcher: a model, its tools, its sub-agents and the
/// interrupt policy, plus the checkpoint store for paused threads.
#[derive(Clone)]
pub struct DeepAgent {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    schema: Arc<dyn ToolSchemaPort>,
    checkpoints: Arc<dyn CheckpointStore>,
    model: Model,
    system_prompt: String,
    subagents: Vec<SubAgentSpec>,
    policy: InterruptPolicy,
    limits: AgentLimits,
    progress: Arc<dyn AgentProgressNotifier>,
    cancellation_token: Option<CancellationToken>,
}

impl DeepAgent {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        schema: Arc<dyn ToolSchemaPort>,
        checkpoints: Arc<dyn CheckpointStore>,
        model: Model,
    ) -> Self {
        Self {
            gateway,
            tools,
            schema,
            checkpoints,
            model,
            system_prompt: String::new(),
            subagents: Vec::new(),
            policy: InterruptPolicy::new(),
            limits: AgentLimits::default(),
            progress: Arc::new(NoAgentProgress),
            cancellation_token: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_subagents(mut self, subagents: Vec<SubAgentSpec>) -> Self {
        self.subagents = subagents;
        self
    }

    pub fn with_interrupt_policy(mut self, policy: InterruptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_limits(mut self, limits: AgentLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn AgentProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn subagents(&self) -> &[SubAgentSpec] {
        &self.subagents
    }

    pub fn interrupt_policy(&self) -> &InterruptPolicy {
        &self.policy
    }

    /// Tools the head researcher sees: the registry plus `task` when
    /// sub-agents are configured.
    pub fn head_tool_spec(&self) -> ToolSpec {
        let spec = self.tools.tool_spec().clone();
        if self.subagents.is_empty() {
            spec
        } else {
            spec.register(delegation::task_tool(&self.subagents))
        }
    }

    /// Start a new run on `thread_id`.
    ///
    /// Any checkpoint left on the thread by an earlier run is discarded.
    pub async fn invoke(
        &self,
        thread_id: &str,
        user_message: &str,
    ) -> Result<AgentRunResult, AgentError> {
        info!(thread_id, model = %self.model, "Starting research run");
        self.checkpoints.delete(thread_id);
        self.run_loop(thread_id, vec![Message::user(user_message)])
            .await
    }

    /// Continue a paused run with one decision per interrupted call.
    ///
    /// Decisions follow the order of the interrupt's action requests. The
    /// checkpoint stays in place until the run completes or pauses again, so
    /// a failed resume can be retried.
    pub async fn resume(
        &self,
        thread_id: &str,
        decisions: Vec<Decision>,
    ) -> Result<AgentRunResult, AgentError> {
        let checkpoint = self
            .checkpoints
            .load(thread_id)
            .ok_or_else(|| AgentError::NoPendingInterrupt(thread_id.to_string()))?;
        self.policy
            .validate_all(&self.awaiting_review(&checkpoint), &decisions)?;
        info!(
            thread_id,
            decisions = decisions.len(),
            delegated = checkpoint.delegated.len(),
            "Resuming research run"
        );

        let Checkpoint {
            mut messages,
            pending,
            delegated,
        } = checkpoint;
        let mut decisions = decisions.into_iter();

        let (calls, outcomes) = if delegated.is_empty() {
            let actions = self.apply_decisions(pending, &mut decisions)?;
            record_actions(&mut messages, &actions);
            let calls: Vec<ToolCall> = actions.iter().map(|a| a.call().clone()).collect();

            let head_spec = self.head_tool_spec();
            let head_spec = &head_spec;
            let outcomes = join_all(actions.into_iter().map(|action| async move {
                match action {
                    PendingAction::Run(call) => self.execute_head_call(&call, head_spec).await,
                    PendingAction::Reject(call, message) => {
                        CallOutcome::Done(rejection(&call, message))
                    }
                }
            }))
            .await;
            (calls, outcomes)
        } else {
            // Apply every decision before anything runs
            let mut resumed = Vec::with_capacity(delegated.len());
            for mut pause in delegated {
                let actions =
                    self.apply_decisions(std::mem::take(&mut pause.pending), &mut decisions)?;
                record_actions(&mut pause.messages, &actions);
                resumed.push((pause, actions));
            }
            let outcomes = join_all(
                resumed
                    .into_iter()
                    .map(|(pause, actions)| self.resume_subagent(pause, actions)),
            )
            .await;
            (pending, outcomes)
        };

        let (waiting, delegated) = settle(&mut messages, &calls, outcomes);
        if !delegated.is_empty() {
            return Ok(self.pause(
                thread_id,
                Checkpoint {
                    messages,
                    pending: waiting,
                    delegated,
                },
            ));
        }

        self.run_loop(thread_id, messages).await
    }

    async fn run_loop(
        &self,
        thread_id: &str,
        mut messages: Vec<Message>,
    ) -> Result<AgentRunResult, AgentError> {
        let head_spec = self.head_tool_spec();
        let tools = self.schema.all_tools_schema(&head_spec);

        for iteration in 1..=self.limits.max_iterations {
            self.progress.on_model_call(iteration);
            let response = self.chat(&self.system_prompt, &messages, &tools).await?;

            let text = response.text_content();
            let calls = assign_call_ids(response.tool_calls(), iteration);

            if calls.is_empty() {
                self.checkpoints.delete(thread_id);
                info!(thread_id, iterations = iteration, "Research run completed");
                return Ok(AgentRunResult::Completed { output: text });
            }

            messages.push(Message::assistant_with_tools(text, calls.clone()));

            if self.needs_review(&calls) {
                return Ok(self.pause(thread_id, Checkpoint::head(messages, calls)));
            }

            let outcomes = join_all(
                calls
                    .iter()
                    .map(|call| self.execute_head_call(call, &head_spec)),
            )
            .await;
            let (waiting, delegated) = settle(&mut messages, &calls, outcomes);
            if !delegated.is_empty() {
                return Ok(self.pause(
                    thread_id,
                    Checkpoint {
                        messages,
                        pending: waiting,
                        delegated,
                    },
                ));
            }
        }

        warn!(
            thread_id,
            max_iterations = self.limits.max_iterations,
            "Research run exceeded max iterations"
        );
        Err(AgentError::MaxIterationsExceeded(self.limits.max_iterations))
    }

    fn needs_review(&self, calls: &[ToolCall]) -> bool {
        calls.iter().any(|c| self.policy.covers(&c.tool_name))
    }

    /// Calls a human must decide on, in the order decisions are expected
    fn awaiting_review(&self, checkpoint: &Checkpoint) -> Vec<ToolCall> {
        let covered = |calls: &[ToolCall]| -> Vec<ToolCall> {
            calls
                .iter()
                .filter(|c| self.policy.covers(&c.tool_name))
                .cloned()
                .collect()
        };
        if checkpoint.delegated.is_empty() {
            covered(&checkpoint.pending)
        } else {
            checkpoint
                .delegated
                .iter()
                .flat_map(|pause| covered(&pause.pending))
                .collect()
        }
    }

    /// Save the checkpoint and build the interrupt payload
    fn pause(&self, thread_id: &str, checkpoint: Checkpoint) -> AgentRunResult {
        let paused = self.awaiting_review(&checkpoint);
        for call in &paused {
            self.progress.on_interrupt(&call.tool_name);
        }
        info!(
            thread_id,
            tools = ?paused.iter().map(|c| c.tool_name.as_str()).collect::<Vec<_>>(),
            subagents = ?checkpoint.delegated.iter().map(|d| d.subagent.as_str()).collect::<Vec<_>>(),
            "Pausing for human review"
        );
        let interrupt = self.policy.interrupt_for(&paused);
        self.checkpoints.save(thread_id, checkpoint);
        AgentRunResult::Interrupted(interrupt)
    }

    /// Pair each covered call of `pending` with the next decision
    fn apply_decisions(
        &self,
        pending: Vec<ToolCall>,
        decisions: &mut impl Iterator<Item = Decision>,
    ) -> Result<Vec<PendingAction>, AgentError> {
        let expected = pending
            .iter()
            .filter(|c| self.policy.covers(&c.tool_name))
            .count();
        let mut applied = 0;
        let mut actions = Vec::with_capacity(pending.len());

        for call in pending {
            if !self.policy.covers(&call.tool_name) {
                actions.push(PendingAction::Run(call));
                continue;
            }
            let Some(decision) = decisions.next() else {
                return Err(DomainError::DecisionCountMismatch {
                    expected,
                    actual: applied,
                }
                .into());
            };
            applied += 1;
            actions.push(match decision {
                Decision::Approve => PendingAction::Run(call),
                Decision::Edit { edited_action } => {
                    debug!(tool = %edited_action.tool_name, "Applying edited tool call");
                    PendingAction::Run(ToolCall {
                        native_id: call.native_id.clone(),
                        ..edited_action
                    })
                }
                Decision::Reject { message } => PendingAction::Reject(call, message),
            });
        }
        Ok(actions)
    }

    /// One model call, aborted early if the run is cancelled.
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, AgentError> {
        check_cancelled(&self.cancellation_token)?;
        let request = ChatRequest {
            model: &self.model,
            system_prompt,
            messages,
            tools,
        };

        match &self.cancellation_token {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(AgentError::Cancelled),
                response = self.gateway.chat(request) => Ok(response?),
            },
            None => Ok(self.gateway.chat(request).await?),
        }
    }

    async fn execute_head_call(&self, call: &ToolCall, head_spec: &ToolSpec) -> CallOutcome {
        if call.tool_name == TASK_TOOL && !self.subagents.is_empty() {
            return self.delegate(call).await;
        }
        CallOutcome::Done(self.execute_tool(call, head_spec).await)
    }

    /// Run a registry tool if `allowed` contains it.
    async fn execute_tool(&self, call: &ToolCall, allowed: &ToolSpec) -> ToolResult {
        if !allowed.contains(&call.tool_name) || !self.tools.has_tool(&call.tool_name) {
            warn!(tool = %call.tool_name, "Model called an unknown tool");
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        }

        self.progress
            .on_tool_call(&call.tool_name, &tool_args_preview(call));
        let started = Instant::now();
        let result = self.tools.execute(call).await;
        self.progress
            .on_tool_result(&call.tool_name, result.is_success());

        debug!(
            tool = %call.tool_name,
            success = result.is_success(),
            elapsed_ms = elapsed_ms(started),
            output = %truncate_preview(&result.to_model_content(), 200),
            "Tool finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use research_domain::{
        ContentBlock, DecisionType, QUESTIONS_TOOL, Role, StopReason, ToolDefinition,
        ToolParameter,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    const SEARCH: &str = "COMPOSIO_SEARCH_TAVILY_SEARCH";

    /// A scripted response for the mock gateway
    #[derive(Debug, Clone)]
    enum Scripted {
        Text(String),
        Tools(Vec<(String, String, serde_json::Value)>),
        Error(String),
    }

    fn tools(calls: &[(&str, &str, serde_json::Value)]) -> Scripted {
        Scripted::Tools(
            calls
                .iter()
                .map(|(id, name, args)| (id.to_string(), name.to_string(), args.clone()))
                .collect(),
        )
    }

    /// What the gateway saw on each call
    #[derive(Debug, Clone)]
    struct SeenRequest {
        system_prompt: String,
        messages: Vec<Message>,
        tool_names: Vec<String>,
    }

    /// Mock gateway that returns scripted responses in order
    struct ScriptedGateway {
        responses: Mutex<VecDeque<Scripted>>,
        seen: Mutex<Vec<SeenRequest>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Scripted>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<SeenRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn chat(
            &self,
            request: ChatRequest<'_>,
        ) -> Result<LlmResponse, crate::ports::llm_gateway::GatewayError> {
            self.seen.lock().unwrap().push(SeenRequest {
                system_prompt: request.system_prompt.to_string(),
                messages: request.messages.to_vec(),
                tool_names: request
                    .tools
                    .iter()
                    .filter_map(|t| t["name"].as_str().map(String::from))
                    .collect(),
            });

            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Scripted::Text("(no more responses)".to_string()));
            match next {
                Scripted::Text(t) => Ok(LlmResponse::from_text(t)),
                Scripted::Tools(calls) => Ok(LlmResponse {
                    content: calls
                        .into_iter()
                        .map(|(id, name, args)| ContentBlock::ToolUse {
                            id,
                            name,
                            input: serde_json::from_value::<HashMap<String, serde_json::Value>>(
                                args,
                            )
                            .unwrap(),
                        })
                        .collect(),
                    stop_reason: Some(StopReason::ToolUse),
                    model: None,
                }),
                Scripted::Error(e) => Err(crate::ports::llm_gateway::GatewayError::RequestFailed(e)),
            }
        }
    }

    /// Mock tool executor that records calls and echoes arguments
    struct MockTools {
        spec: ToolSpec,
        calls: Mutex<Vec<ToolCall>>,
    }

    impl MockTools {
        fn new() -> Self {
            let spec = ToolSpec::new()
                .register(
                    ToolDefinition::new(QUESTIONS_TOOL, "Extract questions")
                        .with_parameter(ToolParameter::new("q", "Numbered list", true)),
                )
                .register(
                    ToolDefinition::new(SEARCH, "Web search")
                        .with_input_schema(serde_json::json!({"type": "object"})),
                );
            Self {
                spec,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn executed(&self) -> Vec<ToolCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockTools {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.calls.lock().unwrap().push(call.clone());
            ToolResult::success(
                &call.tool_name,
                format!("{}:{}", call.tool_name, call.arguments_json()),
            )
        }
    }

    struct NameOnlySchema;

    impl ToolSchemaPort for NameOnlySchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({ "name": tool.name })
        }
    }

    #[derive(Default)]
    struct MapCheckpoints(Mutex<HashMap<String, Checkpoint>>);

    impl CheckpointStore for MapCheckpoints {
        fn save(&self, thread_id: &str, checkpoint: Checkpoint) {
            self.0.lock().unwrap().insert(thread_id.to_string(), checkpoint);
        }

        fn load(&self, thread_id: &str) -> Option<Checkpoint> {
            self.0.lock().unwrap().get(thread_id).cloned()
        }

        fn delete(&self, thread_id: &str) {
            self.0.lock().unwrap().remove(thread_id);
        }
    }

    struct Fixture {
        gateway: Arc<ScriptedGateway>,
        tools: Arc<MockTools>,
        checkpoints: Arc<MapCheckpoints>,
        agent: DeepAgent,
    }

    fn fixture(responses: Vec<Scripted>) -> Fixture {
        let gateway = Arc::new(ScriptedGateway::new(responses));
        let tools = Arc::new(MockTools::new());
        let checkpoints = Arc::new(MapCheckpoints::default());
        let agent = DeepAgent::new(
            gateway.clone(),
            tools.clone(),
            Arc::new(NameOnlySchema),
            checkpoints.clone(),
            Model::default(),
        )
        .with_system_prompt("HEAD")
        .with_subagents(SubAgentSpec::defaults(&[SEARCH]))
        .with_interrupt_policy(InterruptPolicy::research_default());
        Fixture {
            gateway,
            tools,
            checkpoints,
            agent,
        }
    }

    fn questions(id: &str) -> Scripted {
        tools(&[(id, QUESTIONS_TOOL, serde_json::json!({"q": "1. A?\\n2. B?"}))])
    }

    #[tokio::test]
    async fn test_text_answer_completes() {
        let f = fixture(vec![Scripted::Text("<html>report</html>".into())]);

        let result = f.agent.invoke("t1", "Topic: RL, Domain: Tech").await.unwrap();
        assert_eq!(result.output(), Some("<html>report</html>"));

        let seen = f.gateway.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_prompt, "HEAD");
        assert_eq!(seen[0].messages[0].content, "Topic: RL, Domain: Tech");
        assert!(seen[0].tool_names.contains(&TASK_TOOL.to_string()));
        assert!(seen[0].tool_names.contains(&QUESTIONS_TOOL.to_string()));
    }

    #[tokio::test]
    async fn test_interrupt_saves_checkpoint_without_executing() {
        let f = fixture(vec![questions("call_q")]);

        let result = f.agent.invoke("t1", "go").await.unwrap();
        let interrupt = result.interrupt().unwrap();
        let action = interrupt.first().unwrap();
        assert_eq!(action.name, QUESTIONS_TOOL);
        assert_eq!(action.arg_str("q"), Some("1. A?\\n2. B?"));
        assert_eq!(
            interrupt.review_configs[0].allowed_decisions,
            vec![DecisionType::Approve, DecisionType::Edit]
        );

        assert!(f.tools.executed().is_empty());
        let checkpoint = f.checkpoints.load("t1").unwrap();
        assert_eq!(checkpoint.pending.len(), 1);
        assert_eq!(checkpoint.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_resume_approve_executes_original_call() {
        let f = fixture(vec![questions("call_q"), Scripted::Text("<html/>".into())]);

        f.agent.invoke("t1", "go").await.unwrap();
        let result = f.agent.resume("t1", vec![Decision::Approve]).await.unwrap();
        assert_eq!(result.output(), Some("<html/>"));

        let executed = f.tools.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].get_string("q"), Some("1. A?\\n2. B?"));

        let last_request = f.gateway.seen().pop().unwrap();
        let tool_msg = last_request.messages.last().unwrap();
        assert_eq!(tool_msg.role, Role::Tool);
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_q"));
        assert!(f.checkpoints.load("t1").is_none());
    }

    #[tokio::test]
    async fn test_resume_edit_executes_edited_call() {
        let f = fixture(vec![questions("call_q"), Scripted::Text("done".into())]);

        f.agent.invoke("t1", "go").await.unwrap();
        let edited = ToolCall::new(QUESTIONS_TOOL).with_arg("q", "1. C?\\n2. D?");
        f.agent
            .resume(
                "t1",
                vec![Decision::Edit {
                    edited_action: edited,
                }],
            )
            .await
            .unwrap();

        let executed = f.tools.executed();
        assert_eq!(executed[0].get_string("q"), Some("1. C?\\n2. D?"));
        assert_eq!(executed[0].native_id.as_deref(), Some("call_q"));

        // The assistant turn in history carries the edited arguments
        let history = f.gateway.seen().pop().unwrap().messages;
        assert_eq!(history[1].tool_calls[0].get_string("q"), Some("1. C?\\n2. D?"));
    }

    #[tokio::test]
    async fn test_resume_rejects_disallowed_decision() {
        let f = fixture(vec![questions("call_q")]);
        f.agent.invoke("t1", "go").await.unwrap();

        let err = f
            .agent
            .resume("t1", vec![Decision::Reject { message: None }])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::Domain(DomainError::DecisionNotAllowed { .. })
        ));
        // Still paused
        assert!(f.checkpoints.load("t1").is_some());
    }

    #[tokio::test]
    async fn test_reject_feeds_message_back() {
        let mut f = fixture(vec![questions("call_q"), Scripted::Text("ok".into())]);
        f.agent = f.agent.with_interrupt_policy(InterruptPolicy::new().interrupt_on(
            QUESTIONS_TOOL,
            [DecisionType::Approve, DecisionType::Reject],
        ));

        f.agent.invoke("t1", "go").await.unwrap();
        f.agent
            .resume(
                "t1",
                vec![Decision::Reject {
                    message: Some("too vague".into()),
                }],
            )
            .await
            .unwrap();

        assert!(f.tools.executed().is_empty());
        let history = f.gateway.seen().pop().unwrap().messages;
        let content = &history.last().unwrap().content;
        assert!(content.contains("REJECTED"));
        assert!(content.contains("too vague"));
    }

    #[tokio::test]
    async fn test_resume_without_checkpoint() {
        let f = fixture(vec![]);
        let err = f.agent.resume("missing", vec![Decision::Approve]).await.unwrap_err();
        assert!(matches!(err, AgentError::NoPendingInterrupt(t) if t == "missing"));
    }

    #[tokio::test]
    async fn test_uncovered_calls_in_paused_turn_run_on_resume() {
        let f = fixture(vec![
            tools(&[
                ("c1", SEARCH, serde_json::json!({"query": "rl"})),
                ("c2", QUESTIONS_TOOL, serde_json::json!({"q": "1. A?"})),
            ]),
            Scripted::Text("fin".into()),
        ]);

        let result = f.agent.invoke("t1", "go").await.unwrap();
        assert!(result.is_interrupted());
        assert_eq!(result.interrupt().unwrap().action_requests.len(), 1);
        assert!(f.tools.executed().is_empty());

        f.agent.resume("t1", vec![Decision::Approve]).await.unwrap();
        let names: Vec<_> = f
            .tools
            .executed()
            .into_iter()
            .map(|c| c.tool_name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&SEARCH.to_string()));
    }

    #[tokio::test]
    async fn test_unknown_tool_reported_to_model() {
        let f = fixture(vec![
            tools(&[("c1", "delete_everything", serde_json::json!({}))]),
            Scripted::Text("sorry".into()),
        ]);

        let result = f.agent.invoke("t1", "go").await.unwrap();
        assert_eq!(result.output(), Some("sorry"));
        let history = f.gateway.seen().pop().unwrap().messages;
        assert!(history.last().unwrap().content.contains("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let responses = (0..5)
            .map(|i| {
                tools(&[(
                    format!("c{}", i).as_str(),
                    SEARCH,
                    serde_json::json!({"query": "x"}),
                )])
            })
            .collect();
        let f = fixture(responses);
        let agent = f.agent.with_limits(AgentLimits {
            max_iterations: 3,
            subagent_max_iterations: 3,
        });

        let err = agent.invoke("t1", "go").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterationsExceeded(3)));
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let f = fixture(vec![Scripted::Error("boom".into())]);
        let err = f.agent.invoke("t1", "go").await.unwrap_err();
        assert!(matches!(err, AgentError::GatewayError(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_model_call() {
        let f = fixture(vec![Scripted::Text("never".into())]);
        let token = CancellationToken::new();
        token.cancel();
        let agent = f.agent.with_cancellation(token);

        let err = agent.invoke("t1", "go").await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(f.gateway.seen().is_empty());
    }

    #[tokio::test]
    async fn test_delegation_runs_subagent_loop() {
        let f = fixture(vec![
            tools(&[(
                "t",
                TASK_TOOL,
                serde_json::json!({
                    "subagent_type": research_domain::ANSWER_AGENT,
                    "description": "Did A happen?"
                }),
            )]),
            // sub-agent: one search, then its answer
            tools(&[("s1", SEARCH, serde_json::json!({"query": "A"}))]),
            Scripted::Text("A happened in 1990.".into()),
            // head researcher finishes
            Scripted::Text("<html/>".into()),
        ]);

        let result = f.agent.invoke("t1", "go").await.unwrap();
        assert_eq!(result.output(), Some("<html/>"));

        let seen = f.gateway.seen();
        assert_eq!(seen.len(), 4);
        // The sub-agent gets its own prompt and only its tool subset
        assert!(seen[1].system_prompt.contains("research assistant"));
        assert_eq!(seen[1].messages[0].content, "Did A happen?");
        assert_eq!(seen[1].tool_names, vec![SEARCH.to_string()]);

        let head_history = &seen[3].messages;
        assert_eq!(head_history.last().unwrap().content, "A happened in 1990.");
    }

    #[tokio::test]
    async fn test_delegation_to_unknown_subagent_fails_softly() {
        let f = fixture(vec![
            tools(&[(
                "t",
                TASK_TOOL,
                serde_json::json!({"subagent_type": "ghost", "description": "x"}),
            )]),
            Scripted::Text("fallback".into()),
        ]);

        let result = f.agent.invoke("t1", "go").await.unwrap();
        assert_eq!(result.output(), Some("fallback"));
        let history = f.gateway.seen().pop().unwrap().messages;
        assert!(history.last().unwrap().content.contains("INVALID_ARGUMENT"));
    }

    #[tokio::test]
    async fn test_invoke_discards_stale_checkpoint() {
        let f = fixture(vec![questions("q1"), Scripted::Text("fresh".into())]);
        f.agent.invoke("t1", "go").await.unwrap();
        assert!(f.checkpoints.load("t1").is_some());

        let result = f.agent.invoke("t1", "again").await.unwrap();
        assert_eq!(result.output(), Some("fresh"));
        assert!(f.checkpoints.load("t1").is_none());
    }

    #[test]
    fn test_elapsed_ms_is_small_for_fresh_instant() {
        assert!(elapsed_ms(Instant::now()) < 1_000);
    }

    fn delegate_questions() -> Scripted {
        tools(&[(
            "t",
            TASK_TOOL,
            serde_json::json!({
                "subagent_type": research_domain::QUESTION_AGENT,
                "description": "Draft 5 questions on RL in Technology"
            }),
        )])
    }

    #[tokio::test]
    async fn test_subagent_question_extraction_pauses_run() {
        let f = fixture(vec![delegate_questions(), questions("call_q")]);

        let result = f.agent.invoke("t1", "go").await.unwrap();
        let interrupt = result.interrupt().unwrap();
        let action = interrupt.first().unwrap();
        assert_eq!(action.name, QUESTIONS_TOOL);
        assert_eq!(action.arg_str("q"), Some("1. A?\\n2. B?"));
        assert!(f.tools.executed().is_empty());

        let checkpoint = f.checkpoints.load("t1").unwrap();
        assert_eq!(checkpoint.pending.len(), 1);
        assert_eq!(checkpoint.pending[0].tool_name, TASK_TOOL);
        assert_eq!(checkpoint.delegated.len(), 1);
        let pause = &checkpoint.delegated[0];
        assert_eq!(pause.subagent, research_domain::QUESTION_AGENT);
        assert_eq!(pause.task_call_id, "t");
        assert_eq!(pause.pending[0].native_id.as_deref(), Some("call_q"));
    }

    #[tokio::test]
    async fn test_resume_continues_paused_subagent() {
        let f = fixture(vec![
            delegate_questions(),
            questions("call_q"),
            // sub-agent after approval, then the head researcher
            Scripted::Text("1. A?\n2. B?".into()),
            Scripted::Text("<html/>".into()),
        ]);

        f.agent.invoke("t1", "go").await.unwrap();
        let result = f.agent.resume("t1", vec![Decision::Approve]).await.unwrap();
        assert_eq!(result.output(), Some("<html/>"));

        let executed = f.tools.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].tool_name, QUESTIONS_TOOL);

        let seen = f.gateway.seen();
        assert_eq!(seen.len(), 4);
        // The sub-agent picks up its own conversation with the tool result
        assert_eq!(seen[2].system_prompt, seen[1].system_prompt);
        let sub_last = seen[2].messages.last().unwrap();
        assert_eq!(sub_last.role, Role::Tool);
        assert_eq!(sub_last.tool_call_id.as_deref(), Some("call_q"));
        // The head researcher gets the sub-agent's answer as the task result
        let head_last = seen[3].messages.last().unwrap();
        assert_eq!(head_last.tool_call_id.as_deref(), Some("t"));
        assert_eq!(head_last.content, "1. A?\n2. B?");
        assert!(f.checkpoints.load("t1").is_none());
    }

    #[tokio::test]
    async fn test_edit_reaches_paused_subagent_call() {
        let f = fixture(vec![
            delegate_questions(),
            questions("call_q"),
            Scripted::Text("edited".into()),
            Scripted::Text("<html/>".into()),
        ]);

        f.agent.invoke("t1", "go").await.unwrap();
        let edited = ToolCall::new(QUESTIONS_TOOL).with_arg("q", "1. C?");
        f.agent
            .resume(
                "t1",
                vec![Decision::Edit {
                    edited_action: edited,
                }],
            )
            .await
            .unwrap();

        let executed = f.tools.executed();
        assert_eq!(executed[0].get_string("q"), Some("1. C?"));
        assert_eq!(executed[0].native_id.as_deref(), Some("call_q"));
    }

    #[tokio::test]
    async fn test_subagent_pause_keeps_finished_results() {
        let f = fixture(vec![
            tools(&[
                ("s", SEARCH, serde_json::json!({"query": "rl"})),
                (
                    "t",
                    TASK_TOOL,
                    serde_json::json!({
                        "subagent_type": research_domain::QUESTION_AGENT,
                        "description": "Draft questions"
                    }),
                ),
            ]),
            questions("call_q"),
            Scripted::Text("done".into()),
            Scripted::Text("<html/>".into()),
        ]);

        assert!(f.agent.invoke("t1", "go").await.unwrap().is_interrupted());
        let checkpoint = f.checkpoints.load("t1").unwrap();
        // The search already ran; its result is in the head history
        let last = checkpoint.messages.last().unwrap();
        assert_eq!(last.tool_call_id.as_deref(), Some("s"));
        assert_eq!(checkpoint.pending.len(), 1);

        f.agent.resume("t1", vec![Decision::Approve]).await.unwrap();
        let names: Vec<_> = f
            .tools
            .executed()
            .into_iter()
            .map(|c| c.tool_name)
            .collect();
        assert_eq!(names, vec![SEARCH.to_string(), QUESTIONS_TOOL.to_string()]);
    }
}
