//! Sub-agent delegation through the `task` tool.
//!
//! A delegated task runs a nested tool loop with the sub-agent's own system
//! prompt and tool subset. Its final text is returned to the head researcher
//! as the `task` result. A call covered by the interrupt policy stops the
//! sub-agent; its conversation is kept in the thread's checkpoint and picks
//! up again on resume.

use super::{
    AgentError, CallOutcome, DeepAgent, PendingAction, assign_call_ids, elapsed_ms,
    push_tool_results, rejection,
};
use crate::ports::checkpoint::DelegatedPause;
use futures::future::join_all;
use research_domain::{
    DefaultToolValidator, Message, ResearchPromptTemplate, SubAgentSpec, TASK_TOOL, ToolCall,
    ToolDefinition, ToolError, ToolParameter, ToolResult, ToolSpec, ToolValidator,
};
use std::time::Instant;
use tracing::{info, warn};

/// Definition of the `task` tool for the given sub-agents
pub(super) fn task_tool(subagents: &[SubAgentSpec]) -> ToolDefinition {
    ToolDefinition::new(
        TASK_TOOL,
        ResearchPromptTemplate::task_tool_description(subagents),
    )
    .with_parameter(ToolParameter::new(
        "description",
        "The task for the sub-agent, with all the context it needs to work on its own",
        true,
    ))
    .with_parameter(
        ToolParameter::new("subagent_type", "Which sub-agent to delegate to", true)
            .with_allowed_values(subagents.iter().map(|a| a.name.clone())),
    )
}

enum SubAgentRun {
    Finished(String),
    Paused(DelegatedPause),
}

impl DeepAgent {
    /// Execute a `task` call by running the named sub-agent.
    pub(super) async fn delegate(&self, call: &ToolCall) -> CallOutcome {
        let definition = task_tool(&self.subagents);
        if let Err(e) = DefaultToolValidator.validate(call, &definition) {
            return CallOutcome::Done(ToolResult::failure(
                TASK_TOOL,
                ToolError::invalid_argument(e),
            ));
        }
        let (Some(name), Some(task)) = (
            call.get_string("subagent_type"),
            call.get_string("description"),
        ) else {
            return CallOutcome::Done(ToolResult::failure(
                TASK_TOOL,
                ToolError::invalid_argument("subagent_type and description must be strings"),
            ));
        };
        let Some(spec) = self.subagents.iter().find(|a| a.name == name) else {
            return CallOutcome::Done(ToolResult::failure(TASK_TOOL, ToolError::not_found(name)));
        };

        info!(subagent = name, "Delegating task");
        self.progress.on_subagent_start(name, task);
        let started = Instant::now();

        let allowed = self.subagent_tools(spec);
        let task_call_id = call.native_id.as_deref().unwrap_or_default();
        let run = self
            .subagent_loop(spec, task_call_id, vec![Message::user(task)], &allowed)
            .await;
        self.finish_delegation(&spec.name, run, started)
    }

    /// Continue a paused sub-agent with the reviewed actions of its last turn.
    pub(super) async fn resume_subagent(
        &self,
        pause: DelegatedPause,
        actions: Vec<PendingAction>,
    ) -> CallOutcome {
        let Some(spec) = self.subagents.iter().find(|a| a.name == pause.subagent) else {
            return CallOutcome::Done(ToolResult::failure(
                TASK_TOOL,
                ToolError::not_found(&pause.subagent),
            ));
        };
        let DelegatedPause {
            task_call_id,
            mut messages,
            ..
        } = pause;

        info!(subagent = %spec.name, "Resuming sub-agent after review");
        let task = messages.first().map(|m| m.content.as_str()).unwrap_or_default();
        self.progress.on_subagent_start(&spec.name, task);
        let started = Instant::now();

        let allowed = self.subagent_tools(spec);
        let allowed_ref = &allowed;
        let calls: Vec<ToolCall> = actions.iter().map(|a| a.call().clone()).collect();
        let results = join_all(actions.into_iter().map(|action| async move {
            match action {
                PendingAction::Run(call) => self.execute_tool(&call, allowed_ref).await,
                PendingAction::Reject(call, message) => rejection(&call, message),
            }
        }))
        .await;
        push_tool_results(&mut messages, &calls, results);

        let run = self
            .subagent_loop(spec, &task_call_id, messages, &allowed)
            .await;
        self.finish_delegation(&spec.name, run, started)
    }

    fn subagent_tools(&self, spec: &SubAgentSpec) -> ToolSpec {
        self.tools
            .tool_spec()
            .subset(spec.tools.iter().map(String::as_str))
    }

    fn finish_delegation(
        &self,
        name: &str,
        run: Result<SubAgentRun, AgentError>,
        started: Instant,
    ) -> CallOutcome {
        match run {
            Ok(SubAgentRun::Finished(report)) => {
                self.progress.on_subagent_end(name, true);
                CallOutcome::Done(
                    ToolResult::success(TASK_TOOL, report).with_duration(elapsed_ms(started)),
                )
            }
            Ok(SubAgentRun::Paused(pause)) => {
                info!(subagent = name, "Sub-agent paused for human review");
                CallOutcome::Paused(pause)
            }
            Err(e) => {
                warn!(subagent = name, error = %e, "Sub-agent failed");
                self.progress.on_subagent_end(name, false);
                CallOutcome::Done(
                    ToolResult::failure(
                        TASK_TOOL,
                        ToolError::execution_failed(format!("Sub-agent '{}' failed", name))
                            .with_cause(e.to_string()),
                    )
                    .with_duration(elapsed_ms(started)),
                )
            }
        }
    }

    async fn subagent_loop(
        &self,
        spec: &SubAgentSpec,
        task_call_id: &str,
        mut messages: Vec<Message>,
        allowed: &ToolSpec,
    ) -> Result<SubAgentRun, AgentError> {
        let tools = self.schema.all_tools_schema(allowed);

        for iteration in 1..=self.limits.subagent_max_iterations {
            let response = self.chat(&spec.system_prompt, &messages, &tools).await?;
            let text = response.text_content();
            let calls = assign_call_ids(response.tool_calls(), iteration);

            if calls.is_empty() {
                return Ok(SubAgentRun::Finished(text));
            }

            messages.push(Message::assistant_with_tools(text, calls.clone()));

            if self.needs_review(&calls) {
                return Ok(SubAgentRun::Paused(DelegatedPause {
                    task_call_id: task_call_id.to_string(),
                    subagent: spec.name.clone(),
                    messages,
                    pending: calls,
                }));
            }

            let results = join_all(calls.iter().map(|call| self.execute_tool(call, allowed))).await;
            push_tool_results(&mut messages, &calls, results);
        }

        Err(AgentError::MaxIterationsExceeded(
            self.limits.subagent_max_iterations,
        ))
    }
}
