//! Research session use case
//!
//! Owns the single [`ResearchSession`] and the agent, and maps each UI
//! action onto the session state machine:
//!
//! | Action | Phase | Agent call |
//! |--------|-------|------------|
//! | `start` | Input | `invoke(thread, "Topic: …, Domain: …")` |
//! | `approve` | Interrupt | `resume(thread, [Approve])` |
//! | `begin_edit` / `back_to_review` | Interrupt / Edit | none |
//! | `submit_edit` | Edit | `resume(thread, [Edit { q }])` |
//! | `restart` | any | cancels an in-flight run |
//!
//! Only one agent run happens at a time. A run whose session was restarted
//! while it was in flight is discarded.

use crate::agent::{AgentError, AgentRunResult, DeepAgent};
use research_domain::{
    Decision, DomainError, QUESTIONS_TOOL, ResearchRequest, ResearchSession, RunOutcome,
    SessionEvent, ToolCall, escape_newlines,
};
use std::sync::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors returned by session actions
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Please enter both a topic and a domain")]
    MissingInput,

    #[error("A research run is already in progress")]
    Busy,

    #[error("The agent paused without an action to review")]
    EmptyInterrupt,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
}

/// Controller for the research session behind the UI
pub struct ResearchSessionUseCase {
    agent: DeepAgent,
    session: Mutex<ResearchSession>,
    /// Cancels the in-flight run on restart
    cancel: Mutex<CancellationToken>,
    run_lock: tokio::sync::Mutex<()>,
}

impl ResearchSessionUseCase {
    pub fn new(agent: DeepAgent) -> Self {
        Self {
            agent,
            session: Mutex::new(ResearchSession::new()),
            cancel: Mutex::new(CancellationToken::new()),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current session state for rendering
    pub fn snapshot(&self) -> ResearchSession {
        self.lock_session().clone()
    }

    /// Whether an agent run is in flight
    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Submit topic and domain and run the agent until it pauses or finishes
    pub async fn start(&self, topic: &str, domain: &str) -> Result<(), ResearchError> {
        let request =
            ResearchRequest::try_new(topic, domain).map_err(|_| ResearchError::MissingInput)?;
        info!(request = %request, "Starting research");
        let prompt = request.to_prompt();

        self.run(SessionEvent::Start, |agent, thread_id| async move {
            agent.invoke(&thread_id, &prompt).await
        })
        .await
    }

    /// Accept the generated questions as they are
    pub async fn approve(&self) -> Result<(), ResearchError> {
        self.run(SessionEvent::Approve, |agent, thread_id| async move {
            agent.resume(&thread_id, vec![Decision::Approve]).await
        })
        .await
    }

    pub fn begin_edit(&self) -> Result<(), ResearchError> {
        Ok(self.lock_session().begin_edit()?)
    }

    pub fn back_to_review(&self) -> Result<(), ResearchError> {
        Ok(self.lock_session().back_to_review()?)
    }

    /// Send the edited question list back to the paused tool call
    pub async fn submit_edit(&self, edited: &str) -> Result<(), ResearchError> {
        let tool_name = self
            .lock_session()
            .tool_name()
            .unwrap_or(QUESTIONS_TOOL)
            .to_string();
        let edited_action = ToolCall::new(tool_name).with_arg("q", escape_newlines(edited));

        self.run(SessionEvent::SubmitEdit, |agent, thread_id| async move {
            agent
                .resume(&thread_id, vec![Decision::Edit { edited_action }])
                .await
        })
        .await
    }

    /// Back to input with a fresh thread, cancelling any in-flight run
    pub fn restart(&self) {
        {
            let mut cancel = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
            cancel.cancel();
            *cancel = CancellationToken::new();
        }
        self.lock_session().restart();
        info!("Research session restarted");
    }

    async fn run<F, Fut>(&self, event: SessionEvent, call: F) -> Result<(), ResearchError>
    where
        F: FnOnce(DeepAgent, String) -> Fut,
        Fut: std::future::Future<Output = Result<AgentRunResult, AgentError>>,
    {
        let _guard = self.run_lock.try_lock().map_err(|_| ResearchError::Busy)?;

        let thread_id = {
            let session = self.lock_session();
            session.ensure(event)?;
            session.thread_id().to_string()
        };
        let token = self
            .cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let agent = self.agent.clone().with_cancellation(token);

        let result = call(agent, thread_id.clone()).await;

        let mut session = self.lock_session();
        if session.thread_id() != thread_id {
            info!(thread_id, "Discarding result of a restarted session");
            return Ok(());
        }

        let outcome = match result {
            Ok(AgentRunResult::Completed { output }) => RunOutcome::Completed { html: output },
            Ok(AgentRunResult::Interrupted(interrupt)) => {
                let Some(action) = interrupt.first() else {
                    session.record_failure(ResearchError::EmptyInterrupt.to_string());
                    return Err(ResearchError::EmptyInterrupt);
                };
                RunOutcome::Interrupted {
                    questions: action.arg_str("q").unwrap_or_default().to_string(),
                    tool_name: action.name.clone(),
                }
            }
            Err(e) if e.is_cancelled() => {
                info!(thread_id, "Research run cancelled");
                return Ok(());
            }
            Err(e) => {
                warn!(thread_id, error = %e, "Research run failed");
                session.record_failure(e.to_string());
                return Err(e.into());
            }
        };

        session.finish_run(event, outcome)?;
        info!(thread_id, phase = %session.phase(), "Research session updated");
        Ok(())
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, ResearchSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
