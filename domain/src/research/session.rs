//! Research session state machine
//!
//! One session drives the UI through four phases:
//!
//! ```text
//!            run → interrupt            begin edit
//!   Input ─────────────────→ Interrupt ───────────→ Edit
//!     │                       │    ↑                 │
//!     │ run → done   approve  │    └─ back to review ┘
//!     ↓                       ↓                      │ submit edited
//!   Completed ←───────────────┴──────────────────────┘
//!
//!   restart: any phase → Input (fresh thread id)
//! ```
//!
//! Agent runs happen outside the session. The caller checks that an event
//! is allowed with [`ResearchSession::ensure`], runs the agent, then applies
//! the outcome with [`ResearchSession::finish_run`]. A failed run is stored
//! in `last_error` and leaves the phase unchanged.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of the research session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchPhase {
    #[default]
    Input,
    Interrupt,
    Edit,
    Completed,
}

impl ResearchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchPhase::Input => "input",
            ResearchPhase::Interrupt => "interrupt",
            ResearchPhase::Edit => "edit",
            ResearchPhase::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user action on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Submit topic and domain
    Start,
    /// Accept the generated questions
    Approve,
    BeginEdit,
    BackToReview,
    /// Send edited questions
    SubmitEdit,
}

impl SessionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEvent::Start => "start research",
            SessionEvent::Approve => "approve questions",
            SessionEvent::BeginEdit => "edit questions",
            SessionEvent::BackToReview => "go back to review",
            SessionEvent::SubmitEdit => "submit edited questions",
        }
    }

    /// Phase the event is valid in
    fn source(&self) -> ResearchPhase {
        match self {
            SessionEvent::Start => ResearchPhase::Input,
            SessionEvent::Approve | SessionEvent::BeginEdit => ResearchPhase::Interrupt,
            SessionEvent::BackToReview | SessionEvent::SubmitEdit => ResearchPhase::Edit,
        }
    }

    /// Whether the event triggers an agent run
    pub fn runs_agent(&self) -> bool {
        matches!(
            self,
            SessionEvent::Start | SessionEvent::Approve | SessionEvent::SubmitEdit
        )
    }
}

/// Result of an agent run, as far as the session cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The agent paused on a tool call awaiting review
    Interrupted { questions: String, tool_name: String },
    /// The agent finished with a report
    Completed { html: String },
}

/// The single research session (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSession {
    phase: ResearchPhase,
    thread_id: String,
    /// Raw question list from the paused tool call (literal `\n` separators)
    interrupt_q: String,
    tool_name: Option<String>,
    html_content: String,
    last_error: Option<String>,
}

impl Default for ResearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchSession {
    pub fn new() -> Self {
        Self {
            phase: ResearchPhase::Input,
            thread_id: Uuid::new_v4().to_string(),
            interrupt_q: String::new(),
            tool_name: None,
            html_content: String::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> ResearchPhase {
        self.phase
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn interrupt_q(&self) -> &str {
        &self.interrupt_q
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    pub fn html_content(&self) -> &str {
        &self.html_content
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Check that `event` is allowed in the current phase
    pub fn ensure(&self, event: SessionEvent) -> Result<(), DomainError> {
        if self.phase == event.source() {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                phase: self.phase.to_string(),
                event: event.as_str().to_string(),
            })
        }
    }

    pub fn begin_edit(&mut self) -> Result<(), DomainError> {
        self.ensure(SessionEvent::BeginEdit)?;
        self.phase = ResearchPhase::Edit;
        Ok(())
    }

    pub fn back_to_review(&mut self) -> Result<(), DomainError> {
        self.ensure(SessionEvent::BackToReview)?;
        self.phase = ResearchPhase::Interrupt;
        Ok(())
    }

    /// Apply the outcome of the agent run triggered by `event`.
    ///
    /// A resumed run that pauses again returns to review with the new list.
    pub fn finish_run(&mut self, event: SessionEvent, outcome: RunOutcome) -> Result<(), DomainError> {
        if !event.runs_agent() {
            return Err(DomainError::InvalidTransition {
                phase: self.phase.to_string(),
                event: event.as_str().to_string(),
            });
        }
        self.ensure(event)?;
        self.last_error = None;

        match outcome {
            RunOutcome::Interrupted {
                questions,
                tool_name,
            } => {
                self.interrupt_q = questions;
                self.tool_name = Some(tool_name);
                self.phase = ResearchPhase::Interrupt;
            }
            RunOutcome::Completed { html } => {
                self.html_content = html;
                self.phase = ResearchPhase::Completed;
            }
        }
        Ok(())
    }

    /// Record a failed run; the phase stays where it was
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Back to input with a fresh thread id and no data
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}
