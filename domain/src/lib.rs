//! Domain layer for deep-research
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Research session
//!
//! A user names a **topic** and a **domain**. The head researcher drafts a
//! numbered list of yes/no questions and passes it to the question extraction
//! tool. The agent pauses there so a human can approve or edit the list, then
//! it researches each question and compiles an HTML report.
//!
//! ## Sub-agents
//!
//! The head researcher may delegate work to three role-specialized sub-agents
//! (question drafting, answering, report compiling) through the `task` tool.
//!
//! ## Interrupts
//!
//! An [`InterruptPolicy`] names the tools whose calls pause the agent and the
//! [`Decision`]s a human may return for them.

pub mod agent;
pub mod core;
pub mod prompt;
pub mod research;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    ANSWER_AGENT, ActionRequest, Decision, DecisionType, Interrupt, InterruptPolicy,
    QUESTION_AGENT, REPORT_AGENT, ReviewConfig, SubAgentSpec,
};
pub use core::{error::DomainError, model::Model};
pub use prompt::{QUESTIONS_TOOL, ResearchPromptTemplate, TASK_TOOL};
pub use research::{
    ResearchPhase, ResearchRequest, ResearchSession, RunOutcome, SessionEvent, escape_newlines,
    extract_questions, numbered_count, unescape_newlines,
};
pub use session::{
    entities::{Message, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    provider::{ProviderError, ToolProvider},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata},
};
