//! Prompt domain
//!
//! Templates for the head researcher, the user request, and sub-agent delegation.

pub mod research;

pub use research::{QUESTIONS_TOOL, ResearchPromptTemplate, TASK_TOOL};
