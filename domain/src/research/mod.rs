//! Research domain
//!
//! The research request, the question list format shared by the model and
//! the human reviewer, and the session state machine behind the UI.

pub mod questions;
pub mod session;
pub mod topic;

pub use questions::{escape_newlines, extract_questions, numbered_count, unescape_newlines};
pub use session::{ResearchPhase, ResearchSession, RunOutcome, SessionEvent};
pub use topic::ResearchRequest;
