//! Agent domain module
//!
//! Configuration of the research agent: the sub-agents it can delegate to
//! and the interrupt policy that pauses it for human review.

pub mod interrupt;
pub mod subagent;

pub use interrupt::{
    ActionRequest, Decision, DecisionType, Interrupt, InterruptPolicy, ReviewConfig,
};
pub use subagent::{ANSWER_AGENT, QUESTION_AGENT, REPORT_AGENT, SubAgentSpec};
