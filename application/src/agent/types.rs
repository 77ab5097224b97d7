//! Type definitions for the research agent.

use crate::ports::llm_gateway::GatewayError;
use research_domain::{DomainError, Interrupt};
use thiserror::Error;

/// Errors that can occur during an agent run
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("No pending interrupt for thread '{0}'")]
    NoPendingInterrupt(String),

    #[error("Max iterations exceeded ({0})")]
    MaxIterationsExceeded(usize),

    #[error("Operation cancelled")]
    Cancelled,
}

impl AgentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }
}

/// Outcome of [`invoke`](super::DeepAgent::invoke) or [`resume`](super::DeepAgent::resume)
#[derive(Debug, Clone, PartialEq)]
pub enum AgentRunResult {
    /// The model answered without further tool calls
    Completed { output: String },
    /// The run paused on a tool call that needs human review
    Interrupted(Interrupt),
}

impl AgentRunResult {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, AgentRunResult::Interrupted(_))
    }

    pub fn interrupt(&self) -> Option<&Interrupt> {
        match self {
            AgentRunResult::Interrupted(i) => Some(i),
            AgentRunResult::Completed { .. } => None,
        }
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            AgentRunResult::Completed { output } => Some(output),
            AgentRunResult::Interrupted(_) => None,
        }
    }
}

/// Loop bounds for the head researcher and its sub-agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentLimits {
    /// Model calls per invoke/resume of the head researcher
    pub max_iterations: usize,
    /// Model calls per delegated task
    pub subagent_max_iterations: usize,
}

impl Default for AgentLimits {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            subagent_max_iterations: 25,
        }
    }
}
