//! Interrupt policy and human decisions
//!
//! The research agent pauses before executing selected tools so a human can
//! review the call. The flow:
//!
//! ```text
//! model calls generate_questions_list(q)
//!        ↓
//! InterruptPolicy::covers("generate_questions_list")  → pause
//!        ↓
//! Interrupt { action_requests: [ActionRequest { name, args }] }
//!        ↓
//! human returns Decision::Approve | Decision::Edit { edited_action }
//!        ↓
//! InterruptPolicy::validate()  → resume
//! ```

use crate::core::error::DomainError;
use crate::prompt::QUESTIONS_TOOL;
use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of decision a human can make on a paused tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionType {
    Approve,
    Edit,
    Reject,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Approve => "approve",
            DecisionType::Edit => "edit",
            DecisionType::Reject => "reject",
        }
    }
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human decision on one paused tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Decision {
    /// Execute the call with the model's arguments
    Approve,
    /// Execute this call instead
    Edit { edited_action: ToolCall },
    /// Do not execute; tell the model why
    Reject { message: Option<String> },
}

impl Decision {
    pub fn decision_type(&self) -> DecisionType {
        match self {
            Decision::Approve => DecisionType::Approve,
            Decision::Edit { .. } => DecisionType::Edit,
            Decision::Reject { .. } => DecisionType::Reject,
        }
    }
}

/// A tool call the agent paused on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub name: String,
    pub args: HashMap<String, serde_json::Value>,
    pub description: String,
}

impl ActionRequest {
    pub fn from_call(call: &ToolCall) -> Self {
        Self {
            name: call.tool_name.clone(),
            args: call.arguments.clone(),
            description: format!("Tool execution requires approval: {}", call.tool_name),
        }
    }

    /// String argument of the paused call (e.g. `q` for the question list)
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}

/// Which decisions are allowed for one paused action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub action_name: String,
    pub allowed_decisions: Vec<DecisionType>,
}

/// Payload returned when the agent pauses for human review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    pub action_requests: Vec<ActionRequest>,
    pub review_configs: Vec<ReviewConfig>,
}

impl Interrupt {
    /// First paused action (the agent pauses on one call per turn in practice)
    pub fn first(&self) -> Option<&ActionRequest> {
        self.action_requests.first()
    }
}

/// Map of tool name → decisions a human may take when the agent calls it.
///
/// Tools not in the map run without pausing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterruptPolicy {
    rules: HashMap<String, Vec<DecisionType>>,
}

impl InterruptPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause on `tool`, allowing `decisions`
    pub fn interrupt_on(
        mut self,
        tool: impl Into<String>,
        decisions: impl IntoIterator<Item = DecisionType>,
    ) -> Self {
        self.rules.insert(tool.into(), decisions.into_iter().collect());
        self
    }

    /// Whether calls to `tool` pause for review
    pub fn covers(&self, tool: &str) -> bool {
        self.rules.contains_key(tool)
    }

    pub fn allowed(&self, tool: &str) -> &[DecisionType] {
        self.rules.get(tool).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Build the interrupt payload for the paused calls
    pub fn interrupt_for(&self, calls: &[ToolCall]) -> Interrupt {
        Interrupt {
            action_requests: calls.iter().map(ActionRequest::from_call).collect(),
            review_configs: calls
                .iter()
                .map(|c| ReviewConfig {
                    action_name: c.tool_name.clone(),
                    allowed_decisions: self.allowed(&c.tool_name).to_vec(),
                })
                .collect(),
        }
    }

    /// Check a decision against the rule for `tool`
    pub fn validate(&self, tool: &str, decision: &Decision) -> Result<(), DomainError> {
        let kind = decision.decision_type();
        if self.allowed(tool).contains(&kind) {
            Ok(())
        } else {
            Err(DomainError::DecisionNotAllowed {
                tool: tool.to_string(),
                decision: kind.to_string(),
            })
        }
    }

    /// Check one decision per paused call, in order
    pub fn validate_all(
        &self,
        calls: &[ToolCall],
        decisions: &[Decision],
    ) -> Result<(), DomainError> {
        if calls.len() != decisions.len() {
            return Err(DomainError::DecisionCountMismatch {
                expected: calls.len(),
                actual: decisions.len(),
            });
        }
        calls
            .iter()
            .zip(decisions)
            .try_for_each(|(call, decision)| self.validate(&call.tool_name, decision))
    }

    /// Default research policy: pause on question extraction, allow approve/edit
    pub fn research_default() -> Self {
        Self::new().interrupt_on(QUESTIONS_TOOL, [DecisionType::Approve, DecisionType::Edit])
    }
}
