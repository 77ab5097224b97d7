//! Errors raised by domain invariants

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Empty topic or domain
    #[error("Invalid research topic: {0}")]
    InvalidTopic(String),

    /// Not a `provider:model` id
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// A UI action that the current phase does not accept
    #[error("Cannot {event} while session is in '{phase}' state")]
    InvalidTransition { phase: String, event: String },

    #[error("Decision '{decision}' is not allowed for tool '{tool}'")]
    DecisionNotAllowed { tool: String, decision: String },

    /// Resume must carry one decision per pending action
    #[error("Expected {expected} decision(s), got {actual}")]
    DecisionCountMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let transition = DomainError::InvalidTransition {
            phase: "input".to_string(),
            event: "approve".to_string(),
        };
        assert_eq!(
            transition.to_string(),
            "Cannot approve while session is in 'input' state"
        );

        let count = DomainError::DecisionCountMismatch {
            expected: 1,
            actual: 0,
        };
        assert_eq!(count.to_string(), "Expected 1 decision(s), got 0");
    }
}
