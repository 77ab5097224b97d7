//! Research request value object

use crate::core::error::DomainError;
use crate::prompt::ResearchPromptTemplate;
use serde::{Deserialize, Serialize};

/// A topic to research within a domain (Value Object)
///
/// Both parts are trimmed and must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRequest {
    topic: String,
    domain: String,
}

impl ResearchRequest {
    pub fn try_new(topic: &str, domain: &str) -> Result<Self, DomainError> {
        let topic = topic.trim();
        let domain = domain.trim();
        if topic.is_empty() {
            return Err(DomainError::InvalidTopic("topic cannot be empty".into()));
        }
        if domain.is_empty() {
            return Err(DomainError::InvalidTopic("domain cannot be empty".into()));
        }
        Ok(Self {
            topic: topic.to_string(),
            domain: domain.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The first user message of a research run
    pub fn to_prompt(&self) -> String {
        ResearchPromptTemplate::user_request(&self.topic, &self.domain)
    }
}

impl std::fmt::Display for ResearchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.topic, self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_formats_prompt() {
        let req = ResearchRequest::try_new("  History of RL ", "Technology\n").unwrap();
        assert_eq!(req.topic(), "History of RL");
        assert_eq!(req.to_prompt(), "Topic: History of RL, Domain: Technology");
    }

    #[test]
    fn test_blank_parts_rejected() {
        assert!(ResearchRequest::try_new("", "Technology").is_err());
        assert!(ResearchRequest::try_new("RL", "   ").is_err());
    }
}
