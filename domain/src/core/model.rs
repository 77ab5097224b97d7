//! Model value object representing an LLM model

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Provider used when a model id has no `provider:` prefix.
pub const DEFAULT_PROVIDER: &str = "openai";

/// An LLM model identified as `provider:name` (Value Object)
///
/// Mirrors the `openai:gpt-5-mini` notation used in configuration files.
/// A bare name (`gpt-5-mini`) is assumed to belong to [`DEFAULT_PROVIDER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Model {
    provider: String,
    name: String,
}

impl Model {
    pub fn new(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
        }
    }

    /// Shorthand for an OpenAI model
    pub fn openai(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_PROVIDER, name)
    }

    /// Provider prefix (e.g. "openai")
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Model name as sent to the provider API (e.g. "gpt-5-mini")
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_openai(&self) -> bool {
        self.provider == DEFAULT_PROVIDER
    }
}

impl Default for Model {
    /// Returns the default research model (openai:gpt-5-mini)
    fn default() -> Self {
        Model::openai("gpt-5-mini")
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.name)
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (provider, name) = match s.split_once(':') {
            Some((provider, name)) => (provider.trim(), name.trim()),
            None => (DEFAULT_PROVIDER, s),
        };

        if provider.is_empty() || name.is_empty() {
            return Err(DomainError::InvalidModel(s.to_string()));
        }

        Ok(Model::new(provider, name))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
