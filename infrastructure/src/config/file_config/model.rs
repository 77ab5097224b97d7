//! Model configuration from TOML (`[model]` section)

use research_domain::{DomainError, Model};
use serde::{Deserialize, Serialize};

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// id = "openai:gpt-5-mini"
/// base_url = "https://api.openai.com/v1"
/// timeout_seconds = 300
/// ```
///
/// The API key is never read from the config file; it comes from
/// `OPENAI_API_KEY` or the UI sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model id as `provider:name` (a bare name means OpenAI)
    pub id: String,
    /// Chat completions base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            id: Model::default().to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_seconds: 300,
        }
    }
}

impl FileModelConfig {
    pub fn parse_model(&self) -> Result<Model, DomainError> {
        self.id.parse()
    }
}
