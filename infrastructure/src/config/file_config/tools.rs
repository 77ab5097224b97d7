//! Tools configuration from TOML (`[tools]` section)
//!
//! The remotely hosted tools come from Composio. Which actions the agent
//! gets is a list of action slugs:
//!
//! ```toml
//! [tools]
//! composio_base_url = "https://backend.composio.dev"
//! user_id = "default"
//! slugs = [
//!     "COMPOSIO_SEARCH_TAVILY_SEARCH",
//!     "PERPLEXITYAI_PERPLEXITY_AI_SEARCH",
//!     "GOOGLEDOCS_CREATE_DOCUMENT_MARKDOWN",
//! ]
//! timeout_seconds = 120
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOOL_SLUGS: [&str; 3] = [
    "COMPOSIO_SEARCH_TAVILY_SEARCH",
    "PERPLEXITYAI_PERPLEXITY_AI_SEARCH",
    "GOOGLEDOCS_CREATE_DOCUMENT_MARKDOWN",
];

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub composio_base_url: String,
    /// Composio user (entity) the tools execute for
    pub user_id: String,
    pub slugs: Vec<String>,
    /// Timeout for a single remote tool call
    pub timeout_seconds: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            composio_base_url: "https://backend.composio.dev".to_string(),
            user_id: "default".to_string(),
            slugs: DEFAULT_TOOL_SLUGS.iter().map(|s| s.to_string()).collect(),
            timeout_seconds: 120,
        }
    }
}
