//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; every section has defaults so a partial
//! file (or no file at all) yields a working configuration.

mod agent;
mod model;
mod report;
mod tools;

pub use agent::FileAgentConfig;
pub use model::FileModelConfig;
pub use report::{FileReportConfig, FileServerConfig};
pub use tools::{DEFAULT_TOOL_SLUGS, FileToolsConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0}: timeout_seconds cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("invalid model id '{0}'")]
    InvalidModel(String),

    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("tools.slugs cannot be empty")]
    EmptySlugList,

    #[error("tools.slugs contains an empty slug")]
    EmptySlug,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub model: FileModelConfig,
    pub agent: FileAgentConfig,
    pub tools: FileToolsConfig,
    pub report: FileReportConfig,
    pub server: FileServerConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("model"));
        }
        if self.tools.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("tools"));
        }

        if self.model.id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        self.model
            .parse_model()
            .map_err(|_| ConfigValidationError::InvalidModel(self.model.id.clone()))?;

        if self.agent.max_iterations == 0 {
            return Err(ConfigValidationError::ZeroValue("agent.max_iterations"));
        }
        if self.agent.subagent_max_iterations == 0 {
            return Err(ConfigValidationError::ZeroValue(
                "agent.subagent_max_iterations",
            ));
        }
        if self.report.port == 0 {
            return Err(ConfigValidationError::ZeroValue("report.port"));
        }

        if self.tools.slugs.is_empty() {
            return Err(ConfigValidationError::EmptySlugList);
        }
        if self.tools.slugs.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigValidationError::EmptySlug);
        }

        Ok(())
    }
}
