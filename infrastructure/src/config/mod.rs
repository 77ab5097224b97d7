//! Configuration file loading for deep-research
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEEP_RESEARCH_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./deep-research.toml` or `./.deep-research.toml`
//! 4. Global: `$XDG_CONFIG_HOME/deep-research/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_TOOL_SLUGS, FileAgentConfig, FileConfig, FileModelConfig,
    FileReportConfig, FileServerConfig, FileToolsConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
