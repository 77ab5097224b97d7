//! Sources of tools
//!
//! The agent's registry merges several [`ToolProvider`]s: the in-process
//! question extractor and the hosted Composio toolkit. A tool name offered
//! by two providers resolves to the one with the higher [`priority`].
//!
//! [`priority`]: ToolProvider::priority

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing credentials or an unreachable service
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),
}

#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Stable key, e.g. `builtin` or `composio`
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    async fn is_available(&self) -> bool;

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError>;

    /// Run a call for one of the discovered tools. Failures come back as
    /// failed results, never as panics or errors.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
