//! Port through which the agent runs tools

use async_trait::async_trait;
use research_domain::tool::{
    entities::{ToolCall, ToolSpec},
    value_objects::ToolResult,
};

/// Executes tool calls issued by the head researcher or a sub-agent.
///
/// A failed call is a failed [`ToolResult`]; the agent hands it back to the
/// model as the tool message.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Everything this executor can run
    fn tool_spec(&self) -> &ToolSpec;

    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
