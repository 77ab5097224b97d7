//! Port for rendering tool definitions as chat-completions `tools` entries

use research_domain::tool::entities::{ToolDefinition, ToolSpec};

pub trait ToolSchemaPort: Send + Sync {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// One entry per tool, ordered by name so requests are reproducible
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut schemas = Vec::with_capacity(spec.len());
        for tool in spec.sorted() {
            schemas.push(self.tool_to_schema(tool));
        }
        schemas
    }
}
