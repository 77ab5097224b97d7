//! In-process tools: question extraction

use async_trait::async_trait;
use research_domain::QUESTIONS_TOOL;
use research_domain::tool::{
    DefaultToolValidator, ToolError, ToolValidator,
    entities::{ToolCall, ToolDefinition, ToolSpec},
    provider::{ProviderError, ToolProvider},
    value_objects::ToolResult,
};

use crate::tools::questions;

/// Below every remote provider, so a hosted tool with the same name wins
pub const BUILTIN_PRIORITY: i32 = -100;

#[derive(Debug, Clone)]
pub struct BuiltinProvider {
    tools: ToolSpec,
}

impl BuiltinProvider {
    pub fn new() -> Self {
        Self {
            tools: crate::tools::builtin_tool_spec(),
        }
    }
}

impl Default for BuiltinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for BuiltinProvider {
    fn id(&self) -> &str {
        "builtin"
    }

    fn display_name(&self) -> &str {
        "Built-in Tools"
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(self.tools.all().cloned().collect())
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(definition) = self.tools.get(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        };
        if let Err(reason) = DefaultToolValidator.validate(call, definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(reason));
        }

        match definition.name.as_str() {
            QUESTIONS_TOOL => questions::execute_questions(call),
            other => ToolResult::failure(other, ToolError::not_found(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_domain::ToolErrorKind;

    #[tokio::test]
    async fn test_discovers_questions_tool_only() {
        let provider = BuiltinProvider::new();
        assert!(provider.is_available().await);
        assert!(provider.priority() < 0);

        let names: Vec<_> = provider
            .discover_tools()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec![QUESTIONS_TOOL.to_string()]);
    }

    #[tokio::test]
    async fn test_extracts_questions() {
        let call = ToolCall::new(QUESTIONS_TOOL).with_arg("q", "1. Is A?\n2. Is B?");
        let result = BuiltinProvider::new().execute(&call).await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some(r#"["1. Is A?","2. Is B?"]"#));
    }

    #[tokio::test]
    async fn test_invalid_arguments_reported() {
        let call = ToolCall::new(QUESTIONS_TOOL)
            .with_arg("q", "1. A?")
            .with_arg("count", 5);
        let result = BuiltinProvider::new().execute(&call).await;
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::InvalidArgument);

        let missing = BuiltinProvider::new()
            .execute(&ToolCall::new(QUESTIONS_TOOL))
            .await;
        assert_eq!(missing.error().unwrap().kind, ToolErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = BuiltinProvider::new()
            .execute(&ToolCall::new("read_file"))
            .await;
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::NotFound);
    }
}
