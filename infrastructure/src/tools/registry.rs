//! Routes tool calls to the provider that serves each tool
//!
//! ```ignore
//! let mut registry = ToolRegistry::new()
//!     .register(ComposioToolProvider::new(client, user_id, slugs))
//!     .register(BuiltinProvider::new());
//! registry.discover().await;
//! let result = registry.execute(&call).await;
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use research_application::ports::tool_executor::ToolExecutorPort;
use research_domain::tool::{
    entities::{ToolCall, ToolSpec},
    provider::ToolProvider,
    value_objects::{ToolError, ToolResult},
};
use tracing::{debug, info, warn};

pub struct ToolRegistry {
    providers: Vec<Arc<dyn ToolProvider>>,
    /// Filled by `discover`; `None` until then
    routes: Option<HashMap<String, Arc<dyn ToolProvider>>>,
    spec: ToolSpec,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            routes: None,
            spec: ToolSpec::new(),
        }
    }

    pub fn register<P: ToolProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self.routes = None;
        self
    }

    /// Query every available provider, highest priority first.
    ///
    /// A tool name already claimed by an earlier provider is skipped. Provider
    /// failures are logged and leave the rest of the registry usable.
    pub async fn discover(&mut self) {
        self.providers.sort_by_key(|p| Reverse(p.priority()));

        let mut routes: HashMap<String, Arc<dyn ToolProvider>> = HashMap::new();
        let mut spec = ToolSpec::new();

        for provider in &self.providers {
            if !provider.is_available().await {
                warn!(provider = provider.id(), "Provider not available, skipping");
                continue;
            }
            let tools = match provider.discover_tools().await {
                Ok(tools) => tools,
                Err(e) => {
                    warn!(provider = provider.id(), error = %e, "Tool discovery failed");
                    continue;
                }
            };
            info!(provider = provider.display_name(), count = tools.len(), "Discovered tools");

            for tool in tools {
                if routes.contains_key(&tool.name) {
                    debug!(tool = %tool.name, provider = provider.id(), "Shadowed by higher priority provider");
                    continue;
                }
                routes.insert(tool.name.clone(), Arc::clone(provider));
                spec = spec.register(tool);
            }
        }

        self.spec = spec;
        self.routes = Some(routes);
    }

    /// Sorted names of the tools routed to `provider_id`
    pub fn tools_of(&self, provider_id: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .routes
            .iter()
            .flatten()
            .filter(|(_, provider)| provider.id() == provider_id)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(routes) = &self.routes else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed("Tool registry not initialized"),
            );
        };
        match routes.get(&call.tool_name) {
            Some(provider) => provider.execute(call).await,
            None => ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::BuiltinProvider;
    use research_domain::{ProviderError, QUESTIONS_TOOL, ToolDefinition, ToolErrorKind};

    struct Fixed {
        id: &'static str,
        priority: i32,
        available: bool,
        tools: &'static [&'static str],
    }

    impl Fixed {
        fn remote(id: &'static str, priority: i32, tools: &'static [&'static str]) -> Self {
            Self {
                id,
                priority,
                available: true,
                tools,
            }
        }
    }

    #[async_trait]
    impl ToolProvider for Fixed {
        fn id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> &str {
            self.id
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
            Ok(self
                .tools
                .iter()
                .map(|name| ToolDefinition::new(*name, "fixed"))
                .collect())
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            ToolResult::success(&call.tool_name, self.id)
        }
    }

    #[tokio::test]
    async fn test_routes_remote_and_builtin() {
        let mut registry = ToolRegistry::new()
            .register(BuiltinProvider::new())
            .register(Fixed::remote("composio", 100, &["TAVILY_SEARCH"]));
        registry.discover().await;

        assert!(registry.has_tool(QUESTIONS_TOOL));
        assert_eq!(registry.tools_of("builtin"), vec![QUESTIONS_TOOL]);
        assert_eq!(registry.tools_of("composio"), vec!["TAVILY_SEARCH"]);

        let remote = registry.execute(&ToolCall::new("TAVILY_SEARCH")).await;
        assert_eq!(remote.output(), Some("composio"));

        let local = registry
            .execute(&ToolCall::new(QUESTIONS_TOOL).with_arg("q", "1. A?\n2. B?"))
            .await;
        assert!(local.is_success());
    }

    #[tokio::test]
    async fn test_higher_priority_shadows() {
        let mut registry = ToolRegistry::new()
            .register(Fixed::remote("low", 0, &["SEARCH"]))
            .register(Fixed::remote("high", 10, &["SEARCH"]));
        registry.discover().await;

        let result = registry.execute(&ToolCall::new("SEARCH")).await;
        assert_eq!(result.output(), Some("high"));
        assert!(registry.tools_of("low").is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_provider_skipped() {
        let mut registry = ToolRegistry::new().register(Fixed {
            available: false,
            ..Fixed::remote("offline", 100, &["SEARCH"])
        });
        registry.discover().await;

        assert!(!registry.has_tool("SEARCH"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let mut registry = ToolRegistry::new().register(BuiltinProvider::new());
        registry.discover().await;

        let result = registry.execute(&ToolCall::new("unknown_tool")).await;
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_execute_before_discover_fails() {
        let registry = ToolRegistry::new().register(BuiltinProvider::new());

        let result = registry.execute(&ToolCall::new(QUESTIONS_TOOL)).await;
        assert!(result.error().unwrap().message.contains("not initialized"));
    }
}
