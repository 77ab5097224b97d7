//! Composio tool provider
//!
//! Exposes a fixed bundle of Composio action slugs to the
//! [`ToolRegistry`](crate::tools::ToolRegistry). The slugs' schemas are
//! opaque: they are fetched once during discovery and passed to the model
//! verbatim.

use super::client::ComposioClient;
use async_trait::async_trait;
use research_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    provider::{ProviderError, ToolProvider},
    value_objects::ToolResult,
};

/// Priority for remote tools (preferred over builtin)
pub const COMPOSIO_PRIORITY: i32 = 100;

pub struct ComposioToolProvider {
    client: ComposioClient,
    user_id: String,
    slugs: Vec<String>,
}

impl ComposioToolProvider {
    pub fn new(client: ComposioClient, user_id: impl Into<String>, slugs: Vec<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
            slugs,
        }
    }

    pub fn slugs(&self) -> &[String] {
        &self.slugs
    }
}

#[async_trait]
impl ToolProvider for ComposioToolProvider {
    fn id(&self) -> &str {
        "composio"
    }

    fn display_name(&self) -> &str {
        "Composio"
    }

    fn priority(&self) -> i32 {
        COMPOSIO_PRIORITY
    }

    async fn is_available(&self) -> bool {
        !self.slugs.is_empty()
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        let tools = self.client.fetch_tools(&self.slugs).await;
        if tools.is_empty() {
            return Err(ProviderError::DiscoveryFailed(format!(
                "none of the {} configured tools could be loaded",
                self.slugs.len()
            )));
        }
        Ok(tools)
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.client
            .execute(&call.tool_name, &self.user_id, &call.arguments_json())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn serve() -> String {
        let router = Router::new()
            .route(
                "/api/v3/tools/{slug}",
                get(|Path(slug): Path<String>| async move {
                    Json(json!({"slug": slug, "description": "remote", "input_parameters": {"type": "object"}}))
                }),
            )
            .route(
                "/api/v3/tools/execute/{slug}",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({"data": body["user_id"], "successful": true}))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base: &str, slugs: &[&str]) -> ComposioToolProvider {
        let client = ComposioClient::new("ck", base, Duration::from_secs(5)).unwrap();
        ComposioToolProvider::new(client, "alice", slugs.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_discover_and_execute_as_user() {
        let base = serve().await;
        let provider = provider(&base, &["TAVILY", "PERPLEXITY"]);

        assert!(provider.is_available().await);
        let tools = provider.discover_tools().await.unwrap();
        assert_eq!(tools.len(), 2);

        let result = provider
            .execute(&ToolCall::new("TAVILY").with_arg("query", "rust"))
            .await;
        assert_eq!(result.output(), Some("alice"));
    }

    #[tokio::test]
    async fn test_discovery_fails_when_nothing_loads() {
        let provider = provider("http://127.0.0.1:9", &["TAVILY"]);
        assert!(matches!(
            provider.discover_tools().await,
            Err(ProviderError::DiscoveryFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_bundle_unavailable() {
        let provider = provider("http://127.0.0.1:9", &[]);
        assert!(!provider.is_available().await);
        assert_eq!(provider.priority(), COMPOSIO_PRIORITY);
    }
}
