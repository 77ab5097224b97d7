//! Composio v3 REST client

use reqwest::{
    Client, StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use research_domain::tool::{
    entities::ToolDefinition,
    value_objects::{ToolError, ToolResult},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors talking to the Composio service
#[derive(Error, Debug)]
pub enum ComposioError {
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Composio returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Tool metadata from `GET /api/v3/tools/{slug}`
#[derive(Debug, Deserialize)]
struct ToolInfo {
    slug: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input_parameters: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    user_id: &'a str,
    arguments: &'a Value,
}

/// Response of `POST /api/v3/tools/execute/{slug}`
#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    successful: bool,
}

impl ToolInfo {
    fn into_definition(self) -> ToolDefinition {
        let schema = self
            .input_parameters
            .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}}));
        ToolDefinition::new(self.slug, self.description).with_input_schema(schema)
    }
}

/// Client for the tools endpoints of the Composio API
#[derive(Clone)]
pub struct ComposioClient {
    client: Client,
    base_url: String,
}

impl ComposioClient {
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ComposioError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| ComposioError::InvalidApiKey(e.to_string()))?;
        headers.insert("x-api-key", key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn error_for(response: reqwest::Response) -> ComposioError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ComposioError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
        }
    }

    /// Fetch the definition of a single tool
    pub async fn fetch_tool(&self, slug: &str) -> Result<ToolDefinition, ComposioError> {
        let url = format!("{}/api/v3/tools/{}", self.base_url, slug);
        debug!(url = %url, "Fetching tool schema");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let info: ToolInfo = response
            .json()
            .await
            .map_err(|e| ComposioError::Decode(e.to_string()))?;
        Ok(info.into_definition())
    }

    /// Fetch the definitions of all slugs, skipping the ones that fail
    pub async fn fetch_tools(&self, slugs: &[String]) -> Vec<ToolDefinition> {
        let results =
            futures::future::join_all(slugs.iter().map(|slug| self.fetch_tool(slug))).await;

        let mut tools = Vec::with_capacity(slugs.len());
        for (slug, result) in slugs.iter().zip(results) {
            match result {
                Ok(tool) => tools.push(tool),
                Err(e) => warn!(slug = %slug, error = %e, "Skipping tool"),
            }
        }

        info!(requested = slugs.len(), loaded = tools.len(), "Loaded Composio tools");
        tools
    }

    /// Execute a tool on behalf of `user_id`
    ///
    /// Failures are returned as failed results so the model can see them.
    pub async fn execute(&self, slug: &str, user_id: &str, arguments: &Value) -> ToolResult {
        let start = Instant::now();
        let url = format!("{}/api/v3/tools/execute/{}", self.base_url, slug);
        debug!(url = %url, "Executing tool");

        let outcome = self.execute_inner(&url, user_id, arguments).await;
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(ExecuteResponse {
                data,
                successful: true,
                ..
            }) => {
                let output = match data {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                ToolResult::success(slug, output).with_duration(elapsed)
            }
            Ok(ExecuteResponse { error, .. }) => ToolResult::failure(
                slug,
                ToolError::execution_failed(
                    error.unwrap_or_else(|| "tool execution was not successful".to_string()),
                ),
            )
            .with_duration(elapsed),
            Err(ComposioError::Http(e)) if e.is_timeout() => {
                ToolResult::failure(slug, ToolError::timeout(slug)).with_duration(elapsed)
            }
            Err(e) => ToolResult::failure(slug, ToolError::execution_failed(e.to_string()))
                .with_duration(elapsed),
        }
    }

    async fn execute_inner(
        &self,
        url: &str,
        user_id: &str,
        arguments: &Value,
    ) -> Result<ExecuteResponse, ComposioError> {
        let response = self
            .client
            .post(url)
            .json(&ExecuteRequest { user_id, arguments })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ComposioError::Decode(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("message"))
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
    });

    match message {
        Some(m) => m.to_string(),
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        None => body.to_string(),
    }
}
