//! OpenAI chat completions gateway

use super::types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use super::types::{convert_messages, convert_response};
use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use research_application::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use research_domain::LlmResponse;
use std::time::Duration;
use tracing::{debug, info};

/// LLM gateway speaking the OpenAI chat completions protocol
#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    base_url: String,
}

impl OpenAiGateway {
    /// Create a gateway with the given key, API base URL and request timeout
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| GatewayError::Unauthorized(format!("malformed API key: {}", e)))?;
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "OpenAI gateway initialized");

        Ok(Self { client, base_url })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str, model: &str) -> GatewayError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        StatusCode::NOT_FOUND => {
            GatewayError::ModelNotAvailable(format!("{}: {}", model, message))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<LlmResponse, GatewayError> {
        if !request.model.is_openai() {
            return Err(GatewayError::ModelNotAvailable(format!(
                "provider '{}' is not supported",
                request.model.provider()
            )));
        }

        let body = ChatCompletionRequest {
            model: request.model.name().to_string(),
            messages: convert_messages(request.system_prompt, request.messages),
            tools: request.tools.to_vec(),
        };

        debug!(
            model = %request.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_status_error(status, &text, request.model.name()));
        }

        debug!(bytes = text.len(), "chat completion response");

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", e, text)))?;
        convert_response(parsed)
    }
}
