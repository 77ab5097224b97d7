//! Port to the chat model
//!
//! Each call is self-contained: system prompt, full history and tool schemas
//! travel with it. The agent keeps the conversation, which is what lets a
//! paused run be checkpointed as plain data.

use async_trait::async_trait;
use research_domain::{LlmResponse, Message, Model};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// DNS, TLS or socket failure before a response arrived
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Missing, malformed or rejected API key
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Non-success HTTP status not covered above
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Body that does not parse as a chat completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a Model,
    pub system_prompt: &'a str,
    pub messages: &'a [Message],
    /// Function-calling schemas, see [`ToolSchemaPort`](super::tool_schema::ToolSchemaPort)
    pub tools: &'a [serde_json::Value],
}

#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// The model's next turn for this conversation
    async fn chat(&self, request: ChatRequest<'_>) -> Result<LlmResponse, GatewayError>;
}
