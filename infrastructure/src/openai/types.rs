//! Wire types for the OpenAI chat completions API and their conversion to
//! and from domain types.

use research_application::ports::llm_gateway::GatewayError;
use research_domain::{ContentBlock, LlmResponse, Message, Role, StopReason, ToolCall};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

// ─── Request ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: WireFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

// ─── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

// ─── Domain → OpenAI ─────────────────────────────────────────────

fn convert_tool_call(call: &ToolCall) -> WireToolCall {
    WireToolCall {
        id: call.native_id.clone().unwrap_or_default(),
        kind: function_type(),
        function: WireFunction {
            name: call.tool_name.clone(),
            arguments: call.arguments_json().to_string(),
        },
    }
}

/// Convert the system prompt and conversation to wire messages.
pub fn convert_messages(system_prompt: &str, messages: &[Message]) -> Vec<WireMessage> {
    let system = (!system_prompt.is_empty()).then(|| WireMessage {
        role: Role::System.as_str().to_string(),
        content: Some(system_prompt.to_string()),
        tool_calls: Vec::new(),
        tool_call_id: None,
    });

    system
        .into_iter()
        .chain(messages.iter().map(|m| {
            let content = if m.role == Role::Assistant && m.content.is_empty() && m.has_tool_calls()
            {
                None
            } else {
                Some(m.content.clone())
            };
            WireMessage {
                role: m.role.as_str().to_string(),
                content,
                tool_calls: m.tool_calls.iter().map(convert_tool_call).collect(),
                tool_call_id: m.tool_call_id.clone(),
            }
        }))
        .collect()
}

// ─── OpenAI → Domain ─────────────────────────────────────────────

fn parse_arguments(call: &WireToolCall) -> HashMap<String, serde_json::Value> {
    if call.function.arguments.trim().is_empty() {
        return HashMap::new();
    }
    match serde_json::from_str::<serde_json::Value>(&call.function.arguments) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
        Ok(other) => {
            warn!(tool = %call.function.name, "Tool arguments are not an object: {}", other);
            HashMap::new()
        }
        Err(e) => {
            warn!(tool = %call.function.name, error = %e, "Tool arguments are not valid JSON");
            HashMap::new()
        }
    }
}

/// Convert the first choice of a completion to a domain response.
pub fn convert_response(response: ChatCompletionResponse) -> Result<LlmResponse, GatewayError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
        content.push(ContentBlock::Text(text));
    }
    for call in &choice.message.tool_calls {
        content.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.function.name.clone(),
            input: parse_arguments(call),
        });
    }

    Ok(LlmResponse {
        content,
        stop_reason: choice
            .finish_reason
            .as_deref()
            .map(StopReason::from_finish_reason),
        model: response.model,
    })
}
