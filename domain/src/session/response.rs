//! One model turn: text and native tool calls.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(String),
    /// Native tool call; `id` is echoed back on the tool message
    ToolUse {
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    /// Output cut at the token limit
    MaxTokens,
    Other(String),
}

impl StopReason {
    /// Map a chat-completions `finish_reason`
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// Parsed model reply.
///
/// ```
/// use research_domain::LlmResponse;
///
/// let reply = LlmResponse::from_text("<html></html>");
/// assert_eq!(reply.text_content(), "<html></html>");
/// assert!(!reply.has_tool_calls());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    /// Model id echoed by the API
    pub model: Option<String>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// All text blocks, concatenated
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for block in &self.content {
            if let ContentBlock::Text(t) = block {
                text.push_str(t);
            }
        }
        text
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        let mut calls = Vec::new();
        for block in &self.content {
            if let ContentBlock::ToolUse { id, name, input } = block {
                calls.push(ToolCall::from_native(id, name, input.clone()));
            }
        }
        calls
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }
}
