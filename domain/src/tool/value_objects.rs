//! Outcome of a tool call
//!
//! Every tool execution produces a [`ToolResult`]. Failures are values, not
//! errors: the agent feeds them back to the model so it can correct itself
//! (wrong arguments, unknown tool) instead of aborting the research run.

use serde::{Deserialize, Serialize};

/// Failure category reported back to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    /// Missing or malformed arguments; the model can retry
    InvalidArgument,
    /// No tool (or sub-agent) with that name
    NotFound,
    /// HTTP failure or a remote tool reporting `successful: false`
    ExecutionFailed,
    /// Rejected by a human at an interrupt
    Rejected,
    Timeout,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::ExecutionFailed => "EXECUTION_FAILED",
            ToolErrorKind::Rejected => "REJECTED",
            ToolErrorKind::Timeout => "TIMEOUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    /// Underlying error text, when it adds something to `message`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, format!("Unknown tool: {}", name.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArgument, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionFailed, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Rejected, message)
    }

    pub fn timeout(tool: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, format!("{} timed out", tool.into()))
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        match &self.cause {
            Some(cause) => write!(f, ": {}", cause),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ToolError {}

/// Timing and size of an execution, for logs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Extracted questions, search hits, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    /// Output text or the failure
    pub outcome: Result<String, ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: Ok(output.into()),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: Err(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_item_count(mut self, count: usize) -> Self {
        self.metadata.item_count = Some(count);
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.outcome.as_ref().err()
    }

    /// Content of the tool message sent back to the model
    pub fn to_model_content(&self) -> String {
        match &self.outcome {
            Ok(output) => output.clone(),
            Err(error) => format!("Error: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToolError::execution_failed("Sub-agent 'research-answer-agent' failed")
            .with_cause("Timeout");
        assert_eq!(
            err.to_string(),
            "[EXECUTION_FAILED] Sub-agent 'research-answer-agent' failed: Timeout"
        );
        assert_eq!(
            ToolError::not_found("TAVILY_SEARCH").to_string(),
            "[NOT_FOUND] Unknown tool: TAVILY_SEARCH"
        );
    }

    #[test]
    fn test_kind_serializes_as_code() {
        let json = serde_json::to_value(ToolError::timeout("TAVILY")).unwrap();
        assert_eq!(json["kind"], "TIMEOUT");
        assert!(json.get("cause").is_none());
    }

    #[test]
    fn test_success_content() {
        let result = ToolResult::success("generate_questions_list", "[\"a\"]").with_item_count(1);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("[\"a\"]"));
        assert!(result.error().is_none());
        assert_eq!(result.metadata.item_count, Some(1));
        assert_eq!(result.to_model_content(), "[\"a\"]");
    }

    #[test]
    fn test_failure_content() {
        let result = ToolResult::failure("task", ToolError::rejected("User rejected the call"));

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::Rejected);
        assert_eq!(
            result.to_model_content(),
            "Error: [REJECTED] User rejected the call"
        );
    }
}
