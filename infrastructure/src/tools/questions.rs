//! Question extraction tool: generate_questions_list

use research_domain::{
    QUESTIONS_TOOL, extract_questions, unescape_newlines,
    tool::{
        entities::{ToolCall, ToolDefinition, ToolParameter},
        value_objects::{ToolError, ToolResult},
    },
};
use std::time::Instant;

/// Get the tool definition for generate_questions_list
pub fn questions_definition() -> ToolDefinition {
    ToolDefinition::new(
        QUESTIONS_TOOL,
        "Generate a list of questions from a numbered list of questions. \
         Pass the numbered list as `q`; returns the questions as a JSON array.",
    )
    .with_parameter(
        ToolParameter::new("q", "The numbered list of questions, one per line", true)
            .with_type("string"),
    )
}

/// Execute the generate_questions_list tool
///
/// Accepts both real newlines and the escaped `\n` form an edited list comes
/// back in.
pub fn execute_questions(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let raw = match call.require_string("q") {
        Ok(q) => q,
        Err(e) => return ToolResult::failure(QUESTIONS_TOOL, ToolError::invalid_argument(e)),
    };

    let questions = extract_questions(&unescape_newlines(raw));
    let count = questions.len();

    match serde_json::to_string(&questions) {
        Ok(output) => ToolResult::success(QUESTIONS_TOOL, output)
            .with_item_count(count)
            .with_duration(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)),
        Err(e) => ToolResult::failure(
            QUESTIONS_TOOL,
            ToolError::execution_failed(format!("Failed to encode questions: {}", e)),
        ),
    }
}
