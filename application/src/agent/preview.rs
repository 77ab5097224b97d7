//! Short previews of tool arguments for progress output.

use research_domain::tool::entities::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`query`, `q`, `description`, `title`) first,
/// then falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["query", "q", "description", "title"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return truncate_preview(s, 60);
        }
    }
    // Fallback: first string value
    for value in call.arguments.values() {
        if let Some(s) = value.as_str() {
            return truncate_preview(s, 60);
        }
    }
    String::new()
}

/// Single line of at most `max_len` characters
pub(crate) fn truncate_preview(s: &str, max_len: usize) -> String {
    let single_line = s.replace("\\n", " ").replace('\n', " ");
    if single_line.chars().count() <= max_len {
        single_line
    } else {
        let truncated: String = single_line.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
