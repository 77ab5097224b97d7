//! Question list handling
//!
//! The model writes its research questions as one numbered list. Tool
//! arguments carry line breaks as the two-character sequence `\n`, so text
//! shown to a human is unescaped and edited text is escaped again before it
//! goes back to the agent.

/// Split a numbered list into questions.
///
/// Lines are trimmed and empty lines dropped. Numbering prefixes are kept.
pub fn extract_questions(q: &str) -> Vec<String> {
    q.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn literal `\n` sequences into real newlines for display.
pub fn unescape_newlines(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Normalise line endings and encode newlines as literal `\n`.
pub fn escape_newlines(edited: &str) -> String {
    edited.replace("\r\n", "\n").replace('\n', "\\n")
}

/// Count lines starting with a `N.` or `N)` prefix.
pub fn numbered_count(q: &str) -> usize {
    q.lines().filter(|line| is_numbered(line.trim_start())).count()
}

fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')'))
}
