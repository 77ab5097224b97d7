//! Server-rendered HTML for the research UI
//!
//! Everything here is a pure function of [`Page`], so views can be tested
//! without a running server.

use std::fmt::Write;

pub const PAGE_TITLE: &str = "AI Domain Deep Research Agent";
pub const DEFAULT_TOPIC: &str = "History of Reinforcement Learning";
pub const DEFAULT_DOMAIN: &str = "Technology";

/// Seconds between reloads while the agent runs
const REFRESH_SECONDS: u32 = 2;

pub const HELP_STEPS: [&str; 7] = [
    "Enter <b>Composio</b> and <b>OpenAI</b> API keys.",
    "Provide <b>Topic</b> and <b>Domain</b>.",
    "Click <b>Research</b>.",
    "When interrupted, <b>Approve</b> or <b>Edit</b> the questions.",
    "After completion, view the <b>Executive Summary</b>.",
    "Click <b>View full report</b> to open the complete HTML in a new tab.",
    "Use <b>Restart</b> to begin a new session.",
];

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; display: flex; min-height: 100vh; }
aside { width: 300px; padding: 1.5rem; background: #f0f2f6; box-sizing: border-box; }
main { flex: 1; padding: 2rem 3rem; max-width: 960px; }
label { display: block; margin: .75rem 0 .25rem; font-size: .9rem; }
input[type=text], input[type=password], textarea { width: 100%; box-sizing: border-box; padding: .5rem; font: inherit; }
textarea { min-height: 16rem; }
button { margin-top: .75rem; padding: .5rem 1rem; font: inherit; cursor: pointer; }
button.primary { background: #ff4b4b; color: #fff; border: none; border-radius: 4px; }
.row { display: flex; gap: 1rem; }
.row > * { flex: 1; }
.notice { padding: .75rem 1rem; border-radius: 4px; margin: 1rem 0; }
.notice.info { background: #e8f0fe; }
.notice.success { background: #e6f4ea; }
.notice.warning { background: #fff8e1; }
.notice.error { background: #fdecea; }
"#;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// One-shot message shown above the main view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Which API keys are known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStatus {
    pub composio: bool,
    pub openai: bool,
}

impl KeyStatus {
    pub fn ready(&self) -> bool {
        self.composio && self.openai
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainView {
    /// API keys missing
    Locked,
    Running { activity: Vec<String> },
    Input { topic: String, domain: String },
    Review { questions: String },
    Edit {
        questions: String,
        expected: usize,
        warning: Option<String>,
    },
    /// `summary` is trusted report HTML
    Completed { summary: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub keys: KeyStatus,
    pub notice: Option<Notice>,
    /// Failure of the last agent run
    pub run_error: Option<String>,
    pub main: MainView,
}

/// Warning shown in the edit view when the list is not numbered as asked
pub fn count_warning(numbered: usize, expected: usize) -> Option<String> {
    (numbered != expected).then(|| {
        format!(
            "Found {} numbered question(s); the agent expects {}. You can still submit.",
            numbered, expected
        )
    })
}

pub fn render_page(page: &Page) -> String {
    let refresh = match page.main {
        MainView::Running { .. } => {
            format!(r#"<meta http-equiv="refresh" content="{}">"#, REFRESH_SECONDS)
        }
        _ => String::new(),
    };

    let mut main = String::new();
    if let Some(notice) = &page.notice {
        main.push_str(&notice_html(notice));
    }
    if let Some(error) = &page.run_error {
        main.push_str(&notice_html(&Notice::error(format!("Research failed: {}", error))));
    }
    main.push_str(&main_html(&page.main));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
{refresh}
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<aside>{sidebar}</aside>
<main>{main}</main>
</body>
</html>"#,
        title = PAGE_TITLE,
        sidebar = sidebar_html(page.keys),
    )
}

fn notice_html(notice: &Notice) -> String {
    format!(
        r#"<div class="notice {}">{}</div>"#,
        notice.level.class(),
        escape_html(&notice.text)
    )
}

fn sidebar_html(keys: KeyStatus) -> String {
    let placeholder = |set: bool| if set { "(set)" } else { "" };
    let status = if keys.ready() {
        notice_html(&Notice::success("API keys set. You can use the app now."))
    } else {
        notice_html(&Notice {
            level: NoticeLevel::Warning,
            text: "Enter both API keys above to enable the agent.".to_string(),
        })
    };

    let mut steps = String::new();
    for step in HELP_STEPS {
        let _ = write!(steps, "<li>{}</li>", step);
    }

    format!(
        r#"<h2>🔑 API Keys</h2>
<form method="post" action="/keys">
<label for="composio_key">Composio API Key</label>
<input type="password" id="composio_key" name="composio_key" placeholder="{composio}" title="Used for Tavily / Perplexity / Google Docs tools">
<label for="openai_key">OpenAI API Key</label>
<input type="password" id="openai_key" name="openai_key" placeholder="{openai}" title="Used for the research model">
<button type="submit">Save keys</button>
</form>
{status}
<hr>
<h2>📋 How to use</h2>
<ol>{steps}</ol>"#,
        composio = placeholder(keys.composio),
        openai = placeholder(keys.openai),
    )
}

fn button_form(action: &str, label: &str, primary: bool) -> String {
    format!(
        r#"<form method="post" action="{}"><button type="submit"{}>{}</button></form>"#,
        action,
        if primary { r#" class="primary""# } else { "" },
        label
    )
}

fn main_html(view: &MainView) -> String {
    match view {
        MainView::Locked => format!(
            "<h1>{}</h1><p>Enter your <b>Composio</b> and <b>OpenAI</b> API keys in the sidebar to start.</p>",
            PAGE_TITLE
        ),
        MainView::Running { activity } => {
            let mut items = String::new();
            for line in activity {
                let _ = write!(items, "<li>{}</li>", escape_html(line));
            }
            format!(
                "<h1>⏳ Running deep research agent...</h1><ul>{}</ul>{}",
                items,
                button_form("/restart", "🔄 Restart", false)
            )
        }
        MainView::Input { topic, domain } => format!(
            r#"<h1>{title}</h1>
<form method="post" action="/research">
<div class="row">
<div><label for="topic">Topic</label><input type="text" id="topic" name="topic" value="{topic}"></div>
<div><label for="domain">Domain</label><input type="text" id="domain" name="domain" value="{domain}"></div>
</div>
<button type="submit" class="primary">🚀 Research</button>
</form>"#,
            title = PAGE_TITLE,
            topic = escape_html(topic),
            domain = escape_html(domain),
        ),
        MainView::Review { questions } => format!(
            r#"<h1>👀 Review Research Questions (Human-in-the-loop)</h1>
<label for="questions">Generated research questions (read-only):</label>
<textarea id="questions" readonly>{}</textarea>
<div class="row">{}{}</div>"#,
            escape_html(questions),
            button_form("/approve", "✅ Approve", true),
            button_form("/edit", "✏️ Edit questions", false),
        ),
        MainView::Edit {
            questions,
            expected,
            warning,
        } => {
            let warning = warning
                .as_deref()
                .map(|w| {
                    notice_html(&Notice {
                        level: NoticeLevel::Warning,
                        text: w.to_string(),
                    })
                })
                .unwrap_or_default();
            format!(
                r#"<h1>✏️ Edit Research Questions</h1>
{warning}
<form method="post" action="/submit">
<label for="questions">Edit questions (keep them numbered 1–{expected}):</label>
<textarea id="questions" name="questions">{questions}</textarea>
<button type="submit" class="primary">✅ Submit edited</button>
</form>
{back}"#,
                questions = escape_html(questions),
                back = button_form("/back", "⬅️ Back to review", false),
            )
        }
        MainView::Completed { summary } => format!(
            r#"<h1>✅ Research Completed</h1>
<h3>Executive Summary</h3>
<div class="summary">{}</div>
<hr>
{}{}"#,
            summary,
            button_form("/report", "📄 View full report", true),
            button_form("/restart", "🔄 Restart", false),
        ),
    }
}
