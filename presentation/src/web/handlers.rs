//! HTTP handlers for the research UI
//!
//! Every POST redirects back to `/`. Agent runs happen in background tasks;
//! while one is in flight the index page shows the running view and reloads
//! itself until the session reaches its next phase.

use super::state::AppState;
use super::view::{
    DEFAULT_DOMAIN, DEFAULT_TOPIC, KeyStatus, MainView, Notice, Page, count_warning, render_page,
};
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use research_application::{ResearchError, ResearchSessionUseCase};
use research_domain::{
    ResearchPhase, ResearchRequest, ResearchSession, numbered_count, unescape_newlines,
};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct KeysForm {
    #[serde(default)]
    pub composio_key: String,
    #[serde(default)]
    pub openai_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ResearchForm {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub questions: String,
}

fn home() -> Redirect {
    Redirect::to("/")
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&build_page(&state)))
}

fn build_page(state: &AppState) -> Page {
    let keys = state.keys();
    let status = KeyStatus {
        composio: keys.composio.is_some(),
        openai: keys.openai.is_some(),
    };
    let notice = state.take_notice();

    if !keys.is_complete() {
        return Page {
            keys: status,
            notice,
            run_error: None,
            main: MainView::Locked,
        };
    }

    if state.is_running() {
        return Page {
            keys: status,
            notice,
            run_error: None,
            main: MainView::Running {
                activity: state.feed().recent(),
            },
        };
    }

    let session = state
        .controller()
        .map(|c| c.snapshot())
        .unwrap_or_default();

    Page {
        keys: status,
        notice,
        run_error: session.last_error().map(str::to_string),
        main: main_view(state, &session),
    }
}

fn main_view(state: &AppState, session: &ResearchSession) -> MainView {
    match session.phase() {
        ResearchPhase::Input => {
            let (topic, domain) = state
                .draft()
                .unwrap_or_else(|| (DEFAULT_TOPIC.to_string(), DEFAULT_DOMAIN.to_string()));
            MainView::Input { topic, domain }
        }
        ResearchPhase::Interrupt => MainView::Review {
            questions: unescape_newlines(session.interrupt_q()),
        },
        ResearchPhase::Edit => {
            let questions = unescape_newlines(session.interrupt_q());
            let expected = state.expected_questions();
            MainView::Edit {
                warning: count_warning(numbered_count(&questions), expected),
                questions,
                expected,
            }
        }
        ResearchPhase::Completed => {
            let html = session.html_content();
            let summary = state.report().executive_summary(html);
            MainView::Completed {
                summary: if summary.is_empty() {
                    html.to_string()
                } else {
                    summary
                },
            }
        }
    }
}

pub async fn save_keys(State(state): State<AppState>, Form(form): Form<KeysForm>) -> Redirect {
    state.update_keys(&form.openai_key, &form.composio_key);
    if state.keys().is_complete() {
        info!("API keys updated");
        state.set_notice(Notice::success("API keys saved"));
    } else {
        state.set_notice(Notice::error("Both API keys are required"));
    }
    home()
}

pub async fn research(State(state): State<AppState>, Form(form): Form<ResearchForm>) -> Redirect {
    state.set_draft(&form.topic, &form.domain);

    if !state.keys().is_complete() {
        state.set_notice(Notice::error("Both API keys are required"));
        return home();
    }
    if ResearchRequest::try_new(&form.topic, &form.domain).is_err() {
        state.set_notice(Notice::error(ResearchError::MissingInput.to_string()));
        return home();
    }
    if !state.try_begin_run() {
        state.set_notice(Notice::error(ResearchError::Busy.to_string()));
        return home();
    }

    state.feed().clear();
    let task_state = state.clone();
    spawn_run(state, async move {
        let use_case = match task_state.controller_for_start().await {
            Ok(use_case) => use_case,
            Err(e) => {
                warn!(error = %e, "Failed to build research agent");
                task_state.set_notice(Notice::error(format!("Could not start the agent: {}", e)));
                return Ok(());
            }
        };
        use_case.start(&form.topic, &form.domain).await
    });
    home()
}

pub async fn approve(State(state): State<AppState>) -> Redirect {
    if let Some(use_case) = begin_agent_action(&state) {
        spawn_run(state, async move { use_case.approve().await });
    }
    home()
}

pub async fn submit_edit(State(state): State<AppState>, Form(form): Form<EditForm>) -> Redirect {
    if let Some(use_case) = begin_agent_action(&state) {
        spawn_run(state, async move { use_case.submit_edit(&form.questions).await });
    }
    home()
}

pub async fn begin_edit(State(state): State<AppState>) -> Redirect {
    if let Some(use_case) = state.controller()
        && let Err(e) = use_case.begin_edit()
    {
        state.set_notice(Notice::error(e.to_string()));
    }
    home()
}

pub async fn back_to_review(State(state): State<AppState>) -> Redirect {
    if let Some(use_case) = state.controller()
        && let Err(e) = use_case.back_to_review()
    {
        state.set_notice(Notice::error(e.to_string()));
    }
    home()
}

/// Write the report, serve it and open it in a browser tab
pub async fn open_report(State(state): State<AppState>) -> Redirect {
    let html = state
        .controller()
        .map(|c| c.snapshot().html_content().to_string())
        .unwrap_or_default();
    if html.is_empty() {
        state.set_notice(Notice::error("No report is available yet"));
        return home();
    }

    match state.report().open_report(&html).await {
        Ok(link) if link.server_started => {
            state.set_notice(Notice::success(format!("Report opened at {}", link.url)));
        }
        Ok(link) => {
            state.set_notice(Notice::success(format!(
                "Report server already running, opened {}",
                link.url
            )));
        }
        Err(e) => {
            warn!(error = %e, "Failed to open report");
            state.set_notice(Notice::error(format!("Could not open the report: {}", e)));
        }
    }
    home()
}

pub async fn restart(State(state): State<AppState>) -> Redirect {
    if let Some(use_case) = state.controller() {
        use_case.restart();
    }
    state.feed().clear();
    state.clear_draft();
    home()
}

/// The controller for approve/submit, with the busy flag taken
fn begin_agent_action(state: &AppState) -> Option<Arc<ResearchSessionUseCase>> {
    let Some(use_case) = state.controller() else {
        state.set_notice(Notice::error("No research session is in progress"));
        return None;
    };
    if !state.try_begin_run() {
        state.set_notice(Notice::error(ResearchError::Busy.to_string()));
        return None;
    }
    state.feed().clear();
    Some(use_case)
}

fn spawn_run<F>(state: AppState, run: F)
where
    F: Future<Output = Result<(), ResearchError>> + Send + 'static,
{
    tokio::spawn(async move {
        match run.await {
            Ok(()) => {}
            // Already recorded on the session and shown as the run error
            Err(ResearchError::Agent(_) | ResearchError::EmptyInterrupt) => {}
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
        state.end_run();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::router;
    use crate::web::state::{AgentFactory, ApiKeys, BuildError};
    use async_trait::async_trait;
    use research_application::{
        AgentProgressNotifier, ChatRequest, Checkpoint, CheckpointStore, DeepAgent, GatewayError,
        LlmGateway, ReportLink, ReportViewerPort, ToolExecutorPort, ToolSchemaPort,
    };
    use research_domain::{
        ContentBlock, InterruptPolicy, LlmResponse, Model, QUESTIONS_TOOL, ToolCall,
        ToolDefinition, ToolParameter, ToolResult, ToolSpec,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    const REPORT: &str =
        r#"<section id="executive-summary"><p>Short</p></section><section><p>Details</p></section>"#;

    struct ScriptedGateway(Mutex<VecDeque<Option<&'static str>>>);

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn chat(&self, _request: ChatRequest<'_>) -> Result<LlmResponse, GatewayError> {
            match self.0.lock().unwrap().pop_front() {
                Some(Some(html)) => Ok(LlmResponse::from_text(html)),
                Some(None) => Ok(LlmResponse {
                    content: vec![ContentBlock::ToolUse {
                        id: "call_q".to_string(),
                        name: QUESTIONS_TOOL.to_string(),
                        input: HashMap::from([(
                            "q".to_string(),
                            serde_json::json!("1. Is A?\\n2. Is B?"),
                        )]),
                    }],
                    stop_reason: None,
                    model: None,
                }),
                None => Err(GatewayError::Timeout),
            }
        }
    }

    struct QuestionTool(ToolSpec);

    #[async_trait]
    impl ToolExecutorPort for QuestionTool {
        fn tool_spec(&self) -> &ToolSpec {
            &self.0
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            ToolResult::success(&call.tool_name, "[]")
        }
    }

    struct NameSchema;

    impl ToolSchemaPort for NameSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({ "name": tool.name })
        }
    }

    #[derive(Default)]
    struct Checkpoints(Mutex<HashMap<String, Checkpoint>>);

    impl CheckpointStore for Checkpoints {
        fn save(&self, thread_id: &str, checkpoint: Checkpoint) {
            self.0.lock().unwrap().insert(thread_id.into(), checkpoint);
        }
        fn load(&self, thread_id: &str) -> Option<Checkpoint> {
            self.0.lock().unwrap().get(thread_id).cloned()
        }
        fn delete(&self, thread_id: &str) {
            self.0.lock().unwrap().remove(thread_id);
        }
    }

    /// Questions first, then the report
    struct ScriptedFactory;

    #[async_trait]
    impl AgentFactory for ScriptedFactory {
        async fn build(
            &self,
            _keys: &ApiKeys,
            progress: Arc<dyn AgentProgressNotifier>,
        ) -> Result<DeepAgent, BuildError> {
            let gateway = ScriptedGateway(Mutex::new(VecDeque::from([None, Some(REPORT)])));
            let tools = QuestionTool(ToolSpec::new().register(
                ToolDefinition::new(QUESTIONS_TOOL, "Extract questions")
                    .with_parameter(ToolParameter::new("q", "Numbered list", true)),
            ));
            Ok(DeepAgent::new(
                Arc::new(gateway),
                Arc::new(tools),
                Arc::new(NameSchema),
                Arc::new(Checkpoints::default()),
                Model::default(),
            )
            .with_interrupt_policy(InterruptPolicy::research_default())
            .with_progress(progress))
        }
    }

    #[derive(Default)]
    struct RecordingReport(Mutex<Vec<String>>);

    #[async_trait]
    impl ReportViewerPort for RecordingReport {
        fn executive_summary(&self, html: &str) -> String {
            html.split("</section>")
                .next()
                .filter(|s| s.contains("executive-summary"))
                .map(|s| format!("{}</section>", s))
                .unwrap_or_default()
        }

        async fn open_report(&self, html: &str) -> Result<ReportLink, String> {
            self.0.lock().unwrap().push(html.to_string());
            Ok(ReportLink {
                url: "http://localhost:8000/temp.html".to_string(),
                server_started: true,
            })
        }
    }

    fn keys() -> ApiKeys {
        ApiKeys {
            openai: Some("sk".to_string()),
            composio: Some("ck".to_string()),
        }
    }

    struct TestApp {
        base: String,
        client: reqwest::Client,
        report: Arc<RecordingReport>,
    }

    impl TestApp {
        async fn start(keys: ApiKeys) -> Self {
            let report = Arc::new(RecordingReport::default());
            let state = AppState::new(Arc::new(ScriptedFactory), report.clone(), keys, 5);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router(state)).await.unwrap();
            });
            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap();
            Self {
                base: format!("http://{}", addr),
                client,
                report,
            }
        }

        async fn page(&self) -> String {
            self.client
                .get(&self.base)
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        }

        async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
            let response = self
                .client
                .post(format!("{}{}", self.base, path))
                .form(form)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
            response
        }

        /// Reload until the running view is gone
        async fn settled_page(&self) -> String {
            for _ in 0..100 {
                let page = self.page().await;
                if !page.contains("Running deep research agent") {
                    return page;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            panic!("agent run did not finish");
        }
    }

    #[tokio::test]
    async fn test_locked_until_keys_saved() {
        let app = TestApp::start(ApiKeys::default()).await;
        assert!(app.page().await.contains("API keys in the sidebar to start"));

        app.post("/keys", &[("composio_key", "ck"), ("openai_key", "")])
            .await;
        let page = app.page().await;
        assert!(page.contains("Both API keys are required"));

        app.post("/keys", &[("composio_key", ""), ("openai_key", "sk")])
            .await;
        let page = app.page().await;
        assert!(page.contains("API keys saved"));
        assert!(page.contains(r#"action="/research""#));
        assert!(page.contains(DEFAULT_TOPIC));
    }

    #[tokio::test]
    async fn test_blank_topic_shows_error() {
        let app = TestApp::start(keys()).await;
        app.post("/research", &[("topic", " "), ("domain", "Tech")])
            .await;
        let page = app.page().await;
        assert!(page.contains("Please enter both a topic and a domain"));
        assert!(page.contains(r#"action="/research""#));
    }

    #[tokio::test]
    async fn test_research_approve_and_report() {
        let app = TestApp::start(keys()).await;

        app.post("/research", &[("topic", "RL"), ("domain", "Tech")])
            .await;
        let page = app.settled_page().await;
        assert!(page.contains("readonly>1. Is A?\n2. Is B?</textarea>"));

        app.post("/approve", &[]).await;
        let page = app.settled_page().await;
        assert!(page.contains("Research Completed"));
        assert!(page.contains("<p>Short</p>"));
        assert!(!page.contains("<p>Details</p>"));

        app.post("/report", &[]).await;
        assert!(app.page().await.contains("Report opened at http://localhost:8000/temp.html"));
        assert_eq!(app.report.0.lock().unwrap().as_slice(), [REPORT]);

        app.post("/restart", &[]).await;
        assert!(app.page().await.contains(r#"action="/research""#));
    }

    #[tokio::test]
    async fn test_edit_view_warns_on_count() {
        let app = TestApp::start(keys()).await;

        app.post("/research", &[("topic", "RL"), ("domain", "Tech")])
            .await;
        app.settled_page().await;

        app.post("/edit", &[]).await;
        let page = app.page().await;
        assert!(page.contains("Edit Research Questions"));
        assert!(page.contains("Found 2 numbered question(s); the agent expects 5."));

        app.post("/back", &[]).await;
        assert!(app.page().await.contains("Review Research Questions"));

        app.post("/edit", &[]).await;
        app.post("/submit", &[("questions", "1. Is C?\n2. Is D?")])
            .await;
        assert!(app.settled_page().await.contains("Research Completed"));
    }

    #[tokio::test]
    async fn test_report_before_completion() {
        let app = TestApp::start(keys()).await;
        app.post("/report", &[]).await;
        assert!(app.page().await.contains("No report is available yet"));
        assert!(app.report.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_without_session() {
        let app = TestApp::start(keys()).await;
        app.post("/approve", &[]).await;
        assert!(app.page().await.contains("No research session is in progress"));
    }
}
