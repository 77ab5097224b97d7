//! Shared state of the web UI

use super::progress::ActivityFeed;
use super::view::Notice;
use async_trait::async_trait;
use research_application::{
    AgentProgressNotifier, DeepAgent, ReportViewerPort, ResearchSessionUseCase,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Environment variables consulted for keys not entered in the UI
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const COMPOSIO_KEY_ENV: &str = "COMPOSIO_API_KEY";

/// API keys entered in the sidebar or found in the environment
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub composio: Option<String>,
}

impl ApiKeys {
    /// The only place keys are read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            openai: read(OPENAI_KEY_ENV),
            composio: read(COMPOSIO_KEY_ENV),
        }
    }

    /// Overwrite keys with the non-blank values given
    pub fn update(&mut self, openai: &str, composio: &str) {
        if !openai.trim().is_empty() {
            self.openai = Some(openai.trim().to_string());
        }
        if !composio.trim().is_empty() {
            self.composio = Some(composio.trim().to_string());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.openai.is_some() && self.composio.is_some()
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &self.openai.as_ref().map(|_| "***"))
            .field("composio", &self.composio.as_ref().map(|_| "***"))
            .finish()
    }
}

pub type BuildError = Box<dyn std::error::Error + Send + Sync>;

/// Builds the research agent once both API keys are known
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn build(
        &self,
        keys: &ApiKeys,
        progress: Arc<dyn AgentProgressNotifier>,
    ) -> Result<DeepAgent, BuildError>;
}

struct Controller {
    use_case: Arc<ResearchSessionUseCase>,
    /// Keys the agent was built with
    keys: ApiKeys,
}

struct Inner {
    factory: Arc<dyn AgentFactory>,
    report: Arc<dyn ReportViewerPort>,
    expected_questions: usize,
    keys: Mutex<ApiKeys>,
    controller: Mutex<Option<Controller>>,
    notice: Mutex<Option<Notice>>,
    /// Topic and domain last submitted, shown again after a failed start
    draft: Mutex<Option<(String, String)>>,
    feed: Arc<ActivityFeed>,
    busy: AtomicBool,
}

/// Cloneable handle to the UI state (one research session per server)
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl AppState {
    pub fn new(
        factory: Arc<dyn AgentFactory>,
        report: Arc<dyn ReportViewerPort>,
        keys: ApiKeys,
        expected_questions: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                factory,
                report,
                expected_questions,
                keys: Mutex::new(keys),
                controller: Mutex::new(None),
                notice: Mutex::new(None),
                draft: Mutex::new(None),
                feed: Arc::new(ActivityFeed::new()),
                busy: AtomicBool::new(false),
            }),
        }
    }

    pub fn keys(&self) -> ApiKeys {
        lock(&self.inner.keys).clone()
    }

    pub fn update_keys(&self, openai: &str, composio: &str) {
        lock(&self.inner.keys).update(openai, composio);
    }

    pub fn report(&self) -> &Arc<dyn ReportViewerPort> {
        &self.inner.report
    }

    pub fn expected_questions(&self) -> usize {
        self.inner.expected_questions
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.inner.feed
    }

    pub fn set_notice(&self, notice: Notice) {
        *lock(&self.inner.notice) = Some(notice);
    }

    /// Take the pending notice (shown once)
    pub fn take_notice(&self) -> Option<Notice> {
        lock(&self.inner.notice).take()
    }

    pub fn set_draft(&self, topic: &str, domain: &str) {
        *lock(&self.inner.draft) = Some((topic.to_string(), domain.to_string()));
    }

    pub fn draft(&self) -> Option<(String, String)> {
        lock(&self.inner.draft).clone()
    }

    pub fn clear_draft(&self) {
        *lock(&self.inner.draft) = None;
    }

    /// The session controller, if the agent has been built
    pub fn controller(&self) -> Option<Arc<ResearchSessionUseCase>> {
        lock(&self.inner.controller)
            .as_ref()
            .map(|c| Arc::clone(&c.use_case))
    }

    /// The controller for a new run, (re)building the agent when the keys
    /// changed since it was built
    pub async fn controller_for_start(&self) -> Result<Arc<ResearchSessionUseCase>, BuildError> {
        let keys = self.keys();
        if let Some(controller) = lock(&self.inner.controller).as_ref()
            && controller.keys == keys
        {
            return Ok(Arc::clone(&controller.use_case));
        }

        let progress: Arc<dyn AgentProgressNotifier> = self.inner.feed.clone();
        let agent = self.inner.factory.build(&keys, progress).await?;
        let use_case = Arc::new(ResearchSessionUseCase::new(agent));
        *lock(&self.inner.controller) = Some(Controller {
            use_case: Arc::clone(&use_case),
            keys,
        });
        Ok(use_case)
    }

    /// Mark a background run as started; false if one is already running
    pub fn try_begin_run(&self) -> bool {
        !self.inner.busy.swap(true, Ordering::SeqCst)
    }

    pub fn end_run(&self) {
        self.inner.busy.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.inner.busy.load(Ordering::SeqCst)
            || self.controller().is_some_and(|c| c.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_update_ignores_blank() {
        let mut keys = ApiKeys::default();
        keys.update("sk-1", "  ");
        assert_eq!(keys.openai.as_deref(), Some("sk-1"));
        assert!(keys.composio.is_none());
        assert!(!keys.is_complete());

        keys.update("", " ck-1 ");
        assert_eq!(keys.openai.as_deref(), Some("sk-1"));
        assert_eq!(keys.composio.as_deref(), Some("ck-1"));
        assert!(keys.is_complete());
    }

    #[test]
    fn test_keys_from_environment_names() {
        let env = std::collections::HashMap::from([
            (OPENAI_KEY_ENV, " sk-env "),
            (COMPOSIO_KEY_ENV, "   "),
        ]);
        let keys = ApiKeys::from_lookup(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(keys.openai.as_deref(), Some("sk-env"));
        assert!(keys.composio.is_none());
        assert!(!keys.is_complete());
    }

    #[test]
    fn test_keys_debug_is_masked() {
        let keys = ApiKeys {
            openai: Some("sk-secret".to_string()),
            composio: None,
        };
        let debug = format!("{:?}", keys);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }
}
