//! Progress reporting for agent runs behind the web UI

use research_application::AgentProgressNotifier;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Number of activity lines kept for the running view
const FEED_CAPACITY: usize = 8;

/// Logs agent progress and keeps the latest lines for display
#[derive(Default)]
pub struct ActivityFeed {
    recent: Mutex<VecDeque<String>>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest activity, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, line: String) {
        let mut recent = self.lock();
        if recent.len() == FEED_CAPACITY {
            recent.pop_front();
        }
        recent.push_back(line);
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.recent.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AgentProgressNotifier for ActivityFeed {
    fn on_model_call(&self, iteration: usize) {
        debug!(iteration, "Calling model");
        self.push(format!("Thinking (step {})", iteration + 1));
    }

    fn on_tool_call(&self, tool_name: &str, args_preview: &str) {
        info!(tool = tool_name, args = args_preview, "Tool call");
        if args_preview.is_empty() {
            self.push(format!("Running {}", tool_name));
        } else {
            self.push(format!("Running {}: {}", tool_name, args_preview));
        }
    }

    fn on_tool_result(&self, tool_name: &str, success: bool) {
        if success {
            debug!(tool = tool_name, "Tool succeeded");
        } else {
            info!(tool = tool_name, "Tool failed");
            self.push(format!("{} failed", tool_name));
        }
    }

    fn on_subagent_start(&self, name: &str, task: &str) {
        info!(subagent = name, task, "Delegating");
        self.push(format!("Delegated to {}", name));
    }

    fn on_subagent_end(&self, name: &str, success: bool) {
        info!(subagent = name, success, "Sub-agent finished");
        self.push(format!(
            "{} {}",
            name,
            if success { "finished" } else { "failed" }
        ));
    }

    fn on_interrupt(&self, tool_name: &str) {
        info!(tool = tool_name, "Waiting for human review");
        self.push("Questions ready for review".to_string());
    }
}
