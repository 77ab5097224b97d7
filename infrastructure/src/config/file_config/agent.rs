//! `[agent]` section
//!
//! ```toml
//! [agent]
//! max_iterations = 50
//! subagent_max_iterations = 25
//! expected_questions = 5
//! ```

use research_application::AgentLimits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Model calls per invoke or resume of the head researcher
    pub max_iterations: usize,
    /// Model calls per delegated task
    pub subagent_max_iterations: usize,
    /// Questions drafted for review; the edit view warns on a different count
    pub expected_questions: usize,
}

impl FileAgentConfig {
    pub fn limits(&self) -> AgentLimits {
        AgentLimits {
            max_iterations: self.max_iterations,
            subagent_max_iterations: self.subagent_max_iterations,
        }
    }
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let limits = AgentLimits::default();
        Self {
            max_iterations: limits.max_iterations,
            subagent_max_iterations: limits.subagent_max_iterations,
            expected_questions: 5,
        }
    }
}
