//! Checkpoint port
//!
//! Stores the state of a paused agent run, keyed by thread id.

use research_domain::{Message, ToolCall};
use serde::{Deserialize, Serialize};

/// Saved state of a paused thread
///
/// A pause happens either in the head researcher's own turn (`delegated` is
/// empty and no call of `pending` has run) or inside one or more sub-agents
/// (`pending` holds the `task` calls still waiting on them, in the same order
/// as `delegated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Head conversation, ending with the paused assistant turn and the
    /// results of that turn's calls that already finished
    pub messages: Vec<Message>,
    /// Calls of that turn still waiting for a result
    pub pending: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegated: Vec<DelegatedPause>,
}

impl Checkpoint {
    /// Pause in the head researcher's own turn
    pub fn head(messages: Vec<Message>, pending: Vec<ToolCall>) -> Self {
        Self {
            messages,
            pending,
            delegated: Vec::new(),
        }
    }
}

/// A sub-agent stopped on a call that needs human review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegatedPause {
    /// Native id of the head researcher's `task` call
    pub task_call_id: String,
    pub subagent: String,
    /// Sub-agent conversation, ending with its paused assistant turn
    pub messages: Vec<Message>,
    /// Every call of that turn; none has run yet
    pub pending: Vec<ToolCall>,
}

/// Port for checkpoint storage
pub trait CheckpointStore: Send + Sync {
    /// Save (or replace) the checkpoint for a thread
    fn save(&self, thread_id: &str, checkpoint: Checkpoint);

    fn load(&self, thread_id: &str) -> Option<Checkpoint>;

    fn delete(&self, thread_id: &str);
}
