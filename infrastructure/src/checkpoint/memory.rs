//! In-memory checkpoint store

use research_application::ports::checkpoint::{Checkpoint, CheckpointStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Keeps checkpoints for the lifetime of the process, keyed by thread id
#[derive(Default)]
pub struct MemoryCheckpointStore {
    threads: Mutex<HashMap<String, Checkpoint>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Checkpoint>> {
        self.threads.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn save(&self, thread_id: &str, checkpoint: Checkpoint) {
        debug!(
            thread_id,
            messages = checkpoint.messages.len(),
            pending = checkpoint.pending.len(),
            "Saving checkpoint"
        );
        self.lock().insert(thread_id.to_string(), checkpoint);
    }

    fn load(&self, thread_id: &str) -> Option<Checkpoint> {
        self.lock().get(thread_id).cloned()
    }

    fn delete(&self, thread_id: &str) {
        if self.lock().remove(thread_id).is_some() {
            debug!(thread_id, "Deleted checkpoint");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_domain::{Message, QUESTIONS_TOOL, ToolCall};

    fn checkpoint() -> Checkpoint {
        Checkpoint::head(
            vec![Message::user("Topic: RL, Domain: Tech")],
            vec![ToolCall::new(QUESTIONS_TOOL).with_arg("q", "1. A?")],
        )
    }

    #[test]
    fn test_save_load_delete() {
        let store = MemoryCheckpointStore::new();
        assert!(store.load("t1").is_none());

        store.save("t1", checkpoint());
        assert_eq!(store.load("t1"), Some(checkpoint()));
        assert_eq!(store.len(), 1);

        store.delete("t1");
        assert!(store.load("t1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_threads_are_isolated() {
        let store = MemoryCheckpointStore::new();
        store.save("t1", checkpoint());

        let mut other = checkpoint();
        other.pending.clear();
        store.save("t2", other.clone());

        assert_eq!(store.load("t1").unwrap().pending.len(), 1);
        assert_eq!(store.load("t2"), Some(other));

        store.delete("t1");
        assert!(store.load("t2").is_some());
    }

    #[test]
    fn test_save_overwrites() {
        let store = MemoryCheckpointStore::new();
        store.save("t1", checkpoint());

        let mut updated = checkpoint();
        updated.messages.push(Message::assistant("ok"));
        store.save("t1", updated);

        assert_eq!(store.load("t1").unwrap().messages.len(), 2);
    }
}
