//! Conversation history store collaborator

use crate::util::errors::SheetMateResult;
use crate::util::types::Message;
use std::sync::{Mutex, MutexGuard};

/// Most recent entries kept on save; older turns are dropped.
pub const HISTORY_CAP: usize = 50;

pub trait HistoryStore: Send + Sync {
    fn get_messages(&self) -> SheetMateResult<Vec<Message>>;
    /// Persists at most the most recent [`HISTORY_CAP`] entries.
    fn save_messages(&self, messages: &[Message]) -> SheetMateResult<()>;
    fn clear_messages(&self) -> SheetMateResult<()>;
}

/// Keep only the most recent [`HISTORY_CAP`] entries. Shared by store
/// implementations so the cap cannot drift between them.
pub fn cap_messages(messages: &[Message]) -> &[Message] {
    let start = messages.len().saturating_sub(HISTORY_CAP);
    &messages[start..]
}

pub struct InMemoryHistoryStore {
    inner: Mutex<Vec<Message>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.inner.lock().expect("history lock poisoned")
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn get_messages(&self) -> SheetMateResult<Vec<Message>> {
        Ok(self.lock().clone())
    }

    fn save_messages(&self, messages: &[Message]) -> SheetMateResult<()> {
        *self.lock() = cap_messages(messages).to_vec();
        Ok(())
    }

    fn clear_messages(&self) -> SheetMateResult<()> {
        self.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_keeps_only_the_most_recent_fifty() {
        let store = InMemoryHistoryStore::new();
        let messages: Vec<Message> = (0..60).map(|i| Message::user(format!("m{}", i))).collect();
        store.save_messages(&messages).expect("save");

        let kept = store.get_messages().expect("get");
        assert_eq!(kept.len(), HISTORY_CAP);
        assert_eq!(kept[0].content, "m10");
        assert_eq!(kept.last().expect("last").content, "m59");
    }

    #[test]
    fn clear_empties_the_store() {
        let store = InMemoryHistoryStore::new();
        store
            .save_messages(&[Message::user("hello")])
            .expect("save");
        store.clear_messages().expect("clear");
        assert!(store.get_messages().expect("get").is_empty());
    }
}
