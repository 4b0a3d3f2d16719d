//! Storage system
//!
//! Credential/settings and conversation history collaborators. The core
//! only reads them per request; ownership stays with the application shell.

pub mod history;
pub mod settings;

pub use history::{HistoryStore, InMemoryHistoryStore, HISTORY_CAP};
pub use settings::{InMemorySettingsStore, SettingsStore};
