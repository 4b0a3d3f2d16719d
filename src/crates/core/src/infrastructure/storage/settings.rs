//! Settings store collaborator
//!
//! The core consumes settings read-only at the start of each turn; the
//! store itself is owned by the surrounding application shell.

use crate::util::errors::SheetMateResult;
use crate::util::types::{AssistantSettings, ProviderKind};
use std::sync::{Mutex, MutexGuard};

pub trait SettingsStore: Send + Sync {
    fn get_settings(&self) -> SheetMateResult<AssistantSettings>;

    fn save_api_key(&self, api_key: &str) -> SheetMateResult<()>;
    fn get_api_key(&self) -> SheetMateResult<Option<String>>;
    fn clear_api_key(&self) -> SheetMateResult<()>;

    fn save_provider(&self, provider: ProviderKind) -> SheetMateResult<()>;
    fn get_provider(&self) -> SheetMateResult<ProviderKind>;

    fn save_model(&self, model: &str) -> SheetMateResult<()>;
    fn get_model(&self) -> SheetMateResult<String>;
}

/// Volatile store for headless runs and tests.
pub struct InMemorySettingsStore {
    inner: Mutex<AssistantSettings>,
}

impl InMemorySettingsStore {
    pub fn new(settings: AssistantSettings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AssistantSettings> {
        self.inner.lock().expect("settings lock poisoned")
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new(AssistantSettings::default())
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get_settings(&self) -> SheetMateResult<AssistantSettings> {
        Ok(self.lock().clone())
    }

    fn save_api_key(&self, api_key: &str) -> SheetMateResult<()> {
        self.lock().api_key = api_key.to_string();
        Ok(())
    }

    fn get_api_key(&self) -> SheetMateResult<Option<String>> {
        let key = self.lock().api_key.clone();
        Ok(if key.is_empty() { None } else { Some(key) })
    }

    fn clear_api_key(&self) -> SheetMateResult<()> {
        self.lock().api_key.clear();
        Ok(())
    }

    fn save_provider(&self, provider: ProviderKind) -> SheetMateResult<()> {
        let mut settings = self.lock();
        settings.provider = provider;
        settings.model = provider.default_model().to_string();
        Ok(())
    }

    fn get_provider(&self) -> SheetMateResult<ProviderKind> {
        Ok(self.lock().provider)
    }

    fn save_model(&self, model: &str) -> SheetMateResult<()> {
        self.lock().model = model.to_string();
        Ok(())
    }

    fn get_model(&self) -> SheetMateResult<String> {
        Ok(self.lock().model.clone())
    }
}
