//! AI client dispatch
//!
//! Selects the adapter for the configured provider tag and forwards the
//! call. Simple variant dispatch over a map, no inheritance.

use super::providers::{DeepSeekAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter};
use super::types::unified::ProviderResponse;
use crate::util::errors::{SheetMateError, SheetMateResult};
use crate::util::types::{AssistantSettings, Message, ProviderKind};
use log::debug;
use std::collections::HashMap;

pub struct AIClient {
    adapters: HashMap<ProviderKind, Box<dyn ProviderAdapter>>,
}

impl Default for AIClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AIClient {
    /// Client with all three stock adapters sharing one HTTP connection pool.
    pub fn new() -> Self {
        let http = reqwest::Client::new();
        let mut adapters: HashMap<ProviderKind, Box<dyn ProviderAdapter>> = HashMap::new();
        adapters.insert(
            ProviderKind::OpenAi,
            Box::new(OpenAiAdapter::new(http.clone())),
        );
        adapters.insert(
            ProviderKind::Gemini,
            Box::new(GeminiAdapter::new(http.clone())),
        );
        adapters.insert(ProviderKind::DeepSeek, Box::new(DeepSeekAdapter::new(http)));
        Self { adapters }
    }

    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Replace or add an adapter for one provider tag. Test seam and
    /// extension point for self-hosted backends.
    pub fn with_adapter(mut self, kind: ProviderKind, adapter: Box<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(kind, adapter);
        self
    }

    pub async fn send(
        &self,
        settings: &AssistantSettings,
        history: &[Message],
        system_prompt: &str,
    ) -> SheetMateResult<ProviderResponse> {
        let adapter = self.adapters.get(&settings.provider).ok_or_else(|| {
            SheetMateError::provider(format!(
                "No adapter registered for provider '{}'",
                settings.provider
            ))
        })?;
        debug!(
            "Dispatching chat turn to {} ({} history turns)",
            adapter.name(),
            history.len()
        );
        adapter.send(history, system_prompt, settings).await
    }
}
