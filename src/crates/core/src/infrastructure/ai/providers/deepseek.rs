//! DeepSeek adapter (text-completion pattern, no tool schema)

use super::{interpolate_history, provider_error, ProviderAdapter};
use crate::infrastructure::ai::types::deepseek::ChatResponse;
use crate::infrastructure::ai::types::unified::ProviderResponse;
use crate::util::errors::{SheetMateError, SheetMateResult};
use crate::util::types::{AssistantSettings, Message};
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

pub struct DeepSeekAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl DeepSeekAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn build_request_body(history: &[Message], system_prompt: &str, model: &str) -> Value {
        // Same single-string pattern as Gemini: the whole conversation rides
        // in one user message and operations come back via the fenced block.
        let prompt = interpolate_history(history, system_prompt);
        json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}]
        })
    }
}

#[async_trait]
impl ProviderAdapter for DeepSeekAdapter {
    fn name(&self) -> &'static str {
        "DeepSeek"
    }

    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        settings: &AssistantSettings,
    ) -> SheetMateResult<ProviderResponse> {
        let body = Self::build_request_body(history, system_prompt, &settings.model);
        debug!("DeepSeek request: model={}", settings.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(self.name(), status.as_u16(), &body));
        }

        let parsed: ChatResponse = response.json().await.map_err(|error| {
            SheetMateError::provider(format!(
                "DeepSeek returned an unexpected response: {}",
                error
            ))
        })?;
        Ok(parsed.into_provider_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_has_no_tools_and_one_user_message() {
        let history = vec![Message::user("Add a chart")];
        let body = DeepSeekAdapter::build_request_body(&history, "SYSTEM", "deepseek-chat");

        assert_eq!(body["model"], "deepseek-chat");
        assert!(body.get("tools").is_none());
        let messages = body["messages"].as_array().expect("messages");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert!(messages[0]["content"]
            .as_str()
            .expect("content")
            .contains("User: Add a chart"));
    }
}
