//! OpenAI adapter (native tool calling)

use super::{provider_error, ProviderAdapter};
use crate::infrastructure::ai::types::openai::ChatCompletionResponse;
use crate::infrastructure::ai::types::unified::ProviderResponse;
use crate::schema::tool_definitions;
use crate::util::errors::{SheetMateError, SheetMateResult};
use crate::util::types::{AssistantSettings, Message, MessageRole};
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiAdapter {
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
        let mut messages = vec![json!({"role": "system", "content": system_prompt})];
        for message in history {
            let role = match message.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(json!({"role": role, "content": message.content}));
        }
        json!({
            "model": model,
            "messages": messages,
            "tools": tool_definitions(),
            "tool_choice": "auto",
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        settings: &AssistantSettings,
    ) -> SheetMateResult<ProviderResponse> {
        let body = Self::build_request_body(history, system_prompt, &settings.model);
        debug!(
            "OpenAI request: model={} messages={}",
            settings.model,
            history.len() + 1
        );

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

        let parsed: ChatCompletionResponse = response.json().await.map_err(|error| {
            SheetMateError::provider(format!("OpenAI returned an unexpected response: {}", error))
        })?;
        Ok(parsed.into_provider_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Operation;

    #[test]
    fn request_carries_system_prompt_tools_and_history() {
        let history = vec![Message::user("Set A1 to 5")];
        let body = OpenAiAdapter::build_request_body(&history, "SYSTEM", "gpt-4o-mini");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "SYSTEM");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(
            body["tools"].as_array().map(Vec::len),
            Some(Operation::ACTION_NAMES.len())
        );
    }
}
