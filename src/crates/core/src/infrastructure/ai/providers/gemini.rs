//! Gemini adapter (single-string generation API)

use super::{interpolate_history, provider_error, ProviderAdapter};
use crate::infrastructure::ai::types::gemini::GenerateContentResponse;
use crate::infrastructure::ai::types::unified::ProviderResponse;
use crate::util::errors::{SheetMateError, SheetMateResult};
use crate::util::types::{AssistantSettings, Message};
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiAdapter {
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

    fn build_request_body(history: &[Message], system_prompt: &str) -> Value {
        let prompt = interpolate_history(history, system_prompt);
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        })
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        settings: &AssistantSettings,
    ) -> SheetMateResult<ProviderResponse> {
        let body = Self::build_request_body(history, system_prompt);
        debug!("Gemini request: model={}", settings.model);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, settings.model
            ))
            .query(&[("key", settings.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(self.name(), status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|error| {
            SheetMateError::provider(format!("Gemini returned an unexpected response: {}", error))
        })?;
        Ok(parsed.into_provider_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_one_interpolated_text_part() {
        let history = vec![Message::user("Sort column B")];
        let body = GeminiAdapter::build_request_body(&history, "SYSTEM");

        let parts = body["contents"][0]["parts"].as_array().expect("parts");
        assert_eq!(parts.len(), 1);
        let text = parts[0]["text"].as_str().expect("text part");
        assert!(text.starts_with("SYSTEM"));
        assert!(text.contains("User: Sort column B"));
    }
}
