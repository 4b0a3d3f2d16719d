//! Provider adapters
//!
//! One implementation per backend. Each adapter turns (history + system
//! prompt) into that backend's request shape, makes exactly one outbound
//! HTTP call, and normalizes the reply into a canonical `ProviderResponse`.
//! There is no client-side retry; transport failures propagate to the turn.

pub mod deepseek;
pub mod gemini;
pub mod openai;

pub use deepseek::DeepSeekAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use super::types::unified::ProviderResponse;
use crate::util::errors::{SheetMateError, SheetMateResult};
use crate::util::types::{AssistantSettings, Message, MessageRole};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// One outbound network call; credentials are validated by the caller
    /// before dispatch, not here.
    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        settings: &AssistantSettings,
    ) -> SheetMateResult<ProviderResponse>;
}

/// Flatten the conversation into one prompt string for backends driven
/// through a single-string generation API.
pub(crate) fn interpolate_history(history: &[Message], system_prompt: &str) -> String {
    let mut prompt = String::from(system_prompt);
    prompt.push_str("\n\n");
    for message in history {
        let speaker = match message.role {
            MessageRole::System => continue,
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }
    prompt.push_str("Assistant:");
    prompt
}

/// Convert a non-success backend reply into one human-readable error,
/// preferring a backend-supplied message and falling back to a generic
/// `<provider> API error: <status>` line.
pub(crate) fn provider_error(provider: &str, status: u16, body: &str) -> SheetMateError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| extract_api_error_message(&json))
        .unwrap_or_else(|| format!("{} API error: {}", provider, status));
    SheetMateError::Provider(message)
}

fn extract_api_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if let Some(message) = error.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    if let Some(message) = error.as_str() {
        return Some(message.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(role: MessageRole, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn interpolates_turns_in_conversation_order() {
        let history = vec![
            message(MessageRole::User, "Set A1 to 5"),
            message(MessageRole::Assistant, "Done."),
            message(MessageRole::User, "Now bold it"),
        ];
        let prompt = interpolate_history(&history, "You are a spreadsheet assistant.");
        assert!(prompt.starts_with("You are a spreadsheet assistant."));
        let user_pos = prompt.find("User: Set A1 to 5").expect("first user turn");
        let assistant_pos = prompt.find("Assistant: Done.").expect("assistant turn");
        let second_pos = prompt.find("User: Now bold it").expect("second user turn");
        assert!(user_pos < assistant_pos && assistant_pos < second_pos);
        assert!(prompt.ends_with("Assistant:"));
    }

    #[test]
    fn prefers_backend_error_message_object_shape() {
        let error = provider_error("OpenAI", 429, r#"{"error": {"message": "rate limited"}}"#);
        assert_eq!(error.to_string(), "rate limited");
    }

    #[test]
    fn accepts_string_error_shape() {
        let error = provider_error("Gemini", 400, r#"{"error": "bad request"}"#);
        assert_eq!(error.to_string(), "bad request");
    }

    #[test]
    fn falls_back_to_generic_status_message() {
        let error = provider_error("DeepSeek", 503, "upstream unavailable");
        assert_eq!(error.to_string(), "DeepSeek API error: 503");
    }
}
