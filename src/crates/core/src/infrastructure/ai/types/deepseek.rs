//! DeepSeek chat-completions response shapes (text-completion pattern)

use super::unified::{normalize_response, ProviderResponse};
use log::warn;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// DeepSeek is driven without tools; like Gemini, operations arrive only
    /// through the fenced block.
    pub fn into_provider_response(self) -> ProviderResponse {
        let Some(choice) = self.choices.into_iter().next() else {
            warn!("DeepSeek response contained no choices");
            return ProviderResponse::default();
        };
        normalize_response(&choice.message.content.unwrap_or_default(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_operations_from_the_fenced_block() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": "Filtered.\n```sheetops\n{\"operations\":[{\"action\":\"applyFilter\",\"address\":\"A1:C10\",\"column\":1}]}\n```"
                }
            }]
        }"#;

        let response: ChatResponse = serde_json::from_str(raw).expect("valid deepseek response");
        let normalized = response.into_provider_response();

        assert_eq!(normalized.text, "Filtered.");
        assert_eq!(normalized.operations.len(), 1);
        assert_eq!(normalized.operations[0].action(), "applyFilter");
    }

    #[test]
    fn missing_content_degrades_to_an_empty_response() {
        let raw = r#"{"choices": [{"message": {}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).expect("valid deepseek response");
        let normalized = response.into_provider_response();
        assert!(normalized.text.is_empty());
        assert!(normalized.operations.is_empty());
    }
}
