//! Gemini generateContent response shapes

use super::unified::{normalize_response, ProviderResponse};
use log::warn;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Gemini has no native tool path here; operations only ever arrive via
    /// the fenced block embedded in the first candidate's text parts.
    pub fn into_provider_response(self) -> ProviderResponse {
        let Some(candidate) = self.candidates.unwrap_or_default().into_iter().next() else {
            warn!("Gemini response contained no candidates");
            return ProviderResponse::default();
        };

        let text = candidate
            .content
            .and_then(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        normalize_response(&text, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Operation;
    use serde_json::json;

    #[test]
    fn joins_parts_and_extracts_the_fenced_block() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "I'll set that for you.\n"},
                        {"text": "```sheetops\n{\"operations\":[{\"action\":\"setCellValue\",\"address\":\"A1\",\"value\":\"5\"}]}\n```"}
                    ]
                }
            }]
        }"#;

        let response: GenerateContentResponse =
            serde_json::from_str(raw).expect("valid gemini response");
        let normalized = response.into_provider_response();

        assert_eq!(normalized.text, "I'll set that for you.");
        assert_eq!(
            normalized.operations,
            vec![Operation::SetCellValue {
                address: "A1".to_string(),
                value: json!("5"),
            }]
        );
    }

    #[test]
    fn empty_candidates_degrade_to_an_empty_response() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).expect("valid gemini response");
        let normalized = response.into_provider_response();
        assert!(normalized.text.is_empty());
        assert!(normalized.operations.is_empty());
    }
}
