//! OpenAI chat-completions response shapes

use super::unified::{normalize_response, ProviderResponse};
use crate::schema::{operation_from_parts, Operation};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    #[allow(dead_code)]
    id: Option<String>,
    #[allow(dead_code)]
    #[serde(rename = "type")]
    tool_type: Option<String>,
    function: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: Option<String>,
    /// Usually a JSON-encoded string, but some compatible backends send a
    /// structured object. Both shapes are accepted.
    arguments: Option<Value>,
}

impl ChatCompletionResponse {
    /// Each tool invocation maps 1:1 to one `Operation`; invocations with an
    /// unknown name or malformed arguments are dropped, not fatal.
    pub fn into_provider_response(self) -> ProviderResponse {
        let Some(choice) = self.choices.into_iter().next() else {
            warn!("OpenAI response contained no choices");
            return ProviderResponse::default();
        };

        let text = choice.message.content.unwrap_or_default();
        let native_operations: Vec<Operation> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|call| {
                let function = call.function?;
                let name = function.name?;
                let arguments = function.arguments.unwrap_or(Value::Null);
                operation_from_parts(&name, &arguments)
            })
            .collect();

        normalize_response(&text, native_operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_native_tool_calls_to_operations() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {
                            "id": "call_1",
                            "type": "function",
                            "function": {
                                "name": "setCellValue",
                                "arguments": "{\"address\": \"A1\", \"value\": \"5\"}"
                            }
                        },
                        {
                            "id": "call_2",
                            "type": "function",
                            "function": {
                                "name": "createSheet",
                                "arguments": {"name": "Report"}
                            }
                        }
                    ]
                }
            }]
        }"#;

        let response: ChatCompletionResponse =
            serde_json::from_str(raw).expect("valid openai response");
        let normalized = response.into_provider_response();

        assert_eq!(normalized.operations.len(), 2);
        assert_eq!(
            normalized.operations[0],
            Operation::SetCellValue {
                address: "A1".to_string(),
                value: json!("5"),
            }
        );
        assert_eq!(
            normalized.operations[1],
            Operation::CreateSheet {
                name: "Report".to_string(),
            }
        );
    }

    #[test]
    fn unknown_tool_call_is_dropped_and_rest_survive() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": "Working on it.",
                    "tool_calls": [
                        {
                            "id": "call_1",
                            "type": "function",
                            "function": {
                                "name": "mergeCells",
                                "arguments": "{\"address\": \"A1:B2\"}"
                            }
                        },
                        {
                            "id": "call_2",
                            "type": "function",
                            "function": {
                                "name": "createSheet",
                                "arguments": "{\"name\": \"Data\"}"
                            }
                        }
                    ]
                }
            }]
        }"#;

        let response: ChatCompletionResponse =
            serde_json::from_str(raw).expect("valid openai response");
        let normalized = response.into_provider_response();

        assert_eq!(normalized.text, "Working on it.");
        assert_eq!(normalized.operations.len(), 1);
        assert_eq!(normalized.operations[0].action(), "createSheet");
    }

    #[test]
    fn native_calls_take_precedence_over_embedded_block() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": "Done.\n```sheetops\n{\"operations\":[{\"action\":\"setCellValue\",\"address\":\"B9\",\"value\":9}]}\n```",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "setCellValue",
                            "arguments": "{\"address\": \"A1\", \"value\": 1}"
                        }
                    }]
                }
            }]
        }"#;

        let response: ChatCompletionResponse =
            serde_json::from_str(raw).expect("valid openai response");
        let normalized = response.into_provider_response();

        assert_eq!(normalized.text, "Done.");
        assert_eq!(normalized.operations.len(), 1);
        assert_eq!(
            normalized.operations[0],
            Operation::SetCellValue {
                address: "A1".to_string(),
                value: json!(1),
            }
        );
    }

    #[test]
    fn text_only_response_falls_back_to_fenced_block() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": "Here.\n```sheetops\n{\"operations\":[{\"action\":\"autofitColumns\"}]}\n```"
                }
            }]
        }"#;

        let response: ChatCompletionResponse =
            serde_json::from_str(raw).expect("valid openai response");
        let normalized = response.into_provider_response();

        assert_eq!(normalized.text, "Here.");
        assert_eq!(normalized.operations.len(), 1);
        assert_eq!(normalized.operations[0].action(), "autofitColumns");
    }
}
