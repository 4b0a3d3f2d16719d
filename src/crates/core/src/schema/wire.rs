//! Operation batch wire format
//!
//! The one bit-exact contract with the model:
//! `{"operations": [{"action": <tag>, ...}, ...]}`, optionally embedded in a
//! fenced block tagged `sheetops` when the backend has no native tool
//! calling. Parsing is lenient per element: an unknown action or malformed
//! fields drop that element with a warning, never the whole batch.

use super::operation::Operation;
use log::warn;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Language tag of the fenced block carrying the operation batch.
pub const FENCE_TAG: &str = "sheetops";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(&format!(r"(?s)```{}\s*(.*?)```", FENCE_TAG)).expect("valid fence regex")
    })
}

/// Parse a `{"operations": [...]}` object. Elements that fail to
/// deserialize are skipped.
pub fn parse_operations(payload: &Value) -> Vec<Operation> {
    let Some(items) = payload.get("operations").and_then(Value::as_array) else {
        warn!("Operation payload has no 'operations' array: {}", payload);
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(operation) => Some(operation),
            Err(error) => {
                warn!("Skipping unrecognized operation {}: {}", item, error);
                None
            }
        })
        .collect()
}

/// Build one `Operation` from a native tool invocation's name and argument
/// object. Arguments may arrive as a structured object or as a JSON-encoded
/// string; both normalize identically.
pub fn operation_from_parts(name: &str, arguments: &Value) -> Option<Operation> {
    let arguments = match arguments {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!("Tool call '{}' has malformed argument JSON: {}", name, error);
                return None;
            }
        },
        other => other.clone(),
    };

    let mut object = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            warn!("Tool call '{}' arguments are not an object: {}", name, other);
            return None;
        }
    };
    object.insert("action".to_string(), Value::String(name.to_string()));

    match serde_json::from_value(Value::Object(object)) {
        Ok(operation) => Some(operation),
        Err(error) => {
            warn!("Skipping tool call '{}': {}", name, error);
            None
        }
    }
}

/// Encode an operation list into the fenced-block text convention.
pub fn encode_operations(operations: &[Operation]) -> String {
    let payload = serde_json::json!({ "operations": operations });
    format!("```{}\n{}\n```", FENCE_TAG, payload)
}

/// Scan prose for the first `sheetops` fenced block. Returns the prose with
/// the block stripped plus the operations it carried. A missing block means
/// zero operations; a malformed block also means zero operations (the prose
/// is still returned for display).
pub fn extract_fenced_operations(text: &str) -> (String, Vec<Operation>) {
    let Some(captures) = fence_regex().captures(text) else {
        return (text.trim().to_string(), Vec::new());
    };

    let full_match = captures.get(0).expect("regex match");
    let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let mut stripped = String::with_capacity(text.len());
    stripped.push_str(&text[..full_match.start()]);
    stripped.push_str(&text[full_match.end()..]);
    let stripped = stripped.trim().to_string();

    let operations = match serde_json::from_str::<Value>(body) {
        Ok(payload) => parse_operations(&payload),
        Err(error) => {
            warn!("Fenced {} block is not valid JSON: {}", FENCE_TAG, error);
            Vec::new()
        }
    };

    (stripped, operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_then_extract_round_trips() {
        let operations = vec![
            Operation::SetCellValue {
                address: "A1".to_string(),
                value: json!("5"),
            },
            Operation::SortRange {
                address: "A1:B10".to_string(),
                key: Some(1),
                ascending: Some(false),
            },
            Operation::CreateChart {
                address: "A1:C10".to_string(),
                chart_type: None,
                title: Some("Sales".to_string()),
            },
        ];

        let text = format!("Here you go.\n\n{}", encode_operations(&operations));
        let (stripped, parsed) = extract_fenced_operations(&text);

        assert_eq!(stripped, "Here you go.");
        assert_eq!(parsed, operations);
    }

    #[test]
    fn unknown_action_is_skipped_not_fatal() {
        let payload = json!({
            "operations": [
                {"action": "setCellValue", "address": "A1", "value": 1},
                {"action": "explodeSheet", "address": "A1"},
                {"action": "createSheet", "name": "Report"}
            ]
        });
        let operations = parse_operations(&payload);
        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].action(), "setCellValue");
        assert_eq!(operations[1].action(), "createSheet");
    }

    #[test]
    fn malformed_block_yields_prose_and_no_operations() {
        let text = "Done!\n```sheetops\n{\"operations\": [not json\n```";
        let (stripped, operations) = extract_fenced_operations(text);
        assert_eq!(stripped, "Done!");
        assert!(operations.is_empty());
    }

    #[test]
    fn text_without_block_passes_through() {
        let (stripped, operations) = extract_fenced_operations("Just an answer.");
        assert_eq!(stripped, "Just an answer.");
        assert!(operations.is_empty());
    }

    #[test]
    fn tool_call_arguments_accept_string_and_object_shapes() {
        let from_object = operation_from_parts(
            "setCellValue",
            &json!({"address": "A1", "value": "5"}),
        )
        .expect("object arguments parse");
        let from_string = operation_from_parts(
            "setCellValue",
            &json!("{\"address\": \"A1\", \"value\": \"5\"}"),
        )
        .expect("string arguments parse");
        assert_eq!(from_object, from_string);
    }

    #[test]
    fn tool_call_with_unknown_name_is_dropped() {
        assert!(operation_from_parts("mergeCells", &json!({"address": "A1:B2"})).is_none());
    }

    #[test]
    fn only_the_first_block_is_consumed() {
        let text = "a\n```sheetops\n{\"operations\":[{\"action\":\"createSheet\",\"name\":\"S\"}]}\n```\nb\n```sheetops\n{\"operations\":[]}\n```";
        let (stripped, operations) = extract_fenced_operations(text);
        assert_eq!(operations.len(), 1);
        assert!(stripped.contains("```sheetops"));
        assert!(stripped.starts_with('a'));
    }
}
