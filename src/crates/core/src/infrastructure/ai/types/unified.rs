//! Canonical provider response
//!
//! Every backend response collapses into `{ text, operations }` here,
//! regardless of whether the operations arrived as native tool calls or as
//! an embedded fenced block.

use crate::schema::{extract_fenced_operations, Operation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    /// Human-readable reply with any operation fence already stripped.
    pub text: String,
    pub operations: Vec<Operation>,
}

/// Merge prose and native tool calls into one canonical response.
///
/// Precedence rule: native tool calls win. A fenced block in the prose is
/// always stripped for display cleanliness, but its operations only count
/// when the backend produced no native calls — never both, never a
/// concatenation.
pub fn normalize_response(text: &str, native_operations: Vec<Operation>) -> ProviderResponse {
    let (stripped, embedded_operations) = extract_fenced_operations(text);
    let operations = if native_operations.is_empty() {
        embedded_operations
    } else {
        native_operations
    };
    ProviderResponse {
        text: stripped,
        operations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::encode_operations;
    use serde_json::json;

    fn set_a1(value: i64) -> Operation {
        Operation::SetCellValue {
            address: "A1".to_string(),
            value: json!(value),
        }
    }

    #[test]
    fn embedded_block_is_used_when_no_native_calls_exist() {
        let text = format!("Setting it now.\n{}", encode_operations(&[set_a1(5)]));
        let response = normalize_response(&text, Vec::new());
        assert_eq!(response.text, "Setting it now.");
        assert_eq!(response.operations, vec![set_a1(5)]);
    }

    #[test]
    fn native_calls_win_over_a_conflicting_embedded_block() {
        let text = format!("Done.\n{}", encode_operations(&[set_a1(1)]));
        let response = normalize_response(&text, vec![set_a1(2)]);
        // Exactly one source's operations appear, and the fence is still
        // stripped from the display text.
        assert_eq!(response.operations, vec![set_a1(2)]);
        assert_eq!(response.text, "Done.");
    }

    #[test]
    fn plain_prose_yields_zero_operations() {
        let response = normalize_response("The total is 42.", Vec::new());
        assert_eq!(response.text, "The total is 42.");
        assert!(response.operations.is_empty());
    }
}
