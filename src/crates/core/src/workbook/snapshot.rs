//! Read-only workbook snapshot
//!
//! Materialized fresh at the start of every chat turn and discarded with it.
//! Never cached: the spreadsheet may have changed since the previous turn.

use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct UsedRange {
    /// A1-style address of the used region, e.g. "A1:D6".
    pub address: String,
    /// Row-major cell values; empty cells render as `Value::Null`.
    pub values: Vec<Vec<Value>>,
    /// Row-major formulas; cells without a formula hold an empty string.
    pub formulas: Vec<Vec<String>>,
    pub row_count: usize,
    pub col_count: usize,
}

#[derive(Debug, Clone)]
pub struct WorkbookSnapshot {
    pub active_sheet_name: String,
    pub sheet_names: Vec<String>,
    /// `None` when the active sheet has no data at all.
    pub used_range: Option<UsedRange>,
}

impl WorkbookSnapshot {
    /// Fixed demo snapshot used when no live spreadsheet host is reachable.
    /// Keeps the assistant usable headless and keeps prompts deterministic
    /// in tests.
    pub fn demo() -> Self {
        let values = vec![
            vec![json!("Product"), json!("Units"), json!("Price"), json!("Total")],
            vec![json!("Widget"), json!(12), json!(4.5), json!(54.0)],
            vec![json!("Gadget"), json!(7), json!(9.99), json!(69.93)],
            vec![json!("Doohickey"), json!(3), json!(2.25), json!(6.75)],
        ];
        let formulas = vec![
            vec![String::new(), String::new(), String::new(), String::new()],
            vec![String::new(), String::new(), String::new(), "=B2*C2".to_string()],
            vec![String::new(), String::new(), String::new(), "=B3*C3".to_string()],
            vec![String::new(), String::new(), String::new(), "=B4*C4".to_string()],
        ];
        Self {
            active_sheet_name: "Sheet1".to_string(),
            sheet_names: vec!["Sheet1".to_string()],
            used_range: Some(UsedRange {
                address: "A1:D4".to_string(),
                row_count: values.len(),
                col_count: 4,
                values,
                formulas,
            }),
        }
    }
}
