//! Action catalog and its two renderings
//!
//! One table describes every action's name, purpose, and JSON-schema
//! parameters. `tool_definitions` renders it for backends with native
//! function calling; `text_protocol` renders it as prompt instructions for
//! backends without. Adding an action means adding one table entry (and the
//! matching `Operation` variant) — the renderings regenerate themselves.

use super::wire::FENCE_TAG;
use serde_json::{json, Value};
use std::sync::OnceLock;

pub struct ActionSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Full JSON-schema object: `{"type":"object","properties":{...},"required":[...]}`.
    pub parameters: Value,
}

static CATALOG: OnceLock<Vec<ActionSpec>> = OnceLock::new();

pub fn catalog() -> &'static [ActionSpec] {
    CATALOG.get_or_init(build_catalog)
}

fn build_catalog() -> Vec<ActionSpec> {
    vec![
        ActionSpec {
            name: "setCellValue",
            description: "Set the value of a single cell",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string", "description": "A1-style cell address, e.g. \"B2\"" },
                    "value": { "description": "New cell value (string, number, or boolean)" }
                },
                "required": ["address", "value"]
            }),
        },
        ActionSpec {
            name: "setRangeValues",
            description: "Set a rectangular range of values as a row-major grid",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string", "description": "A1-style range address, e.g. \"A1:C3\"" },
                    "values": {
                        "type": "array",
                        "items": { "type": "array" },
                        "description": "Row-major grid matching the range dimensions"
                    }
                },
                "required": ["address", "values"]
            }),
        },
        ActionSpec {
            name: "setCellFormula",
            description: "Set the formula of a single cell",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string", "description": "A1-style cell address" },
                    "formula": { "type": "string", "description": "Formula starting with '=', e.g. \"=SUM(A1:A10)\"" }
                },
                "required": ["address", "formula"]
            }),
        },
        ActionSpec {
            name: "formatRange",
            description: "Apply formatting to a range",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string" },
                    "bold": { "type": "boolean" },
                    "italic": { "type": "boolean" },
                    "fontColor": { "type": "string", "description": "Hex color like \"#FF0000\"" },
                    "fillColor": { "type": "string", "description": "Hex background color" },
                    "numberFormat": { "type": "string", "description": "Number format code, e.g. \"0.00%\"" }
                },
                "required": ["address"]
            }),
        },
        ActionSpec {
            name: "createTable",
            description: "Create a table over a range",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string" },
                    "name": { "type": "string" },
                    "hasHeaders": { "type": "boolean", "description": "Whether the first row holds headers (default true)" }
                },
                "required": ["address"]
            }),
        },
        ActionSpec {
            name: "createChart",
            description: "Create a chart from a data range",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string", "description": "Source data range" },
                    "chartType": { "type": "string", "description": "Chart type, e.g. \"ColumnClustered\", \"Line\", \"Pie\" (default ColumnClustered)" },
                    "title": { "type": "string" }
                },
                "required": ["address"]
            }),
        },
        ActionSpec {
            name: "createPivotTable",
            description: "Create a pivot table from a source range",
            parameters: json!({
                "type": "object",
                "properties": {
                    "sourceSheet": { "type": "string" },
                    "sourceAddress": { "type": "string", "description": "Source data range including headers" },
                    "destinationSheet": { "type": "string" },
                    "destinationAddress": { "type": "string" },
                    "rows": { "type": "array", "items": { "type": "string" }, "description": "Row hierarchy field names" },
                    "columns": { "type": "array", "items": { "type": "string" }, "description": "Column hierarchy field names" },
                    "values": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "field": { "type": "string" },
                                "function": { "type": "string", "description": "sum, count, average, min, max (default sum)" }
                            },
                            "required": ["field"]
                        }
                    }
                },
                "required": ["sourceAddress"]
            }),
        },
        ActionSpec {
            name: "createSheet",
            description: "Add a new worksheet",
            parameters: sheet_name_parameters(),
        },
        ActionSpec {
            name: "deleteSheet",
            description: "Delete a worksheet",
            parameters: sheet_name_parameters(),
        },
        ActionSpec {
            name: "renameSheet",
            description: "Rename a worksheet",
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "newName": { "type": "string" }
                },
                "required": ["name", "newName"]
            }),
        },
        ActionSpec {
            name: "activateSheet",
            description: "Make a worksheet the active sheet",
            parameters: sheet_name_parameters(),
        },
        ActionSpec {
            name: "hideSheet",
            description: "Hide a worksheet",
            parameters: sheet_name_parameters(),
        },
        ActionSpec {
            name: "sortRange",
            description: "Sort a range by one of its columns",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string" },
                    "key": { "type": "integer", "description": "0-based column index within the range (default 0)" },
                    "ascending": { "type": "boolean", "description": "Sort direction (default true)" }
                },
                "required": ["address"]
            }),
        },
        ActionSpec {
            name: "applyFilter",
            description: "Apply an autofilter to a range",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string" },
                    "column": { "type": "integer", "description": "0-based column index within the range (default 0)" },
                    "values": { "type": "array", "items": { "type": "string" }, "description": "Keep only rows matching these values; omit to just enable the filter" }
                },
                "required": ["address"]
            }),
        },
        ActionSpec {
            name: "insertRows",
            description: "Insert blank rows",
            parameters: json!({
                "type": "object",
                "properties": {
                    "startRow": { "type": "integer", "description": "1-based row number where insertion starts" },
                    "count": { "type": "integer", "description": "Number of rows (default 1)" }
                },
                "required": ["startRow"]
            }),
        },
        ActionSpec {
            name: "deleteRows",
            description: "Delete rows",
            parameters: json!({
                "type": "object",
                "properties": {
                    "startRow": { "type": "integer", "description": "1-based row number where deletion starts" },
                    "count": { "type": "integer", "description": "Number of rows (default 1)" }
                },
                "required": ["startRow"]
            }),
        },
        ActionSpec {
            name: "insertColumns",
            description: "Insert blank columns",
            parameters: json!({
                "type": "object",
                "properties": {
                    "startColumn": { "type": "string", "description": "Column letter where insertion starts, e.g. \"C\"" },
                    "count": { "type": "integer", "description": "Number of columns (default 1)" }
                },
                "required": ["startColumn"]
            }),
        },
        ActionSpec {
            name: "deleteColumns",
            description: "Delete columns",
            parameters: json!({
                "type": "object",
                "properties": {
                    "startColumn": { "type": "string", "description": "Column letter where deletion starts" },
                    "count": { "type": "integer", "description": "Number of columns (default 1)" }
                },
                "required": ["startColumn"]
            }),
        },
        ActionSpec {
            name: "autofitColumns",
            description: "Autofit column widths",
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": { "type": "string", "description": "Range whose columns to autofit; omit for the used range" }
                },
                "required": []
            }),
        },
    ]
}

fn sheet_name_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Worksheet name" }
        },
        "required": ["name"]
    })
}

/// Render the catalog as a native function-calling tool array.
pub fn tool_definitions() -> Vec<Value> {
    catalog()
        .iter()
        .map(|spec| {
            json!({
                "type": "function",
                "function": {
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": spec.parameters,
                }
            })
        })
        .collect()
}

/// Render the catalog as prompt instructions for backends without native
/// tool calling: the fenced-block convention plus one line per action.
pub fn text_protocol() -> String {
    let mut out = String::new();
    out.push_str(
        "When the user asks for spreadsheet changes, end your reply with exactly one fenced code block tagged `",
    );
    out.push_str(FENCE_TAG);
    out.push_str("` containing a JSON object of the form {\"operations\": [...]}.\n");
    out.push_str("Each operation is an object with an \"action\" field plus that action's parameters.\n");
    out.push_str("If no changes are needed, omit the block entirely.\n\nAvailable actions:\n");

    for spec in catalog() {
        out.push_str("- ");
        out.push_str(spec.name);
        out.push_str(": ");
        out.push_str(spec.description);
        out.push_str(" (");
        out.push_str(&describe_parameters(&spec.parameters));
        out.push_str(")\n");
    }

    out.push_str("\nExample:\n```");
    out.push_str(FENCE_TAG);
    out.push_str("\n{\"operations\": [{\"action\": \"setCellValue\", \"address\": \"A1\", \"value\": 42}]}\n```\n");
    out
}

fn describe_parameters(parameters: &Value) -> String {
    let required: Vec<&str> = parameters["required"]
        .as_array()
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    parameters["properties"]
        .as_object()
        .map(|props| {
            props
                .keys()
                .map(|key| {
                    if required.contains(&key.as_str()) {
                        key.clone()
                    } else {
                        format!("{}?", key)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Operation;

    #[test]
    fn catalog_matches_operation_action_names() {
        let catalog_names: Vec<&str> = catalog().iter().map(|spec| spec.name).collect();
        assert_eq!(catalog_names, Operation::ACTION_NAMES);
    }

    #[test]
    fn both_renderings_cover_the_same_action_set() {
        let tools = tool_definitions();
        let tool_names: Vec<&str> = tools
            .iter()
            .map(|tool| tool["function"]["name"].as_str().expect("tool name"))
            .collect();
        assert_eq!(tool_names, Operation::ACTION_NAMES);

        let protocol = text_protocol();
        for name in Operation::ACTION_NAMES {
            assert!(
                protocol.contains(&format!("- {}: ", name)),
                "text protocol missing action {}",
                name
            );
        }
    }

    #[test]
    fn text_protocol_declares_the_fence_tag() {
        assert!(text_protocol().contains(FENCE_TAG));
    }
}
