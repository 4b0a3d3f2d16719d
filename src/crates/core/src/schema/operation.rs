//! Canonical spreadsheet operation union
//!
//! Every mutation a model may request is one variant here, tagged by its
//! `action` string on the wire. The union is closed: unknown actions coming
//! from a backend are skipped during parsing, never represented.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One aggregation column of a pivot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotValueField {
    pub field: String,
    /// Aggregation function name (`sum`, `count`, `average`, ...). Defaults
    /// to `sum` at execution time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

/// A canonical spreadsheet mutation, independent of which backend produced
/// it. Optional fields keep their wire absence (`None`) and receive their
/// documented defaults in the executor, not during parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    SetCellValue {
        address: String,
        value: Value,
    },
    SetRangeValues {
        address: String,
        values: Vec<Vec<Value>>,
    },
    SetCellFormula {
        address: String,
        formula: String,
    },
    FormatRange {
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bold: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        italic: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill_color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number_format: Option<String>,
    },
    CreateTable {
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has_headers: Option<bool>,
    },
    CreateChart {
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chart_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    CreatePivotTable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_sheet: Option<String>,
        source_address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination_sheet: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination_address: Option<String>,
        #[serde(default)]
        rows: Vec<String>,
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default)]
        values: Vec<PivotValueField>,
    },
    CreateSheet {
        name: String,
    },
    DeleteSheet {
        name: String,
    },
    RenameSheet {
        name: String,
        new_name: String,
    },
    ActivateSheet {
        name: String,
    },
    HideSheet {
        name: String,
    },
    SortRange {
        address: String,
        /// 0-based column index within the range. Defaults to 0.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<usize>,
        /// Defaults to ascending.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ascending: Option<bool>,
    },
    ApplyFilter {
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<Vec<String>>,
    },
    InsertRows {
        /// 1-based row number where insertion starts.
        start_row: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    },
    DeleteRows {
        start_row: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    },
    InsertColumns {
        /// Column letter where insertion starts, e.g. "C".
        start_column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    },
    DeleteColumns {
        start_column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    },
    AutofitColumns {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
}

impl Operation {
    /// All wire action tags, in catalog order. Kept next to the enum so the
    /// catalog parity tests can detect drift in either direction.
    pub const ACTION_NAMES: &'static [&'static str] = &[
        "setCellValue",
        "setRangeValues",
        "setCellFormula",
        "formatRange",
        "createTable",
        "createChart",
        "createPivotTable",
        "createSheet",
        "deleteSheet",
        "renameSheet",
        "activateSheet",
        "hideSheet",
        "sortRange",
        "applyFilter",
        "insertRows",
        "deleteRows",
        "insertColumns",
        "deleteColumns",
        "autofitColumns",
    ];

    /// The wire tag of this operation.
    pub fn action(&self) -> &'static str {
        match self {
            Operation::SetCellValue { .. } => "setCellValue",
            Operation::SetRangeValues { .. } => "setRangeValues",
            Operation::SetCellFormula { .. } => "setCellFormula",
            Operation::FormatRange { .. } => "formatRange",
            Operation::CreateTable { .. } => "createTable",
            Operation::CreateChart { .. } => "createChart",
            Operation::CreatePivotTable { .. } => "createPivotTable",
            Operation::CreateSheet { .. } => "createSheet",
            Operation::DeleteSheet { .. } => "deleteSheet",
            Operation::RenameSheet { .. } => "renameSheet",
            Operation::ActivateSheet { .. } => "activateSheet",
            Operation::HideSheet { .. } => "hideSheet",
            Operation::SortRange { .. } => "sortRange",
            Operation::ApplyFilter { .. } => "applyFilter",
            Operation::InsertRows { .. } => "insertRows",
            Operation::DeleteRows { .. } => "deleteRows",
            Operation::InsertColumns { .. } => "insertColumns",
            Operation::DeleteColumns { .. } => "deleteColumns",
            Operation::AutofitColumns { .. } => "autofitColumns",
        }
    }
}
