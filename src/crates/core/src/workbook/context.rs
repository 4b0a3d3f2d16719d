//! Workbook context serializer
//!
//! Renders a snapshot into the bounded text block placed in the system
//! prompt. Previews are capped so a large sheet cannot blow the prompt
//! budget: at most 20 data rows and 20 formula cells, with an explicit
//! truncation note. Read failures never propagate past this layer; callers
//! always get a best-effort string.

use super::host::SpreadsheetHost;
use super::snapshot::WorkbookSnapshot;
use log::warn;
use serde_json::Value;

const MAX_PREVIEW_ROWS: usize = 20;
const MAX_PREVIEW_FORMULAS: usize = 20;

/// Serialize a snapshot into the prompt context block.
pub fn serialize_context(snapshot: &WorkbookSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("Active sheet: {}\n", snapshot.active_sheet_name));
    out.push_str(&format!("Sheets: {}\n", snapshot.sheet_names.join(", ")));

    let Some(range) = &snapshot.used_range else {
        out.push_str("The active sheet is empty.\n");
        return out;
    };

    out.push_str(&format!(
        "Used range: {} ({} rows x {} columns)\n",
        range.address, range.row_count, range.col_count
    ));

    out.push_str("Values:\n");
    for (index, row) in range.values.iter().take(MAX_PREVIEW_ROWS).enumerate() {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        out.push_str(&format!("Row {}: {}\n", index + 1, cells.join(" | ")));
    }
    if range.values.len() > MAX_PREVIEW_ROWS {
        out.push_str(&format!(
            "...and {} more rows\n",
            range.values.len() - MAX_PREVIEW_ROWS
        ));
    }

    let formulas: Vec<(usize, usize, &str)> = range
        .formulas
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, formula)| !formula.is_empty())
                .map(move |(c, formula)| (r, c, formula.as_str()))
        })
        .collect();
    if !formulas.is_empty() {
        out.push_str("Formulas:\n");
        for (row, col, formula) in formulas.iter().take(MAX_PREVIEW_FORMULAS) {
            out.push_str(&format!(
                "{}{}: {}\n",
                super::address::column_letters(*col),
                row + 1,
                formula
            ));
        }
        if formulas.len() > MAX_PREVIEW_FORMULAS {
            out.push_str(&format!(
                "...and {} more formulas\n",
                formulas.len() - MAX_PREVIEW_FORMULAS
            ));
        }
    }

    out
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Read the live workbook and serialize it. On any read error, falls back to
/// the fixed demo snapshot so the caller still gets a usable context.
pub async fn build_context(host: &dyn SpreadsheetHost) -> String {
    match host.read_snapshot().await {
        Ok(snapshot) => serialize_context(&snapshot),
        Err(error) => {
            warn!("Workbook read failed, using demo snapshot: {}", error);
            serialize_context(&WorkbookSnapshot::demo())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::snapshot::UsedRange;
    use serde_json::json;

    fn snapshot_with_rows(data_rows: usize) -> WorkbookSnapshot {
        let values: Vec<Vec<Value>> = (0..data_rows)
            .map(|r| vec![json!(format!("item{}", r)), json!(r)])
            .collect();
        let formulas = vec![vec![String::new(); 2]; data_rows];
        WorkbookSnapshot {
            active_sheet_name: "Sheet1".to_string(),
            sheet_names: vec!["Sheet1".to_string(), "Archive".to_string()],
            used_range: Some(UsedRange {
                address: format!("A1:B{}", data_rows),
                row_count: data_rows,
                col_count: 2,
                values,
                formulas,
            }),
        }
    }

    #[test]
    fn truncates_value_preview_at_twenty_rows() {
        let context = serialize_context(&snapshot_with_rows(25));
        assert!(context.contains("Row 20: "));
        assert!(!context.contains("Row 21: "));
        assert!(context.contains("...and 5 more rows"));
    }

    #[test]
    fn no_truncation_note_at_or_under_the_cap() {
        let context = serialize_context(&snapshot_with_rows(20));
        assert!(context.contains("Row 20: "));
        assert!(!context.contains("more rows"));
    }

    #[test]
    fn truncates_formula_preview_at_twenty_cells() {
        let mut snapshot = snapshot_with_rows(25);
        if let Some(range) = snapshot.used_range.as_mut() {
            for (index, row) in range.formulas.iter_mut().enumerate() {
                row[1] = format!("=A{}*2", index + 1);
            }
        }
        let context = serialize_context(&snapshot);
        assert!(context.contains("B20: =A20*2"));
        assert!(!context.contains("B21: "));
        assert!(context.contains("...and 5 more formulas"));
    }

    #[test]
    fn empty_sheet_renders_a_note() {
        let snapshot = WorkbookSnapshot {
            active_sheet_name: "Sheet1".to_string(),
            sheet_names: vec!["Sheet1".to_string()],
            used_range: None,
        };
        let context = serialize_context(&snapshot);
        assert!(context.contains("The active sheet is empty."));
    }

    #[test]
    fn lists_all_sheet_names() {
        let context = serialize_context(&snapshot_with_rows(3));
        assert!(context.contains("Sheets: Sheet1, Archive"));
    }
}
