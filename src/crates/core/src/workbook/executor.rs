//! Operation executor
//!
//! Applies a canonical operation list against the spreadsheet host in list
//! order. Each operation runs in its own failure scope: an error is logged
//! into the report and the batch continues. One host flush commits the whole
//! batch afterwards; there is no rollback, so partially applied batches are
//! an accepted outcome.

use super::host::{PivotSpec, RangeFormat, SpreadsheetHost};
use crate::schema::Operation;
use crate::util::errors::SheetMateResult;
use log::warn;

const DEFAULT_CHART_TYPE: &str = "ColumnClustered";
const DEFAULT_PIVOT_FUNCTION: &str = "sum";

/// Outcome of one batch application.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub attempted: usize,
    pub applied: usize,
    /// One entry per failed operation: `(action, error message)`.
    pub errors: Vec<(String, String)>,
}

impl ApplyReport {
    pub fn all_applied(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Apply an operation batch. Never fails as a whole: per-operation errors
/// are collected and the remaining operations still run.
pub async fn apply(host: &dyn SpreadsheetHost, operations: &[Operation]) -> ApplyReport {
    let mut report = ApplyReport::default();

    for operation in operations {
        report.attempted += 1;
        match apply_one(host, operation) {
            Ok(()) => report.applied += 1,
            Err(error) => {
                warn!(
                    "Operation {} failed, continuing batch: {}",
                    operation.action(),
                    error
                );
                report
                    .errors
                    .push((operation.action().to_string(), error.to_string()));
            }
        }
    }

    if let Err(error) = host.flush().await {
        warn!("Host flush failed after batch: {}", error);
        report.errors.push(("flush".to_string(), error.to_string()));
    }

    report
}

fn apply_one(host: &dyn SpreadsheetHost, operation: &Operation) -> SheetMateResult<()> {
    match operation {
        Operation::SetCellValue { address, value } => host.set_cell_value(address, value),
        Operation::SetRangeValues { address, values } => host.set_range_values(address, values),
        Operation::SetCellFormula { address, formula } => host.set_cell_formula(address, formula),
        Operation::FormatRange {
            address,
            bold,
            italic,
            font_color,
            fill_color,
            number_format,
        } => host.format_range(
            address,
            &RangeFormat {
                bold: *bold,
                italic: *italic,
                font_color: font_color.clone(),
                fill_color: fill_color.clone(),
                number_format: number_format.clone(),
            },
        ),
        Operation::CreateTable {
            address,
            name,
            has_headers,
        } => host.create_table(address, name.as_deref(), has_headers.unwrap_or(true)),
        Operation::CreateChart {
            address,
            chart_type,
            title,
        } => host.create_chart(
            address,
            chart_type.as_deref().unwrap_or(DEFAULT_CHART_TYPE),
            title.as_deref(),
        ),
        Operation::CreatePivotTable {
            source_sheet,
            source_address,
            destination_sheet,
            destination_address,
            rows,
            columns,
            values,
        } => host.create_pivot_table(&PivotSpec {
            source_sheet: source_sheet.clone(),
            source_address: source_address.clone(),
            destination_sheet: destination_sheet.clone(),
            destination_address: destination_address.clone(),
            rows: rows.clone(),
            columns: columns.clone(),
            values: values
                .iter()
                .map(|value| {
                    (
                        value.field.clone(),
                        value
                            .function
                            .clone()
                            .unwrap_or_else(|| DEFAULT_PIVOT_FUNCTION.to_string()),
                    )
                })
                .collect(),
        }),
        Operation::CreateSheet { name } => host.create_sheet(name),
        Operation::DeleteSheet { name } => host.delete_sheet(name),
        Operation::RenameSheet { name, new_name } => host.rename_sheet(name, new_name),
        Operation::ActivateSheet { name } => host.activate_sheet(name),
        Operation::HideSheet { name } => host.hide_sheet(name),
        Operation::SortRange {
            address,
            key,
            ascending,
        } => host.sort_range(address, key.unwrap_or(0), ascending.unwrap_or(true)),
        Operation::ApplyFilter {
            address,
            column,
            values,
        } => host.apply_filter(address, column.unwrap_or(0), values.as_deref()),
        Operation::InsertRows { start_row, count } => {
            host.insert_rows(*start_row, count.unwrap_or(1))
        }
        Operation::DeleteRows { start_row, count } => {
            host.delete_rows(*start_row, count.unwrap_or(1))
        }
        Operation::InsertColumns {
            start_column,
            count,
        } => host.insert_columns(start_column, count.unwrap_or(1)),
        Operation::DeleteColumns {
            start_column,
            count,
        } => host.delete_columns(start_column, count.unwrap_or(1)),
        Operation::AutofitColumns { address } => host.autofit_columns(address.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::simulated::SimulatedWorkbook;
    use serde_json::json;

    #[tokio::test]
    async fn invalid_operation_does_not_abort_the_batch() {
        let workbook = SimulatedWorkbook::empty();
        let operations = vec![
            Operation::SetCellValue {
                address: "A1".to_string(),
                value: json!(1),
            },
            Operation::SetCellValue {
                address: "not-an-address".to_string(),
                value: json!(2),
            },
            Operation::SetCellValue {
                address: "A3".to_string(),
                value: json!(3),
            },
        ];

        let report = apply(&workbook, &operations).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.applied, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, "setCellValue");
        assert_eq!(workbook.cell_value("A1"), Some(json!(1)));
        assert_eq!(workbook.cell_value("A3"), Some(json!(3)));
    }

    #[tokio::test]
    async fn batch_flushes_exactly_once() {
        let workbook = SimulatedWorkbook::empty();
        let operations = vec![
            Operation::SetCellValue {
                address: "A1".to_string(),
                value: json!("x"),
            },
            Operation::SetCellValue {
                address: "B1".to_string(),
                value: json!("y"),
            },
        ];

        apply(&workbook, &operations).await;

        // Mutations queue locally; the only sync is the final flush.
        assert_eq!(workbook.sync_count(), 1);
    }

    #[tokio::test]
    async fn sort_range_defaults_to_first_column_ascending() {
        let workbook = SimulatedWorkbook::empty();
        workbook
            .set_range_values(
                "A1:B3",
                &[
                    vec![json!(3), json!("c")],
                    vec![json!(1), json!("a")],
                    vec![json!(2), json!("b")],
                ],
            )
            .expect("seed");

        let report = apply(
            &workbook,
            &[Operation::SortRange {
                address: "A1:B3".to_string(),
                key: None,
                ascending: None,
            }],
        )
        .await;

        assert!(report.all_applied());
        assert_eq!(workbook.cell_value("A1"), Some(json!(1)));
        assert_eq!(workbook.cell_value("A3"), Some(json!(3)));
        assert!(workbook
            .journal()
            .iter()
            .any(|entry| entry.contains("sortRange A1:B3 key=0 ascending=true")));
    }

    #[tokio::test]
    async fn defaults_flow_through_to_the_host() {
        let workbook = SimulatedWorkbook::empty();
        workbook
            .set_range_values("A1:B2", &[vec![json!(1), json!(2)], vec![json!(3), json!(4)]])
            .expect("seed");

        apply(
            &workbook,
            &[
                Operation::CreateChart {
                    address: "A1:B2".to_string(),
                    chart_type: None,
                    title: None,
                },
                Operation::CreateTable {
                    address: "A1:B2".to_string(),
                    name: None,
                    has_headers: None,
                },
            ],
        )
        .await;

        let journal = workbook.journal();
        assert!(journal
            .iter()
            .any(|entry| entry.contains("createChart A1:B2 type=ColumnClustered")));
        assert!(journal
            .iter()
            .any(|entry| entry.contains("hasHeaders=true")));
    }
}
