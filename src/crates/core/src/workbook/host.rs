//! Spreadsheet host interface
//!
//! The host access pattern is batched on both sides: `read_snapshot` issues
//! one load + sync internally, mutation methods only queue changes, and
//! `flush` performs the single commit for a whole operation batch. Each
//! synchronization is a round-trip to the host process, so scattering
//! per-mutation syncs is a correctness regression, not a style choice.

use super::snapshot::WorkbookSnapshot;
use crate::util::errors::SheetMateResult;
use async_trait::async_trait;
use serde_json::Value;

/// Formatting attributes for a range; `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default)]
pub struct RangeFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font_color: Option<String>,
    pub fill_color: Option<String>,
    pub number_format: Option<String>,
}

/// Resolved pivot-table request handed to the host, defaults already applied.
#[derive(Debug, Clone)]
pub struct PivotSpec {
    pub source_sheet: Option<String>,
    pub source_address: String,
    pub destination_sheet: Option<String>,
    pub destination_address: Option<String>,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `(field, aggregation function)` pairs.
    pub values: Vec<(String, String)>,
}

#[async_trait]
pub trait SpreadsheetHost: Send + Sync {
    /// Batched read of the live workbook: one load, one sync, one snapshot.
    async fn read_snapshot(&self) -> SheetMateResult<WorkbookSnapshot>;

    fn set_cell_value(&self, address: &str, value: &Value) -> SheetMateResult<()>;
    fn set_range_values(&self, address: &str, values: &[Vec<Value>]) -> SheetMateResult<()>;
    fn set_cell_formula(&self, address: &str, formula: &str) -> SheetMateResult<()>;
    fn format_range(&self, address: &str, format: &RangeFormat) -> SheetMateResult<()>;

    fn create_table(&self, address: &str, name: Option<&str>, has_headers: bool)
        -> SheetMateResult<()>;
    fn create_chart(&self, address: &str, chart_type: &str, title: Option<&str>)
        -> SheetMateResult<()>;
    fn create_pivot_table(&self, spec: &PivotSpec) -> SheetMateResult<()>;

    fn create_sheet(&self, name: &str) -> SheetMateResult<()>;
    fn delete_sheet(&self, name: &str) -> SheetMateResult<()>;
    fn rename_sheet(&self, name: &str, new_name: &str) -> SheetMateResult<()>;
    fn activate_sheet(&self, name: &str) -> SheetMateResult<()>;
    fn hide_sheet(&self, name: &str) -> SheetMateResult<()>;

    fn sort_range(&self, address: &str, key: usize, ascending: bool) -> SheetMateResult<()>;
    fn apply_filter(&self, address: &str, column: usize, values: Option<&[String]>)
        -> SheetMateResult<()>;

    fn insert_rows(&self, start_row: u32, count: u32) -> SheetMateResult<()>;
    fn delete_rows(&self, start_row: u32, count: u32) -> SheetMateResult<()>;
    fn insert_columns(&self, start_column: &str, count: u32) -> SheetMateResult<()>;
    fn delete_columns(&self, start_column: &str, count: u32) -> SheetMateResult<()>;
    fn autofit_columns(&self, address: Option<&str>) -> SheetMateResult<()>;

    /// Commit every queued mutation in one host synchronization.
    async fn flush(&self) -> SheetMateResult<()>;
}
