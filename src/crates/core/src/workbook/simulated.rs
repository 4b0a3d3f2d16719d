//! In-memory spreadsheet host
//!
//! Stands in for a live spreadsheet when none is attached. Mutations apply
//! to an in-memory grid and are journaled, so headless runs and tests can
//! observe exactly what a batch would have done. `flush` models the single
//! batched host synchronization.

use super::address::{self, CellRef};
use super::host::{PivotSpec, RangeFormat, SpreadsheetHost};
use super::snapshot::{UsedRange, WorkbookSnapshot};
use crate::util::errors::{SheetMateError, SheetMateResult};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct Cell {
    value: Value,
    formula: Option<String>,
}

#[derive(Debug)]
struct SheetState {
    name: String,
    hidden: bool,
    cells: BTreeMap<(usize, usize), Cell>,
}

impl SheetState {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            cells: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
struct Inner {
    sheets: Vec<SheetState>,
    active: usize,
    journal: Vec<String>,
    staged: usize,
    sync_count: usize,
}

pub struct SimulatedWorkbook {
    inner: Mutex<Inner>,
}

impl Default for SimulatedWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedWorkbook {
    /// Workbook pre-seeded with the fixed demo data so prompts have real
    /// content to reference.
    pub fn new() -> Self {
        let workbook = Self::empty();
        let demo = WorkbookSnapshot::demo();
        if let Some(range) = demo.used_range {
            let mut inner = workbook.lock();
            let sheet = &mut inner.sheets[0];
            for (row, (value_row, formula_row)) in
                range.values.iter().zip(range.formulas.iter()).enumerate()
            {
                for (col, value) in value_row.iter().enumerate() {
                    let formula = formula_row.get(col).filter(|f| !f.is_empty()).cloned();
                    sheet.cells.insert(
                        (row, col),
                        Cell {
                            value: value.clone(),
                            formula,
                        },
                    );
                }
            }
        }
        workbook
    }

    pub fn empty() -> Self {
        Self {
            inner: Mutex::new(Inner {
                sheets: vec![SheetState::new("Sheet1")],
                active: 0,
                journal: Vec::new(),
                staged: 0,
                sync_count: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("workbook lock poisoned")
    }

    /// Journal of every mutation applied so far, oldest first.
    pub fn journal(&self) -> Vec<String> {
        self.lock().journal.clone()
    }

    /// Number of host synchronizations performed (snapshot reads + flushes).
    pub fn sync_count(&self) -> usize {
        self.lock().sync_count
    }

    /// Current value of a cell on the active sheet, for assertions.
    pub fn cell_value(&self, address: &str) -> Option<Value> {
        let cell = address::parse_cell(address).ok()?;
        let inner = self.lock();
        let sheet = &inner.sheets[inner.active];
        sheet
            .cells
            .get(&(cell.row, cell.col))
            .map(|c| c.value.clone())
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.lock().sheets.iter().map(|s| s.name.clone()).collect()
    }
}

fn record(inner: &mut Inner, entry: String) {
    debug!("Simulated workbook: {}", entry);
    inner.journal.push(entry);
    inner.staged += 1;
}

fn sheet_index(inner: &Inner, name: &str) -> SheetMateResult<usize> {
    inner
        .sheets
        .iter()
        .position(|s| s.name == name)
        .ok_or_else(|| SheetMateError::host(format!("Sheet not found: {}", name)))
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a
            .as_str()
            .map(str::to_owned)
            .unwrap_or_else(|| a.to_string())
            .cmp(&b.as_str().map(str::to_owned).unwrap_or_else(|| b.to_string())),
    }
}

#[async_trait]
impl SpreadsheetHost for SimulatedWorkbook {
    async fn read_snapshot(&self) -> SheetMateResult<WorkbookSnapshot> {
        let mut inner = self.lock();
        inner.sync_count += 1;
        let active = inner.active;
        let sheet = &inner.sheets[active];

        let used_range = if sheet.cells.is_empty() {
            None
        } else {
            let max_row = sheet.cells.keys().map(|(r, _)| *r).max().unwrap_or(0);
            let max_col = sheet.cells.keys().map(|(_, c)| *c).max().unwrap_or(0);
            let mut values = vec![vec![Value::Null; max_col + 1]; max_row + 1];
            let mut formulas = vec![vec![String::new(); max_col + 1]; max_row + 1];
            for ((row, col), cell) in &sheet.cells {
                values[*row][*col] = cell.value.clone();
                if let Some(formula) = &cell.formula {
                    formulas[*row][*col] = formula.clone();
                }
            }
            Some(UsedRange {
                address: address::format_range(address::RangeRef {
                    start: CellRef { row: 0, col: 0 },
                    end: CellRef {
                        row: max_row,
                        col: max_col,
                    },
                }),
                row_count: max_row + 1,
                col_count: max_col + 1,
                values,
                formulas,
            })
        };

        Ok(WorkbookSnapshot {
            active_sheet_name: sheet.name.clone(),
            sheet_names: inner.sheets.iter().map(|s| s.name.clone()).collect(),
            used_range,
        })
    }

    fn set_cell_value(&self, address_str: &str, value: &Value) -> SheetMateResult<()> {
        let cell = address::parse_cell(address_str)?;
        let mut inner = self.lock();
        let active = inner.active;
        inner.sheets[active].cells.insert(
            (cell.row, cell.col),
            Cell {
                value: value.clone(),
                formula: None,
            },
        );
        record(&mut inner, format!("setCellValue {} = {}", address_str, value));
        Ok(())
    }

    fn set_range_values(&self, address_str: &str, values: &[Vec<Value>]) -> SheetMateResult<()> {
        let range = address::parse_range(address_str)?;
        if values.len() != range.row_count()
            || values.iter().any(|row| row.len() != range.col_count())
        {
            return Err(SheetMateError::host(format!(
                "Value grid does not match range dimensions for {}",
                address_str
            )));
        }
        let mut inner = self.lock();
        let active = inner.active;
        for (r, row) in values.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                inner.sheets[active].cells.insert(
                    (range.start.row + r, range.start.col + c),
                    Cell {
                        value: value.clone(),
                        formula: None,
                    },
                );
            }
        }
        record(
            &mut inner,
            format!(
                "setRangeValues {} ({}x{})",
                address_str,
                range.row_count(),
                range.col_count()
            ),
        );
        Ok(())
    }

    fn set_cell_formula(&self, address_str: &str, formula: &str) -> SheetMateResult<()> {
        let cell = address::parse_cell(address_str)?;
        let mut inner = self.lock();
        let active = inner.active;
        inner.sheets[active].cells.insert(
            (cell.row, cell.col),
            Cell {
                value: Value::Null,
                formula: Some(formula.to_string()),
            },
        );
        record(
            &mut inner,
            format!("setCellFormula {} = {}", address_str, formula),
        );
        Ok(())
    }

    fn format_range(&self, address_str: &str, format: &RangeFormat) -> SheetMateResult<()> {
        address::parse_range(address_str)?;
        let mut inner = self.lock();
        record(
            &mut inner,
            format!("formatRange {} {:?}", address_str, format),
        );
        Ok(())
    }

    fn create_table(
        &self,
        address_str: &str,
        name: Option<&str>,
        has_headers: bool,
    ) -> SheetMateResult<()> {
        address::parse_range(address_str)?;
        let mut inner = self.lock();
        record(
            &mut inner,
            format!(
                "createTable {} name={} hasHeaders={}",
                address_str,
                name.unwrap_or("<auto>"),
                has_headers
            ),
        );
        Ok(())
    }

    fn create_chart(
        &self,
        address_str: &str,
        chart_type: &str,
        title: Option<&str>,
    ) -> SheetMateResult<()> {
        address::parse_range(address_str)?;
        let mut inner = self.lock();
        record(
            &mut inner,
            format!(
                "createChart {} type={} title={}",
                address_str,
                chart_type,
                title.unwrap_or("<none>")
            ),
        );
        Ok(())
    }

    fn create_pivot_table(&self, spec: &PivotSpec) -> SheetMateResult<()> {
        address::parse_range(&spec.source_address)?;
        let mut inner = self.lock();
        record(
            &mut inner,
            format!(
                "createPivotTable source={} rows={:?} columns={:?} values={:?}",
                spec.source_address, spec.rows, spec.columns, spec.values
            ),
        );
        Ok(())
    }

    fn create_sheet(&self, name: &str) -> SheetMateResult<()> {
        let mut inner = self.lock();
        if sheet_index(&inner, name).is_ok() {
            return Err(SheetMateError::host(format!(
                "Sheet already exists: {}",
                name
            )));
        }
        inner.sheets.push(SheetState::new(name));
        record(&mut inner, format!("createSheet {}", name));
        Ok(())
    }

    fn delete_sheet(&self, name: &str) -> SheetMateResult<()> {
        let mut inner = self.lock();
        let index = sheet_index(&inner, name)?;
        if inner.sheets.len() == 1 {
            return Err(SheetMateError::host("Cannot delete the last sheet"));
        }
        inner.sheets.remove(index);
        if inner.active >= inner.sheets.len() {
            inner.active = 0;
        }
        record(&mut inner, format!("deleteSheet {}", name));
        Ok(())
    }

    fn rename_sheet(&self, name: &str, new_name: &str) -> SheetMateResult<()> {
        let mut inner = self.lock();
        if sheet_index(&inner, new_name).is_ok() {
            return Err(SheetMateError::host(format!(
                "Sheet already exists: {}",
                new_name
            )));
        }
        let index = sheet_index(&inner, name)?;
        inner.sheets[index].name = new_name.to_string();
        record(&mut inner, format!("renameSheet {} -> {}", name, new_name));
        Ok(())
    }

    fn activate_sheet(&self, name: &str) -> SheetMateResult<()> {
        let mut inner = self.lock();
        let index = sheet_index(&inner, name)?;
        inner.active = index;
        record(&mut inner, format!("activateSheet {}", name));
        Ok(())
    }

    fn hide_sheet(&self, name: &str) -> SheetMateResult<()> {
        let mut inner = self.lock();
        let index = sheet_index(&inner, name)?;
        let visible = inner.sheets.iter().filter(|s| !s.hidden).count();
        if visible <= 1 {
            return Err(SheetMateError::host("Cannot hide the only visible sheet"));
        }
        inner.sheets[index].hidden = true;
        if inner.active == index {
            inner.active = inner
                .sheets
                .iter()
                .position(|s| !s.hidden)
                .unwrap_or(0);
        }
        record(&mut inner, format!("hideSheet {}", name));
        Ok(())
    }

    fn sort_range(&self, address_str: &str, key: usize, ascending: bool) -> SheetMateResult<()> {
        let range = address::parse_range(address_str)?;
        if key >= range.col_count() {
            return Err(SheetMateError::host(format!(
                "Sort key {} outside range {}",
                key, address_str
            )));
        }
        let mut inner = self.lock();
        let active = inner.active;

        let mut rows: Vec<Vec<Cell>> = (range.start.row..=range.end.row)
            .map(|r| {
                (range.start.col..=range.end.col)
                    .map(|c| {
                        inner.sheets[active]
                            .cells
                            .get(&(r, c))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        rows.sort_by(|a, b| {
            let ordering = compare_values(&a[key].value, &b[key].value);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        for (offset, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                inner.sheets[active]
                    .cells
                    .insert((range.start.row + offset, range.start.col + c), cell);
            }
        }

        record(
            &mut inner,
            format!(
                "sortRange {} key={} ascending={}",
                address_str, key, ascending
            ),
        );
        Ok(())
    }

    fn apply_filter(
        &self,
        address_str: &str,
        column: usize,
        values: Option<&[String]>,
    ) -> SheetMateResult<()> {
        address::parse_range(address_str)?;
        let mut inner = self.lock();
        record(
            &mut inner,
            format!(
                "applyFilter {} column={} values={:?}",
                address_str, column, values
            ),
        );
        Ok(())
    }

    fn insert_rows(&self, start_row: u32, count: u32) -> SheetMateResult<()> {
        if start_row == 0 {
            return Err(SheetMateError::host("Row numbers are 1-based"));
        }
        let pivot = (start_row - 1) as usize;
        let shift = count as usize;
        let mut inner = self.lock();
        let active = inner.active;
        let cells = std::mem::take(&mut inner.sheets[active].cells);
        inner.sheets[active].cells = cells
            .into_iter()
            .map(|((row, col), cell)| {
                let row = if row >= pivot { row + shift } else { row };
                ((row, col), cell)
            })
            .collect();
        record(&mut inner, format!("insertRows {} count={}", start_row, count));
        Ok(())
    }

    fn delete_rows(&self, start_row: u32, count: u32) -> SheetMateResult<()> {
        if start_row == 0 {
            return Err(SheetMateError::host("Row numbers are 1-based"));
        }
        let pivot = (start_row - 1) as usize;
        let shift = count as usize;
        let mut inner = self.lock();
        let active = inner.active;
        let cells = std::mem::take(&mut inner.sheets[active].cells);
        inner.sheets[active].cells = cells
            .into_iter()
            .filter_map(|((row, col), cell)| {
                if row >= pivot && row < pivot + shift {
                    None
                } else if row >= pivot + shift {
                    Some(((row - shift, col), cell))
                } else {
                    Some(((row, col), cell))
                }
            })
            .collect();
        record(&mut inner, format!("deleteRows {} count={}", start_row, count));
        Ok(())
    }

    fn insert_columns(&self, start_column: &str, count: u32) -> SheetMateResult<()> {
        let pivot = address::column_index(start_column)?;
        let shift = count as usize;
        let mut inner = self.lock();
        let active = inner.active;
        let cells = std::mem::take(&mut inner.sheets[active].cells);
        inner.sheets[active].cells = cells
            .into_iter()
            .map(|((row, col), cell)| {
                let col = if col >= pivot { col + shift } else { col };
                ((row, col), cell)
            })
            .collect();
        record(
            &mut inner,
            format!("insertColumns {} count={}", start_column, count),
        );
        Ok(())
    }

    fn delete_columns(&self, start_column: &str, count: u32) -> SheetMateResult<()> {
        let pivot = address::column_index(start_column)?;
        let shift = count as usize;
        let mut inner = self.lock();
        let active = inner.active;
        let cells = std::mem::take(&mut inner.sheets[active].cells);
        inner.sheets[active].cells = cells
            .into_iter()
            .filter_map(|((row, col), cell)| {
                if col >= pivot && col < pivot + shift {
                    None
                } else if col >= pivot + shift {
                    Some(((row, col - shift), cell))
                } else {
                    Some(((row, col), cell))
                }
            })
            .collect();
        record(
            &mut inner,
            format!("deleteColumns {} count={}", start_column, count),
        );
        Ok(())
    }

    fn autofit_columns(&self, address_str: Option<&str>) -> SheetMateResult<()> {
        if let Some(address_str) = address_str {
            address::parse_range(address_str)?;
        }
        let mut inner = self.lock();
        record(
            &mut inner,
            format!("autofitColumns {}", address_str.unwrap_or("<used range>")),
        );
        Ok(())
    }

    async fn flush(&self) -> SheetMateResult<()> {
        let mut inner = self.lock();
        inner.sync_count += 1;
        debug!(
            "Simulated workbook flush: committed {} staged mutations",
            inner.staged
        );
        inner.staged = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn snapshot_covers_the_seeded_demo_data() {
        let workbook = SimulatedWorkbook::new();
        let snapshot = workbook.read_snapshot().await.expect("snapshot");
        let range = snapshot.used_range.expect("used range");
        assert_eq!(range.address, "A1:D4");
        assert_eq!(range.values[0][0], json!("Product"));
        assert_eq!(range.formulas[1][3], "=B2*C2");
    }

    #[test]
    fn sort_reorders_rows_in_the_grid() {
        let workbook = SimulatedWorkbook::empty();
        workbook
            .set_range_values(
                "A1:B3",
                &[
                    vec![json!("b"), json!(2)],
                    vec![json!("c"), json!(3)],
                    vec![json!("a"), json!(1)],
                ],
            )
            .expect("seed");
        workbook.sort_range("A1:B3", 0, true).expect("sort");
        assert_eq!(workbook.cell_value("A1"), Some(json!("a")));
        assert_eq!(workbook.cell_value("B1"), Some(json!(1)));
        assert_eq!(workbook.cell_value("A3"), Some(json!("c")));
    }

    #[test]
    fn insert_rows_shifts_existing_cells_down() {
        let workbook = SimulatedWorkbook::empty();
        workbook.set_cell_value("A1", &json!("x")).expect("seed");
        workbook.set_cell_value("A2", &json!("y")).expect("seed");
        workbook.insert_rows(2, 2).expect("insert");
        assert_eq!(workbook.cell_value("A1"), Some(json!("x")));
        assert_eq!(workbook.cell_value("A2"), None);
        assert_eq!(workbook.cell_value("A4"), Some(json!("y")));
    }

    #[test]
    fn delete_last_sheet_is_rejected() {
        let workbook = SimulatedWorkbook::empty();
        assert!(workbook.delete_sheet("Sheet1").is_err());
        workbook.create_sheet("Data").expect("create");
        workbook.delete_sheet("Sheet1").expect("delete");
        assert_eq!(workbook.sheet_names(), vec!["Data".to_string()]);
    }
}
