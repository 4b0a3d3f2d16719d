//! Workbook module
//!
//! Spreadsheet-facing half of the assistant: A1 addressing, the read-only
//! snapshot model, the batched host interface, the bounded context
//! serializer, and the per-operation isolated executor.

pub mod address;
pub mod context;
pub mod executor;
pub mod host;
pub mod simulated;
pub mod snapshot;

pub use address::{column_index, column_letters, CellRef, RangeRef};
pub use context::{build_context, serialize_context};
pub use executor::{apply, ApplyReport};
pub use host::{PivotSpec, RangeFormat, SpreadsheetHost};
pub use simulated::SimulatedWorkbook;
pub use snapshot::{UsedRange, WorkbookSnapshot};
