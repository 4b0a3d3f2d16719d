//! Operation schema module
//!
//! Single source of truth for the spreadsheet operation vocabulary: the
//! closed `Operation` union, the action catalog, and the two renderings of
//! that catalog (native tool definitions and the textual fenced-block
//! protocol). Both renderings derive from the same catalog table; they are
//! never edited independently.

pub mod catalog;
pub mod operation;
pub mod wire;

pub use catalog::{text_protocol, tool_definitions, ActionSpec};
pub use operation::{Operation, PivotValueField};
pub use wire::{
    encode_operations, extract_fenced_operations, operation_from_parts, parse_operations,
    FENCE_TAG,
};
