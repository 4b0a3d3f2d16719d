//! Infrastructure layer: AI backend clients and storage collaborators.

pub mod ai;
pub mod storage;
