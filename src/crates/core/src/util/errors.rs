//! Unified error type for the assistant core

use thiserror::Error;

pub type SheetMateResult<T> = Result<T, SheetMateError>;

#[derive(Error, Debug)]
pub enum SheetMateError {
    /// No API key is configured for the selected provider. Surfaced to the
    /// user before any network call is attempted.
    #[error("No API key configured for provider '{0}'")]
    MissingCredential(String),

    /// Transport failure or non-success HTTP status from an AI backend.
    /// Aborts the turn; conversation history stays unchanged.
    #[error("{0}")]
    Provider(String),

    /// Malformed tool arguments or malformed embedded JSON. Callers treat
    /// this as "zero operations", never as a fatal turn error.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// Spreadsheet host failure (bad address, missing sheet, write rejected).
    #[error("Spreadsheet host error: {0}")]
    Host(String),

    /// Settings or history store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SheetMateError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<reqwest::Error> for SheetMateError {
    fn from(error: reqwest::Error) -> Self {
        Self::Provider(format!("Network error: {}", error))
    }
}
