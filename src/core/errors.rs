use crate::storage::base::StorageError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser error: {0}")]
    BrowserError(#[from] chromiumoxide::error::CdpError),

    #[error("Browser session error: {0}")]
    SessionError(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Structure mismatch in {context}: expected {expected}, found {found}")]
    StructureError {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("Timed out after {after:?} waiting for {what}")]
    TimeoutError { what: String, after: Duration },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

pub type ScraperResult<T> = Result<T, ScraperError>;
