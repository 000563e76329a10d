//! Export/import errors

use std::path::PathBuf;

use pm_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path} is not a JSON file (detected {detected})")]
    UnsupportedFileType { path: PathBuf, detected: String },

    #[error("Import failed: {0}")]
    Import(#[from] StoreError),
}

pub type ExportResult<T> = Result<T, ExportError>;
