//! Store-level errors

use pm_core::error::{PmError, ValidationErrors};
use thiserror::Error;

use crate::collection::{Collection, Version};
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage medium error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error in {collection}: {source}")]
    Serialization {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot is not valid JSON: {0}")]
    MalformedSnapshot(#[source] serde_json::Error),

    #[error("Snapshot rejected: {0}")]
    InvalidSnapshot(ValidationErrors),

    #[error("{collection} changed underneath us (expected version {expected}, found {found})")]
    VersionMismatch {
        collection: Collection,
        expected: Version,
        found: Version,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, StoreError::VersionMismatch { .. })
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::Storage(StorageError::QuotaExceeded { .. }))
    }
}

impl From<StoreError> for PmError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionMismatch { .. } => PmError::conflict(err.to_string()),
            StoreError::InvalidSnapshot(errors) => PmError::Validation(errors),
            StoreError::MalformedSnapshot(e) => PmError::InvalidInput(e.to_string()),
            other => PmError::Storage(other.to_string()),
        }
    }
}
