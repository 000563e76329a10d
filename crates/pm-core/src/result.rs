//! Result aliases and the mutation outcome type
//!
//! A mutation can be applied to the in-memory collection and still fail to
//! reach the storage medium. `Applied` keeps those two facts apart so callers
//! can retry or warn instead of assuming the write landed.

use crate::error::PmError;

/// Standard result type for PM dashboard operations
pub type PmResult<T> = Result<T, PmError>;

/// Result type returned by every repository mutator
pub type MutationResult<T> = PmResult<Applied<T>>;

/// Whether the storage medium accepted the write that followed a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Persisted,
    PersistFailed { reason: String },
}

impl WriteStatus {
    pub fn is_persisted(&self) -> bool {
        matches!(self, WriteStatus::Persisted)
    }
}

/// A mutation that was applied in memory, plus the fate of its persistence
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value: T,
    pub status: WriteStatus,
}

impl<T> Applied<T> {
    pub fn persisted(value: T) -> Self {
        Self {
            value,
            status: WriteStatus::Persisted,
        }
    }

    pub fn persist_failed(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            status: WriteStatus::PersistFailed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.status.is_persisted()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Applied<U> {
        Applied {
            value: f(self.value),
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_status() {
        let ok = Applied::persisted(3);
        assert!(ok.is_persisted());
        assert_eq!(ok.into_value(), 3);

        let failed = Applied::persist_failed("x", "quota exceeded");
        assert!(!failed.is_persisted());
        assert_eq!(
            failed.status,
            WriteStatus::PersistFailed {
                reason: "quota exceeded".to_string()
            }
        );
    }

    #[test]
    fn test_applied_map_keeps_status() {
        let failed = Applied::persist_failed(2, "disk full").map(|v| v * 10);
        assert_eq!(failed.value, 20);
        assert!(!failed.is_persisted());
    }
}
