//! Core error types for the PM dashboard

use std::collections::BTreeMap;
use thiserror::Error;

use crate::traits::Id;

/// Core error type for every repository-level operation
#[derive(Error, Debug)]
pub enum PmError {
    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: Id },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PmError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        PmError::NotFound { entity, id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PmError::Conflict {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PmError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PmError::Conflict { .. })
    }

    /// Stable machine-readable code, used by the CLI for messages and exit codes
    pub fn error_code(&self) -> &'static str {
        match self {
            PmError::NotFound { .. } => "not_found",
            PmError::Conflict { .. } => "conflict",
            PmError::Validation(_) => "validation_failed",
            PmError::Storage(_) => "storage_error",
            PmError::Serialization(_) => "serialization_error",
            PmError::InvalidInput(_) => "invalid_input",
            PmError::Internal(_) => "internal_error",
        }
    }
}

/// Validation errors collection: field name -> messages
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("{}", self.full_messages().join("; "))]
pub struct ValidationErrors {
    /// Field-specific errors
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_and_merge() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("name", "can't be blank");
        let mut other = ValidationErrors::new();
        other.add("name", "is too long");
        other.add_base("snapshot rejected");
        errors.merge(other);

        assert!(errors.has_error("name"));
        assert_eq!(errors.get("name").map(Vec::len), Some(2));
        assert_eq!(
            errors.full_messages(),
            vec![
                "snapshot rejected".to_string(),
                "name can't be blank".to_string(),
                "name is too long".to_string(),
            ]
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("email", "is invalid");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PmError::not_found("Project", 2).error_code(), "not_found");
        assert!(PmError::not_found("Project", 2).is_not_found());
        assert!(PmError::conflict("stale").is_conflict());
        assert_eq!(
            PmError::not_found("Project", 2).to_string(),
            "Not found: Project with id=2"
        );
    }
}
