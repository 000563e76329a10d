use pm_core::error::ValidationErrors;

/// Flatten `validator` output into the crate-wide error collection
pub(crate) fn collect_errors(result: Result<(), validator::ValidationErrors>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Err(found) = result {
        for (field, field_errors) in found.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                errors.add(field.to_string(), message);
            }
        }
    }
    errors
}
