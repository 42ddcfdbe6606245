//! Form validation error types
//!
//! Errors are keyed by field name. Errors that concern the record as a whole
//! are stored under [`ValidationErrors::NON_FIELD_ERRORS`].

use std::collections::BTreeMap;

/// A single validation error for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The error message
    pub message: String,
    /// Optional error code for programmatic handling
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error with just a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create a field error with a message and code
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Collection of validation errors keyed by field name
///
/// # Examples
///
/// ```rust
/// use acton_categories::forms::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add_with_code("category_name", "This field is required.", "required");
/// errors.add(ValidationErrors::NON_FIELD_ERRORS, "Names must be unique.");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.non_field_errors().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    /// Key for errors not tied to a single field
    pub const NON_FIELD_ERRORS: &'static str = "__all__";

    /// Create a new empty error collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(FieldError::new(message));
    }

    /// Add an error with a code for a field
    pub fn add_with_code(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(FieldError::with_code(message, code));
    }

    /// Check if there are any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if a specific field has errors
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get all errors for a specific field
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Errors stored under [`Self::NON_FIELD_ERRORS`]
    #[must_use]
    pub fn non_field_errors(&self) -> &[FieldError] {
        self.for_field(Self::NON_FIELD_ERRORS)
    }

    /// Get the total number of errors
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_with_code() {
        let error = FieldError::with_code("This field is required.", "required");
        assert_eq!(error.to_string(), "This field is required.");
        assert_eq!(error.code.as_deref(), Some("required"));
    }

    #[test]
    fn test_validation_errors_add() {
        let mut errors = ValidationErrors::new();
        errors.add("category_name", "This field is required.");
        errors.add("category_name", "Too short.");

        assert!(errors.has_errors());
        assert!(errors.has_field_error("category_name"));
        assert!(!errors.has_field_error("some_field"));
        assert_eq!(errors.for_field("category_name").len(), 2);
        assert_eq!(errors.count(), 2);
    }

    #[test]
    fn test_non_field_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.non_field_errors().is_empty());

        errors.add(ValidationErrors::NON_FIELD_ERRORS, "Conflicting values.");
        assert_eq!(errors.non_field_errors()[0].message, "Conflicting values.");
    }
}
