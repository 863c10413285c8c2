//! Schema error types
//!
//! Error codes:
//! - ARK_MALFORMED_VALIDATOR (REJECT)
//! - ARK_DOCUMENT_REJECTED (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Validator descriptor violates its structural invariants
    ArkMalformedValidator,
    /// Document violates the collection validator
    ArkDocumentRejected,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::ArkMalformedValidator => "ARK_MALFORMED_VALIDATOR",
            SchemaErrorCode::ArkDocumentRejected => "ARK_DOCUMENT_REJECTED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone)]
pub struct ValidationDetails {
    /// Field name the check failed on
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn out_of_range(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Validation details if applicable
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create a malformed-validator error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::ArkMalformedValidator,
            message: reason.into(),
            details: None,
        }
    }

    /// Create a document-rejected error
    pub fn rejected(details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ArkDocumentRejected,
            message: details.to_string(),
            details: Some(details),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            SchemaErrorCode::ArkMalformedValidator.code(),
            "ARK_MALFORMED_VALIDATOR"
        );
        assert_eq!(
            SchemaErrorCode::ArkDocumentRejected.code(),
            "ARK_DOCUMENT_REJECTED"
        );
    }

    #[test]
    fn test_rejected_carries_details() {
        let err = SchemaError::rejected(ValidationDetails::missing_field("breed"));
        assert_eq!(err.code().code(), "ARK_DOCUMENT_REJECTED");
        assert_eq!(err.details().unwrap().field, "breed");
        assert!(err.message().contains("breed"));
    }

    #[test]
    fn test_error_display() {
        let err = SchemaError::malformed("field 'age' declares no allowed types");
        let display = format!("{}", err);
        assert!(display.contains("ARK_MALFORMED_VALIDATOR"));
        assert!(display.contains("REJECT"));
    }
}
