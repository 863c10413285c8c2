//! Store error types
//!
//! Store errors are pass-through: they preserve the original error codes
//! from lower subsystems (schema, index) and add the store's own codes.
//! Every error carries a taxonomy class so callers can classify failures
//! without matching on code strings.
//!
//! Store-native codes:
//! - ARK_COLLECTION_NOT_FOUND (NotFound)
//! - ARK_COLLECTION_EXISTS (Conflict)
//! - ARK_DOCUMENT_NOT_FOUND (NotFound)
//! - ARK_DUPLICATE_ID (Conflict)
//! - ARK_INVALID_DOCUMENT (Validation)
//! - ARK_INVALID_INDEX (Validation)
//! - ARK_INVALID_COLLECTION (Validation)
//! - ARK_STORAGE_IO (Resource)

use std::fmt;

use crate::index::{IndexError, IndexErrorCode};
use crate::schema::SchemaError;

/// Error taxonomy surfaced to administrative callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Target collection or document absent
    NotFound,
    /// Malformed descriptor or rejected document
    Validation,
    /// Name or id reused with a different meaning
    Conflict,
    /// Engine-side resource failure (index build, storage I/O)
    Resource,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::NotFound => "NOT_FOUND",
            ErrorClass::Validation => "VALIDATION",
            ErrorClass::Conflict => "CONFLICT",
            ErrorClass::Resource => "RESOURCE",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Store error with preserved subsystem error information
#[derive(Debug)]
pub struct StoreError {
    /// Error code string (store-native or passed through)
    code: String,
    /// Human-readable message
    message: String,
    /// Taxonomy class
    class: ErrorClass,
}

impl StoreError {
    /// Target collection absent
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self {
            code: "ARK_COLLECTION_NOT_FOUND".into(),
            message: format!("collection '{}' does not exist", name.into()),
            class: ErrorClass::NotFound,
        }
    }

    /// Collection name already taken
    pub fn collection_exists(name: impl Into<String>) -> Self {
        Self {
            code: "ARK_COLLECTION_EXISTS".into(),
            message: format!("collection '{}' already exists", name.into()),
            class: ErrorClass::Conflict,
        }
    }

    /// Update target absent
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self {
            code: "ARK_DOCUMENT_NOT_FOUND".into(),
            message: format!("document '{}' does not exist", id.into()),
            class: ErrorClass::NotFound,
        }
    }

    /// Insert with an id that is already present
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self {
            code: "ARK_DUPLICATE_ID".into(),
            message: format!("document '{}' already exists", id.into()),
            class: ErrorClass::Conflict,
        }
    }

    /// Document is structurally unusable (not an object, bad _id type)
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self {
            code: "ARK_INVALID_DOCUMENT".into(),
            message: reason.into(),
            class: ErrorClass::Validation,
        }
    }

    /// Collection name is unusable
    pub fn invalid_collection(reason: impl Into<String>) -> Self {
        Self {
            code: "ARK_INVALID_COLLECTION".into(),
            message: reason.into(),
            class: ErrorClass::Validation,
        }
    }

    /// Index descriptor is structurally unusable
    pub fn invalid_index(reason: impl Into<String>) -> Self {
        Self {
            code: "ARK_INVALID_INDEX".into(),
            message: reason.into(),
            class: ErrorClass::Validation,
        }
    }

    /// Filesystem failure while persisting or loading state
    pub fn storage_io(message: impl Into<String>) -> Self {
        Self {
            code: "ARK_STORAGE_IO".into(),
            message: message.into(),
            class: ErrorClass::Resource,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the taxonomy class
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SchemaError> for StoreError {
    fn from(err: SchemaError) -> Self {
        Self {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
            class: ErrorClass::Validation,
        }
    }
}

impl From<IndexError> for StoreError {
    fn from(err: IndexError) -> Self {
        let class = match err.code() {
            IndexErrorCode::ArkIndexConflict => ErrorClass::Conflict,
            IndexErrorCode::ArkIndexBuildFailed => ErrorClass::Resource,
        };
        Self {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
            class,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.class, self.code, self.message)
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
