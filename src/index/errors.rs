//! Index error types
//!
//! Error codes:
//! - ARK_INDEX_CONFLICT (REJECT)
//! - ARK_INDEX_BUILD_FAILED (FATAL)

use std::fmt;

/// Severity levels for index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// System must halt the affected operation
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Index name reused with a different definition
    ArkIndexConflict,
    /// Index build failed
    ArkIndexBuildFailed,
}

impl IndexErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::ArkIndexConflict => "ARK_INDEX_CONFLICT",
            IndexErrorCode::ArkIndexBuildFailed => "ARK_INDEX_BUILD_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            IndexErrorCode::ArkIndexConflict => Severity::Reject,
            IndexErrorCode::ArkIndexBuildFailed => Severity::Fatal,
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error type with full context
#[derive(Debug)]
pub struct IndexError {
    /// Error code
    code: IndexErrorCode,
    /// Human-readable message
    message: String,
    /// Index name if applicable
    index_name: Option<String>,
}

impl IndexError {
    /// Create a name-conflict error
    pub fn conflict(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: IndexErrorCode::ArkIndexConflict,
            message: format!(
                "index '{}' already exists with a different definition",
                name
            ),
            index_name: Some(name),
        }
    }

    /// Create a build-failed error
    pub fn build_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: IndexErrorCode::ArkIndexBuildFailed,
            message: format!("index '{}' build failed: {}", name, reason.into()),
            index_name: Some(name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
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

    /// Returns the index name if applicable
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }
}

impl fmt::Display for IndexError {
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

impl std::error::Error for IndexError {}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
