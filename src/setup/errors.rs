//! Provisioning errors
//!
//! Thin wrappers that record which administrative step failed; the engine
//! error itself passes through untouched.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for provisioning
pub type SetupResult<T> = Result<T, SetupError>;

/// Provisioning errors
#[derive(Debug, Error)]
pub enum SetupError {
    /// The apply-validator call failed
    #[error("applying validator to '{collection}' failed: {source}")]
    ApplyValidator {
        collection: String,
        #[source]
        source: StoreError,
    },

    /// A create-index call failed
    #[error("creating index '{index}' on '{collection}' failed: {source}")]
    CreateIndex {
        collection: String,
        index: String,
        #[source]
        source: StoreError,
    },
}

impl SetupError {
    /// Returns the underlying engine error
    pub fn store_error(&self) -> &StoreError {
        match self {
            SetupError::ApplyValidator { source, .. } => source,
            SetupError::CreateIndex { source, .. } => source,
        }
    }
}
