//! Persisted collection metadata
//!
//! One JSON file per collection at `metadata/collections/<name>.json`,
//! holding the validator document and the index catalog. This file is the
//! durable result of the administrative calls; document data lives
//! separately under `data/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::index::IndexDescriptor;
use crate::schema::ValidatorSpec;

/// The validator currently attached to a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorMeta {
    /// The descriptor being enforced
    pub spec: ValidatorSpec,
    /// When this descriptor replaced its predecessor
    pub applied_at: DateTime<Utc>,
}

/// Complete persisted metadata of one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    /// Collection name
    pub name: String,
    /// When the collection was created
    pub created_at: DateTime<Utc>,
    /// Attached validator, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorMeta>,
    /// Index catalog in creation order
    #[serde(default)]
    pub indexes: Vec<IndexDescriptor>,
}

impl CollectionMeta {
    /// Creates metadata for a fresh collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            validator: None,
            indexes: Vec::new(),
        }
    }
}
