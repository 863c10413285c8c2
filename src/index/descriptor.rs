//! Index descriptors
//!
//! A descriptor names an index and fixes its ordered (field, direction)
//! key list. Descriptors are persisted in the collection metadata and are
//! the unit of idempotence: re-creating an identical descriptor is a
//! no-op, a different descriptor under the same name is a conflict.

use serde::{Deserialize, Serialize};

/// Sort direction for one index key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One (field, direction) pair of an index key list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Field name
    pub field: String,
    /// Sort direction
    pub order: SortOrder,
}

impl IndexField {
    /// Ascending key on the given field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending key on the given field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Complete index descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Unique name within the collection
    pub name: String,
    /// Ordered key list
    pub keys: Vec<IndexField>,
}

impl IndexDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, keys: Vec<IndexField>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }

    /// Returns the key field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.field.as_str())
    }

    /// Validates the descriptor structure itself.
    ///
    /// Invariants:
    /// - non-empty name
    /// - at least one key field
    /// - no duplicate fields within the key list
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("index name must not be empty".into());
        }

        if self.keys.is_empty() {
            return Err(format!("index '{}' declares no key fields", self.name));
        }

        for (i, key) in self.keys.iter().enumerate() {
            if self.keys[..i].iter().any(|k| k.field == key.field) {
                return Err(format!(
                    "index '{}' declares field '{}' more than once",
                    self.name, key.field
                ));
            }
        }

        Ok(())
    }
}
