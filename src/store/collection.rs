//! In-memory collection state
//!
//! A collection holds its documents, the attached validator, and the live
//! index trees. All validator enforcement and index maintenance happens
//! here; persistence is the database's job.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::index::{CreateOutcome, DocId, IndexDescriptor, IndexManager};
use crate::schema::{DocumentValidator, EnforcementLevel, ValidatorSpec};

use super::errors::{StoreError, StoreResult};
use super::meta::{CollectionMeta, ValidatorMeta};

/// Result of an index-covered read
#[derive(Debug)]
pub struct IndexedRead {
    /// Name of the index that served the read
    pub index: String,
    /// Matching documents in index key order
    pub documents: Vec<Value>,
}

/// One collection: documents + validator + indexes
pub struct Collection {
    meta: CollectionMeta,
    documents: BTreeMap<DocId, Value>,
    indexes: IndexManager,
}

impl Collection {
    /// Creates a fresh empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: CollectionMeta::new(name),
            documents: BTreeMap::new(),
            indexes: IndexManager::new(),
        }
    }

    /// Restores a collection from persisted metadata and documents.
    ///
    /// Rebuilds every index in the catalog over the loaded documents.
    pub fn from_parts(
        meta: CollectionMeta,
        documents: BTreeMap<DocId, Value>,
    ) -> StoreResult<Self> {
        let mut indexes = IndexManager::new();
        for descriptor in &meta.indexes {
            indexes.create(descriptor.clone(), &documents)?;
        }

        Ok(Self {
            meta,
            documents,
            indexes,
        })
    }

    /// Returns the collection name
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Returns the persisted metadata
    pub fn meta(&self) -> &CollectionMeta {
        &self.meta
    }

    /// Returns the attached validator, if any
    pub fn validator(&self) -> Option<&ValidatorSpec> {
        self.meta.validator.as_ref().map(|v| &v.spec)
    }

    /// Returns the documents
    pub fn documents(&self) -> &BTreeMap<DocId, Value> {
        &self.documents
    }

    /// Returns the number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Replaces the collection's validator with the supplied descriptor.
    ///
    /// The descriptor's structural invariants are checked first
    /// (ARK_MALFORMED_VALIDATOR on violation). Existing documents are never
    /// re-validated.
    pub fn apply_validator(&mut self, spec: ValidatorSpec) -> StoreResult<()> {
        spec.validate_structure()
            .map_err(|reason| StoreError::from(crate::schema::SchemaError::malformed(reason)))?;

        self.meta.validator = Some(ValidatorMeta {
            spec,
            applied_at: Utc::now(),
        });

        Ok(())
    }

    /// Registers a named index and builds it over the current documents.
    ///
    /// Identical re-creation is a no-op; a different descriptor under an
    /// existing name is ARK_INDEX_CONFLICT. The catalog only changes when
    /// the build succeeds.
    pub fn create_index(&mut self, descriptor: IndexDescriptor) -> StoreResult<CreateOutcome> {
        descriptor
            .validate_structure()
            .map_err(StoreError::invalid_index)?;

        let outcome = self.indexes.create(descriptor.clone(), &self.documents)?;

        if outcome == CreateOutcome::Created {
            self.meta.indexes.push(descriptor);
        }

        Ok(outcome)
    }

    /// Inserts a document.
    ///
    /// `_id` is generated (UUID v4) when absent; inserts are validated
    /// whenever a validator is attached, regardless of enforcement level.
    pub fn insert(&mut self, mut document: Value) -> StoreResult<DocId> {
        let obj = document
            .as_object_mut()
            .ok_or_else(|| StoreError::invalid_document("document must be an object"))?;

        let doc_id = match obj.get("_id") {
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(StoreError::invalid_document(format!(
                    "_id must be a string, got {}",
                    other
                )));
            }
            None => {
                let id = Uuid::new_v4().to_string();
                obj.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
        };

        if self.documents.contains_key(&doc_id) {
            return Err(StoreError::duplicate_id(doc_id));
        }

        if let Some(validator) = &self.meta.validator {
            DocumentValidator::check(&validator.spec, &document)?;
        }

        self.indexes.apply_write(&doc_id, None, &document);
        self.documents.insert(doc_id.clone(), document);

        Ok(doc_id)
    }

    /// Replaces an existing document.
    ///
    /// Enforcement level decides whether the validator runs:
    /// - Strict: always
    /// - Moderate: only when the pre-image already satisfies the validator
    pub fn update(&mut self, document: Value) -> StoreResult<()> {
        let doc_id = document
            .get("_id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| StoreError::invalid_document("document missing string _id"))?;

        let old = self
            .documents
            .get(&doc_id)
            .cloned()
            .ok_or_else(|| StoreError::document_not_found(&doc_id))?;

        if let Some(validator) = &self.meta.validator {
            let must_check = match validator.spec.level {
                EnforcementLevel::Strict => true,
                EnforcementLevel::Moderate => DocumentValidator::satisfies(&validator.spec, &old),
            };
            if must_check {
                DocumentValidator::check(&validator.spec, &document)?;
            }
        }

        self.indexes.apply_write(&doc_id, Some(&old), &document);
        self.documents.insert(doc_id, document);

        Ok(())
    }

    /// Deletes a document by id. Returns true if it existed.
    pub fn delete(&mut self, doc_id: &str) -> bool {
        match self.documents.remove(doc_id) {
            Some(body) => {
                self.indexes.apply_delete(doc_id, &body);
                true
            }
            None => false,
        }
    }

    /// Reads documents through a covering index, without a collection scan.
    ///
    /// `eq` pins fields to exact values (fields must be distinct); when
    /// `order_by` is given, the documents come back ascending on that
    /// field. Returns None when no registered index covers the access,
    /// i.e. answering it would require scanning the whole collection.
    pub fn read_via_index(
        &self,
        eq: &[(&str, &Value)],
        order_by: Option<&str>,
    ) -> Option<IndexedRead> {
        let eq_fields: Vec<&str> = eq.iter().map(|(field, _)| *field).collect();
        let descriptor = self.indexes.covering_index(&eq_fields, order_by)?;

        // Prefix values in the descriptor's column order
        let values: Vec<&Value> = descriptor.keys[..eq.len()]
            .iter()
            .filter_map(|k| {
                eq.iter()
                    .find(|(field, _)| *field == k.field)
                    .map(|(_, value)| *value)
            })
            .collect();

        let name = descriptor.name.clone();
        let documents = self
            .indexes
            .lookup(&name, &values)
            .into_iter()
            .filter_map(|id| self.documents.get(&id).cloned())
            .collect();

        Some(IndexedRead {
            index: name,
            documents,
        })
    }
}
