//! Index manager
//!
//! Maintains the named secondary indexes of one collection. Trees live in
//! memory and are rebuilt from the stored documents on startup.
//!
//! # API
//!
//! - `create(descriptor, docs)` - Register and build a named index
//! - `apply_write(doc_id, old, new)` - Update trees after a write
//! - `apply_delete(doc_id, body)` - Update trees after a delete
//! - `covering_index(eq_fields, order_by)` - Coverage probe
//! - `lookup(name, eq_values)` - Prefix candidate lookup

use std::collections::HashMap;

use serde_json::Value;

use super::btree::{DocId, IndexKey, IndexTree};
use super::descriptor::{IndexDescriptor, SortOrder};
use super::errors::{IndexError, IndexResult};

/// One named secondary index: its descriptor plus the live tree.
#[derive(Debug)]
pub struct SecondaryIndex {
    descriptor: IndexDescriptor,
    tree: IndexTree,
}

impl SecondaryIndex {
    fn new(descriptor: IndexDescriptor) -> Self {
        Self {
            descriptor,
            tree: IndexTree::new(),
        }
    }

    /// Returns the descriptor
    pub fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    /// Extracts this index's compound key from a document body.
    ///
    /// Absent or unindexable fields key as Missing so every document is
    /// reachable through every index.
    fn key_for(&self, body: &Value) -> Vec<IndexKey> {
        self.descriptor
            .keys
            .iter()
            .map(|k| IndexKey::from_json(body.get(&k.field)))
            .collect()
    }

    /// Returns the number of indexed entries
    pub fn entry_count(&self) -> usize {
        self.tree.entry_count()
    }
}

/// Outcome of a create call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Index was newly built
    Created,
    /// An identical index already existed; call was a no-op
    AlreadyExists,
}

/// Index manager for one collection
#[derive(Debug, Default)]
pub struct IndexManager {
    /// Named indexes
    indexes: HashMap<String, SecondaryIndex>,
}

impl IndexManager {
    /// Creates an empty manager
    pub fn new() -> Self {
        Self {
            indexes: HashMap::new(),
        }
    }

    /// Registers a named index and builds it over the given documents.
    ///
    /// Idempotence:
    /// - identical descriptor under an existing name: no-op
    /// - different descriptor under an existing name: ARK_INDEX_CONFLICT
    ///
    /// Build walks every document; a non-object body halts the build with
    /// ARK_INDEX_BUILD_FAILED and leaves the manager unchanged.
    pub fn create<'a, D>(&mut self, descriptor: IndexDescriptor, docs: D) -> IndexResult<CreateOutcome>
    where
        D: IntoIterator<Item = (&'a DocId, &'a Value)>,
    {
        if let Some(existing) = self.indexes.get(&descriptor.name) {
            if existing.descriptor == descriptor {
                return Ok(CreateOutcome::AlreadyExists);
            }
            return Err(IndexError::conflict(&descriptor.name));
        }

        let name = descriptor.name.clone();
        let mut index = SecondaryIndex::new(descriptor);
        Self::build(&mut index, docs)?;

        self.indexes.insert(name, index);
        Ok(CreateOutcome::Created)
    }

    fn build<'a, D>(index: &mut SecondaryIndex, docs: D) -> IndexResult<()>
    where
        D: IntoIterator<Item = (&'a DocId, &'a Value)>,
    {
        for (doc_id, body) in docs {
            if !body.is_object() {
                return Err(IndexError::build_failed(
                    &index.descriptor.name,
                    format!("document '{}' is not an object", doc_id),
                ));
            }
            let key = index.key_for(body);
            index.tree.insert(key, doc_id.clone());
        }
        Ok(())
    }

    /// Apply a write (insert or update) to all indexes.
    ///
    /// Called AFTER the document store mutation.
    pub fn apply_write(&mut self, doc_id: &str, old_body: Option<&Value>, new_body: &Value) {
        for index in self.indexes.values_mut() {
            if let Some(old) = old_body {
                let old_key = index.key_for(old);
                index.tree.remove(&old_key, doc_id);
            }
            let new_key = index.key_for(new_body);
            index.tree.insert(new_key, doc_id.to_string());
        }
    }

    /// Apply a delete to all indexes.
    pub fn apply_delete(&mut self, doc_id: &str, body: &Value) {
        for index in self.indexes.values_mut() {
            let key = index.key_for(body);
            index.tree.remove(&key, doc_id);
        }
    }

    /// Finds a registered index that can answer an equality-plus-order
    /// access without scanning the whole collection.
    ///
    /// An index covers the access when `eq_fields` pin its leading key
    /// columns (in any order) and the requested order field, if given, is
    /// either one of those pinned columns or the next key column with an
    /// ascending direction.
    ///
    /// Candidates are considered in name order, so the choice is
    /// deterministic. Returns None when no index covers the access.
    pub fn covering_index(
        &self,
        eq_fields: &[&str],
        order_by: Option<&str>,
    ) -> Option<&IndexDescriptor> {
        self.descriptors()
            .into_iter()
            .find(|d| Self::covers(d, eq_fields, order_by))
    }

    fn covers(descriptor: &IndexDescriptor, eq_fields: &[&str], order_by: Option<&str>) -> bool {
        let pinned = eq_fields.len();
        if descriptor.keys.len() < pinned {
            return false;
        }

        if !descriptor.keys[..pinned]
            .iter()
            .all(|k| eq_fields.contains(&k.field.as_str()))
        {
            return false;
        }

        match order_by {
            None => true,
            // A pinned column is constant, so any order satisfies it
            Some(field) if eq_fields.contains(&field) => true,
            Some(field) => descriptor
                .keys
                .get(pinned)
                .map_or(false, |k| k.field == field && k.order == SortOrder::Asc),
        }
    }

    /// Candidate lookup on a named index.
    ///
    /// `eq_values` pin the leading key columns. Returns document ids in
    /// index key order.
    pub fn lookup(&self, name: &str, eq_values: &[&Value]) -> Vec<DocId> {
        let Some(index) = self.indexes.get(name) else {
            return Vec::new();
        };

        let prefix: Vec<IndexKey> = eq_values
            .iter()
            .map(|v| IndexKey::from_json(Some(*v)))
            .collect();

        index.tree.lookup_prefix(&prefix)
    }

    /// Returns the descriptor for a named index, if registered
    pub fn descriptor(&self, name: &str) -> Option<&IndexDescriptor> {
        self.indexes.get(name).map(|i| i.descriptor())
    }

    /// Returns all descriptors, sorted by index name for determinism
    pub fn descriptors(&self) -> Vec<&IndexDescriptor> {
        let mut all: Vec<&IndexDescriptor> =
            self.indexes.values().map(|i| i.descriptor()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Returns the number of registered indexes
    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }
}
