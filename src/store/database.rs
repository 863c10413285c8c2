//! Database: collections + persistence
//!
//! The database owns the named collections of one data directory and is
//! the administrative surface the configurator and the CLI talk to.
//!
//! Directory layout:
//! - `<data_dir>/metadata/collections/<name>.json` - validator + index catalog
//! - `<data_dir>/data/<name>.ndjson` - documents, one JSON object per line
//!
//! Every mutation rewrites the affected collection's files; indexes are
//! in-memory and rebuilt from the document file on open.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::index::{CreateOutcome, DocId, IndexDescriptor};
use crate::schema::ValidatorSpec;

use super::collection::Collection;
use super::errors::{StoreError, StoreResult};
use super::meta::CollectionMeta;

/// Database over one data directory
pub struct Database {
    data_dir: PathBuf,
    collections: BTreeMap<String, Collection>,
}

impl Database {
    /// Creates the directory layout for a fresh data directory.
    pub fn init_dirs(data_dir: &Path) -> StoreResult<()> {
        for dir in [data_dir.join("data"), Self::meta_dir_of(data_dir)] {
            fs::create_dir_all(&dir).map_err(|e| {
                StoreError::storage_io(format!("failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Returns true if the directory layout exists.
    pub fn is_initialized(data_dir: &Path) -> bool {
        data_dir.join("data").exists() && Self::meta_dir_of(data_dir).exists()
    }

    /// Opens a data directory, loading every collection and rebuilding its
    /// indexes from the stored documents.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        Self::init_dirs(&data_dir)?;

        let mut collections = BTreeMap::new();

        let meta_dir = Self::meta_dir_of(&data_dir);
        let entries = fs::read_dir(&meta_dir).map_err(|e| {
            StoreError::storage_io(format!("failed to read {}: {}", meta_dir.display(), e))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| StoreError::storage_io(format!("failed to read entry: {}", e)))?;
            let path = entry.path();

            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let meta = Self::load_meta(&path)?;
            let documents = Self::load_documents(&data_dir, &meta.name)?;
            let collection = Collection::from_parts(meta, documents)?;
            collections.insert(collection.name().to_string(), collection);
        }

        Ok(Self {
            data_dir,
            collections,
        })
    }

    /// Returns the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the names of all collections
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Returns a collection by name
    pub fn collection(&self, name: &str) -> StoreResult<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| StoreError::collection_not_found(name))
    }

    fn collection_mut(&mut self, name: &str) -> StoreResult<&mut Collection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| StoreError::collection_not_found(name))
    }

    /// Creates an empty collection.
    pub fn create_collection(&mut self, name: &str) -> StoreResult<()> {
        // Names become file names; keep them path-safe
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoreError::invalid_collection(format!(
                "collection name '{}' must be non-empty and contain only \
                 alphanumerics, '_' or '-'",
                name
            )));
        }
        if self.collections.contains_key(name) {
            return Err(StoreError::collection_exists(name));
        }

        let collection = Collection::new(name);
        self.save_meta(&collection)?;
        self.save_documents(&collection)?;
        self.collections.insert(name.to_string(), collection);

        Ok(())
    }

    /// Replaces a collection's validator (administrative call).
    pub fn apply_validator(&mut self, name: &str, spec: ValidatorSpec) -> StoreResult<()> {
        let collection = self.collection_mut(name)?;
        collection.apply_validator(spec)?;

        let collection = self.collection(name)?;
        self.save_meta(collection)
    }

    /// Creates a named index on a collection (administrative call).
    pub fn create_index(
        &mut self,
        name: &str,
        descriptor: IndexDescriptor,
    ) -> StoreResult<CreateOutcome> {
        let collection = self.collection_mut(name)?;
        let outcome = collection.create_index(descriptor)?;

        if outcome == CreateOutcome::Created {
            let collection = self.collection(name)?;
            self.save_meta(collection)?;
        }

        Ok(outcome)
    }

    /// Inserts a document and persists the collection.
    pub fn insert(&mut self, name: &str, document: Value) -> StoreResult<DocId> {
        let collection = self.collection_mut(name)?;
        let doc_id = collection.insert(document)?;

        let collection = self.collection(name)?;
        self.save_documents(collection)?;
        Ok(doc_id)
    }

    /// Replaces a document and persists the collection.
    pub fn update(&mut self, name: &str, document: Value) -> StoreResult<()> {
        let collection = self.collection_mut(name)?;
        collection.update(document)?;

        let collection = self.collection(name)?;
        self.save_documents(collection)
    }

    /// Deletes a document and persists the collection. Returns true if the
    /// document existed.
    pub fn delete(&mut self, name: &str, doc_id: &str) -> StoreResult<bool> {
        let collection = self.collection_mut(name)?;
        let existed = collection.delete(doc_id);

        if existed {
            let collection = self.collection(name)?;
            self.save_documents(collection)?;
        }
        Ok(existed)
    }

    // ---- persistence ----

    fn meta_dir_of(data_dir: &Path) -> PathBuf {
        data_dir.join("metadata").join("collections")
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        Self::meta_dir_of(&self.data_dir).join(format!("{}.json", name))
    }

    fn documents_path(data_dir: &Path, name: &str) -> PathBuf {
        data_dir.join("data").join(format!("{}.ndjson", name))
    }

    fn load_meta(path: &Path) -> StoreResult<CollectionMeta> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::storage_io(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            StoreError::storage_io(format!("invalid metadata in {}: {}", path.display(), e))
        })
    }

    fn save_meta(&self, collection: &Collection) -> StoreResult<()> {
        let path = self.meta_path(collection.name());
        let content = serde_json::to_string_pretty(collection.meta())
            .map_err(|e| StoreError::storage_io(format!("failed to serialize metadata: {}", e)))?;

        fs::write(&path, content).map_err(|e| {
            StoreError::storage_io(format!("failed to write {}: {}", path.display(), e))
        })
    }

    fn load_documents(data_dir: &Path, name: &str) -> StoreResult<BTreeMap<DocId, Value>> {
        let path = Self::documents_path(data_dir, name);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            StoreError::storage_io(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut documents = BTreeMap::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let body: Value = serde_json::from_str(line).map_err(|e| {
                StoreError::storage_io(format!(
                    "invalid document at {}:{}: {}",
                    path.display(),
                    line_no + 1,
                    e
                ))
            })?;

            let doc_id = body
                .get("_id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    StoreError::storage_io(format!(
                        "document at {}:{} has no string _id",
                        path.display(),
                        line_no + 1
                    ))
                })?
                .to_string();

            documents.insert(doc_id, body);
        }

        Ok(documents)
    }

    fn save_documents(&self, collection: &Collection) -> StoreResult<()> {
        let path = Self::documents_path(&self.data_dir, collection.name());

        let mut content = String::new();
        for body in collection.documents().values() {
            content.push_str(&body.to_string());
            content.push('\n');
        }

        fs::write(&path, content).map_err(|e| {
            StoreError::storage_io(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexField;
    use crate::schema::{EnforcementLevel, FieldRule};
    use serde_json::json;
    use tempfile::TempDir;

    fn outcome_validator() -> ValidatorSpec {
        ValidatorSpec::new(EnforcementLevel::Moderate)
            .with_field("breed", FieldRule::required_string())
            .with_field("sex_upon_outcome", FieldRule::required_string())
            .with_field(
                "age_upon_outcome_in_weeks",
                FieldRule::required_number().with_minimum(0.0),
            )
    }

    #[test]
    fn test_create_collection_and_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let mut db = Database::open(tmp.path()).unwrap();
            db.create_collection("animals").unwrap();
            db.insert("animals", json!({"_id": "a1", "breed": "Labrador"}))
                .unwrap();
        }

        let db = Database::open(tmp.path()).unwrap();
        assert_eq!(db.collection_names(), vec!["animals"]);
        assert_eq!(db.collection("animals").unwrap().len(), 1);
    }

    #[test]
    fn test_create_collection_rejects_unsafe_names() {
        let tmp = TempDir::new().unwrap();
        let mut db = Database::open(tmp.path()).unwrap();

        for name in ["", "../escape", "a/b", "dots."] {
            let err = db.create_collection(name).unwrap_err();
            assert_eq!(err.code(), "ARK_INVALID_COLLECTION");
        }

        db.create_collection("animals_2-test").unwrap();
    }

    #[test]
    fn test_create_collection_twice_conflicts() {
        let tmp = TempDir::new().unwrap();
        let mut db = Database::open(tmp.path()).unwrap();

        db.create_collection("animals").unwrap();
        let err = db.create_collection("animals").unwrap_err();
        assert_eq!(err.code(), "ARK_COLLECTION_EXISTS");
    }

    #[test]
    fn test_apply_validator_requires_collection() {
        let tmp = TempDir::new().unwrap();
        let mut db = Database::open(tmp.path()).unwrap();

        let err = db
            .apply_validator("missing", outcome_validator())
            .unwrap_err();
        assert_eq!(err.code(), "ARK_COLLECTION_NOT_FOUND");
    }

    #[test]
    fn test_validator_survives_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let mut db = Database::open(tmp.path()).unwrap();
            db.create_collection("animals").unwrap();
            db.apply_validator("animals", outcome_validator()).unwrap();
        }

        let mut db = Database::open(tmp.path()).unwrap();
        let err = db
            .insert("animals", json!({"breed": "Poodle"}))
            .unwrap_err();
        assert_eq!(err.code(), "ARK_DOCUMENT_REJECTED");
    }

    #[test]
    fn test_index_catalog_survives_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let mut db = Database::open(tmp.path()).unwrap();
            db.create_collection("animals").unwrap();
            db.insert(
                "animals",
                json!({"_id": "a1", "breed": "Labrador", "age_upon_outcome_in_weeks": 52}),
            )
            .unwrap();
            db.create_index(
                "animals",
                IndexDescriptor::new(
                    "idx_age",
                    vec![IndexField::asc("age_upon_outcome_in_weeks")],
                ),
            )
            .unwrap();
        }

        let db = Database::open(tmp.path()).unwrap();
        let read = db
            .collection("animals")
            .unwrap()
            .read_via_index(&[("age_upon_outcome_in_weeks", &json!(52))], None)
            .unwrap();

        assert_eq!(read.index, "idx_age");
        assert_eq!(read.documents.len(), 1);
    }

    #[test]
    fn test_index_create_idempotent_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let descriptor = IndexDescriptor::new(
            "idx_age",
            vec![IndexField::asc("age_upon_outcome_in_weeks")],
        );

        {
            let mut db = Database::open(tmp.path()).unwrap();
            db.create_collection("animals").unwrap();
            assert_eq!(
                db.create_index("animals", descriptor.clone()).unwrap(),
                CreateOutcome::Created
            );
        }

        let mut db = Database::open(tmp.path()).unwrap();
        assert_eq!(
            db.create_index("animals", descriptor).unwrap(),
            CreateOutcome::AlreadyExists
        );
    }

    #[test]
    fn test_delete_persists() {
        let tmp = TempDir::new().unwrap();

        {
            let mut db = Database::open(tmp.path()).unwrap();
            db.create_collection("animals").unwrap();
            db.insert("animals", json!({"_id": "a1", "breed": "Labrador"}))
                .unwrap();
            assert!(db.delete("animals", "a1").unwrap());
            assert!(!db.delete("animals", "a1").unwrap());
        }

        let db = Database::open(tmp.path()).unwrap();
        assert!(db.collection("animals").unwrap().is_empty());
    }

    #[test]
    fn test_init_dirs_layout() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("db");

        assert!(!Database::is_initialized(&data_dir));
        Database::init_dirs(&data_dir).unwrap();
        assert!(Database::is_initialized(&data_dir));
        assert!(data_dir.join("metadata").join("collections").exists());
    }
}
