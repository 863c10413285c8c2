//! Index catalog tests
//!
//! Named index lifecycle at the database surface:
//! - creation builds over existing documents
//! - identical re-creation is a no-op, mismatched redefinition conflicts
//! - the catalog is durable and rebuilt trees stay correct

use arkdb::index::{CreateOutcome, IndexDescriptor, IndexField};
use arkdb::store::{Database, ErrorClass};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn age_descriptor() -> IndexDescriptor {
    IndexDescriptor::new("idx_age", vec![IndexField::asc("age_upon_outcome_in_weeks")])
}

fn seeded_db(tmp: &TempDir) -> Database {
    let mut db = Database::open(tmp.path()).unwrap();
    db.create_collection("animals").unwrap();

    for (id, breed, age) in [
        ("a1", "Labrador", 52),
        ("a2", "Poodle", 12),
        ("a3", "Beagle", 200),
    ] {
        db.insert(
            "animals",
            json!({
                "_id": id,
                "breed": breed,
                "sex_upon_outcome": "Male",
                "age_upon_outcome_in_weeks": age
            }),
        )
        .unwrap();
    }

    db
}

fn ages_in_order(db: &Database) -> Vec<i64> {
    db.collection("animals")
        .unwrap()
        .read_via_index(&[], Some("age_upon_outcome_in_weeks"))
        .expect("age ordering must be index-covered")
        .documents
        .iter()
        .filter_map(|d| d["age_upon_outcome_in_weeks"].as_i64())
        .collect()
}

// =============================================================================
// Creation Tests
// =============================================================================

/// Creating an index over existing documents makes them all reachable.
#[test]
fn test_create_builds_over_existing_documents() {
    let tmp = TempDir::new().unwrap();
    let mut db = seeded_db(&tmp);

    assert_eq!(
        db.create_index("animals", age_descriptor()).unwrap(),
        CreateOutcome::Created
    );

    assert_eq!(ages_in_order(&db), vec![12, 52, 200]);

    let read = db
        .collection("animals")
        .unwrap()
        .read_via_index(&[("age_upon_outcome_in_weeks", &json!(52))], None)
        .unwrap();
    assert_eq!(read.index, "idx_age");
    assert_eq!(read.documents.len(), 1);
    assert_eq!(read.documents[0]["_id"], "a1");
}

/// Creating on a missing collection is NotFound.
#[test]
fn test_create_on_missing_collection() {
    let tmp = TempDir::new().unwrap();
    let mut db = Database::open(tmp.path()).unwrap();

    let err = db.create_index("nowhere", age_descriptor()).unwrap_err();
    assert_eq!(err.code(), "ARK_COLLECTION_NOT_FOUND");
    assert_eq!(err.class(), ErrorClass::NotFound);
}

/// A structurally invalid descriptor never reaches the catalog.
#[test]
fn test_invalid_descriptor_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut db = seeded_db(&tmp);

    let empty = IndexDescriptor::new("idx_empty", vec![]);
    let err = db.create_index("animals", empty).unwrap_err();
    assert_eq!(err.code(), "ARK_INVALID_INDEX");
    assert!(db.collection("animals").unwrap().meta().indexes.is_empty());
}

// =============================================================================
// Idempotence / Conflict Tests
// =============================================================================

/// Identical re-creation is a no-op; a different shape conflicts.
#[test]
fn test_idempotent_then_conflicting() {
    let tmp = TempDir::new().unwrap();
    let mut db = seeded_db(&tmp);

    db.create_index("animals", age_descriptor()).unwrap();
    assert_eq!(
        db.create_index("animals", age_descriptor()).unwrap(),
        CreateOutcome::AlreadyExists
    );

    let flipped = IndexDescriptor::new(
        "idx_age",
        vec![IndexField::desc("age_upon_outcome_in_weeks")],
    );
    let err = db.create_index("animals", flipped).unwrap_err();
    assert_eq!(err.code(), "ARK_INDEX_CONFLICT");

    // Catalog unchanged
    let coll = db.collection("animals").unwrap();
    assert_eq!(coll.meta().indexes.len(), 1);
    assert_eq!(coll.meta().indexes[0], age_descriptor());
}

// =============================================================================
// Maintenance Tests
// =============================================================================

/// Writes and deletes after creation keep the index current.
#[test]
fn test_index_maintained_across_writes() {
    let tmp = TempDir::new().unwrap();
    let mut db = seeded_db(&tmp);
    db.create_index("animals", age_descriptor()).unwrap();

    db.insert(
        "animals",
        json!({"_id": "a4", "breed": "Husky", "age_upon_outcome_in_weeks": 100}),
    )
    .unwrap();
    assert_eq!(ages_in_order(&db), vec![12, 52, 100, 200]);

    db.update(
        "animals",
        json!({"_id": "a4", "breed": "Husky", "age_upon_outcome_in_weeks": 10}),
    )
    .unwrap();
    assert_eq!(ages_in_order(&db), vec![10, 12, 52, 200]);

    db.delete("animals", "a1").unwrap();
    assert_eq!(ages_in_order(&db), vec![10, 12, 200]);
}

/// Documents without the indexed field are still reachable via the index.
#[test]
fn test_missing_field_documents_reachable() {
    let tmp = TempDir::new().unwrap();
    let mut db = seeded_db(&tmp);

    db.insert("animals", json!({"_id": "ageless", "breed": "Mystery"}))
        .unwrap();
    db.create_index("animals", age_descriptor()).unwrap();

    // The ageless document keys lowest, so it leads the index order
    let read = db
        .collection("animals")
        .unwrap()
        .read_via_index(&[], Some("age_upon_outcome_in_weeks"))
        .unwrap();
    assert_eq!(read.documents.len(), 4);
    assert_eq!(read.documents[0]["_id"], "ageless");
}

// =============================================================================
// Durability Tests
// =============================================================================

/// The catalog survives reopen and trees are rebuilt from documents.
#[test]
fn test_catalog_durable_and_rebuilt() {
    let tmp = TempDir::new().unwrap();

    {
        let mut db = seeded_db(&tmp);
        db.create_index("animals", age_descriptor()).unwrap();
    }

    let mut db = Database::open(tmp.path()).unwrap();

    // Identical re-create across processes stays a no-op
    assert_eq!(
        db.create_index("animals", age_descriptor()).unwrap(),
        CreateOutcome::AlreadyExists
    );

    // Rebuilt tree answers covered reads
    assert_eq!(ages_in_order(&db), vec![12, 52, 200]);
}
