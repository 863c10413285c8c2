//! Validator enforcement tests
//!
//! Enforcement-level semantics across the write path:
//! - moderate leaves pre-existing violators writable
//! - strict checks every write
//! - a later apply replaces the earlier rule wholesale

use arkdb::schema::{EnforcementLevel, FieldRule, ValidatorSpec};
use arkdb::setup;
use arkdb::store::Database;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn db_with_collection(tmp: &TempDir) -> Database {
    let mut db = Database::open(tmp.path()).unwrap();
    db.create_collection("animals").unwrap();
    db
}

fn conforming(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "breed": "Labrador",
        "sex_upon_outcome": "Male",
        "age_upon_outcome_in_weeks": 52
    })
}

// =============================================================================
// Moderate Enforcement Tests
// =============================================================================

/// Documents present before the rule was applied are never re-validated.
#[test]
fn test_moderate_leaves_existing_documents_untouched() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.insert("animals", json!({"_id": "legacy", "name": "NoBreed"}))
        .unwrap();

    db.apply_validator("animals", setup::outcomes_validator())
        .unwrap();

    // Still stored, still readable
    let coll = db.collection("animals").unwrap();
    assert!(coll.documents().contains_key("legacy"));
}

/// A legacy violator may be updated without conforming.
#[test]
fn test_moderate_update_of_legacy_violator_allowed() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.insert("animals", json!({"_id": "legacy", "name": "NoBreed"}))
        .unwrap();
    db.apply_validator("animals", setup::outcomes_validator())
        .unwrap();

    db.update("animals", json!({"_id": "legacy", "name": "Renamed"}))
        .unwrap();
}

/// A conforming pre-image must stay conforming on update.
#[test]
fn test_moderate_update_of_conforming_document_checked() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.insert("animals", conforming("good")).unwrap();
    db.apply_validator("animals", setup::outcomes_validator())
        .unwrap();

    let err = db
        .update("animals", json!({"_id": "good", "name": "Stripped"}))
        .unwrap_err();
    assert_eq!(err.code(), "ARK_DOCUMENT_REJECTED");

    // A conforming replacement passes
    let mut replacement = conforming("good");
    replacement["age_upon_outcome_in_weeks"] = json!(60);
    db.update("animals", replacement).unwrap();
}

/// Inserts are always validated under moderate enforcement.
#[test]
fn test_moderate_still_gates_inserts() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.apply_validator("animals", setup::outcomes_validator())
        .unwrap();

    let err = db
        .insert("animals", json!({"name": "NoBreed"}))
        .unwrap_err();
    assert_eq!(err.code(), "ARK_DOCUMENT_REJECTED");
}

// =============================================================================
// Strict Enforcement Tests
// =============================================================================

/// Strict enforcement checks updates of legacy violators too.
#[test]
fn test_strict_checks_legacy_violators() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.insert("animals", json!({"_id": "legacy", "name": "NoBreed"}))
        .unwrap();

    let strict = ValidatorSpec::new(EnforcementLevel::Strict)
        .with_field("breed", FieldRule::required_string());
    db.apply_validator("animals", strict).unwrap();

    let err = db
        .update("animals", json!({"_id": "legacy", "name": "Renamed"}))
        .unwrap_err();
    assert_eq!(err.code(), "ARK_DOCUMENT_REJECTED");
}

// =============================================================================
// Replacement Tests
// =============================================================================

/// A later apply call replaces the earlier rule wholesale.
#[test]
fn test_later_apply_supersedes() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.apply_validator("animals", setup::outcomes_validator())
        .unwrap();

    let name_only = ValidatorSpec::new(EnforcementLevel::Moderate)
        .with_field("name", FieldRule::required_string());
    db.apply_validator("animals", name_only).unwrap();

    // The breed rule is gone; only name is enforced now
    db.insert("animals", json!({"name": "JustAName"})).unwrap();
    let err = db
        .insert("animals", json!({"breed": "Labrador"}))
        .unwrap_err();
    assert!(err.message().contains("name"));
}

/// A malformed descriptor is rejected and leaves the previous rule active.
#[test]
fn test_malformed_descriptor_rejected_without_side_effect() {
    let tmp = TempDir::new().unwrap();
    let mut db = db_with_collection(&tmp);

    db.apply_validator("animals", setup::outcomes_validator())
        .unwrap();

    let malformed = ValidatorSpec::new(EnforcementLevel::Moderate)
        .with_field("name", FieldRule::required_string().with_minimum(3.0));
    let err = db.apply_validator("animals", malformed).unwrap_err();
    assert_eq!(err.code(), "ARK_MALFORMED_VALIDATOR");

    // The outcomes rule still applies
    let err = db
        .insert("animals", json!({"name": "NoBreed"}))
        .unwrap_err();
    assert_eq!(err.code(), "ARK_DOCUMENT_REJECTED");
}

/// Applying to an absent collection is a NotFound-class failure.
#[test]
fn test_apply_to_missing_collection() {
    let tmp = TempDir::new().unwrap();
    let mut db = Database::open(tmp.path()).unwrap();

    let err = db
        .apply_validator("nowhere", setup::outcomes_validator())
        .unwrap_err();
    assert_eq!(err.code(), "ARK_COLLECTION_NOT_FOUND");
}
