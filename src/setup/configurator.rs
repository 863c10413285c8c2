//! Outcomes collection provisioning
//!
//! The one-shot administrative sequence for the rescue-animal outcomes
//! collection:
//! 1. apply the outcomes validator (moderate enforcement)
//! 2. create idx_rescue_filter (compound ascending on breed,
//!    sex_upon_outcome, age_upon_outcome_in_weeks)
//! 3. create idx_age (ascending on age_upon_outcome_in_weeks)
//!
//! Calls are issued sequentially and awaited one at a time; there is no
//! retry and no fallback. Engine errors abort the affected call and
//! propagate verbatim.

use crate::index::{CreateOutcome, IndexDescriptor, IndexField};
use crate::observability::Logger;
use crate::schema::{EnforcementLevel, FieldRule, ValidatorSpec};
use crate::store::Database;

use super::errors::{SetupError, SetupResult};

/// Default collection the configurator targets
pub const OUTCOMES_COLLECTION: &str = "animals";

/// Compound rescue-filter index name
pub const RESCUE_FILTER_INDEX: &str = "idx_rescue_filter";

/// Single-field age index name
pub const AGE_INDEX: &str = "idx_age";

/// Builds the outcomes validator descriptor.
///
/// Moderate enforcement: documents present before the rule was applied are
/// left untouched; new inserts and updates of conforming documents must
/// conform.
pub fn outcomes_validator() -> ValidatorSpec {
    ValidatorSpec::new(EnforcementLevel::Moderate)
        .with_field("breed", FieldRule::required_string())
        .with_field("sex_upon_outcome", FieldRule::required_string())
        .with_field(
            "age_upon_outcome_in_weeks",
            FieldRule::required_number().with_minimum(0.0),
        )
        .with_field(
            "location_lat",
            FieldRule::optional_number().with_range(-90.0, 90.0),
        )
        .with_field(
            "location_long",
            FieldRule::optional_number().with_range(-180.0, 180.0),
        )
}

/// Builds the rescue-filter index descriptor.
///
/// Supports combined equality on breed and sex plus range/sort on age.
pub fn rescue_filter_index() -> IndexDescriptor {
    IndexDescriptor::new(
        RESCUE_FILTER_INDEX,
        vec![
            IndexField::asc("breed"),
            IndexField::asc("sex_upon_outcome"),
            IndexField::asc("age_upon_outcome_in_weeks"),
        ],
    )
}

/// Builds the standalone age index descriptor.
pub fn age_index() -> IndexDescriptor {
    IndexDescriptor::new(AGE_INDEX, vec![IndexField::asc("age_upon_outcome_in_weeks")])
}

/// Result of one provisioning run
#[derive(Debug)]
pub struct ProvisionReport {
    /// Target collection
    pub collection: String,
    /// Per-index creation outcome, in call order
    pub indexes: Vec<(String, CreateOutcome)>,
}

/// Provisions the outcomes collection: validator, then both indexes.
pub fn provision(db: &mut Database, collection: &str) -> SetupResult<ProvisionReport> {
    let validator = outcomes_validator();
    let level = validator.level.as_str();

    db.apply_validator(collection, validator).map_err(|source| {
        Logger::error(
            "VALIDATOR_APPLY_FAILED",
            &[("collection", collection), ("error", source.code())],
        );
        SetupError::ApplyValidator {
            collection: collection.to_string(),
            source,
        }
    })?;

    Logger::info(
        "VALIDATOR_APPLIED",
        &[("collection", collection), ("level", level)],
    );

    let mut indexes = Vec::new();
    for descriptor in [rescue_filter_index(), age_index()] {
        let index_name = descriptor.name.clone();

        let outcome = db.create_index(collection, descriptor).map_err(|source| {
            Logger::error(
                "INDEX_CREATE_FAILED",
                &[
                    ("collection", collection),
                    ("error", source.code()),
                    ("index", index_name.as_str()),
                ],
            );
            SetupError::CreateIndex {
                collection: collection.to_string(),
                index: index_name.clone(),
                source,
            }
        })?;

        let event = match outcome {
            CreateOutcome::Created => "INDEX_CREATED",
            CreateOutcome::AlreadyExists => "INDEX_EXISTS",
        };
        Logger::info(
            event,
            &[("collection", collection), ("index", index_name.as_str())],
        );

        indexes.push((index_name, outcome));
    }

    Ok(ProvisionReport {
        collection: collection.to_string(),
        indexes,
    })
}
