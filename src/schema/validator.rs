//! Document validation against a collection validator
//!
//! Check semantics:
//! - required fields must be present with one of their allowed types
//! - optional fields are checked only when present
//! - numeric bounds are inclusive
//! - undeclared fields pass through unchecked
//!
//! Validation is deterministic (fields checked in name order) and never
//! mutates the document.

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{FieldKind, FieldRule, ValidatorSpec};

/// Checks documents against a validator descriptor.
pub struct DocumentValidator;

impl DocumentValidator {
    /// Validates a document against a validator descriptor.
    ///
    /// # Errors
    ///
    /// Returns `ARK_DOCUMENT_REJECTED` with field/expected/actual detail on
    /// the first violated rule.
    pub fn check(spec: &ValidatorSpec, document: &Value) -> SchemaResult<()> {
        let doc_obj = document.as_object().ok_or_else(|| {
            SchemaError::rejected(ValidationDetails::type_mismatch(
                "$root",
                "object",
                json_type_name(document),
            ))
        })?;

        for (field, rule) in &spec.fields {
            match doc_obj.get(field) {
                Some(value) => Self::check_value(field, rule, value)?,
                None => {
                    if rule.required {
                        return Err(SchemaError::rejected(ValidationDetails::missing_field(
                            field,
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns true if the document satisfies the descriptor.
    ///
    /// Used by moderate enforcement to classify pre-images.
    pub fn satisfies(spec: &ValidatorSpec, document: &Value) -> bool {
        Self::check(spec, document).is_ok()
    }

    /// Checks a present value against its field rule.
    fn check_value(field: &str, rule: &FieldRule, value: &Value) -> SchemaResult<()> {
        let kind = match value_kind(value) {
            Some(k) if rule.admits(k) => k,
            _ => {
                return Err(SchemaError::rejected(ValidationDetails::type_mismatch(
                    field,
                    rule.type_set_name(),
                    json_type_name(value),
                )));
            }
        };

        if kind == FieldKind::Number {
            // Bounds only ever exist on numeric rules
            let n = value.as_f64().unwrap_or(f64::NAN);

            if let Some(min) = rule.minimum {
                if !(n >= min) {
                    return Err(SchemaError::rejected(ValidationDetails::out_of_range(
                        field,
                        format!(">= {}", min),
                        n.to_string(),
                    )));
                }
            }

            if let Some(max) = rule.maximum {
                if !(n <= max) {
                    return Err(SchemaError::rejected(ValidationDetails::out_of_range(
                        field,
                        format!("<= {}", max),
                        n.to_string(),
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Maps a JSON value to the kind a rule can admit.
///
/// Null, arrays, and objects map to no kind and fail any typed rule.
fn value_kind(value: &Value) -> Option<FieldKind> {
    match value {
        Value::String(_) => Some(FieldKind::String),
        Value::Number(_) => Some(FieldKind::Number),
        Value::Bool(_) => Some(FieldKind::Bool),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
