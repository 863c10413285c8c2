//! Validator descriptor types
//!
//! A validator constrains writes to a collection:
//! - required fields must be present with one of their allowed types
//! - optional fields are checked only when present
//! - numeric fields may carry inclusive minimum/maximum bounds
//!
//! Undeclared fields are permitted; the rule constrains declared fields only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field types a rule can admit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// Any JSON number (integer or float)
    Number,
    /// Boolean
    Bool,
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
        }
    }
}

/// Constraint on a single declared field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Allowed types (must be non-empty)
    pub types: Vec<FieldKind>,
    /// Whether the field must be present
    pub required: bool,
    /// Inclusive lower bound (numeric fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper bound (numeric fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl FieldRule {
    /// Create a required string field
    pub fn required_string() -> Self {
        Self {
            types: vec![FieldKind::String],
            required: true,
            minimum: None,
            maximum: None,
        }
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self {
            required: false,
            ..Self::required_string()
        }
    }

    /// Create a required numeric field
    pub fn required_number() -> Self {
        Self {
            types: vec![FieldKind::Number],
            required: true,
            minimum: None,
            maximum: None,
        }
    }

    /// Create an optional numeric field
    pub fn optional_number() -> Self {
        Self {
            required: false,
            ..Self::required_number()
        }
    }

    /// Create a required boolean field
    pub fn required_bool() -> Self {
        Self {
            types: vec![FieldKind::Bool],
            required: true,
            minimum: None,
            maximum: None,
        }
    }

    /// Sets the inclusive lower bound
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets the inclusive upper bound
    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Sets both bounds
    pub fn with_range(self, minimum: f64, maximum: f64) -> Self {
        self.with_minimum(minimum).with_maximum(maximum)
    }

    /// Checks whether the rule admits the given type
    pub fn admits(&self, kind: FieldKind) -> bool {
        self.types.contains(&kind)
    }

    /// Renders the allowed type set for error messages
    pub fn type_set_name(&self) -> String {
        self.types
            .iter()
            .map(|k| k.type_name())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Enforcement level for a collection validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementLevel {
    /// Inserts are always validated; updates are validated only when the
    /// pre-image already satisfies the validator. Pre-existing violating
    /// documents stay writable without conforming.
    Moderate,
    /// All inserts and updates are validated.
    Strict,
}

impl EnforcementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnforcementLevel::Moderate => "moderate",
            EnforcementLevel::Strict => "strict",
        }
    }
}

/// Complete validator descriptor for one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSpec {
    /// Field rules, keyed by field name (ordered for deterministic output)
    pub fields: BTreeMap<String, FieldRule>,
    /// Enforcement level
    pub level: EnforcementLevel,
}

impl ValidatorSpec {
    /// Create a new validator descriptor
    pub fn new(level: EnforcementLevel) -> Self {
        Self {
            fields: BTreeMap::new(),
            level,
        }
    }

    /// Adds a field rule (builder style)
    pub fn with_field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Returns the rule for a field, if declared
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }

    /// Validates the descriptor structure itself (not a document).
    ///
    /// Invariants:
    /// - at least one field rule
    /// - every rule declares a non-empty allowed type set
    /// - minimum/maximum only on rules that admit numbers
    /// - minimum <= maximum when both are present
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("validator declares no field rules".into());
        }

        for (name, rule) in &self.fields {
            if rule.types.is_empty() {
                return Err(format!("field '{}' declares no allowed types", name));
            }

            let has_bounds = rule.minimum.is_some() || rule.maximum.is_some();
            if has_bounds && !rule.admits(FieldKind::Number) {
                return Err(format!(
                    "field '{}' declares numeric bounds but does not admit numbers",
                    name
                ));
            }

            if let (Some(min), Some(max)) = (rule.minimum, rule.maximum) {
                if min > max {
                    return Err(format!(
                        "field '{}' declares minimum {} greater than maximum {}",
                        name, min, max
                    ));
                }
            }
        }

        Ok(())
    }
}
