//! Schema validation subsystem
//!
//! Validator descriptors and the document checker. A descriptor declares
//! per-field type and range constraints plus an enforcement level; the
//! store consults the checker on every write.

pub mod errors;
pub mod types;
pub mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use types::{EnforcementLevel, FieldKind, FieldRule, ValidatorSpec};
pub use validator::DocumentValidator;
