//! Observability
//!
//! Structured JSON logging with deterministic output.

pub mod logger;

pub use logger::{Logger, Severity};
