//! # VALIDATION MODULE
//!
//! **CORE VALIDATION SYSTEM WITH TRAIT-BASED ARCHITECTURE**
//!
//! This module provides the [`Validator`] trait a compiled schema variant exposes, the
//! [`SchemaCompiler`] capability that produces validators, and the shared
//! [`ValidatorCache`] that memoizes compilation per `(field, variant id)`.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **COMPILE** - A variant's schema is compiled once, on first use
//! 2. **CACHE** - The compiled validator is stored for the process lifetime
//! 3. **VALIDATE** - The field payload is checked, producing a [`ValidationOutcome`]
//!
//! ## USAGE
//!
//! ```rust
//! use schema_constraint::validation::{JsonSchemaCompiler, SchemaCompiler};
//! use serde_json::json;
//!
//! let compiler = JsonSchemaCompiler::new();
//! let validator = compiler.compile(&json!({"type": "object", "required": ["a"]})).unwrap();
//! assert!(validator.validate(&json!({"b": 1})).is_failure());
//! ```

use crate::errors::CompileError;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub mod cache;
pub mod compiler;

pub use cache::{CacheKey, ValidatorCache};
pub use compiler::{JsonSchemaCompiler, JsonType};

/// **VALIDATION OUTCOME**
///
/// Either a plain verdict or a report object carrying an error marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// `true` when the payload is valid.
    Boolean(bool),
    /// Failed when `error` is set and non-empty.
    Report {
        /// Validator diagnostic.
        error: Option<String>,
    },
}

impl ValidationOutcome {
    /// **FAILURE CHECK** - `false`, or a report carrying a non-empty error
    pub fn is_failure(&self) -> bool {
        match self {
            ValidationOutcome::Boolean(valid) => !valid,
            ValidationOutcome::Report { error } => error.as_deref().is_some_and(|e| !e.is_empty()),
        }
    }

    /// Diagnostic text, when the validator produced one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Boolean(_) => None,
            ValidationOutcome::Report { error } => error.as_deref(),
        }
    }
}

impl From<bool> for ValidationOutcome {
    fn from(valid: bool) -> Self {
        ValidationOutcome::Boolean(valid)
    }
}

/// **CORE VALIDATOR TRAIT**
///
/// **MANDATE**: Compiled validators are shared across concurrent requests.
/// **GUARANTEE**: MUST NOT panic. Failures are expressed through [`ValidationOutcome`].
pub trait Validator: Send + Sync {
    /// Check one field payload.
    fn validate(&self, payload: &JsonValue) -> ValidationOutcome;
}

impl<F, O> Validator for F
where
    F: Fn(&JsonValue) -> O + Send + Sync,
    O: Into<ValidationOutcome>,
{
    fn validate(&self, payload: &JsonValue) -> ValidationOutcome {
        self(payload).into()
    }
}

/// **SCHEMA COMPILER CAPABILITY**
///
/// Given one variant's schema body, produce a reusable validator.
pub trait SchemaCompiler: Send + Sync {
    /// Compile a schema body, without its `$id`.
    fn compile(&self, schema: &JsonValue) -> Result<Arc<dyn Validator>, CompileError>;
}

impl<F> SchemaCompiler for F
where
    F: Fn(&JsonValue) -> Result<Arc<dyn Validator>, CompileError> + Send + Sync,
{
    fn compile(&self, schema: &JsonValue) -> Result<Arc<dyn Validator>, CompileError> {
        self(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_failure_rules() {
        assert!(ValidationOutcome::Boolean(false).is_failure());
        assert!(!ValidationOutcome::Boolean(true).is_failure());
        assert!(!ValidationOutcome::Report { error: None }.is_failure());
        let report = ValidationOutcome::Report {
            error: Some("missing mul5".to_string()),
        };
        assert!(report.is_failure());
        assert_eq!(report.detail(), Some("missing mul5"));
    }

    #[test]
    fn test_empty_error_marker_is_not_a_failure() {
        let report = ValidationOutcome::Report {
            error: Some(String::new()),
        };
        assert!(!report.is_failure());
    }

    #[test]
    fn test_closures_are_validators() {
        let validator = |payload: &JsonValue| payload.is_object();
        assert!(!validator.validate(&json!({})).is_failure());
        assert!(validator.validate(&json!(1)).is_failure());
    }

    #[test]
    fn test_closures_are_compilers() {
        let compiler = |_: &JsonValue| -> Result<Arc<dyn Validator>, CompileError> {
            Ok(Arc::new(|_: &JsonValue| true))
        };
        let validator = compiler.compile(&json!({})).unwrap();
        assert!(!validator.validate(&json!(null)).is_failure());
    }
}
