//! # CONSTRAINT ERROR TYPES
//!
//! **REGISTRATION**: [`ConfigError`] and [`RouteError`] abort setup.
//! **PER REQUEST**: [`Violation`] is mapped through the field's options into
//! [`ConstraintError::Rejected`]; [`SchemaError`] always surfaces as a 500.

use crate::types::Field;
use thiserror::Error;

/// Registration-time configuration failure. Aborts startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An option value has the wrong type.
    #[error("The \"{field}.{option}\" option must be a {expected}")]
    InvalidType {
        /// Field the option belongs to.
        field: Field,
        /// Option key as spelled in the options document.
        option: &'static str,
        /// Expected type name: `function`, `number` or `string`.
        expected: &'static str,
    },

    /// A numeric status code outside `100..=999`.
    #[error("The \"{field}.statusCode\" option must be a valid HTTP status code, got {value}")]
    InvalidStatusCode {
        /// Field the option belongs to.
        field: Field,
        /// The rejected value as written.
        value: String,
    },

    /// No options at all.
    #[error("Options are required")]
    Missing,
}

/// Malformed route registration: pattern, method or schema declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The field's schema is not a JSON object.
    #[error("the '{field}' schema declaration must be a JSON object")]
    NotAnObject {
        /// Offending field.
        field: Field,
    },

    /// `oneOf` is present but not an array.
    #[error("the '{field}.oneOf' route setting must be an array")]
    InvalidOneOf {
        /// Offending field.
        field: Field,
    },

    /// The path pattern could not be compiled.
    #[error("invalid route pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as registered.
        pattern: String,
        /// Reason reported by the pattern parser.
        message: String,
    },

    /// Unknown HTTP method name.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}

/// Per-request failure produced while checking one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// The discriminator returned an error or panicked.
    #[error("Schema constraint function error for {field}: {message}")]
    ConstraintFunction {
        /// Field being checked.
        field: Field,
        /// Text of the discriminator's error.
        message: String,
    },

    /// The discriminator named an id the route does not declare.
    #[error("JSON schema id {id} not found in the '{field}.oneOf' route settings")]
    VariantNotFound {
        /// Field being checked.
        field: Field,
        /// Id returned by the discriminator.
        id: String,
    },

    /// The field's payload failed the selected schema.
    #[error("Schema constraint failure: the {field} doesn't match the JSON schema {id}")]
    Mismatch {
        /// Field being checked.
        field: Field,
        /// Id of the selected schema.
        id: String,
        /// First diagnostic reported by the validator, kept out of the message.
        detail: Option<String>,
    },
}

impl Violation {
    /// The field whose check produced this violation.
    pub fn field(&self) -> Field {
        match self {
            Violation::ConstraintFunction { field, .. }
            | Violation::VariantNotFound { field, .. }
            | Violation::Mismatch { field, .. } => *field,
        }
    }

    /// Stable machine-readable code for the violation kind.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::ConstraintFunction { .. } => error_codes::CONSTRAINT_FUNCTION,
            Violation::VariantNotFound { .. } => error_codes::VARIANT_NOT_FOUND,
            Violation::Mismatch { .. } => error_codes::SCHEMA_MISMATCH,
        }
    }
}

/// Failure of the schema compiler capability on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CompileError(pub String);

/// A declared variant could not be compiled into a validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to compile JSON schema {id} for {field}: {source}")]
pub struct SchemaError {
    /// Field the variant was declared on.
    pub field: Field,
    /// Id of the variant.
    pub id: String,
    /// Compiler diagnostic.
    pub source: CompileError,
}

/// Outcome of evaluating a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The request was rejected for this field.
    #[error(transparent)]
    Violation(#[from] Violation),

    /// The selected variant could not be compiled.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Outcome of running the interceptor over a whole request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// A field was rejected; status and message already reflect the field's options.
    #[error("{message}")]
    Rejected {
        /// Configured status code, 400 by default.
        status_code: u16,
        /// Configured error message, or the violation's own text.
        message: String,
        /// The violation that triggered the rejection.
        violation: Violation,
    },

    /// A declared variant failed to compile. Not subject to the field's options.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ConstraintError {
    /// HTTP status the host should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ConstraintError::Rejected { status_code, .. } => *status_code,
            ConstraintError::Schema(_) => 500,
        }
    }
}

/// Stable violation codes.
pub mod error_codes {
    /// [`Violation::ConstraintFunction`](super::Violation::ConstraintFunction)
    pub const CONSTRAINT_FUNCTION: &str = "SCHEMA_CONSTRAINT_FUNCTION_ERROR";
    /// [`Violation::VariantNotFound`](super::Violation::VariantNotFound)
    pub const VARIANT_NOT_FOUND: &str = "SCHEMA_CONSTRAINT_VARIANT_NOT_FOUND";
    /// [`Violation::Mismatch`](super::Violation::Mismatch)
    pub const SCHEMA_MISMATCH: &str = "SCHEMA_CONSTRAINT_SCHEMA_MISMATCH";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidType {
            field: Field::Body,
            option: "constraint",
            expected: "function",
        };
        assert_eq!(err.to_string(), "The \"body.constraint\" option must be a function");
        assert_eq!(ConfigError::Missing.to_string(), "Options are required");
    }

    #[test]
    fn test_violation_messages() {
        let err = Violation::ConstraintFunction {
            field: Field::Headers,
            message: "Unexpected error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Schema constraint function error for headers: Unexpected error"
        );

        let err = Violation::VariantNotFound {
            field: Field::Querystring,
            id: "schema404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "JSON schema id schema404 not found in the 'querystring.oneOf' route settings"
        );

        let err = Violation::Mismatch {
            field: Field::Params,
            id: "schema1".to_string(),
            detail: Some("44 is not a multiple of 5".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Schema constraint failure: the params doesn't match the JSON schema schema1"
        );
        assert_eq!(err.field(), Field::Params);
        assert_eq!(err.code(), error_codes::SCHEMA_MISMATCH);
    }

    #[test]
    fn test_schema_error_status() {
        let err = ConstraintError::Schema(SchemaError {
            field: Field::Body,
            id: "broken".to_string(),
            source: CompileError("bad keyword".to_string()),
        });
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("broken"));
    }
}
