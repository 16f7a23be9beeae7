//! # SCHEMA CONSTRAINT CORE LIBRARY
//!
//! **PER-REQUEST DISCRIMINATED JSON-SCHEMA CONSTRAINTS**
//!
//! **ARCHITECTURE**: A route declares several candidate schemas per request field; a
//! caller-supplied discriminator picks one at request time and the request is rejected
//! when the field does not match it.
//! **GUARANTEE**: Fields are checked in a fixed order and the first failure wins.
//! **CACHING**: Each `(field, variant id)` pair is compiled at most once per interceptor.
//!
//! ```
//! use schema_constraint::{
//!     discriminator_fn, BoxError, ConstraintOptions, FieldOptions, HttpRequest, RouteSchema,
//!     SchemaConstraint,
//! };
//! use serde_json::json;
//!
//! let options = ConstraintOptions::builder()
//!     .body(FieldOptions::new().constraint(discriminator_fn(|_: &HttpRequest| {
//!         Ok::<_, BoxError>("schema1")
//!     })))
//!     .build()
//!     .unwrap();
//! let _interceptor = SchemaConstraint::new(options);
//!
//! let schema = RouteSchema::from_json(&json!({
//!     "body": { "oneOf": [{ "$id": "schema1", "type": "object", "required": ["a"] }] }
//! }))
//! .unwrap();
//! assert!(!schema.is_empty());
//! ```

pub mod config;
pub mod discriminator;
pub mod errors;
pub mod evaluator;
pub mod interceptor;
pub mod request;
pub mod routing;
pub mod schema;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;

pub use config::{ConstraintOptions, FieldOptions, OptionValue, RawOptions, DEFAULT_STATUS_CODE};
pub use discriminator::{discriminator_fn, BoxError, Discriminant, Discriminator};
pub use errors::{
    CompileError, ConfigError, ConstraintError, EvaluationError, RouteError, SchemaError,
    Violation,
};
pub use evaluator::ConstraintEvaluator;
pub use interceptor::SchemaConstraint;
pub use request::{HttpRequest, RequestBody};
pub use routing::{HttpMethod, RouteMatch, RouteMatcher};
pub use schema::{RouteSchema, SchemaVariant, VariantSet};
pub use types::Field;
pub use validation::{JsonSchemaCompiler, SchemaCompiler, ValidationOutcome, Validator};
