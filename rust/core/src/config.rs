//! # CONSTRAINT OPTIONS
//!
//! **PURPOSE**: Normalizes and validates the operator-supplied options for each field.
//! **GUARANTEE**: A [`ConstraintOptions`] value is validated and immutable; every failure
//! surfaces at registration as a [`ConfigError`].
//!
//! Options arrive either typed, through [`ConstraintOptions::builder`], or loosely typed
//! through [`RawOptions`], where each option value is checked for its expected kind.

use crate::discriminator::Discriminator;
use crate::errors::ConfigError;
use crate::types::Field;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Status used when a violated field configures none.
pub const DEFAULT_STATUS_CODE: u16 = 400;

/// Option names, in the order they are checked within a field.
pub mod option_names {
    /// Discriminator function.
    pub const CONSTRAINT: &str = "constraint";
    /// Status answered on violation.
    pub const STATUS_CODE: &str = "statusCode";
    /// Message answered on violation.
    pub const ERROR_MESSAGE: &str = "errorMessage";
}

/// **FIELD OPTIONS**
#[derive(Clone, Default)]
pub struct FieldOptions {
    constraint: Option<Arc<dyn Discriminator>>,
    status_code: Option<u16>,
    error_message: Option<String>,
}

impl FieldOptions {
    /// Options with nothing set; the field stays unconstrained.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the discriminator that picks this field's variant.
    pub fn constraint<D: Discriminator + 'static>(mut self, discriminator: D) -> Self {
        self.constraint = Some(Arc::new(discriminator));
        self
    }

    /// Same as [`FieldOptions::constraint`] for an already shared discriminator.
    pub fn shared_constraint(mut self, discriminator: Arc<dyn Discriminator>) -> Self {
        self.constraint = Some(discriminator);
        self
    }

    /// Status answered when this field is rejected. Checked against `100..=999` on build.
    pub fn status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Replaces the generated rejection message.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// The configured discriminator, if any.
    pub fn discriminator(&self) -> Option<&Arc<dyn Discriminator>> {
        self.constraint.as_ref()
    }

    /// `true` when a discriminator is configured.
    pub fn has_constraint(&self) -> bool {
        self.constraint.is_some()
    }

    /// Configured status, or [`DEFAULT_STATUS_CODE`].
    pub fn effective_status_code(&self) -> u16 {
        self.status_code.unwrap_or(DEFAULT_STATUS_CODE)
    }

    /// Status exactly as configured.
    pub fn configured_status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Message exactly as configured.
    pub fn configured_error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("constraint", &self.constraint.as_ref().map(|_| "<fn>"))
            .field("status_code", &self.status_code)
            .field("error_message", &self.error_message)
            .finish()
    }
}

/// **VALIDATED OPTIONS FOR ALL FOUR FIELDS**
#[derive(Debug, Clone)]
pub struct ConstraintOptions {
    fields: [FieldOptions; 4],
}

impl ConstraintOptions {
    /// Starts a typed builder.
    pub fn builder() -> ConstraintOptionsBuilder {
        ConstraintOptionsBuilder::default()
    }

    /// Options of one field.
    pub fn field(&self, field: Field) -> &FieldOptions {
        &self.fields[field.index()]
    }

    /// Fields that declare a discriminator, in evaluation order.
    pub fn constrained_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.field(*field).has_constraint())
            .collect()
    }

    /// **NORMALIZE LOOSELY TYPED OPTIONS**
    ///
    /// Fields are checked in [`Field::ALL`] order and, within a field, `constraint`,
    /// `statusCode`, `errorMessage`. The first offending option is reported.
    pub fn from_raw(raw: RawOptions) -> Result<Self, ConfigError> {
        let mut fields: [FieldOptions; 4] = Default::default();

        for (name, _) in raw.fields.iter().filter(|(name, _)| Field::parse(name).is_none()) {
            log::debug!("ignoring options for unknown field '{}'", name);
        }

        for field in Field::ALL {
            let Some(options) = raw.fields.get(field.as_str()) else {
                continue;
            };
            let normalized = &mut fields[field.index()];

            match options.get(option_names::CONSTRAINT) {
                None => {}
                Some(OptionValue::Function(discriminator)) => {
                    normalized.constraint = Some(discriminator.clone());
                }
                Some(OptionValue::Value(_)) => {
                    return Err(invalid_type(field, option_names::CONSTRAINT, "function"));
                }
            }

            match options.get(option_names::STATUS_CODE) {
                None => {}
                Some(OptionValue::Value(JsonValue::Number(number))) => {
                    normalized.status_code = Some(status_from_number(field, number)?);
                }
                Some(_) => return Err(invalid_type(field, option_names::STATUS_CODE, "number")),
            }

            match options.get(option_names::ERROR_MESSAGE) {
                None => {}
                Some(OptionValue::Value(JsonValue::String(message))) => {
                    normalized.error_message = Some(message.clone());
                }
                Some(_) => return Err(invalid_type(field, option_names::ERROR_MESSAGE, "string")),
            }

            for name in options.keys().filter(|name| !is_known_option(name)) {
                log::debug!("ignoring unknown option '{}.{}'", field, name);
            }
        }

        Self::finish(fields)
    }

    fn finish(fields: [FieldOptions; 4]) -> Result<Self, ConfigError> {
        for field in Field::ALL {
            if let Some(status) = fields[field.index()].status_code {
                check_status_range(field, status)?;
            }
        }
        if fields.iter().all(|options| !options.has_constraint()) {
            return Err(ConfigError::Missing);
        }
        Ok(Self { fields })
    }
}

/// **TYPED OPTIONS BUILDER**
#[derive(Debug, Default)]
pub struct ConstraintOptionsBuilder {
    fields: [FieldOptions; 4],
}

impl ConstraintOptionsBuilder {
    /// Sets the options of `field`, replacing earlier ones.
    pub fn field(mut self, field: Field, options: FieldOptions) -> Self {
        self.fields[field.index()] = options;
        self
    }

    /// Shorthand for [`Field::Body`].
    pub fn body(self, options: FieldOptions) -> Self {
        self.field(Field::Body, options)
    }

    /// Shorthand for [`Field::Querystring`].
    pub fn querystring(self, options: FieldOptions) -> Self {
        self.field(Field::Querystring, options)
    }

    /// Shorthand for [`Field::Params`].
    pub fn params(self, options: FieldOptions) -> Self {
        self.field(Field::Params, options)
    }

    /// Shorthand for [`Field::Headers`].
    pub fn headers(self, options: FieldOptions) -> Self {
        self.field(Field::Headers, options)
    }

    /// Validates status codes and requires at least one discriminator.
    pub fn build(self) -> Result<ConstraintOptions, ConfigError> {
        ConstraintOptions::finish(self.fields)
    }
}

/// A loosely typed option value: a discriminator function or any JSON value.
#[derive(Clone)]
pub enum OptionValue {
    /// A discriminator.
    Function(Arc<dyn Discriminator>),
    /// Anything else.
    Value(JsonValue),
}

impl OptionValue {
    /// Wraps a discriminator.
    pub fn function<D: Discriminator + 'static>(discriminator: D) -> Self {
        OptionValue::Function(Arc::new(discriminator))
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Function(_) => f.write_str("Function(<fn>)"),
            OptionValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<JsonValue> for OptionValue {
    fn from(value: JsonValue) -> Self {
        OptionValue::Value(value)
    }
}

/// **RAW OPTIONS** - field name → option name → value, before normalization
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    fields: HashMap<String, HashMap<String, OptionValue>>,
}

impl RawOptions {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field.option`. Names are kept as given and matched on normalization.
    pub fn set(
        mut self,
        field: impl Into<String>,
        option: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .insert(option.into(), value.into());
        self
    }

    /// Load options from a JSON document such as
    /// `{"body": {"statusCode": 412, "errorMessage": "..."}}`.
    ///
    /// JSON cannot carry functions, so any `constraint` key read here will be
    /// rejected by [`ConstraintOptions::from_raw`] unless replaced with [`RawOptions::set`].
    pub fn from_json(document: &JsonValue) -> Self {
        let mut raw = Self::new();
        let Some(object) = document.as_object() else {
            return raw;
        };
        for (field_name, options) in object {
            let JsonValue::Object(options) = options else {
                log::debug!("ignoring non-object options for '{}'", field_name);
                continue;
            };
            for (option, value) in options {
                raw = raw.set(field_name.clone(), option.clone(), value.clone());
            }
        }
        raw
    }
}

fn invalid_type(field: Field, option: &'static str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidType {
        field,
        option,
        expected,
    }
}

fn is_known_option(name: &str) -> bool {
    matches!(
        name,
        option_names::CONSTRAINT | option_names::STATUS_CODE | option_names::ERROR_MESSAGE
    )
}

/// Integral values (including `412.0`) are range checked on the spot so errors keep field
/// order; anything fractional is a type error.
fn status_from_number(field: Field, number: &serde_json::Number) -> Result<u16, ConfigError> {
    let value = number
        .as_f64()
        .filter(|value| value.fract() == 0.0)
        .ok_or_else(|| invalid_type(field, option_names::STATUS_CODE, "number"))?;
    if !(100.0..=999.0).contains(&value) {
        return Err(ConfigError::InvalidStatusCode {
            field,
            value: number.to_string(),
        });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as u16)
}

fn check_status_range(field: Field, status: u16) -> Result<(), ConfigError> {
    if (100..=999).contains(&status) {
        Ok(())
    } else {
        Err(ConfigError::InvalidStatusCode {
            field,
            value: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::{discriminator_fn, BoxError};
    use crate::request::HttpRequest;
    use serde_json::json;

    fn schema1() -> OptionValue {
        OptionValue::function(discriminator_fn(|_: &HttpRequest| Ok::<_, BoxError>("schema1")))
    }

    mod raw_option_tests {
        use super::*;

        #[test]
        fn test_no_options_is_missing() {
            let err = ConstraintOptions::from_raw(RawOptions::new()).unwrap_err();
            assert_eq!(err, ConfigError::Missing);
            assert_eq!(err.to_string(), "Options are required");
        }

        #[test]
        fn test_wrong_types_name_field_and_option() {
            let options = [
                (option_names::CONSTRAINT, json!("not a function"), "function"),
                (option_names::STATUS_CODE, json!("not a number"), "number"),
                (option_names::ERROR_MESSAGE, json!(0x42), "string"),
            ];
            for field in Field::ALL {
                for (option, value, expected) in options.clone() {
                    let raw = RawOptions::new().set(field.as_str(), option, value);
                    let err = ConstraintOptions::from_raw(raw).unwrap_err();
                    assert_eq!(err, invalid_type(field, option, expected));
                    assert_eq!(
                        err.to_string(),
                        format!("The \"{}.{}\" option must be a {}", field, option, expected)
                    );
                }
            }
        }

        #[test]
        fn test_function_in_wrong_slot_is_rejected() {
            let raw = RawOptions::new().set("body", "statusCode", schema1());
            let err = ConstraintOptions::from_raw(raw).unwrap_err();
            assert_eq!(err.to_string(), "The \"body.statusCode\" option must be a number");
        }

        #[test]
        fn test_null_constraint_is_not_a_function() {
            let raw = RawOptions::new().set("params", "constraint", JsonValue::Null);
            let err = ConstraintOptions::from_raw(raw).unwrap_err();
            assert_eq!(err.to_string(), "The \"params.constraint\" option must be a function");
        }

        #[test]
        fn test_check_order_field_then_option() {
            let raw = RawOptions::new()
                .set("headers", "constraint", json!(1))
                .set("querystring", "errorMessage", json!(1))
                .set("querystring", "statusCode", json!("x"));
            let err = ConstraintOptions::from_raw(raw).unwrap_err();
            assert_eq!(err.to_string(), "The \"querystring.statusCode\" option must be a number");
        }

        #[test]
        fn test_type_errors_win_over_missing() {
            let raw = RawOptions::new().set("body", "errorMessage", json!(false));
            assert!(matches!(
                ConstraintOptions::from_raw(raw),
                Err(ConfigError::InvalidType { .. })
            ));
        }

        #[test]
        fn test_fractional_status_code_is_a_type_error() {
            let raw = RawOptions::new()
                .set("body", "constraint", schema1())
                .set("body", "statusCode", json!(412.5));
            let err = ConstraintOptions::from_raw(raw).unwrap_err();
            assert_eq!(err, invalid_type(Field::Body, option_names::STATUS_CODE, "number"));
            assert_eq!(err.to_string(), "The \"body.statusCode\" option must be a number");
        }

        #[test]
        fn test_status_code_must_be_in_range() {
            for bad in [json!(-1), json!(70000), json!(42), json!(1000)] {
                let raw = RawOptions::new()
                    .set("body", "constraint", schema1())
                    .set("body", "statusCode", bad);
                assert!(matches!(
                    ConstraintOptions::from_raw(raw),
                    Err(ConfigError::InvalidStatusCode { field: Field::Body, .. })
                ));
            }

            let raw = RawOptions::new()
                .set("body", "constraint", schema1())
                .set("body", "statusCode", json!(412.0));
            let options = ConstraintOptions::from_raw(raw).unwrap();
            assert_eq!(options.field(Field::Body).configured_status_code(), Some(412));
        }

        #[test]
        fn test_status_range_errors_keep_field_order() {
            for bad in [json!(42), json!(70000)] {
                let raw = RawOptions::new()
                    .set("body", "statusCode", bad)
                    .set("querystring", "constraint", json!("x"));
                assert!(matches!(
                    ConstraintOptions::from_raw(raw),
                    Err(ConfigError::InvalidStatusCode { field: Field::Body, .. })
                ));
            }

            let raw = RawOptions::new()
                .set("body", "constraint", json!("x"))
                .set("querystring", "statusCode", json!(42));
            assert_eq!(
                ConstraintOptions::from_raw(raw).unwrap_err(),
                invalid_type(Field::Body, option_names::CONSTRAINT, "function")
            );
        }

        #[test]
        fn test_valid_raw_options() {
            let raw = RawOptions::new()
                .set("body", "constraint", schema1())
                .set("body", "statusCode", json!(412))
                .set("body", "errorMessage", json!("This constraint return only schema1"))
                .set("body", "somethingElse", json!(true))
                .set("cookies", "constraint", json!("ignored"));
            let options = ConstraintOptions::from_raw(raw).unwrap();

            let body = options.field(Field::Body);
            assert!(body.has_constraint());
            assert_eq!(body.effective_status_code(), 412);
            assert_eq!(
                body.configured_error_message(),
                Some("This constraint return only schema1")
            );
            assert_eq!(options.field(Field::Headers).effective_status_code(), 400);
            assert_eq!(options.constrained_fields(), vec![Field::Body]);
        }
    }

    mod json_loading_tests {
        use super::*;

        #[test]
        fn test_from_json_then_attach_functions() {
            let raw = RawOptions::from_json(&json!({
                "body": { "statusCode": 412, "errorMessage": "X" },
                "headers": { "statusCode": 500 }
            }))
            .set("body", "constraint", schema1());
            let options = ConstraintOptions::from_raw(raw).unwrap();
            assert_eq!(options.field(Field::Body).effective_status_code(), 412);
            assert_eq!(options.field(Field::Headers).configured_status_code(), Some(500));
            assert!(!options.field(Field::Headers).has_constraint());
        }

        #[test]
        fn test_from_json_constraint_is_rejected() {
            let raw = RawOptions::from_json(&json!({"body": {"constraint": "schema1"}}));
            let err = ConstraintOptions::from_raw(raw).unwrap_err();
            assert_eq!(err.to_string(), "The \"body.constraint\" option must be a function");
        }

        #[test]
        fn test_from_json_ignores_non_object_fields() {
            let raw = RawOptions::from_json(&json!({"params": 3, "body": null}));
            assert_eq!(ConstraintOptions::from_raw(raw).unwrap_err(), ConfigError::Missing);
        }
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_builder_requires_a_constraint() {
            let err = ConstraintOptions::builder()
                .body(FieldOptions::new().status_code(412))
                .build()
                .unwrap_err();
            assert_eq!(err, ConfigError::Missing);
        }

        #[test]
        fn test_builder_rejects_unusable_status() {
            let err = ConstraintOptions::builder()
                .headers(
                    FieldOptions::new()
                        .constraint(discriminator_fn(|_: &HttpRequest| Ok::<_, BoxError>("a")))
                        .status_code(42),
                )
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidStatusCode { field: Field::Headers, .. }));
        }

        #[test]
        fn test_builder_success() {
            let options = ConstraintOptions::builder()
                .querystring(
                    FieldOptions::new()
                        .constraint(discriminator_fn(|_: &HttpRequest| Ok::<_, BoxError>("a")))
                        .error_message("bad query"),
                )
                .build()
                .unwrap();
            assert_eq!(options.constrained_fields(), vec![Field::Querystring]);
            assert_eq!(
                options.field(Field::Querystring).configured_error_message(),
                Some("bad query")
            );
            assert_eq!(options.field(Field::Querystring).effective_status_code(), 400);
        }
    }
}
