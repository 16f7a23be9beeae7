//! # JSON SCHEMA COMPILER
//!
//! **PURPOSE**: Default [`SchemaCompiler`] backed by the `jsonschema` crate.
//! **COERCION**: Query, path and header payloads only ever carry strings, so scalar
//! properties are coerced to the type their schema declares before validation.

use super::{SchemaCompiler, ValidationOutcome, Validator};
use crate::errors::CompileError;
use jsonschema::Draft;
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;

/// **JSON TYPE ENUMERATION**
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonType {
    fn parse(name: &str) -> Option<JsonType> {
        match name {
            "string" => Some(JsonType::String),
            "number" => Some(JsonType::Number),
            "integer" => Some(JsonType::Integer),
            "boolean" => Some(JsonType::Boolean),
            "array" => Some(JsonType::Array),
            "object" => Some(JsonType::Object),
            "null" => Some(JsonType::Null),
            _ => None,
        }
    }

    /// Declared types of a schema's `type` keyword, in declaration order.
    fn declared(schema: &JsonValue) -> Vec<JsonType> {
        match schema.get("type") {
            Some(JsonValue::String(name)) => JsonType::parse(name).into_iter().collect(),
            Some(JsonValue::Array(names)) => names
                .iter()
                .filter_map(JsonValue::as_str)
                .filter_map(JsonType::parse)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// **JSON SCHEMA COMPILER**
#[derive(Debug, Clone)]
pub struct JsonSchemaCompiler {
    draft: Draft,
    coerce_types: bool,
}

impl JsonSchemaCompiler {
    /// **CONSTRUCTOR** - Draft 7, scalar coercion enabled
    pub fn new() -> Self {
        Self {
            draft: Draft::Draft7,
            coerce_types: true,
        }
    }

    /// Compile against another JSON Schema draft.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = draft;
        self
    }

    /// Toggle string coercion for `number`, `integer`, `boolean` and `null` properties.
    pub fn coerce_types(mut self, enabled: bool) -> Self {
        self.coerce_types = enabled;
        self
    }
}

impl Default for JsonSchemaCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaCompiler for JsonSchemaCompiler {
    fn compile(&self, schema: &JsonValue) -> Result<Arc<dyn Validator>, CompileError> {
        let inner = jsonschema::options()
            .with_draft(self.draft)
            .build(schema)
            .map_err(|err| CompileError(format!("invalid schema: {err}")))?;

        let coercions = if self.coerce_types {
            property_types(schema)
        } else {
            HashMap::new()
        };

        Ok(Arc::new(JsonSchemaValidator { inner, coercions }))
    }
}

/// Compiled variant plus the coercion table derived from its `properties`.
struct JsonSchemaValidator {
    inner: jsonschema::Validator,
    coercions: HashMap<String, Vec<JsonType>>,
}

impl Validator for JsonSchemaValidator {
    fn validate(&self, payload: &JsonValue) -> ValidationOutcome {
        let coerced = match payload {
            JsonValue::Object(map) if !self.coercions.is_empty() => {
                Some(JsonValue::Object(self.coerce_object(map)))
            }
            _ => None,
        };
        let instance = coerced.as_ref().unwrap_or(payload);

        let error = self.inner.iter_errors(instance).next().map(|err| err.to_string());
        ValidationOutcome::Report { error }
    }
}

impl JsonSchemaValidator {
    fn coerce_object(&self, map: &Map<String, JsonValue>) -> Map<String, JsonValue> {
        map.iter()
            .map(|(key, value)| {
                let value = match self.coercions.get(key) {
                    Some(targets) => coerce_scalar(value, targets).unwrap_or_else(|| value.clone()),
                    None => value.clone(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

fn property_types(schema: &JsonValue) -> HashMap<String, Vec<JsonType>> {
    let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) else {
        return HashMap::new();
    };
    properties
        .iter()
        .map(|(name, property)| (name.clone(), JsonType::declared(property)))
        .filter(|(_, types)| !types.is_empty())
        .collect()
}

/// Coerce a string into the first declared scalar type it can represent.
fn coerce_scalar(value: &JsonValue, targets: &[JsonType]) -> Option<JsonValue> {
    let JsonValue::String(text) = value else {
        return None;
    };
    if targets.contains(&JsonType::String) {
        return None;
    }
    targets.iter().find_map(|target| match target {
        JsonType::Integer => text.trim().parse::<i64>().ok().map(JsonValue::from),
        JsonType::Number => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(int) = trimmed.parse::<i64>() {
                return Some(JsonValue::from(int));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(JsonValue::Number)
        }
        JsonType::Boolean => match text.as_str() {
            "true" => Some(JsonValue::Bool(true)),
            "false" => Some(JsonValue::Bool(false)),
            _ => None,
        },
        JsonType::Null => text.is_empty().then_some(JsonValue::Null),
        JsonType::String | JsonType::Array | JsonType::Object => None,
    })
}
