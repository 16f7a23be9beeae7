//! # REQUEST TYPES
//!
//! **PURPOSE**: The request view every field check reads from.

use crate::routing::HttpMethod;
use crate::types::Field;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Read-only view of an incoming request, as handed to discriminators and validators.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Path without the query string.
    pub path: String,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    /// Decoded query string.
    pub query_params: HashMap<String, String>,
    /// Values captured by the route pattern.
    pub path_params: HashMap<String, String>,
    /// Decoded body.
    pub body: RequestBody,
}

/// Body as decoded from its content type.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// `application/json`.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`.
    Form(HashMap<String, String>),
    /// Anything else, kept as bytes.
    Raw(Vec<u8>),
}

impl HttpRequest {
    /// Request with no headers, parameters or body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            query_params: HashMap::new(),
            path_params: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// Adds a header; the name is lower-cased.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Adds a decoded query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Adds a path parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets a JSON body.
    pub fn with_json(self, value: Value) -> Self {
        self.with_body(RequestBody::Json(value))
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The JSON payload a field's validator runs against.
    ///
    /// The querystring field validates the parsed query map, never the raw query.
    pub fn payload(&self, field: Field) -> Value {
        match field {
            Field::Body => self.body.to_value(),
            Field::Querystring => string_map(&self.query_params),
            Field::Params => string_map(&self.path_params),
            Field::Headers => string_map(&self.headers),
        }
    }
}

impl RequestBody {
    /// JSON view of the body; empty and raw bodies have no structured payload.
    pub fn to_value(&self) -> Value {
        match self {
            RequestBody::Empty | RequestBody::Raw(_) => Value::Null,
            RequestBody::Json(value) => value.clone(),
            RequestBody::Form(fields) => string_map(fields),
        }
    }
}

fn string_map(map: &HashMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>(),
    )
}
