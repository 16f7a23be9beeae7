//! # REQUEST FIELD DEFINITIONS
//!
//! **CRITICAL**: The four request fields a constraint can be attached to.
//! **MANDATE**: Evaluation order is fixed by [`Field::ALL`] and MUST NOT change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// **REQUEST FIELD**
///
/// **PURPOSE**: Names one part of an incoming request that carries its own schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Request body payload.
    Body,
    /// Parsed query-parameter map.
    Querystring,
    /// Path parameters captured by the route pattern.
    Params,
    /// Request headers, keyed by lower-cased name.
    Headers,
}

impl Field {
    /// **EVALUATION ORDER** - body, querystring, params, headers
    pub const ALL: [Field; 4] = [Field::Body, Field::Querystring, Field::Params, Field::Headers];

    /// Option-key spelling of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Body => "body",
            Field::Querystring => "querystring",
            Field::Params => "params",
            Field::Headers => "headers",
        }
    }

    /// Parse the option-key spelling back into a field.
    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Position of the field inside [`Field::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Field::Body => 0,
            Field::Querystring => 1,
            Field::Params => 2,
            Field::Headers => 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_is_fixed() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["body", "querystring", "params", "headers"]);
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(Field::parse("querystring"), Some(Field::Querystring));
        assert_eq!(Field::parse("query"), None);
        assert_eq!(Field::parse("Body"), None);
    }

    #[test]
    fn test_field_serde_spelling() {
        let value = serde_json::to_value(Field::Headers).unwrap();
        assert_eq!(value, serde_json::json!("headers"));
    }
}
