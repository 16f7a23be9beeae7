//! # ROUTE PATTERN PARSER
//!
//! **SYNTAX**: `/items/{id}` or `/items/:id`; a trailing slash is optional when matching.

use crate::errors::RouteError;
use crate::routing::types::{HttpMethod, Route};
use crate::schema::RouteSchema;
use regex::Regex;
use std::sync::Arc;

/// Compile a route pattern. Parameters are written `{name}` or `:name`.
pub fn parse_route_pattern(
    pattern: &str,
    method: &str,
    handler_id: &str,
    schema: RouteSchema,
) -> Result<Route, RouteError> {
    let mut regex_pattern = String::from("^");
    let mut param_names = Vec::new();

    for part in pattern.split('/').filter(|part| !part.is_empty()) {
        regex_pattern.push('/');
        if let Some(param_name) = param_name(part) {
            if param_name.is_empty() {
                return Err(RouteError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: "empty parameter name".to_string(),
                });
            }
            param_names.push(param_name.to_string());
            regex_pattern.push_str(r"([^/]+)");
        } else {
            regex_pattern.push_str(&regex::escape(part));
        }
    }
    if param_names.is_empty() && regex_pattern == "^" {
        regex_pattern.push('/');
    }
    regex_pattern.push_str("/?$");

    let path_regex = Regex::new(&regex_pattern).map_err(|e| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(Route {
        path: pattern.to_string(),
        method: parse_http_method(method)?,
        handler_id: handler_id.to_string(),
        path_regex,
        param_names,
        schema: Arc::new(schema),
    })
}

fn param_name(part: &str) -> Option<&str> {
    if let Some(name) = part.strip_prefix(':') {
        return Some(name);
    }
    part.strip_prefix('{').and_then(|rest| rest.strip_suffix('}'))
}

/// Case-insensitive method name lookup.
pub fn parse_http_method(method: &str) -> Result<HttpMethod, RouteError> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(HttpMethod::GET),
        "POST" => Ok(HttpMethod::POST),
        "PUT" => Ok(HttpMethod::PUT),
        "DELETE" => Ok(HttpMethod::DELETE),
        "PATCH" => Ok(HttpMethod::PATCH),
        "HEAD" => Ok(HttpMethod::HEAD),
        "OPTIONS" => Ok(HttpMethod::OPTIONS),
        "TRACE" => Ok(HttpMethod::TRACE),
        _ => Err(RouteError::InvalidMethod(method.to_string())),
    }
}
