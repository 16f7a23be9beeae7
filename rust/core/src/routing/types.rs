//! # ROUTING TYPES

use crate::schema::RouteSchema;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Supported request methods.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    TRACE,
}

impl HttpMethod {
    /// Upper-case method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// **REGISTERED ROUTE**
#[derive(Debug, Clone)]
pub struct Route {
    /// Pattern as registered.
    pub path: String,
    /// Method the route answers.
    pub method: HttpMethod,
    /// Opaque handler key handed back on match.
    pub handler_id: String,
    /// Compiled pattern; one capture group per parameter.
    pub path_regex: regex::Regex,
    /// Parameter names in capture order.
    pub param_names: Vec<String>,
    /// Declared schema variants, shared with every match of this route.
    pub schema: Arc<RouteSchema>,
}

/// **ROUTE MATCH** - what a request resolved to
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Handler key of the matched route.
    pub handler_id: String,
    /// Decoded path parameters.
    pub path_params: HashMap<String, String>,
    /// Schema declarations of the matched route.
    pub schema: Arc<RouteSchema>,
}
