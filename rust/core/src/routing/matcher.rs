//! # ROUTE MATCHER
//!
//! **ORDER**: Routes are tried in registration order.

use crate::routing::types::{HttpMethod, Route, RouteMatch};
use std::collections::HashMap;

/// Ordered route table; the first registered match wins.
#[derive(Debug, Default)]
pub struct RouteMatcher {
    routes: Vec<Route>,
}

impl RouteMatcher {
    /// Empty table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route; it loses to any earlier route matching the same request.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` before any route is added.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route with the same method whose pattern matches `path`. Parameters are percent-decoded.
    pub fn match_route(&self, path: &str, method: HttpMethod) -> Option<RouteMatch> {
        for route in &self.routes {
            if route.method != method {
                continue;
            }

            if let Some(captures) = route.path_regex.captures(path) {
                let mut path_params = HashMap::new();
                for (i, param_name) in route.param_names.iter().enumerate() {
                    if let Some(value) = captures.get(i + 1) {
                        let decoded = urlencoding::decode(value.as_str())
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| value.as_str().to_string());
                        path_params.insert(param_name.clone(), decoded);
                    }
                }

                return Some(RouteMatch {
                    handler_id: route.handler_id.clone(),
                    path_params,
                    schema: route.schema.clone(),
                });
            }
        }

        None
    }
}
