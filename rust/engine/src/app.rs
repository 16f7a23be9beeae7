//! # APPLICATION PIPELINE
//!
//! **FLOW**: route match → pre-handler hooks in registration order → handler.
//! **ERRORS**: 404 for unknown routes, 400 for undecodable bodies, 500 for handler panics.

use crate::config::EngineConfig;
use crate::error::{catch_unwind_handler, EngineError};
use crate::hooks::PreHandlerHook;
use crate::response::HttpResponse;
use schema_constraint::request::{parse_body, parse_headers, parse_query_string};
use schema_constraint::routing::{parse_http_method, parse_route_pattern};
use schema_constraint::{
    ConstraintOptions, HttpRequest, RawOptions, RouteMatcher, RouteSchema, SchemaConstraint,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Route handler. Runs after every hook has let the request through.
pub type Handler = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Raw request as it arrives from a socket or a test.
#[derive(Debug, Clone, Default)]
pub struct InjectRequest {
    /// Method name, any case.
    pub method: String,
    /// Path with an optional `?query` suffix.
    pub url: String,
    /// Headers as sent; names are lower-cased on decoding.
    pub headers: Vec<(String, String)>,
    /// Query parameters added on top of the url's.
    pub query: Vec<(String, String)>,
    /// Raw body, decoded according to `content-type`.
    pub body: Vec<u8>,
}

impl InjectRequest {
    /// Request with no headers or body.
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: &str, value: impl ToString) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Extra query parameter, merged over the ones in the url.
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// JSON payload; sets `content-type: application/json`.
    pub fn payload(self, value: &JsonValue) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.body("application/json", body)
    }

    /// Raw body with its content type, replacing any earlier `content-type`.
    pub fn body(mut self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
        self.headers
            .push(("content-type".to_string(), content_type.to_string()));
        self.body = body.into();
        self
    }
}

/// Routes, handlers and hooks. Shared read-only across connections once built.
#[derive(Default)]
pub struct App {
    config: EngineConfig,
    matcher: RouteMatcher,
    handlers: HashMap<String, Handler>,
    hooks: Vec<Arc<dyn PreHandlerHook>>,
}

impl App {
    /// App with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// App with explicit engine settings.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Install a schema constraint as a pre-handler hook.
    pub fn register(&mut self, options: ConstraintOptions) -> Arc<SchemaConstraint> {
        let constraint = Arc::new(SchemaConstraint::new(options));
        self.hooks.push(constraint.clone());
        constraint
    }

    /// Validate loosely typed options and install the resulting constraint.
    pub fn register_raw(&mut self, raw: RawOptions) -> Result<Arc<SchemaConstraint>, EngineError> {
        let options = ConstraintOptions::from_raw(raw)?;
        Ok(self.register(options))
    }

    /// Install any other pre-handler hook. Hooks run in registration order.
    pub fn add_hook<H: PreHandlerHook + 'static>(&mut self, hook: H) {
        self.hooks.push(Arc::new(hook));
    }

    /// Add a route. `schema` is the route's `{body, querystring, params, headers}`
    /// declaration; pass `JsonValue::Null` for none.
    pub fn route<H>(
        &mut self,
        method: &str,
        pattern: &str,
        schema: &JsonValue,
        handler: H,
    ) -> Result<(), EngineError>
    where
        H: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        let route_schema = RouteSchema::from_json(schema)?;
        let handler_id = format!("{} {}#{}", method.to_uppercase(), pattern, self.matcher.len());
        let route = parse_route_pattern(pattern, method, &handler_id, route_schema)?;
        log::debug!("route registered: {} {}", route.method, route.path);

        self.matcher.add_route(route);
        self.handlers.insert(handler_id, Arc::new(handler));
        Ok(())
    }

    /// Run one request through the pipeline without a socket.
    pub async fn inject(&self, request: InjectRequest) -> HttpResponse {
        let (path, query) = match request.url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (request.url.as_str(), ""),
        };

        let Ok(method) = parse_http_method(&request.method) else {
            return not_found(&request.method, path);
        };
        let Some(matched) = self.matcher.match_route(path, method) else {
            return not_found(&request.method, path);
        };

        let headers = parse_headers(
            request
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        let mut query_params = parse_query_string(query);
        query_params.extend(request.query.iter().cloned());

        let body = match parse_body(
            headers.get("content-type").map(String::as_str),
            &request.body,
        ) {
            Ok(body) => body,
            Err(err) => return HttpResponse::error(400, err.to_string()),
        };

        let http_request = HttpRequest {
            method,
            path: path.to_string(),
            headers,
            query_params,
            path_params: matched.path_params,
            body,
        };

        for hook in &self.hooks {
            if let Err(response) = hook.pre_handler(&http_request, &matched.schema).await {
                log::debug!(
                    "{} {} answered by hook with {}",
                    request.method,
                    path,
                    response.status_code
                );
                return response;
            }
        }

        let Some(handler) = self.handlers.get(&matched.handler_id) else {
            log::error!("no handler for {}", matched.handler_id);
            return internal_error();
        };
        match catch_unwind_handler(|| handler(&http_request)) {
            Ok(response) => response,
            Err(err) => {
                log::error!("{} {}: {}", request.method, path, err);
                internal_error()
            }
        }
    }
}

fn not_found(method: &str, path: &str) -> HttpResponse {
    HttpResponse::error(404, format!("Route {}:{} not found", method, path))
}

fn internal_error() -> HttpResponse {
    HttpResponse::error(500, "Internal Server Error")
}
