//! # PRE-HANDLER HOOKS
//!
//! **PURPOSE**: Run after route matching and before the handler. A hook either lets the
//! request through or answers it.

use crate::response::HttpResponse;
use async_trait::async_trait;
use schema_constraint::{ConstraintError, HttpRequest, RouteSchema, SchemaConstraint};
use std::sync::Arc;

/// Hook invoked with the decoded request and the matched route's schema declarations.
#[async_trait]
pub trait PreHandlerHook: Send + Sync {
    /// `Err` short-circuits the pipeline with that response.
    async fn pre_handler(
        &self,
        request: &HttpRequest,
        schema: &RouteSchema,
    ) -> Result<(), HttpResponse>;
}

#[async_trait]
impl PreHandlerHook for SchemaConstraint {
    async fn pre_handler(
        &self,
        request: &HttpRequest,
        schema: &RouteSchema,
    ) -> Result<(), HttpResponse> {
        self.check(request, schema).await.map_err(|err| match err {
            ConstraintError::Rejected {
                status_code,
                message,
                ..
            } => HttpResponse::error(status_code, message),
            ConstraintError::Schema(err) => HttpResponse::error(500, err.to_string()),
        })
    }
}

#[async_trait]
impl<T: PreHandlerHook + ?Sized> PreHandlerHook for Arc<T> {
    async fn pre_handler(
        &self,
        request: &HttpRequest,
        schema: &RouteSchema,
    ) -> Result<(), HttpResponse> {
        (**self).pre_handler(request, schema).await
    }
}
