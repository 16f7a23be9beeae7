//! # REQUEST INTERCEPTOR
//!
//! **PURPOSE**: Per-request entry point invoked by the host before the route handler.
//! **ORDER**: body, querystring, params, headers. The first violation stops evaluation.
//! **GUARANTEE**: Never mutates the request; success has no observable effect.

use crate::config::{ConstraintOptions, RawOptions};
use crate::errors::{ConfigError, ConstraintError, EvaluationError, Violation};
use crate::evaluator::ConstraintEvaluator;
use crate::request::HttpRequest;
use crate::schema::RouteSchema;
use crate::types::Field;
use crate::validation::{JsonSchemaCompiler, SchemaCompiler, ValidatorCache};
use std::sync::Arc;

/// **SCHEMA CONSTRAINT INTERCEPTOR**
///
/// Owns the validated options and one validator cache. Share it across requests.
#[derive(Debug)]
pub struct SchemaConstraint {
    options: ConstraintOptions,
    evaluator: ConstraintEvaluator,
}

impl SchemaConstraint {
    /// Interceptor backed by the default [`JsonSchemaCompiler`].
    pub fn new(options: ConstraintOptions) -> Self {
        Self::with_compiler(options, Arc::new(JsonSchemaCompiler::new()))
    }

    /// Interceptor backed by a custom schema compiler.
    pub fn with_compiler(options: ConstraintOptions, compiler: Arc<dyn SchemaCompiler>) -> Self {
        log::debug!(
            "schema constraints registered for {:?}",
            options.constrained_fields()
        );
        Self {
            options,
            evaluator: ConstraintEvaluator::new(compiler),
        }
    }

    /// Validate loosely typed options and build the interceptor.
    pub fn from_raw(raw: RawOptions) -> Result<Self, ConfigError> {
        ConstraintOptions::from_raw(raw).map(Self::new)
    }

    /// Validated options this interceptor runs with.
    pub fn options(&self) -> &ConstraintOptions {
        &self.options
    }

    /// Validators compiled so far.
    pub fn cache(&self) -> &ValidatorCache {
        self.evaluator.cache()
    }

    /// Run every field check for one request.
    pub async fn check(
        &self,
        request: &HttpRequest,
        schema: &RouteSchema,
    ) -> Result<(), ConstraintError> {
        if schema.is_empty() {
            return Ok(());
        }

        for field in Field::ALL {
            let options = self.options.field(field);
            match self
                .evaluator
                .evaluate(field, options, request, schema.get(field))
                .await
            {
                Ok(()) => {}
                Err(EvaluationError::Violation(violation)) => {
                    return Err(self.reject(violation));
                }
                Err(EvaluationError::Schema(err)) => {
                    log::error!("{}", err);
                    return Err(ConstraintError::Schema(err));
                }
            }
        }

        Ok(())
    }

    /// Apply the violated field's configured status and message.
    fn reject(&self, violation: Violation) -> ConstraintError {
        let options = self.options.field(violation.field());
        let message = options
            .configured_error_message()
            .filter(|message| !message.is_empty())
            .map_or_else(|| violation.to_string(), str::to_string);

        log::debug!("{} {} rejected: {}", violation.field(), violation.code(), violation);

        ConstraintError::Rejected {
            status_code: options.effective_status_code(),
            message,
            violation,
        }
    }
}
