//! # CONSTRAINT EVALUATOR
//!
//! **PURPOSE**: Checks one request field against the variant its discriminator selects.
//!
//! ## STEPS (short-circuit on the first failure)
//!
//! 1. **GUARD** - No declared variants or no discriminator: nothing to check
//! 2. **DISCRIMINATE** - No variant id returned: nothing to check
//! 3. **RESOLVE** - Map the id onto a declared variant
//! 4. **COMPILE** - Fetch or compile the variant's validator
//! 5. **VALIDATE** - Run it against the field payload

use crate::config::FieldOptions;
use crate::discriminator::invoke;
use crate::errors::{EvaluationError, Violation};
use crate::request::HttpRequest;
use crate::schema::{resolve, VariantSet};
use crate::types::Field;
use crate::validation::{SchemaCompiler, ValidatorCache};
use std::sync::Arc;

/// Runs the per-field steps over a shared [`ValidatorCache`].
#[derive(Debug)]
pub struct ConstraintEvaluator {
    cache: ValidatorCache,
}

impl ConstraintEvaluator {
    /// Evaluator with an empty cache over `compiler`.
    pub fn new(compiler: Arc<dyn SchemaCompiler>) -> Self {
        Self {
            cache: ValidatorCache::new(compiler),
        }
    }

    /// Validators compiled so far.
    pub fn cache(&self) -> &ValidatorCache {
        &self.cache
    }

    /// **EVALUATE ONE FIELD**
    ///
    /// `Ok(())` when the field passes or is not checked for this request.
    pub async fn evaluate(
        &self,
        field: Field,
        options: &FieldOptions,
        request: &HttpRequest,
        variants: Option<&VariantSet>,
    ) -> Result<(), EvaluationError> {
        // **STEP 1**: The route must expose variants and the field must be discriminated
        let (Some(variants), Some(discriminator)) = (variants, options.discriminator()) else {
            return Ok(());
        };

        // **STEP 2**: Ask the discriminator which variant applies
        let Some(id) = invoke(field, discriminator.as_ref(), request).await? else {
            return Ok(());
        };

        // **STEP 3**: Resolve the id
        let variant = resolve(field, &id, variants)?;

        // **STEP 4**: Compile on first use
        let validator = self.cache.get_or_compile(field, variant)?;

        // **STEP 5**: Validate the field payload
        let outcome = validator.validate(&request.payload(field));
        if outcome.is_failure() {
            return Err(Violation::Mismatch {
                field,
                id,
                detail: outcome.detail().map(str::to_string),
            }
            .into());
        }

        Ok(())
    }
}
