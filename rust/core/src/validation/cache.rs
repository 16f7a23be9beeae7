//! # VALIDATOR CACHE
//!
//! **PURPOSE**: Process-wide memo of compiled validators keyed by `(field, variant id)`.
//! **CONCURRENCY**: Reads share a lock; compilation runs with no lock held, so two
//! requests racing on the same cold key may both compile. The later insert replaces
//! the whole entry and both validators are equivalent.
//! **LIFETIME**: Entries are never evicted; the key space is bounded by route declarations.

use super::{SchemaCompiler, Validator};
use crate::errors::SchemaError;
use crate::schema::SchemaVariant;
use crate::types::Field;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key: the field and the id of the variant compiled for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Field the validator checks.
    pub field: Field,
    /// Id of the compiled variant.
    pub variant_id: String,
}

impl CacheKey {
    /// Key for `field` and `variant_id`.
    pub fn new(field: Field, variant_id: impl Into<String>) -> Self {
        Self {
            field,
            variant_id: variant_id.into(),
        }
    }
}

/// Shared validator memo. See the module docs for its concurrency rules.
pub struct ValidatorCache {
    compiler: Arc<dyn SchemaCompiler>,
    entries: RwLock<HashMap<CacheKey, Arc<dyn Validator>>>,
}

impl ValidatorCache {
    /// Empty cache compiling through `compiler`.
    pub fn new(compiler: Arc<dyn SchemaCompiler>) -> Self {
        Self {
            compiler,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached validator for `(field, variant.id)`, compiling it on a miss.
    ///
    /// Compilation failures are returned as [`SchemaError`] and nothing is stored.
    pub fn get_or_compile(
        &self,
        field: Field,
        variant: &SchemaVariant,
    ) -> Result<Arc<dyn Validator>, SchemaError> {
        let key = CacheKey::new(field, variant.id());
        if let Some(validator) = self.entries.read().get(&key) {
            return Ok(validator.clone());
        }

        log::debug!("compiling validator for {}.{}", field, variant.id());
        let validator = self
            .compiler
            .compile(variant.schema())
            .map_err(|source| SchemaError {
                field,
                id: variant.id().to_string(),
                source,
            })?;

        self.entries.write().insert(key, validator.clone());
        Ok(validator)
    }

    /// `true` once `(field, variant_id)` compiled successfully.
    pub fn contains(&self, field: Field, variant_id: &str) -> bool {
        self.entries
            .read()
            .contains_key(&CacheKey::new(field, variant_id))
    }

    /// Number of compiled validators.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// `true` until a validator has been compiled.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompileError;
    use serde_json::{json, Value as JsonValue};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_compiler(count: Arc<AtomicUsize>) -> Arc<dyn SchemaCompiler> {
        Arc::new(move |schema: &JsonValue| -> Result<Arc<dyn Validator>, CompileError> {
            count.fetch_add(1, Ordering::SeqCst);
            if schema.get("broken").is_some() {
                return Err(CompileError("broken schema".to_string()));
            }
            Ok(Arc::new(|payload: &JsonValue| payload.is_object()))
        })
    }

    #[test]
    fn test_hit_does_not_recompile() {
        let count = Arc::new(AtomicUsize::new(0));
        let cache = ValidatorCache::new(counting_compiler(count.clone()));
        let variant = SchemaVariant::new("schema1", json!({}));

        for _ in 0..10 {
            cache.get_or_compile(Field::Body, &variant).unwrap();
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(cache.contains(Field::Body, "schema1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_per_field() {
        let count = Arc::new(AtomicUsize::new(0));
        let cache = ValidatorCache::new(counting_compiler(count.clone()));
        let variant = SchemaVariant::new("schema1", json!({}));

        cache.get_or_compile(Field::Body, &variant).unwrap();
        cache.get_or_compile(Field::Headers, &variant).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(Field::Params, "schema1"));
    }

    #[test]
    fn test_compile_failure_is_not_cached() {
        let count = Arc::new(AtomicUsize::new(0));
        let cache = ValidatorCache::new(counting_compiler(count.clone()));
        let variant = SchemaVariant::new("bad", json!({"broken": true}));

        let err = cache.get_or_compile(Field::Params, &variant).err().expect("expected compile error");
        assert_eq!(err.field, Field::Params);
        assert_eq!(err.id, "bad");
        assert!(cache.is_empty());

        cache.get_or_compile(Field::Params, &variant).err().expect("expected compile error");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_use_is_bounded() {
        let count = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(ValidatorCache::new(counting_compiler(count.clone())));
        let variant = SchemaVariant::new("schema1", json!({}));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cache = cache.clone();
                let variant = variant.clone();
                scope.spawn(move || {
                    for _ in 0..100 {
                        let validator = cache.get_or_compile(Field::Body, &variant).unwrap();
                        assert!(!validator.validate(&json!({})).is_failure());
                    }
                });
            }
        });

        let compiled = count.load(Ordering::SeqCst);
        assert!((1..=8).contains(&compiled));
        assert_eq!(cache.len(), 1);
    }
}
