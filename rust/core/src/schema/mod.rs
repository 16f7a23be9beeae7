//! Per-route schema declarations and variant resolution.

pub mod resolver;
pub mod variant;

pub use resolver::resolve;
pub use variant::{RouteSchema, SchemaVariant, VariantSet};
