//! Variant lookup by id.

use crate::errors::Violation;
use crate::schema::variant::{SchemaVariant, VariantSet};
use crate::types::Field;

/// Find the variant a discriminator selected. The first variant with a matching id wins.
pub fn resolve<'a>(
    field: Field,
    id: &str,
    variants: &'a VariantSet,
) -> Result<&'a SchemaVariant, Violation> {
    variants
        .iter()
        .find(|variant| variant.id() == id)
        .ok_or_else(|| Violation::VariantNotFound {
            field,
            id: id.to_string(),
        })
}
