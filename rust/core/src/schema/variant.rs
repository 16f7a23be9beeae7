//! # ROUTE SCHEMA DECLARATIONS
//!
//! **PURPOSE**: Holds, per route and per field, the closed list of `oneOf` variants.
//! **GUARANTEE**: Immutable once the route is registered; shared read-only across requests.

use crate::errors::RouteError;
use crate::types::Field;
use serde_json::Value as JsonValue;

/// One `$id`-tagged schema among a field's declared variants.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaVariant {
    id: String,
    schema: JsonValue,
}

impl SchemaVariant {
    /// A variant whose schema no longer carries its id.
    pub fn new(id: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            id: id.into(),
            schema,
        }
    }

    /// Id the discriminator selects this variant by.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Schema body, without the identifying `$id`.
    pub fn schema(&self) -> &JsonValue {
        &self.schema
    }
}

/// **VARIANT SET**
///
/// **PURPOSE**: The `oneOf` list declared for one field of one route.
/// **NOTE**: Ids are expected to be unique; duplicates are kept and the first wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantSet {
    variants: Vec<SchemaVariant>,
}

impl VariantSet {
    /// Variants in declaration order.
    pub fn new(variants: Vec<SchemaVariant>) -> Self {
        Self { variants }
    }

    /// `true` for `oneOf: []`.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Number of declared variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Variants in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, SchemaVariant> {
        self.variants.iter()
    }

    /// Ids declared more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();
        for variant in &self.variants {
            let id = variant.id();
            if seen.contains(&id) {
                if !duplicates.contains(&id) {
                    duplicates.push(id);
                }
            } else {
                seen.push(id);
            }
        }
        duplicates
    }

    /// **PARSE A FIELD DECLARATION**
    ///
    /// **RETURNS**:
    /// - `Ok(None)` - The declaration carries no `oneOf`, so nothing can be discriminated
    /// - `Ok(Some(set))` - One variant per `oneOf` entry with a string `$id` (or `id`);
    ///   entries without one are skipped and can never be selected
    /// - `Err(RouteError)` - Malformed declaration
    pub fn from_declaration(field: Field, declaration: &JsonValue) -> Result<Option<Self>, RouteError> {
        let object = declaration
            .as_object()
            .ok_or(RouteError::NotAnObject { field })?;

        let one_of = match object.get("oneOf") {
            Some(JsonValue::Array(entries)) => entries,
            Some(_) => return Err(RouteError::InvalidOneOf { field }),
            None => {
                log::debug!("'{}' schema declares no oneOf variants", field);
                return Ok(None);
            }
        };

        let mut variants = Vec::with_capacity(one_of.len());
        for (index, entry) in one_of.iter().enumerate() {
            let Some(mut schema) = entry.as_object().cloned() else {
                log::debug!("'{}.oneOf' entry #{} is not an object; it cannot be selected", field, index);
                continue;
            };
            let id = match schema.remove("$id").or_else(|| schema.remove("id")) {
                Some(JsonValue::String(id)) => id,
                _ => {
                    log::debug!("'{}.oneOf' entry #{} has no string $id; it cannot be selected", field, index);
                    continue;
                }
            };
            variants.push(SchemaVariant::new(id, JsonValue::Object(schema)));
        }

        let set = Self::new(variants);
        let duplicates = set.duplicate_ids();
        if !duplicates.is_empty() {
            log::warn!(
                "'{}.oneOf' declares duplicate ids {:?}; the first declaration of each wins",
                field,
                duplicates
            );
        }
        Ok(Some(set))
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a SchemaVariant;
    type IntoIter = std::slice::Iter<'a, SchemaVariant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// **ROUTE SCHEMA**
///
/// **PURPOSE**: Variant sets for each field a route declares a schema for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSchema {
    fields: [Option<VariantSet>; 4],
}

impl RouteSchema {
    /// No declarations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant declaration for one field.
    pub fn with(mut self, field: Field, variants: VariantSet) -> Self {
        self.fields[field.index()] = Some(variants);
        self
    }

    /// Variants declared for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&VariantSet> {
        self.fields[field.index()].as_ref()
    }

    /// True when no field declares any variant.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(Option::is_none)
    }

    /// **PARSE A ROUTE DECLARATION** - `{ body?, querystring?, params?, headers? }`
    ///
    /// Unknown keys (`response`, `summary`, ...) are ignored.
    pub fn from_json(declaration: &JsonValue) -> Result<Self, RouteError> {
        let mut schema = Self::new();
        let Some(object) = declaration.as_object() else {
            return Ok(schema);
        };
        for field in Field::ALL {
            if let Some(field_declaration) = object.get(field.as_str()) {
                schema.fields[field.index()] = VariantSet::from_declaration(field, field_declaration)?;
            }
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_schema() -> JsonValue {
        json!({
            "oneOf": [
                { "$id": "schema1", "type": "object", "required": ["mul5"] },
                { "$id": "schema2", "type": "object", "required": ["mul3"] }
            ]
        })
    }

    #[test]
    fn test_from_declaration_strips_ids() {
        let set = VariantSet::from_declaration(Field::Body, &test_schema())
            .unwrap()
            .unwrap();
        assert_eq!(set.len(), 2);
        let first = set.iter().next().unwrap();
        assert_eq!(first.id(), "schema1");
        assert!(first.schema().get("$id").is_none());
        assert_eq!(first.schema()["required"], json!(["mul5"]));
    }

    #[test]
    fn test_from_declaration_without_one_of() {
        let set = VariantSet::from_declaration(Field::Body, &json!({"type": "object"})).unwrap();
        assert!(set.is_none());
    }

    #[test]
    fn test_from_declaration_errors() {
        assert_eq!(
            VariantSet::from_declaration(Field::Params, &json!("nope")),
            Err(RouteError::NotAnObject { field: Field::Params })
        );
        assert_eq!(
            VariantSet::from_declaration(Field::Params, &json!({"oneOf": {}})),
            Err(RouteError::InvalidOneOf { field: Field::Params })
        );
    }

    #[test]
    fn test_entries_without_id_are_skipped() {
        let set = VariantSet::from_declaration(
            Field::Body,
            &json!({"oneOf": [{"type": "string"}, true, {"$id": "obj", "type": "object"}, {"$id": 7}]}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().id(), "obj");

        let set = VariantSet::from_declaration(
            Field::Body,
            &json!({"oneOf": [{"type": "string"}, {"type": "integer"}]}),
        )
        .unwrap()
        .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let set = VariantSet::from_declaration(
            Field::Body,
            &json!({"oneOf": [{"$id": "a"}, {"$id": "b"}, {"$id": "a"}, {"id": "a"}]}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.duplicate_ids(), vec!["a"]);
    }

    #[test]
    fn test_route_schema_from_json() {
        let schema = RouteSchema::from_json(&json!({
            "body": test_schema(),
            "headers": test_schema(),
            "response": { "200": { "type": "string" } }
        }))
        .unwrap();
        assert!(schema.get(Field::Body).is_some());
        assert!(schema.get(Field::Querystring).is_none());
        assert!(schema.get(Field::Params).is_none());
        assert!(schema.get(Field::Headers).is_some());
        assert!(!schema.is_empty());
        assert!(RouteSchema::from_json(&json!({})).unwrap().is_empty());
    }
}
