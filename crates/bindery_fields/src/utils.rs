//! Bulk removal and declaration lookup.

use std::sync::Arc;

use bindery_foundation::Value;
use tracing::debug;

use crate::entity::{Entity, EntityType};
use crate::field::TypedField;
use crate::kind::FieldKind;
use crate::resolver::TypeRef;

/// Removes every stored field whose kind is one of `kinds`.
///
/// An empty `kinds` removes everything. Returns the number of removed
/// entries.
pub fn unset(entity: &mut Entity, kinds: &[FieldKind]) -> usize {
    let removed = if kinds.is_empty() {
        entity.storage_mut().clear()
    } else {
        entity
            .storage_mut()
            .retain(|_, stored| !kinds.iter().any(|kind| stored.is_a(*kind)))
    };
    debug!(entity = %entity.entity_type().name(), removed, "unset fields");
    removed
}

/// Something that exposes declared field descriptors.
pub trait HasFields {
    /// Returns the declared fields in declaration order.
    fn typed_fields(&self) -> &[Arc<TypedField>];
}

impl HasFields for EntityType {
    fn typed_fields(&self) -> &[Arc<TypedField>] {
        self.fields()
    }
}

impl HasFields for Entity {
    fn typed_fields(&self) -> &[Arc<TypedField>] {
        self.entity_type().fields()
    }
}

/// Attribute criteria matched by [`find`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldQuery {
    criteria: Vec<(String, Value)>,
}

impl FieldQuery {
    /// Creates a query that matches every field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `attribute` to equal `value`.
    ///
    /// `factory` and `key_name` match the declared slots rather than the
    /// resolved factory and computed key name.
    #[must_use]
    pub fn with(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        let attribute = match attribute {
            "factory" => "_factory",
            "key_name" => "_key_name",
            other => other,
        };
        self.criteria.push((attribute.to_string(), value.into()));
        self
    }

    /// Requires the field name.
    #[must_use]
    pub fn name(self, name: &str) -> Self {
        self.with("name", name)
    }

    /// Requires the comparable flag.
    #[must_use]
    pub fn comparable(self, comparable: bool) -> Self {
        self.with("comparable", comparable)
    }

    /// Requires the multiple flag.
    #[must_use]
    pub fn multiple(self, multiple: bool) -> Self {
        self.with("multiple", multiple)
    }

    /// Requires the declared key name override; `None` matches fields
    /// without one.
    #[must_use]
    pub fn key_name(self, key_name: Option<&str>) -> Self {
        self.with("key_name", key_name)
    }

    /// Requires the declared type: a path matches by its text, a concrete
    /// type by its name.
    #[must_use]
    pub fn type_ref(self, type_ref: impl Into<TypeRef>) -> Self {
        self.with("type_", type_ref.into().to_value())
    }

    /// Requires the field kind.
    #[must_use]
    pub fn kind(self, kind: FieldKind) -> Self {
        self.with("kind", kind.as_str())
    }

    /// Returns the criteria after remapping.
    #[must_use]
    pub fn criteria(&self) -> &[(String, Value)] {
        &self.criteria
    }

    /// Returns true if `field` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, field: &TypedField) -> bool {
        self.criteria
            .iter()
            .all(|(attribute, expected)| field.attribute(attribute).is_some_and(|actual| actual == *expected))
    }
}

/// Returns the declared fields matching `query`, in declaration order.
pub fn find<'a, S>(source: &'a S, query: &FieldQuery) -> Vec<&'a Arc<TypedField>>
where
    S: HasFields + ?Sized,
{
    source
        .typed_fields()
        .iter()
        .filter(|field| query.matches(field))
        .collect()
}
