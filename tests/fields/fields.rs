//! Integration tests for TypedField
//!
//! Tests clean semantics, multiple-valued fields, lazy list creation,
//! hook ordering, and error context.

use std::sync::Arc;

use bindery_fields::{Entity, EntityType, FieldContext, FieldValue, Hook, TypeRegistry, TypedField};
use bindery_foundation::{RecordType, Type, Value};
use proptest::prelude::*;

fn registry() -> Arc<TypeRegistry> {
    Arc::new(TypeRegistry::new().with_type(
        "app.models",
        "Tag",
        RecordType::new("Tag").with_text_attribute("value").castable(),
    ))
}

fn article() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("Article")
            .with_context(FieldContext::new(registry()))
            .with_field(TypedField::text("title"))
            .with_field(TypedField::new("tags").with_type("app.models.Tag").with_multiple(true))
            .with_field(TypedField::integer("scores").with_multiple(true))
            .with_field(TypedField::new("notes").with_multiple(true)),
    )
}

// =============================================================================
// Clean
// =============================================================================

#[test]
fn clean_passes_nil_through_typed_field() {
    let ctx = FieldContext::default();
    let field = TypedField::new("n").with_type(Type::Int);
    assert_eq!(field.clean(Value::Nil, &ctx).unwrap(), Value::Nil);
}

#[test]
fn clean_passes_instances_unchanged() {
    let ctx = FieldContext::default();
    let field = TypedField::new("n").with_type("builtins.int");
    assert_eq!(field.clean(Value::Int(9), &ctx).unwrap(), Value::Int(9));
    assert!(field.clean(Value::from("9"), &ctx).unwrap_err().is_type_mismatch());
}

#[test]
fn castable_round_trip() {
    let ctx = FieldContext::new(registry());
    let field = TypedField::new("tag").with_type("app.models.Tag");
    let ty = Arc::clone(field.type_(&ctx).unwrap().unwrap());
    for raw in ["urgent", "later", "x"] {
        let raw = Value::from(raw);
        assert!(!ty.accepts(&raw));
        assert_eq!(field.clean(raw.clone(), &ctx).unwrap(), ty.construct(&raw).unwrap());
    }
}

// =============================================================================
// Multiple-Valued Fields
// =============================================================================

#[test]
fn unset_multiple_get_returns_same_list() {
    let mut entity = Entity::new(article());
    let first = entity.get("notes").unwrap().unwrap().clone();
    assert!(first.as_list().unwrap().is_empty());

    entity.list_mut("notes").unwrap().push(Value::from("n1")).unwrap();
    let second = entity.get("notes").unwrap().unwrap();
    assert_eq!(second.as_list().unwrap().as_slice(), [Value::from("n1")]);
}

#[test]
fn scalar_wraps_into_one_element_list() {
    let mut entity = Entity::new(article());
    entity.set("scores", "0x10").unwrap();
    assert_eq!(entity.value("scores").unwrap(), Value::list([16]));
}

#[test]
fn sequence_drops_nils() {
    let mut entity = Entity::new(article());
    let ctx = entity.context().clone();
    let field = Arc::clone(entity.entity_type().field("tags").unwrap());
    entity
        .set("tags", Value::list([Value::Nil, Value::from("a"), Value::Nil, Value::from("b")]))
        .unwrap();

    let expected = vec![
        field.clean(Value::from("a"), &ctx).unwrap(),
        field.clean(Value::from("b"), &ctx).unwrap(),
    ];
    assert_eq!(entity.get("tags").unwrap().unwrap().as_list().unwrap(), &expected);
}

#[test]
fn nil_stores_empty_list() {
    let mut entity = Entity::new(article());
    entity.set("scores", Value::list([1, 2])).unwrap();
    entity.set("scores", Value::Nil).unwrap();
    let stored = entity.peek("scores").unwrap().unwrap();
    assert!(matches!(stored, FieldValue::Multiple(list) if list.is_empty()));
}

#[test]
fn multiple_lists_keep_element_type() {
    let mut entity = Entity::new(article());
    let tags = entity.list_mut("tags").unwrap();
    assert_eq!(tags.element_type().unwrap().name(), "Tag");
    tags.push(Value::from("later")).unwrap();
    assert!(tags[0].as_record().is_some());
}

#[test]
fn failed_element_leaves_previous_value() {
    let mut entity = Entity::new(article());
    entity.set("scores", Value::list([1])).unwrap();
    assert!(entity.set("scores", Value::list(["2", "two"])).is_err());
    assert_eq!(entity.value("scores").unwrap(), Value::list([1]));
}

// =============================================================================
// Hooks
// =============================================================================

#[test]
fn hooks_run_once_per_assignment() {
    let class = Arc::new(
        EntityType::new("Shape")
            .with_field(TypedField::float("radius"))
            .with_field(
                TypedField::float("sides")
                    .with_multiple(true)
                    .with_postset_hook(Hook::exclude_fields(["radius"])),
            ),
    );
    let mut entity = Entity::new(class);
    entity.set("radius", 2.0).unwrap();
    entity.set("sides", Value::list([1.0, 1.0, 1.0])).unwrap();
    assert!(!entity.is_set("radius"));
    assert_eq!(entity.value("sides").unwrap(), Value::list([1.0, 1.0, 1.0]));
}

#[test]
fn empty_list_does_not_fire_hook() {
    let class = Arc::new(
        EntityType::new("Shape")
            .with_field(TypedField::float("radius"))
            .with_field(
                TypedField::float("sides")
                    .with_multiple(true)
                    .with_preset_hook(Hook::exclude_fields(["radius"])),
            ),
    );
    let mut entity = Entity::new(class);
    entity.set("radius", 2.0).unwrap();
    entity.set("sides", Value::list([Value::Nil])).unwrap();
    assert!(entity.is_set("radius"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn set_error_names_entity_and_field() {
    let mut entity = Entity::new(article());
    let err = entity.set("scores", "lots").unwrap_err();
    assert!(err.to_string().contains("at Article.scores"));
}

#[test]
fn unresolved_type_surfaces_on_set() {
    let class = Arc::new(
        EntityType::new("Broken").with_field(TypedField::new("x").with_type("nowhere.Thing")),
    );
    let mut entity = Entity::new(class);
    let err = entity.set("x", 1).unwrap_err();
    assert!(err.is_unresolved());
    assert!(!entity.is_set("x"));
}

proptest! {
    #[test]
    fn untyped_clean_is_identity(n in any::<i64>(), s in ".{0,12}", b in any::<bool>()) {
        let ctx = FieldContext::default();
        let field = TypedField::new("free");
        for value in [Value::Nil, Value::Int(n), Value::from(s.as_str()), Value::Bool(b)] {
            prop_assert_eq!(field.clean(value.clone(), &ctx).unwrap(), value);
        }
    }

    #[test]
    fn scalar_set_equals_clean(n in any::<i32>()) {
        let class = Arc::new(
            EntityType::new("T").with_field(TypedField::integer("xs").with_multiple(true)),
        );
        let field = Arc::clone(class.field("xs").unwrap());
        let mut entity = Entity::new(Arc::clone(&class));
        let raw = Value::from(n.to_string());
        entity.set("xs", raw.clone()).unwrap();
        let cleaned = field.clean(raw, class.context()).unwrap();
        prop_assert_eq!(entity.value("xs").unwrap(), Value::list([cleaned]));
    }
}
