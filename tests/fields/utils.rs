//! Integration tests for unset and find

use std::sync::Arc;

use bindery_fields::{Entity, EntityType, FieldKind, FieldQuery, TypeRef, TypedField, find, unset};
use bindery_foundation::RecordType;

fn campaign() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("Campaign")
            .with_field(TypedField::id("id"))
            .with_field(TypedField::idref("idref"))
            .with_field(TypedField::text("title").with_key_name("Title"))
            .with_field(TypedField::datetime("timestamp").with_comparable(false))
            .with_field(TypedField::text("names").with_multiple(true))
            .with_field(
                TypedField::new("intended_effect")
                    .with_factory("app.vocab.IntendedEffect")
                    .with_comparable(false),
            ),
    )
}

fn names(fields: Vec<&Arc<TypedField>>) -> Vec<&str> {
    fields.into_iter().map(|f| f.name()).collect()
}

#[test]
fn unset_without_kinds_removes_everything() {
    let mut entity = Entity::new(campaign());
    entity.set("id", "c-1").unwrap();
    entity.set("title", "Op").unwrap();
    entity.set("names", "alpha").unwrap();
    assert_eq!(unset(&mut entity, &[]), 3);
    assert!(entity.storage().is_empty());
}

#[test]
fn unset_id_leaves_others() {
    let mut entity = Entity::new(campaign());
    entity.set("id", "c-1").unwrap();
    entity.set("title", "Op").unwrap();
    assert_eq!(unset(&mut entity, &[FieldKind::Id]), 1);
    assert!(!entity.is_set("id"));
    assert!(entity.is_set("title"));
}

#[test]
fn unset_typed_means_all() {
    let mut entity = Entity::new(campaign());
    entity.set("idref", "c-0").unwrap();
    entity.set("title", "Op").unwrap();
    assert_eq!(unset(&mut entity, &[FieldKind::Typed]), 2);
}

#[test]
fn unset_several_kinds() {
    let mut entity = Entity::new(campaign());
    entity.set("idref", "c-0").unwrap();
    entity.set("title", "Op").unwrap();
    entity.set("timestamp", "2015-01-01T00:00:00Z").unwrap();
    assert_eq!(unset(&mut entity, &[FieldKind::Idref, FieldKind::DateTime]), 2);
    assert!(entity.is_set("title"));
}

#[test]
fn find_not_comparable() {
    let class = campaign();
    let found = names(find(&*class, &FieldQuery::new().comparable(false)));
    assert_eq!(found, ["timestamp", "intended_effect"]);
    for field in class.fields() {
        let listed = found.contains(&field.name());
        assert_eq!(listed, !field.comparable());
    }
}

#[test]
fn find_remaps_factory_and_key_name() {
    let class = campaign();
    assert_eq!(
        names(find(&*class, &FieldQuery::new().with("factory", "app.vocab.IntendedEffect"))),
        ["intended_effect"]
    );
    assert_eq!(
        names(find(&*class, &FieldQuery::new().with("key_name", "Title"))),
        ["title"]
    );
    // The computed key name is not what `key_name` matches.
    assert!(find(&*class, &FieldQuery::new().with("key_name", "timestamp")).is_empty());
}

#[test]
fn find_combines_criteria() {
    let entity = Entity::new(campaign());
    let query = FieldQuery::new().kind(FieldKind::Text).multiple(true);
    assert_eq!(names(find(&entity, &query)), ["names"]);
}

#[test]
fn find_unknown_attribute() {
    let class = campaign();
    assert!(find(&*class, &FieldQuery::new().with("color", "red")).is_empty());
}

#[test]
fn find_by_concrete_type_name() {
    let class = Arc::new(
        EntityType::new("Holder").with_field(TypedField::new("effect").with_type(TypeRef::of(RecordType::new("Effect")))),
    );
    assert_eq!(names(find(&*class, &FieldQuery::new().with("_type", "Effect"))), ["effect"]);
}
