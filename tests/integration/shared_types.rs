//! Field declarations shared across entity types and contexts.

use std::sync::Arc;

use bindery::fields::{Entity, EntityType, FieldContext, TypeRegistry, TypedField};
use bindery::foundation::{RecordType, Value};

#[test]
fn shared_field_resolves_against_first_context() {
    let shared = Arc::new(TypedField::new("owner").with_type("org.people.Person"));

    let people = Arc::new(TypeRegistry::new().with_type(
        "org.people",
        "Person",
        RecordType::new("Person").with_text_attribute("name").castable(),
    ));
    let with_people = Arc::new(
        EntityType::new("Asset")
            .with_context(FieldContext::new(people))
            .with_shared_field(Arc::clone(&shared)),
    );
    let without = Arc::new(EntityType::new("Ticket").with_shared_field(Arc::clone(&shared)));

    let mut asset = Entity::new(with_people);
    asset.set("owner", "ada").unwrap();

    // The resolution is memoized on the declaration, so the second entity
    // type reuses it.
    let mut ticket = Entity::new(without);
    ticket.set("owner", "grace").unwrap();
    assert_eq!(
        ticket.value("owner").unwrap().as_record().unwrap().get("name"),
        Some(&Value::from("grace"))
    );
}

#[test]
fn entities_share_declarations_not_storage() {
    let class = Arc::new(EntityType::new("Note").with_field(TypedField::text("body")));
    let mut a = Entity::new(Arc::clone(&class));
    let mut b = Entity::new(Arc::clone(&class));
    a.set("body", "first").unwrap();
    assert_eq!(b.value("body").unwrap(), Value::Nil);
    b.set("body", "second").unwrap();
    assert_eq!(a.value("body").unwrap(), Value::from("first"));

    let copy = a.clone();
    a.set("body", "changed").unwrap();
    assert_eq!(copy.peek("body").unwrap().unwrap().to_value(), Value::from("first"));
}
