//! Integration tests for Value and Type
//!
//! Tests truthiness, sequence detection, records, and type instance checks.

use bindery_foundation::{DataType, Mapping, Record, RecordType, Type, Value};

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn falsy_values() {
    for value in [
        Value::Nil,
        Value::Bool(false),
        Value::Int(0),
        Value::Long(0),
        Value::Float(0.0),
        Value::from(""),
        Value::from(Vec::<u8>::new()),
        Value::list::<_, i64>([]),
        Value::Map(Mapping::new()),
    ] {
        assert!(!value.is_truthy(), "{value:?} should be falsy");
    }
}

#[test]
fn truthy_values() {
    let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    for value in [
        Value::Bool(true),
        Value::Int(-1),
        Value::Float(0.5),
        Value::from("0"),
        Value::list([0]),
        Value::from(date),
        Value::Record(Record::new("Empty")),
    ] {
        assert!(value.is_truthy(), "{value:?} should be truthy");
    }
}

// =============================================================================
// Sequence Detection
// =============================================================================

#[test]
fn only_lists_are_sequences() {
    assert!(Value::list([1, 2]).is_sequence());
    assert!(!Value::from("abc").is_sequence());
    assert!(!Value::from(b"abc".as_slice()).is_sequence());
    assert!(!Value::Map(Mapping::new()).is_sequence());
    assert!(!Value::Nil.is_sequence());
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn record_attributes() {
    let record = Record::new("Address")
        .with("city", "Oslo")
        .with("zip", 150);
    assert_eq!(record.type_name(), "Address");
    assert_eq!(record.get("city"), Some(&Value::from("Oslo")));
    assert_eq!(record.get("zip"), Some(&Value::Int(150)));
    assert_eq!(record.get("street"), None);
}

#[test]
fn record_with_is_persistent() {
    let base = Record::new("Address").with("city", "Oslo");
    let moved = base.with("city", "Bergen");
    assert_eq!(base.get("city"), Some(&Value::from("Oslo")));
    assert_eq!(moved.get("city"), Some(&Value::from("Bergen")));
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn value_type_tags() {
    assert_eq!(Value::Nil.value_type(), Type::Nil);
    assert_eq!(Value::Int(1).value_type(), Type::Int);
    assert_eq!(Value::Long(1).value_type(), Type::Long);
    assert_eq!(Value::from("x").value_type(), Type::Text);
    assert_eq!(
        Value::Record(Record::new("Address")).value_type(),
        Type::record("Address")
    );
}

#[test]
fn record_type_instance_check() {
    let address = RecordType::new("Address");
    assert!(address.accepts(&Value::Record(Record::new("Address"))));
    assert!(!address.accepts(&Value::Record(Record::new("Phone"))));
    assert!(!address.accepts(&Value::from("Address")));
    assert_eq!(address.type_tag(), Type::record("Address"));
}

#[test]
fn builtins_are_not_castable() {
    for ty in Type::BUILTINS {
        assert!(!ty.try_cast(), "{ty} should not be castable");
        assert!(ty.is_type_of(&Value::Nil).is_none());
    }
}

#[test]
fn float_equality_is_bitwise() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
}
