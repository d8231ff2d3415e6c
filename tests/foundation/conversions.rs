//! Integration tests for scalar conversions
//!
//! Tests integer literal parsing, numeric conversion, and text/bytes coercion.

use bindery_foundation::{DataType, Type, Value, convert};

// =============================================================================
// Integer Literals
// =============================================================================

#[test]
fn literal_prefixes() {
    assert_eq!(convert::parse_int_literal("0x10").unwrap(), 16);
    assert_eq!(convert::parse_int_literal("0o10").unwrap(), 8);
    assert_eq!(convert::parse_int_literal("0b10").unwrap(), 2);
    assert_eq!(convert::parse_int_literal("10").unwrap(), 10);
    assert_eq!(convert::parse_int_literal("-0x10").unwrap(), -16);
}

#[test]
fn literal_rejects_leading_zero_decimal() {
    assert!(convert::parse_int_literal("007").is_err());
    assert_eq!(convert::parse_int_literal("0").unwrap(), 0);
}

// =============================================================================
// Numeric Conversion
// =============================================================================

#[test]
fn int_truncates_floats() {
    assert_eq!(convert::to_int(&Value::Float(9.99)).unwrap(), 9);
    assert_eq!(convert::to_int(&Value::Float(-9.99)).unwrap(), -9);
}

#[test]
fn long_holds_beyond_int() {
    let big = Value::from("99999999999999999999");
    assert!(convert::to_int(&big).is_err());
    assert_eq!(convert::to_long(&big).unwrap(), 99_999_999_999_999_999_999);
}

#[test]
fn float_from_text() {
    assert_eq!(convert::to_float(&Value::from("-1.25")).unwrap(), -1.25);
    assert!(convert::to_float(&Value::from("1.2.3")).is_err());
}

// =============================================================================
// Constructors
// =============================================================================

#[test]
fn builtin_construct_uses_conversions() {
    assert_eq!(Type::Long.construct(&Value::Int(3)).unwrap(), Value::Long(3));
    assert_eq!(Type::Float.construct(&Value::from("2")).unwrap(), Value::Float(2.0));
    assert_eq!(
        Type::Bytes.construct(&Value::from("hi")).unwrap(),
        Value::from(b"hi".as_slice())
    );
    assert!(Type::Text.construct(&Value::Nil).is_err());
}
