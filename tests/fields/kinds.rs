//! Integration tests for field kinds
//!
//! Tests the clean step of each kind through entity assignment.

use std::sync::Arc;

use bindery_fields::{Entity, EntityType, FieldContext, FieldKind, TypedField};
use bindery_foundation::{DateConfig, Value};
use chrono::{Datelike, NaiveDate, Timelike};

fn record() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("Observable")
            .with_field(TypedField::bytes("raw"))
            .with_field(TypedField::text("label"))
            .with_field(TypedField::boolean("negate"))
            .with_field(TypedField::integer("count"))
            .with_field(TypedField::long("size"))
            .with_field(TypedField::float("score"))
            .with_field(TypedField::datetime("seen"))
            .with_field(TypedField::date("day"))
            .with_field(TypedField::cdata("body")),
    )
}

fn cleaned(field: &str, raw: impl Into<Value>) -> Value {
    let mut entity = Entity::new(record());
    entity.set(field, raw).unwrap();
    entity.value(field).unwrap()
}

#[test]
fn bytes_kind() {
    assert_eq!(cleaned("raw", "abc"), Value::from(b"abc".as_slice()));
    assert_eq!(cleaned("raw", Value::Nil), Value::Nil);
}

#[test]
fn text_kind() {
    assert_eq!(cleaned("label", 42), Value::from("42"));
    assert_eq!(cleaned("label", true), Value::from("true"));
    assert_eq!(cleaned("label", Value::Nil), Value::Nil);
}

#[test]
fn boolean_kind() {
    assert_eq!(cleaned("negate", "yes"), Value::Bool(true));
    assert_eq!(cleaned("negate", ""), Value::Bool(false));
    assert_eq!(cleaned("negate", 0), Value::Bool(false));
    assert_eq!(cleaned("negate", Value::Nil), Value::Bool(false));
}

#[test]
fn integer_kind() {
    assert_eq!(cleaned("count", "0x10"), Value::Int(16));
    assert_eq!(cleaned("count", "0o10"), Value::Int(8));
    assert_eq!(cleaned("count", " 12 "), Value::Int(12));
    assert_eq!(cleaned("count", ""), Value::Nil);
    assert_eq!(cleaned("count", Value::Nil), Value::Nil);
    assert_eq!(cleaned("count", 2.9), Value::Int(2));

    let mut entity = Entity::new(record());
    assert!(entity.set("count", "twelve").unwrap_err().is_type_mismatch());
    assert!(entity.set("count", "012").is_err());
}

#[test]
fn long_kind() {
    assert_eq!(
        cleaned("size", "0xffff_ffff_ffff_ffff_ff"),
        Value::Long(0xffff_ffff_ffff_ffff_ff)
    );
    assert_eq!(cleaned("size", 7), Value::Long(7));
    assert_eq!(cleaned("size", ""), Value::Nil);
}

#[test]
fn float_kind() {
    assert_eq!(cleaned("score", "2.5"), Value::Float(2.5));
    assert_eq!(cleaned("score", 3), Value::Float(3.0));
    assert_eq!(cleaned("score", ""), Value::Nil);
    assert_eq!(cleaned("score", Value::Nil), Value::Nil);
}

#[test]
fn datetime_kind() {
    let seen = cleaned("seen", "2015-03-04T05:06:07Z");
    let dt = seen.as_datetime().unwrap();
    assert_eq!((dt.year(), dt.hour(), dt.second()), (2015, 5, 7));
    assert_eq!(cleaned("seen", ""), Value::Nil);

    let mut entity = Entity::new(record());
    assert!(entity.set("seen", "soon").is_err());
}

#[test]
fn date_kind() {
    assert_eq!(
        cleaned("day", "2015-03-04"),
        Value::from(NaiveDate::from_ymd_opt(2015, 3, 4).unwrap())
    );
    assert_eq!(cleaned("day", Value::Nil), Value::Nil);
}

#[test]
fn datetime_uses_entity_date_config() {
    let class = Arc::new(
        EntityType::new("Local")
            .with_context(FieldContext::default().with_date_config(DateConfig::default().with_naive_offset(-3600)))
            .with_field(TypedField::datetime("at")),
    );
    let mut entity = Entity::new(class);
    entity.set("at", "2015-03-04 05:06:07").unwrap();
    let value = entity.value("at").unwrap();
    assert_eq!(value.as_datetime().unwrap().offset().local_minus_utc(), -3600);
}

#[test]
fn cdata_kind() {
    assert_eq!(cleaned("body", "<![CDATA[<p>hi</p>]]>"), Value::from("<p>hi</p>"));
    assert_eq!(cleaned("body", "plain"), Value::from("plain"));
    assert_eq!(cleaned("body", Value::Nil), Value::Nil);
}

#[test]
fn declared_kinds() {
    let class = record();
    let kinds: Vec<FieldKind> = class.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        [
            FieldKind::Bytes,
            FieldKind::Text,
            FieldKind::Boolean,
            FieldKind::Integer,
            FieldKind::Long,
            FieldKind::Float,
            FieldKind::DateTime,
            FieldKind::Date,
            FieldKind::Cdata,
        ]
    );
}
