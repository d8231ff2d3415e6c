//! Integration tests for date parsing
//!
//! Tests the fail-soft and fail-loud policy and configurable formats.

use bindery_foundation::{DateConfig, DateParser, ErrorKind, Value, parse_date, parse_datetime};
use chrono::{Datelike, NaiveDate};

#[test]
fn canonical_nulls_fail_soft() {
    for value in [Value::Nil, Value::from(""), Value::Bool(false)] {
        assert_eq!(parse_datetime(&value).unwrap(), Value::Nil);
        assert_eq!(parse_date(&value).unwrap(), Value::Nil);
    }
}

#[test]
fn malformed_text_fails_loud() {
    let err = parse_datetime(&Value::from("yesterday")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Malformed { expected: "datetime", .. }));
    let err = parse_date(&Value::from("yesterday")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Malformed { expected: "date", .. }));
}

#[test]
fn date_passes_through() {
    let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
    assert_eq!(parse_date(&Value::from(date)).unwrap(), Value::from(date));
}

#[test]
fn compact_date_format() {
    let parsed = parse_date(&Value::from("20200229")).unwrap();
    assert_eq!(parsed.as_date(), NaiveDate::from_ymd_opt(2020, 2, 29));
}

#[test]
fn custom_format() {
    let parser = DateParser::new(DateConfig::empty().with_date_format("%d/%m/%Y"));
    let parsed = parser.parse_date(&Value::from("29/02/2020")).unwrap();
    assert_eq!(parsed.as_date().map(|d| d.day()), Some(29));
    assert!(parser.parse_date(&Value::from("2020-02-29")).is_err());
}
