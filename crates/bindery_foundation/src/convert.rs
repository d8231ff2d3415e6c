//! Scalar conversions used by coercing fields and built-in constructors.
//!
//! Each conversion accepts any [`Value`] and either produces the target
//! representation or a type mismatch naming the conversion.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Converts by truthiness.
#[must_use]
pub fn to_bool(value: &Value) -> bool {
    value.is_truthy()
}

/// Converts to a 64-bit integer.
///
/// Text is read as a decimal literal; floats are truncated toward zero.
pub fn to_int(value: &Value) -> Result<i64> {
    let wide = to_long(value).map_err(|_| Error::type_mismatch("int", value, "int"))?;
    i64::try_from(wide).map_err(|_| Error::type_mismatch("int", value, "int"))
}

/// Converts to a 128-bit integer.
///
/// Text is read as a decimal literal; floats are truncated toward zero.
pub fn to_long(value: &Value) -> Result<i128> {
    let mismatch = || Error::type_mismatch("long", value, "long");
    match value {
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Int(n) => Ok(i128::from(*n)),
        Value::Long(n) => Ok(*n),
        Value::Float(f) => float_to_wide(*f).ok_or_else(mismatch),
        Value::Text(s) => parse_radix_literal(s, false).ok_or_else(mismatch),
        Value::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| parse_radix_literal(s, false))
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

/// Parses an integer literal, detecting the base from its prefix.
///
/// Accepts surrounding whitespace, an optional sign, `0x`/`0o`/`0b`
/// prefixes and `_` separators between digits. Decimal literals may not
/// carry leading zeros unless every digit is zero.
pub fn parse_int_literal(text: &str) -> Result<i128> {
    parse_radix_literal(text, true)
        .ok_or_else(|| Error::type_mismatch("int literal", &Value::from(text), "int"))
}

/// Converts to a 64-bit float.
pub fn to_float(value: &Value) -> Result<f64> {
    let mismatch = || Error::type_mismatch("float", value, "float");
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(n) => Ok(*n as f64),
        #[allow(clippy::cast_precision_loss)]
        Value::Long(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        Value::Text(s) => parse_float_literal(s).ok_or_else(mismatch),
        Value::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(parse_float_literal)
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

/// Converts to text.
///
/// Bytes must be valid UTF-8. Nil has no text form.
pub fn to_text(value: &Value) -> Result<Arc<str>> {
    match value {
        Value::Text(s) => Ok(Arc::clone(s)),
        Value::Bytes(b) => std::str::from_utf8(b)
            .map(Arc::from)
            .map_err(|_| Error::type_mismatch("text", value, "utf-8 bytes")),
        Value::Nil => Err(Error::type_mismatch("text", value, "text")),
        other => Ok(other.to_string().into()),
    }
}

/// Converts to a byte string.
///
/// Text is UTF-8 encoded, lists must hold integers in `0..=255`, and other
/// scalars use their display form. Nil has no byte form.
pub fn to_bytes(value: &Value) -> Result<Arc<[u8]>> {
    let mismatch = || Error::type_mismatch("bytes", value, "bytes");
    match value {
        Value::Bytes(b) => Ok(Arc::clone(b)),
        Value::Text(s) => Ok(Arc::from(s.as_bytes())),
        Value::List(items) => items
            .iter()
            .map(|item| item.as_int().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Arc::from)
            .ok_or_else(mismatch),
        Value::Bool(_) | Value::Int(_) | Value::Long(_) | Value::Float(_) => {
            Ok(Arc::from(value.to_string().as_bytes()))
        }
        _ => Err(mismatch()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_wide(f: f64) -> Option<i128> {
    // i128 bounds are exactly representable as powers of two.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let truncated = f.trunc();
    (truncated.is_finite() && truncated >= -LIMIT && truncated < LIMIT).then(|| truncated as i128)
}

fn parse_radix_literal(text: &str, detect_base: bool) -> Option<i128> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = if detect_base {
        split_radix_prefix(body)
    } else {
        (10, body)
    };

    if detect_base && radix == 10 && has_leading_zero(digits) {
        return None;
    }

    let magnitude = parse_digits(digits, radix)?;
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

fn split_radix_prefix(body: &str) -> (u32, &str) {
    let lower = body.get(..2).map(str::to_ascii_lowercase);
    let radix = match lower.as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return (10, body),
    };
    // A single separator may follow the prefix: `0x_ff`.
    let rest = &body[2..];
    (radix, rest.strip_prefix('_').unwrap_or(rest))
}

fn has_leading_zero(digits: &str) -> bool {
    digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0' && c != '_')
}

fn parse_digits(digits: &str, radix: u32) -> Option<i128> {
    if !separators_well_placed(digits) || !digits.chars().all(|c| c == '_' || c.is_digit(radix)) {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    i128::from_str_radix(&cleaned, radix).ok()
}

fn separators_well_placed(digits: &str) -> bool {
    !digits.is_empty() && !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__")
}

fn parse_float_literal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.contains('_') {
        let unsigned = trimmed.trim_start_matches(['+', '-']);
        let well_placed = separators_well_placed(unsigned)
            && unsigned
                .split('_')
                .all(|part| part.starts_with(|c: char| c.is_ascii_digit()) && part.ends_with(|c: char| c.is_ascii_digit()));
        if !well_placed {
            return None;
        }
        return trimmed.replace('_', "").parse().ok();
    }
    trimmed.parse().ok()
}
