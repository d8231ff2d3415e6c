//! Field kinds and their per-kind clean steps.

use std::fmt;

use bindery_foundation::convert;
use bindery_foundation::{Error, Result, Value, strip_cdata};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::context::FieldContext;
use crate::field::TypedField;

/// The coercion family a field belongs to.
///
/// Every kind is a [`FieldKind::Typed`]; the others refine the clean step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    /// Validates against the declared type, constructing it when castable.
    Typed,
    /// Coerces to a byte string.
    Bytes,
    /// Coerces to text.
    Text,
    /// Coerces by truthiness.
    Boolean,
    /// Parses integer literals with base detection into 64 bits.
    Integer,
    /// Like `Integer` with 128 bits.
    Long,
    /// Numeric conversion; blank input stays nil.
    Float,
    /// Delegates to the timestamp parser.
    DateTime,
    /// Delegates to the date parser.
    Date,
    /// Strips CDATA wrappers.
    Cdata,
    /// Identifier. Setting one clears every `Idref` field.
    Id,
    /// Identifier reference. Setting one clears every `Id` field.
    Idref,
}

impl FieldKind {
    /// Every kind, in declaration order.
    pub const ALL: [FieldKind; 12] = [
        FieldKind::Typed,
        FieldKind::Bytes,
        FieldKind::Text,
        FieldKind::Boolean,
        FieldKind::Integer,
        FieldKind::Long,
        FieldKind::Float,
        FieldKind::DateTime,
        FieldKind::Date,
        FieldKind::Cdata,
        FieldKind::Id,
        FieldKind::Idref,
    ];

    /// Returns true if this kind is `other` or refines it.
    #[must_use]
    pub fn is_a(self, other: FieldKind) -> bool {
        other == Self::Typed || self == other
    }

    /// Returns the snake_case name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typed => "typed",
            Self::Bytes => "bytes",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Cdata => "cdata",
            Self::Id => "id",
            Self::Idref => "idref",
        }
    }

    /// The kind whose stored values a truthy assignment of this kind clears.
    #[must_use]
    pub const fn excludes(self) -> Option<FieldKind> {
        match self {
            Self::Id => Some(Self::Idref),
            Self::Idref => Some(Self::Id),
            _ => None,
        }
    }

    pub(crate) fn clean(self, field: &TypedField, value: Value, ctx: &FieldContext) -> Result<Value> {
        match self {
            Self::Typed | Self::Id | Self::Idref => field.clean_typed(value, ctx),
            Self::Bytes => clean_bytes(&value),
            Self::Text => clean_text(&value),
            Self::Boolean => Ok(Value::Bool(convert::to_bool(&value))),
            Self::Integer => clean_integer(&value),
            Self::Long => clean_long(&value),
            Self::Float => clean_float(&value),
            Self::DateTime => ctx.dates().parse_datetime(&value),
            Self::Date => ctx.dates().parse_date(&value),
            Self::Cdata => strip_cdata(&value),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn clean_bytes(value: &Value) -> Result<Value> {
    if value.is_nil() {
        return Ok(Value::Nil);
    }
    convert::to_bytes(value).map(Value::Bytes)
}

fn clean_text(value: &Value) -> Result<Value> {
    if value.is_nil() {
        return Ok(Value::Nil);
    }
    convert::to_text(value).map(Value::Text)
}

fn clean_integer(value: &Value) -> Result<Value> {
    if value.is_blank() {
        return Ok(Value::Nil);
    }
    match value {
        Value::Text(text) => {
            let wide = convert::parse_int_literal(text)?;
            i64::try_from(wide)
                .map(Value::Int)
                .map_err(|_| Error::type_mismatch("int", value, "int"))
        }
        other => convert::to_int(other).map(Value::Int),
    }
}

fn clean_long(value: &Value) -> Result<Value> {
    if value.is_blank() {
        return Ok(Value::Nil);
    }
    match value {
        Value::Text(text) => convert::parse_int_literal(text).map(Value::Long),
        other => convert::to_long(other).map(Value::Long),
    }
}

fn clean_float(value: &Value) -> Result<Value> {
    if value.is_blank() {
        return Ok(Value::Nil);
    }
    convert::to_float(value).map(Value::Float)
}
