//! Type tags and the type-provider capability used for field validation.

use std::fmt;
use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::convert;
use crate::error::{Error, Result};
use crate::value::{Record, Value};

/// Runtime type tag of a [`Value`].
///
/// Built-in tags double as declared field types through their [`DataType`]
/// implementation.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The nil type (only value: nil).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 128-bit signed integer.
    Long,
    /// 64-bit floating point.
    Float,
    /// Byte string type.
    Bytes,
    /// Text string type.
    Text,
    /// Timestamp type.
    DateTime,
    /// Calendar date type.
    Date,
    /// List type.
    List,
    /// Map type.
    Map,
    /// Named record type.
    Record(Arc<str>),
}

impl Type {
    /// Built-in types available to every type registry.
    pub const BUILTINS: [Type; 11] = [
        Type::Nil,
        Type::Bool,
        Type::Int,
        Type::Long,
        Type::Float,
        Type::Bytes,
        Type::Text,
        Type::DateTime,
        Type::Date,
        Type::List,
        Type::Map,
    ];

    /// Creates a record type tag.
    #[must_use]
    pub fn record(name: impl Into<Arc<str>>) -> Self {
        Self::Record(name.into())
    }

    /// Returns the short name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Bytes => "bytes",
            Self::Text => "text",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::List => "list",
            Self::Map => "map",
            Self::Record(name) => name,
        }
    }

    /// Returns true for the integer and float tags.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Float)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(name) => write!(f, "record<{name}>"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability interface a declared field type provides.
///
/// `is_instance` is the plain instance check. Types may override
/// `is_type_of` with a custom membership predicate and opt into implicit
/// construction from raw input through `try_cast`.
pub trait DataType: fmt::Debug + Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns true if `value` is an instance of this type.
    fn is_instance(&self, value: &Value) -> bool;

    /// Custom membership predicate; `None` means "use the instance check".
    fn is_type_of(&self, _value: &Value) -> Option<bool> {
        None
    }

    /// Whether fields may construct this type implicitly from raw input.
    fn try_cast(&self) -> bool {
        false
    }

    /// Builds an instance of this type from a single raw value.
    fn construct(&self, value: &Value) -> Result<Value>;

    /// Membership test: the custom predicate when defined, else the
    /// instance check.
    fn accepts(&self, value: &Value) -> bool {
        self.is_type_of(value)
            .unwrap_or_else(|| self.is_instance(value))
    }
}

impl DataType for Type {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn is_instance(&self, value: &Value) -> bool {
        value.value_type() == *self
    }

    fn construct(&self, value: &Value) -> Result<Value> {
        let mismatch = || Error::type_mismatch(self.as_str(), value, self.as_str());
        match self {
            Self::Nil => value.is_nil().then_some(Value::Nil).ok_or_else(mismatch),
            Self::Bool => Ok(Value::Bool(convert::to_bool(value))),
            Self::Int => convert::to_int(value).map(Value::Int),
            Self::Long => convert::to_long(value).map(Value::Long),
            Self::Float => convert::to_float(value).map(Value::Float),
            Self::Bytes => convert::to_bytes(value).map(Value::Bytes),
            Self::Text => convert::to_text(value).map(Value::Text),
            Self::DateTime => match value {
                Value::DateTime(_) => Ok(value.clone()),
                Value::Date(d) => d
                    .and_hms_opt(0, 0, 0)
                    .and_then(|naive| {
                        FixedOffset::east_opt(0)?
                            .from_local_datetime(&naive)
                            .single()
                    })
                    .map(Value::DateTime)
                    .ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
            Self::Date => match value {
                Value::Date(_) => Ok(value.clone()),
                Value::DateTime(dt) => Ok(Value::Date(dt.date_naive())),
                _ => Err(mismatch()),
            },
            Self::List => match value {
                Value::List(_) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            Self::Map => match value {
                Value::Map(_) => Ok(value.clone()),
                Value::Record(r) => Ok(Value::Map(
                    r.attributes()
                        .iter()
                        .map(|(k, v)| (Value::Text(Arc::clone(k)), v.clone()))
                        .collect(),
                )),
                _ => Err(mismatch()),
            },
            Self::Record(name) => record_from_value(name, None, value),
        }
    }
}

/// A named record type usable as a field type.
///
/// Instances are [`Value::Record`] values carrying the same type name.
/// Records are constructed from maps with text keys, or from a bare text
/// value stored under `text_attribute` when one is configured.
#[derive(Clone, Debug)]
pub struct RecordType {
    name: Arc<str>,
    castable: bool,
    text_attribute: Option<Arc<str>>,
    predicate: Option<fn(&Value) -> bool>,
}

impl RecordType {
    /// Creates a record type with plain instance checks and no implicit
    /// construction.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            castable: false,
            text_attribute: None,
            predicate: None,
        }
    }

    /// Allows fields to construct this type implicitly from raw input.
    #[must_use]
    pub fn castable(mut self) -> Self {
        self.castable = true;
        self
    }

    /// Stores bare text input under the given attribute when constructing.
    #[must_use]
    pub fn with_text_attribute(mut self, attribute: impl Into<Arc<str>>) -> Self {
        self.text_attribute = Some(attribute.into());
        self
    }

    /// Replaces the instance check with a custom membership predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: fn(&Value) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Returns the type tag of this record type's instances.
    #[must_use]
    pub fn type_tag(&self) -> Type {
        Type::Record(Arc::clone(&self.name))
    }
}

impl DataType for RecordType {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_instance(&self, value: &Value) -> bool {
        value
            .as_record()
            .is_some_and(|r| r.type_name() == &*self.name)
    }

    fn is_type_of(&self, value: &Value) -> Option<bool> {
        self.predicate.map(|predicate| predicate(value))
    }

    fn try_cast(&self) -> bool {
        self.castable
    }

    fn construct(&self, value: &Value) -> Result<Value> {
        record_from_value(&self.name, self.text_attribute.as_deref(), value)
    }
}

fn record_from_value(name: &Arc<str>, text_attribute: Option<&str>, value: &Value) -> Result<Value> {
    match value {
        Value::Record(r) if r.type_name() == &**name => Ok(value.clone()),
        Value::Map(map) => {
            let mut record = Record::new(Arc::clone(name));
            for (key, item) in map.iter() {
                let key = key
                    .as_str()
                    .ok_or_else(|| Error::type_mismatch(&**name, key, "text key"))?;
                record = record.with(key, item.clone());
            }
            Ok(Value::Record(record))
        }
        Value::Text(_) => match text_attribute {
            Some(attribute) => Ok(Value::Record(
                Record::new(Arc::clone(name)).with(attribute, value.clone()),
            )),
            None => Err(Error::type_mismatch(&**name, value, &**name)),
        },
        _ => Err(Error::type_mismatch(&**name, value, &**name)),
    }
}
