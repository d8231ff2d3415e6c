//! Core values, type tags, and conversion helpers for Bindery.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value type carried by entity fields
//! - [`Type`] and [`DataType`] - Type tags and the type-provider capability
//! - [`Error`] - Rich error types with context
//! - [`convert`] - Scalar conversions used by coercing fields
//! - [`dates`] and [`markup`] - Date parsing and CDATA helpers
//! - Persistent collections ([`Sequence`], [`Mapping`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod convert;
pub mod dates;
pub mod error;
pub mod markup;
pub mod types;
pub mod value;

pub use collections::{Mapping, Sequence};
pub use dates::{DateConfig, DateParser, parse_date, parse_datetime};
pub use error::{Error, ErrorContext, ErrorKind, Missing, Result};
pub use markup::{strip_cdata, wrap_cdata};
pub use types::{DataType, RecordType, Type};
pub use value::{Record, Value};
