//! Typed field descriptors for Bindery entities.
//!
//! This crate provides:
//! - [`TypedField`] - Field declarations that validate, coerce and store values
//! - [`FieldKind`] - The per-kind clean steps (text, integer, date, id, ...)
//! - [`TypedList`] - Element-typed lists for multiple-valued fields
//! - [`EntityType`] and [`Entity`] - Declarations and per-instance storage
//! - [`LazyType`] and [`TypeRegistry`] - Resolve-once type paths
//! - [`unset`] and [`find`] - Bulk removal and declaration lookup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod entity;
pub mod field;
pub mod hook;
pub mod kind;
pub mod resolver;
pub mod storage;
pub mod typed_list;
pub mod utils;

pub use context::FieldContext;
pub use entity::{Entity, EntityType};
pub use field::{FieldId, TypedField};
pub use hook::Hook;
pub use kind::FieldKind;
pub use resolver::{
    BUILTINS_MODULE, LazyType, Module, TypeLoader, TypeRef, TypeRegistry, import_class,
    resolve_class,
};
pub use storage::{FieldStorage, FieldValue};
pub use typed_list::TypedList;
pub use utils::{FieldQuery, HasFields, find, unset};
