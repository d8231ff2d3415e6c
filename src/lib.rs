//! Bindery - Typed entity fields
//!
//! This crate re-exports all layers of the Bindery system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: bindery_fields     — Typed fields, typed lists, entity storage
//! Layer 0: bindery_foundation — Core types (Value, Type, Error), conversions
//! ```

pub use bindery_fields as fields;
pub use bindery_foundation as foundation;
