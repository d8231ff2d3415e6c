//! Cross-layer integration tests for Bindery
//!
//! Tests that verify correct interaction between the foundation and fields
//! layers through the root crate.

mod shared_types;
