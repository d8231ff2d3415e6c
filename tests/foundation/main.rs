//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Type, Error, conversions, dates and markup.

mod conversions;
mod dates;
mod values;
