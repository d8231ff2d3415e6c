//! Error types for the Bindery system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;
use crate::value::Value;

/// Result alias used throughout Bindery.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Bindery operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error, keeping any context already attached.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }
        self
    }

    /// Creates a type mismatch error.
    ///
    /// `target` names the field, container, or conversion that rejected `value`.
    #[must_use]
    pub fn type_mismatch(
        target: impl Into<String>,
        value: &Value,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            target: target.into(),
            value: value.clone(),
            actual: value.value_type(),
            expected: expected.into(),
        })
    }

    /// Creates an error for a type path whose module could not be located.
    #[must_use]
    pub fn missing_module(path: impl Into<String>, module: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unresolved {
            path: path.into(),
            missing: Missing::Module(module.into()),
        })
    }

    /// Creates an error for a type path whose module lacks the named member.
    #[must_use]
    pub fn missing_member(path: impl Into<String>, member: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unresolved {
            path: path.into(),
            missing: Missing::Member(member.into()),
        })
    }

    /// Creates an invalid type reference error.
    #[must_use]
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidReference(reference.into()))
    }

    /// Creates a malformed input error.
    #[must_use]
    pub fn malformed(expected: &'static str, input: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed {
            expected,
            input: input.into(),
        })
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField {
            entity: entity.into(),
            field: field.into(),
        })
    }

    /// Creates an index out of bounds error.
    #[must_use]
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds { index, length })
    }

    /// Returns true if this is a type mismatch.
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }

    /// Returns true if this is a resolution failure.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self.kind, ErrorKind::Unresolved { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A value could neither satisfy nor be coerced into a declared type.
    #[error("{target} must be a {expected}, not a {actual} ({value:?})")]
    TypeMismatch {
        /// The field, container, or conversion that rejected the value.
        target: String,
        /// The offending value.
        value: Value,
        /// The type of the offending value.
        actual: Type,
        /// Name of the expected type.
        expected: String,
    },

    /// A type path could not be resolved.
    #[error("unable to resolve '{path}': {missing}")]
    Unresolved {
        /// The full type path.
        path: String,
        /// What was missing.
        missing: Missing,
    },

    /// A type reference was neither a type, a path, nor absent.
    #[error("unable to resolve class for '{0}'")]
    InvalidReference(String),

    /// Input text could not be parsed.
    #[error("malformed {expected}: {input:?}")]
    Malformed {
        /// What the input should have been.
        expected: &'static str,
        /// The raw input.
        input: String,
    },

    /// Field name not declared on an entity type.
    #[error("unknown field: {field} on {entity}")]
    UnknownField {
        /// The entity type that was queried.
        entity: String,
        /// The field name that was not found.
        field: String,
    },

    /// A list operation was requested on a single-valued field.
    #[error("field is not multiple: {0}")]
    NotMultiple(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length of the collection.
        length: usize,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// The part of a type path that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// The module could not be located.
    Module(String),
    /// The module exists but has no such member.
    Member(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(module) => write!(f, "no module named '{module}'"),
            Self::Member(member) => write!(f, "module has no member '{member}'"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Entity type being processed.
    pub entity: Option<String>,
    /// Field being processed.
    pub field: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity type name.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Sets the field name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.entity, &self.field) {
            (Some(entity), Some(field)) => write!(f, "at {entity}.{field}"),
            (Some(entity), None) => write!(f, "at {entity}"),
            (None, Some(field)) => write!(f, "at {field}"),
            (None, None) => Ok(()),
        }
    }
}
