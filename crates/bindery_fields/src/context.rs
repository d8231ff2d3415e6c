//! Shared configuration consulted by field operations.

use std::fmt;
use std::sync::Arc;

use bindery_foundation::{DateConfig, DateParser};

use crate::resolver::{TypeLoader, TypeRegistry};

/// Where fields look up type paths and how they parse dates.
///
/// Owned by an [`EntityType`](crate::EntityType) and shared by its
/// instances.
#[derive(Clone)]
pub struct FieldContext {
    loader: Arc<dyn TypeLoader>,
    dates: DateParser,
}

impl Default for FieldContext {
    fn default() -> Self {
        Self::new(Arc::new(TypeRegistry::new()))
    }
}

impl FieldContext {
    /// Creates a context resolving type paths through `loader`.
    #[must_use]
    pub fn new(loader: Arc<dyn TypeLoader>) -> Self {
        Self {
            loader,
            dates: DateParser::default(),
        }
    }

    /// Replaces the type loader.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn TypeLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replaces the date parser.
    #[must_use]
    pub fn with_date_parser(mut self, dates: DateParser) -> Self {
        self.dates = dates;
        self
    }

    /// Replaces the date parser with one built from `config`.
    #[must_use]
    pub fn with_date_config(self, config: DateConfig) -> Self {
        self.with_date_parser(DateParser::new(config))
    }

    /// Returns the type loader.
    #[must_use]
    pub fn loader(&self) -> &dyn TypeLoader {
        self.loader.as_ref()
    }

    /// Returns the date parser.
    #[must_use]
    pub fn dates(&self) -> &DateParser {
        &self.dates
    }
}

impl fmt::Debug for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContext")
            .field("dates", &self.dates)
            .finish_non_exhaustive()
    }
}
