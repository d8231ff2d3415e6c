//! Declared cross-field invariants run around field assignment.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Entity;
use crate::field::FieldId;
use crate::kind::FieldKind;
use crate::storage::FieldValue;

/// An invariant a field enforces on its siblings when assigned.
///
/// Hooks fire only for truthy values and never remove the field being set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Hook {
    /// Clear every other stored field of this kind.
    ExcludeKind(FieldKind),
    /// Clear the named sibling fields.
    ExcludeFields(Vec<String>),
}

impl Hook {
    /// Creates an [`Hook::ExcludeFields`] hook.
    #[must_use]
    pub fn exclude_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExcludeFields(names.into_iter().map(Into::into).collect())
    }

    /// Applies the hook for an assignment of `value` to field `setting`.
    /// Returns the number of removed entries.
    pub(crate) fn run(&self, entity: &mut Entity, setting: FieldId, value: &FieldValue) -> usize {
        if !value.is_truthy() {
            return 0;
        }
        match self {
            Self::ExcludeKind(kind) => clear_kind(entity, setting, *kind),
            Self::ExcludeFields(names) => {
                let class = Arc::clone(entity.entity_type());
                let mut removed = 0;
                for field in names.iter().filter_map(|name| class.field(name)) {
                    if field.field_id() != setting && entity.storage_mut().remove(field.field_id()).is_some() {
                        removed += 1;
                    }
                }
                if removed > 0 {
                    debug!(entity = %class.name(), removed, "cleared excluded fields");
                }
                removed
            }
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludeKind(kind) => write!(f, "exclude_kind({kind})"),
            Self::ExcludeFields(names) => write!(f, "exclude_fields({})", names.join(", ")),
        }
    }
}

/// Removes every stored field of `kind` except `keep`.
pub(crate) fn clear_kind(entity: &mut Entity, keep: FieldId, kind: FieldKind) -> usize {
    let removed = entity
        .storage_mut()
        .retain(|id, stored| id == keep || !stored.is_a(kind));
    if removed > 0 {
        debug!(entity = %entity.entity_type().name(), kind = %kind, removed, "cleared excluded fields");
    }
    removed
}
