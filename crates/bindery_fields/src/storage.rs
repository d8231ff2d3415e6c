//! Per-entity field storage keyed by field identity.

use std::collections::HashMap;

use bindery_foundation::Value;

use crate::field::FieldId;
use crate::kind::FieldKind;
use crate::typed_list::TypedList;

/// A stored field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Value of a single-valued field.
    Single(Value),
    /// List of a multiple-valued field.
    Multiple(TypedList),
}

impl FieldValue {
    /// Returns true if the stored value is truthy. Empty lists are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Single(value) => value.is_truthy(),
            Self::Multiple(list) => !list.is_empty(),
        }
    }

    /// Returns the single value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the list, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&TypedList> {
        match self {
            Self::Multiple(list) => Some(list),
            Self::Single(_) => None,
        }
    }

    /// Returns the list mutably, if this is one.
    pub fn as_list_mut(&mut self) -> Option<&mut TypedList> {
        match self {
            Self::Multiple(list) => Some(list),
            Self::Single(_) => None,
        }
    }

    /// Copies the stored value into a plain [`Value`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(list) => list.to_value(),
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    kind: FieldKind,
    value: FieldValue,
}

/// Stored values of one entity, keyed by [`FieldId`].
///
/// Each slot remembers the kind of the field that wrote it so kind-based
/// removal needs no access to the entity type.
#[derive(Clone, Debug, Default)]
pub struct FieldStorage {
    slots: HashMap<FieldId, Slot>,
}

impl FieldStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if a value is stored for `id`.
    #[must_use]
    pub fn contains(&self, id: FieldId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Returns the value stored for `id`.
    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.slots.get(&id).map(|slot| &slot.value)
    }

    /// Returns the value stored for `id` mutably.
    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut FieldValue> {
        self.slots.get_mut(&id).map(|slot| &mut slot.value)
    }

    /// Returns the kind recorded for `id`.
    #[must_use]
    pub fn kind(&self, id: FieldId) -> Option<FieldKind> {
        self.slots.get(&id).map(|slot| slot.kind)
    }

    /// Stores a value, returning the previous one.
    pub fn insert(&mut self, id: FieldId, kind: FieldKind, value: FieldValue) -> Option<FieldValue> {
        self.slots
            .insert(id, Slot { kind, value })
            .map(|slot| slot.value)
    }

    /// Removes and returns the value stored for `id`.
    pub fn remove(&mut self, id: FieldId) -> Option<FieldValue> {
        self.slots.remove(&id).map(|slot| slot.value)
    }

    /// Keeps only the slots for which `keep` returns true. Returns the
    /// number of removed slots.
    pub fn retain(&mut self, mut keep: impl FnMut(FieldId, FieldKind) -> bool) -> usize {
        let before = self.slots.len();
        self.slots.retain(|id, slot| keep(*id, slot.kind));
        before - self.slots.len()
    }

    /// Removes everything. Returns the number of removed slots.
    pub fn clear(&mut self) -> usize {
        let removed = self.slots.len();
        self.slots.clear();
        removed
    }

    /// Iterates stored field ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.slots.keys().copied()
    }
}
