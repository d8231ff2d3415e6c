//! Element-typed lists backing multiple-valued fields.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use bindery_foundation::{DataType, Error, Result, Value};

/// An ordered list whose elements satisfy one element type.
///
/// Typed lists drop falsy input on insert and coerce anything the element
/// type does not accept through [`DataType::construct`]. Untyped lists
/// accept every value except nil. Neither form ever holds nil.
#[derive(Clone, Default)]
pub struct TypedList {
    element: Option<Arc<dyn DataType>>,
    items: Vec<Value>,
}

impl TypedList {
    /// Creates an empty list for `element` values.
    #[must_use]
    pub fn new(element: Arc<dyn DataType>) -> Self {
        Self::with_element(Some(element))
    }

    /// Creates an empty list with no element type.
    #[must_use]
    pub fn untyped() -> Self {
        Self::with_element(None)
    }

    /// Creates an empty list, typed when `element` is present.
    #[must_use]
    pub fn with_element(element: Option<Arc<dyn DataType>>) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// Builds a list from initial items. List items are flattened one level.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if an item cannot be coerced.
    pub fn from_items<I>(element: Option<Arc<dyn DataType>>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut list = Self::with_element(element);
        for item in items {
            match item {
                Value::List(inner) => list.extend(inner)?,
                other => list.push(other)?,
            }
        }
        Ok(list)
    }

    /// Returns the element type.
    #[must_use]
    pub fn element_type(&self) -> Option<&Arc<dyn DataType>> {
        self.element.as_ref()
    }

    /// Returns true if the list has an element type.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        self.element.is_some()
    }

    /// Returns true if `value` satisfies the element type as is.
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.element.as_ref().is_none_or(|ty| ty.accepts(value))
    }

    /// Inserts `value` before `index`, clamped to the list length.
    ///
    /// Falsy values are dropped by typed lists and nil by untyped ones.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if the value cannot be coerced.
    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        if self.skips(&value) {
            return Ok(());
        }
        let value = self.fix(value)?;
        let index = index.min(self.items.len());
        self.items.insert(index, value);
        Ok(())
    }

    /// Appends `value` under the same rules as [`TypedList::insert`].
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if the value cannot be coerced.
    pub fn push(&mut self, value: Value) -> Result<()> {
        self.insert(self.items.len(), value)
    }

    /// Appends each value in turn.
    ///
    /// # Errors
    ///
    /// Returns the first coercion failure; earlier values stay appended.
    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        values.into_iter().try_for_each(|value| self.push(value))
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// Unlike insertion, falsy values are not skipped. Nil is rejected.
    ///
    /// # Errors
    ///
    /// Returns an out-of-bounds error for a bad index or a type mismatch if
    /// the value cannot be coerced.
    pub fn set(&mut self, index: usize, value: Value) -> Result<Value> {
        let length = self.items.len();
        if index >= length {
            return Err(Error::index_out_of_bounds(index, length));
        }
        if value.is_nil() {
            return Err(Error::type_mismatch(self.describe(), &value, self.expected()));
        }
        let value = self.fix(value)?;
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns an out-of-bounds error for a bad index.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        let length = self.items.len();
        if index >= length {
            return Err(Error::index_out_of_bounds(index, length));
        }
        Ok(self.items.remove(index))
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Copies the elements into a [`Value::List`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::List(self.items.iter().cloned().collect())
    }

    fn skips(&self, value: &Value) -> bool {
        if self.element.is_some() {
            !value.is_truthy()
        } else {
            value.is_nil()
        }
    }

    fn fix(&self, value: Value) -> Result<Value> {
        let Some(ty) = &self.element else {
            return Ok(value);
        };
        if ty.accepts(&value) {
            return Ok(value);
        }
        ty.construct(&value)
            .map_err(|_| Error::type_mismatch(self.describe(), &value, ty.name()))
    }

    fn expected(&self) -> String {
        self.element
            .as_ref()
            .map_or_else(|| "value".to_string(), |ty| ty.name().to_string())
    }

    fn describe(&self) -> String {
        format!("TypedList<{}>", self.expected())
    }
}

impl PartialEq for TypedList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl PartialEq<[Value]> for TypedList {
    fn eq(&self, other: &[Value]) -> bool {
        self.items == other
    }
}

impl PartialEq<Vec<Value>> for TypedList {
    fn eq(&self, other: &Vec<Value>) -> bool {
        &self.items == other
    }
}

impl fmt::Debug for TypedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())?;
        f.debug_list().entries(&self.items).finish()
    }
}

impl fmt::Display for TypedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl Index<usize> for TypedList {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a TypedList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
