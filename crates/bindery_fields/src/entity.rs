//! Entity types and their instances.

use std::fmt;
use std::sync::Arc;

use bindery_foundation::{Error, ErrorKind, Result, Value};

use crate::context::FieldContext;
use crate::field::{FieldId, TypedField};
use crate::storage::{FieldStorage, FieldValue};
use crate::typed_list::TypedList;

/// A named set of field declarations.
pub struct EntityType {
    name: String,
    fields: Vec<Arc<TypedField>>,
    context: FieldContext,
}

impl EntityType {
    /// Creates an entity type with no fields and the default context.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            context: FieldContext::default(),
        }
    }

    /// Sets the context shared by instances.
    #[must_use]
    pub fn with_context(mut self, context: FieldContext) -> Self {
        self.context = context;
        self
    }

    /// Declares a field. A field with the same name is replaced in place.
    #[must_use]
    pub fn with_field(self, field: TypedField) -> Self {
        self.with_shared_field(Arc::new(field))
    }

    /// Declares a field shared with other entity types.
    #[must_use]
    pub fn with_shared_field(mut self, field: Arc<TypedField>) -> Self {
        match self.fields.iter().position(|f| f.name() == field.name()) {
            Some(pos) => self.fields[pos] = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Returns the entity type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Arc<TypedField>] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arc<TypedField>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Looks up a field by its external key name.
    #[must_use]
    pub fn field_by_key(&self, key: &str) -> Option<&Arc<TypedField>> {
        self.fields.iter().find(|f| f.key_name() == key)
    }

    /// Looks up a field by identity.
    #[must_use]
    pub fn field_by_id(&self, id: FieldId) -> Option<&Arc<TypedField>> {
        self.fields.iter().find(|f| f.field_id() == id)
    }

    /// Looks up a field by name, failing if it is not declared.
    ///
    /// # Errors
    ///
    /// Returns an unknown field error.
    pub fn require(&self, name: &str) -> Result<&Arc<TypedField>> {
        self.field(name)
            .ok_or_else(|| Error::unknown_field(&self.name, name))
    }

    /// Returns the context shared by instances.
    #[must_use]
    pub fn context(&self) -> &FieldContext {
        &self.context
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// An instance of an [`EntityType`] holding its own field values.
#[derive(Clone)]
pub struct Entity {
    entity_type: Arc<EntityType>,
    storage: FieldStorage,
}

impl Entity {
    /// Creates an instance with nothing stored.
    #[must_use]
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            storage: FieldStorage::new(),
        }
    }

    /// Returns the entity type.
    #[must_use]
    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    /// Returns the entity type's context.
    #[must_use]
    pub fn context(&self) -> &FieldContext {
        self.entity_type.context()
    }

    /// Returns the raw field storage.
    #[must_use]
    pub fn storage(&self) -> &FieldStorage {
        &self.storage
    }

    /// Returns the raw field storage mutably. Writes here bypass cleaning
    /// and hooks.
    pub fn storage_mut(&mut self) -> &mut FieldStorage {
        &mut self.storage
    }

    /// Reads a field by name. See [`TypedField::get`].
    ///
    /// # Errors
    ///
    /// Returns an unknown field error or a resolution error.
    pub fn get(&mut self, name: &str) -> Result<Option<&FieldValue>> {
        let field = Arc::clone(self.entity_type.require(name)?);
        field.get(self)
    }

    /// Reads a field without initializing lists.
    ///
    /// # Errors
    ///
    /// Returns an unknown field error.
    pub fn peek(&self, name: &str) -> Result<Option<&FieldValue>> {
        let field = self.entity_type.require(name)?;
        Ok(self.storage.get(field.field_id()))
    }

    /// Reads a field as a plain value. Unset single fields read as nil.
    ///
    /// # Errors
    ///
    /// Returns an unknown field error or a resolution error.
    pub fn value(&mut self, name: &str) -> Result<Value> {
        Ok(self.get(name)?.map_or(Value::Nil, FieldValue::to_value))
    }

    /// Returns the list of a multiple-valued field for in-place edits.
    ///
    /// # Errors
    ///
    /// Returns an unknown field error, a not-multiple error for single
    /// fields, or a resolution error.
    pub fn list_mut(&mut self, name: &str) -> Result<&mut TypedList> {
        let field = Arc::clone(self.entity_type.require(name)?);
        if !field.multiple() {
            return Err(Error::new(ErrorKind::NotMultiple(name.to_string())));
        }
        field
            .get_mut(self)?
            .and_then(FieldValue::as_list_mut)
            .ok_or_else(|| Error::new(ErrorKind::Internal(format!("no list stored for {name}"))))
    }

    /// Sets a field by name. See [`TypedField::set`].
    ///
    /// # Errors
    ///
    /// Returns an unknown field error or the field's clean error.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = Arc::clone(self.entity_type.require(name)?);
        field.set(self, value.into())
    }

    /// Returns true if a value is stored for the named field.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.entity_type
            .field(name)
            .is_some_and(|field| self.storage.contains(field.field_id()))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for field in self.entity_type.fields() {
            if let Some(value) = self.storage.get(field.field_id()) {
                map.entry(&field.name(), value);
            }
        }
        map.finish()
    }
}
