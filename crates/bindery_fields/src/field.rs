//! Typed field descriptors.
//!
//! A [`TypedField`] is declared once on an [`EntityType`](crate::EntityType)
//! and shared by every instance. It validates and coerces values on the way
//! in, lazily creates lists for multiple-valued fields, and runs its hooks.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bindery_foundation::{DataType, Error, ErrorContext, Result, Value};
use tracing::trace;

use crate::context::FieldContext;
use crate::entity::Entity;
use crate::hook::{Hook, clear_kind};
use crate::kind::FieldKind;
use crate::resolver::{LazyType, TypeRef};
use crate::storage::FieldValue;
use crate::typed_list::TypedList;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a field declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    fn next() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

/// A typed field declaration.
#[derive(Debug)]
pub struct TypedField {
    id: FieldId,
    name: String,
    kind: FieldKind,
    ty: LazyType,
    factory: LazyType,
    key_name: Option<String>,
    comparable: bool,
    multiple: bool,
    preset_hook: Option<Hook>,
    postset_hook: Option<Hook>,
}

impl TypedField {
    /// Creates a plain typed field with no declared type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Typed)
    }

    /// Creates a field of the given kind.
    #[must_use]
    pub fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: FieldId::next(),
            name: name.into(),
            kind,
            ty: LazyType::default(),
            factory: LazyType::default(),
            key_name: None,
            comparable: true,
            multiple: false,
            preset_hook: None,
            postset_hook: None,
        }
    }

    /// Creates a byte-string field.
    #[must_use]
    pub fn bytes(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Bytes)
    }

    /// Creates a text field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Text)
    }

    /// Creates a boolean field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Boolean)
    }

    /// Creates a 64-bit integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Integer)
    }

    /// Creates a 128-bit integer field.
    #[must_use]
    pub fn long(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Long)
    }

    /// Creates a float field.
    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Float)
    }

    /// Creates a timestamp field.
    #[must_use]
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::DateTime)
    }

    /// Creates a calendar date field.
    #[must_use]
    pub fn date(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Date)
    }

    /// Creates a CDATA-stripping text field.
    #[must_use]
    pub fn cdata(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Cdata)
    }

    /// Creates an identifier field.
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Id)
    }

    /// Creates an identifier reference field.
    #[must_use]
    pub fn idref(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Idref)
    }

    /// Declares the field's type.
    #[must_use]
    pub fn with_type(mut self, reference: impl Into<TypeRef>) -> Self {
        self.ty.set(reference.into());
        self
    }

    /// Declares the type external binders use to build values.
    #[must_use]
    pub fn with_factory(mut self, reference: impl Into<TypeRef>) -> Self {
        self.factory.set(reference.into());
        self
    }

    /// Overrides the external key name.
    #[must_use]
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Sets whether the field takes part in entity comparison.
    #[must_use]
    pub fn with_comparable(mut self, comparable: bool) -> Self {
        self.comparable = comparable;
        self
    }

    /// Sets whether the field holds a list of values.
    #[must_use]
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Sets the hook run before a value is stored.
    #[must_use]
    pub fn with_preset_hook(mut self, hook: Hook) -> Self {
        self.preset_hook = Some(hook);
        self
    }

    /// Sets the hook run after a value is stored.
    #[must_use]
    pub fn with_postset_hook(mut self, hook: Hook) -> Self {
        self.postset_hook = Some(hook);
        self
    }

    /// Returns the field identity.
    #[must_use]
    pub const fn field_id(&self) -> FieldId {
        self.id
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns true if the field takes part in entity comparison.
    #[must_use]
    pub const fn comparable(&self) -> bool {
        self.comparable
    }

    /// Returns true if the field holds a list.
    #[must_use]
    pub const fn multiple(&self) -> bool {
        self.multiple
    }

    /// Returns the preset hook.
    #[must_use]
    pub const fn preset_hook(&self) -> Option<&Hook> {
        self.preset_hook.as_ref()
    }

    /// Returns the postset hook.
    #[must_use]
    pub const fn postset_hook(&self) -> Option<&Hook> {
        self.postset_hook.as_ref()
    }

    /// External key name: the declared override, else the lowercased name.
    #[must_use]
    pub fn key_name(&self) -> Cow<'_, str> {
        match &self.key_name {
            Some(key) => Cow::Borrowed(key),
            None => Cow::Owned(self.name.to_lowercase()),
        }
    }

    /// Returns the declared key name override.
    #[must_use]
    pub fn key_name_override(&self) -> Option<&str> {
        self.key_name.as_deref()
    }

    /// Returns the declared type reference.
    #[must_use]
    pub fn type_ref(&self) -> &TypeRef {
        self.ty.reference()
    }

    /// Returns the declared factory reference.
    #[must_use]
    pub fn factory_ref(&self) -> &TypeRef {
        self.factory.reference()
    }

    /// Replaces the type reference, discarding any earlier resolution.
    pub fn set_type(&mut self, reference: impl Into<TypeRef>) {
        self.ty.set(reference.into());
    }

    /// Replaces the factory reference, discarding any earlier resolution.
    pub fn set_factory(&mut self, reference: impl Into<TypeRef>) {
        self.factory.set(reference.into());
    }

    /// Resolves the declared type.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if a type path cannot be resolved.
    pub fn type_(&self, ctx: &FieldContext) -> Result<Option<&Arc<dyn DataType>>> {
        self.ty.get(ctx.loader())
    }

    /// Resolves the declared factory.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if a factory path cannot be resolved.
    pub fn factory(&self, ctx: &FieldContext) -> Result<Option<&Arc<dyn DataType>>> {
        self.factory.get(ctx.loader())
    }

    /// The type that turns external representations into values: the
    /// factory when present, else the type.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if either reference cannot be resolved.
    pub fn transformer(&self, ctx: &FieldContext) -> Result<Option<&Arc<dyn DataType>>> {
        match self.factory(ctx)? {
            Some(factory) => Ok(Some(factory)),
            None => self.type_(ctx),
        }
    }

    /// Returns true if the resolved type allows implicit construction.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the type path cannot be resolved.
    pub fn is_type_castable(&self, ctx: &FieldContext) -> Result<bool> {
        Ok(self.type_(ctx)?.is_some_and(|ty| ty.try_cast()))
    }

    /// Returns true if `value` satisfies the declared type as is.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the type path cannot be resolved.
    pub fn check_type(&self, value: &Value, ctx: &FieldContext) -> Result<bool> {
        Ok(self.type_(ctx)?.is_none_or(|ty| ty.accepts(value)))
    }

    /// Validates and coerces one value according to the field kind.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if the value cannot be coerced, or a
    /// resolution error if the type path cannot be resolved.
    pub fn clean(&self, value: Value, ctx: &FieldContext) -> Result<Value> {
        self.kind.clean(self, value, ctx)
    }

    pub(crate) fn clean_typed(&self, value: Value, ctx: &FieldContext) -> Result<Value> {
        if value.is_nil() {
            return Ok(value);
        }
        let Some(ty) = self.type_(ctx)? else {
            return Ok(value);
        };
        if ty.accepts(&value) {
            return Ok(value);
        }
        if ty.try_cast() {
            return ty.construct(&value);
        }
        Err(Error::type_mismatch(&self.name, &value, ty.name()))
    }

    /// Creates an empty list for this field's values.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the type path cannot be resolved.
    pub fn new_list(&self, ctx: &FieldContext) -> Result<TypedList> {
        Ok(TypedList::with_element(self.type_(ctx)?.cloned()))
    }

    /// Reads the stored value.
    ///
    /// An unset multiple-valued field gets an empty list stored on first
    /// read, so later reads see the same list.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the list's type path cannot be
    /// resolved.
    pub fn get<'a>(&self, entity: &'a mut Entity) -> Result<Option<&'a FieldValue>> {
        self.ensure_list(entity)?;
        Ok(entity.storage().get(self.id))
    }

    /// Mutable form of [`TypedField::get`].
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the list's type path cannot be
    /// resolved.
    pub fn get_mut<'a>(&self, entity: &'a mut Entity) -> Result<Option<&'a mut FieldValue>> {
        self.ensure_list(entity)?;
        Ok(entity.storage_mut().get_mut(self.id))
    }

    /// Cleans and stores a value, running the hooks around the store.
    ///
    /// Multiple-valued fields store nil as an empty list, a list as the
    /// cleaned non-nil elements, and any other value as a one-element list.
    ///
    /// # Errors
    ///
    /// Returns the clean step's error annotated with the entity and field.
    /// Nothing is stored when cleaning fails.
    pub fn set(&self, entity: &mut Entity, value: Value) -> Result<()> {
        let class = Arc::clone(entity.entity_type());
        let assigned = value.is_truthy();
        let stored = self.prepare(value, class.context()).map_err(|err| {
            err.with_context(
                ErrorContext::new()
                    .with_entity(class.name())
                    .with_field(&self.name),
            )
        })?;

        if let Some(hook) = &self.preset_hook {
            hook.run(entity, self.id, &stored);
        }

        trace!(entity = %class.name(), field = %self.name, kind = %self.kind, "set field");
        match &self.postset_hook {
            Some(hook) => {
                entity.storage_mut().insert(self.id, self.kind, stored.clone());
                hook.run(entity, self.id, &stored);
            }
            None => {
                entity.storage_mut().insert(self.id, self.kind, stored);
            }
        }

        if assigned {
            if let Some(excluded) = self.kind.excludes() {
                clear_kind(entity, self.id, excluded);
            }
        }
        Ok(())
    }

    /// Returns a declaration attribute by name, as matched by
    /// [`find`](crate::find). Unknown names return `None`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Value> {
        let value = match name {
            "name" => Value::from(self.name.as_str()),
            "kind" => Value::from(self.kind.as_str()),
            "comparable" => Value::Bool(self.comparable),
            "multiple" => Value::Bool(self.multiple),
            "key_name" => Value::from(self.key_name().into_owned()),
            "_key_name" => Value::from(self.key_name.clone()),
            "_type" | "type" | "type_" => self.ty.reference().to_value(),
            "_factory" => self.factory.reference().to_value(),
            "preset_hook" => Value::from(self.preset_hook.as_ref().map(Hook::to_string)),
            "postset_hook" => Value::from(self.postset_hook.as_ref().map(Hook::to_string)),
            _ => return None,
        };
        Some(value)
    }

    fn ensure_list(&self, entity: &mut Entity) -> Result<()> {
        if self.multiple && !entity.storage().contains(self.id) {
            let list = self.new_list(entity.context())?;
            entity
                .storage_mut()
                .insert(self.id, self.kind, FieldValue::Multiple(list));
        }
        Ok(())
    }

    fn prepare(&self, value: Value, ctx: &FieldContext) -> Result<FieldValue> {
        if !self.multiple {
            return self.clean(value, ctx).map(FieldValue::Single);
        }
        let mut list = self.new_list(ctx)?;
        match value {
            Value::Nil => {}
            Value::List(items) => {
                for item in items.into_iter().filter(|item| !item.is_nil()) {
                    list.push(self.clean(item, ctx)?)?;
                }
            }
            scalar => list.push(self.clean(scalar, ctx)?)?,
        }
        Ok(FieldValue::Multiple(list))
    }
}

impl fmt::Display for TypedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
