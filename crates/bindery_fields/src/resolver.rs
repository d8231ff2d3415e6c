//! Type references and their lazy resolution.
//!
//! A field may name its type before that type exists, as a dotted path like
//! `"stix.indicator.Indicator"`. The path is looked up through a
//! [`TypeLoader`] the first time the field needs it and memoized afterward.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bindery_foundation::{DataType, Error, Result, Type, Value};
use once_cell::sync::OnceCell;
use tracing::debug;

/// Module under which the built-in types are registered.
pub const BUILTINS_MODULE: &str = "builtins";

/// Reference to a field's declared type.
#[derive(Clone, Default)]
pub enum TypeRef {
    /// No type declared; values are not checked.
    #[default]
    Absent,
    /// A concrete type.
    Type(Arc<dyn DataType>),
    /// A fully qualified `module.path.Name` resolved on first use.
    Path(String),
}

impl TypeRef {
    /// Creates a deferred reference to a dotted type path.
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a reference to a concrete type.
    #[must_use]
    pub fn of<T: DataType + 'static>(ty: T) -> Self {
        Self::Type(Arc::new(ty))
    }

    /// Returns true if no type is referenced.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the declared form of this reference as a value: nil, the
    /// path text, or the concrete type's name.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Absent => Value::Nil,
            Self::Type(ty) => Value::from(ty.name()),
            Self::Path(path) => Value::from(path.as_str()),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "TypeRef(absent)"),
            Self::Type(ty) => write!(f, "TypeRef({})", ty.name()),
            Self::Path(path) => write!(f, "TypeRef({path:?})"),
        }
    }
}

impl From<Type> for TypeRef {
    fn from(ty: Type) -> Self {
        Self::Type(Arc::new(ty))
    }
}

impl From<Arc<dyn DataType>> for TypeRef {
    fn from(ty: Arc<dyn DataType>) -> Self {
        Self::Type(ty)
    }
}

impl From<&str> for TypeRef {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl TryFrom<&Value> for TypeRef {
    type Error = Error;

    /// Reads a reference from a declaration value: nil is absent, text is
    /// a path, anything else is invalid.
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Nil => Ok(Self::Absent),
            Value::Text(path) => Ok(Self::Path(path.to_string())),
            other => Err(Error::invalid_reference(other.to_string())),
        }
    }
}

/// A named collection of types addressable by `module.member` paths.
#[derive(Clone, Debug, Default)]
pub struct Module {
    name: String,
    members: HashMap<String, Arc<dyn DataType>>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashMap::new(),
        }
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds or replaces a member.
    pub fn insert(&mut self, member: impl Into<String>, ty: Arc<dyn DataType>) {
        self.members.insert(member.into(), ty);
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&Arc<dyn DataType>> {
        self.members.get(member)
    }

    /// Iterates member names.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

/// Locates modules by name.
pub trait TypeLoader: Send + Sync {
    /// Returns the named module, if it exists.
    fn import(&self, module: &str) -> Option<&Module>;
}

/// In-memory [`TypeLoader`] populated at startup.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    modules: HashMap<String, Module>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding the built-in types under
    /// [`BUILTINS_MODULE`] (`builtins.int`, `builtins.text`, ...).
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for ty in Type::BUILTINS {
            let name = ty.as_str().to_string();
            registry.register(BUILTINS_MODULE, name, Arc::new(ty));
        }
        registry
    }

    /// Creates a registry with no modules at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Registers `ty` as `member` of `module`, creating the module if needed.
    pub fn register(
        &mut self,
        module: impl Into<String>,
        member: impl Into<String>,
        ty: Arc<dyn DataType>,
    ) {
        let module = module.into();
        self.modules
            .entry(module.clone())
            .or_insert_with(|| Module::new(module))
            .insert(member, ty);
    }

    /// Registers `ty` under a full dotted path.
    ///
    /// # Errors
    ///
    /// Returns an invalid reference error if `path` has no module part.
    pub fn register_path(&mut self, path: &str, ty: Arc<dyn DataType>) -> Result<()> {
        let (module, member) = split_path(path).ok_or_else(|| Error::invalid_reference(path))?;
        self.register(module, member, ty);
        Ok(())
    }

    /// Builder form of [`TypeRegistry::register`].
    #[must_use]
    pub fn with_type<T: DataType + 'static>(
        mut self,
        module: impl Into<String>,
        member: impl Into<String>,
        ty: T,
    ) -> Self {
        self.register(module, member, Arc::new(ty));
        self
    }

    /// Returns the named module.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }
}

impl TypeLoader for TypeRegistry {
    fn import(&self, module: &str) -> Option<&Module> {
        self.modules.get(module)
    }
}

fn split_path(path: &str) -> Option<(&str, &str)> {
    path.rsplit_once('.')
        .filter(|(module, member)| !module.is_empty() && !member.is_empty())
}

/// Resolves a reference to a concrete type.
///
/// Absent references resolve to `None` and concrete types to themselves.
///
/// # Errors
///
/// Returns a resolution error if a path's module cannot be located or lacks
/// the named member.
pub fn resolve_class(
    reference: &TypeRef,
    loader: &dyn TypeLoader,
) -> Result<Option<Arc<dyn DataType>>> {
    match reference {
        TypeRef::Absent => Ok(None),
        TypeRef::Type(ty) => Ok(Some(Arc::clone(ty))),
        TypeRef::Path(path) => import_class(path, loader).map(Some),
    }
}

/// Imports the type named by a full `module.path.Name` path.
///
/// # Errors
///
/// Returns a resolution error if the module or the member is missing.
pub fn import_class(path: &str, loader: &dyn TypeLoader) -> Result<Arc<dyn DataType>> {
    let (module_name, member) = split_path(path).ok_or_else(|| Error::missing_module(path, ""))?;
    let module = loader
        .import(module_name)
        .ok_or_else(|| Error::missing_module(path, module_name))?;
    let ty = module
        .get(member)
        .ok_or_else(|| Error::missing_member(path, member))?;
    debug!(path, ty = ty.name(), "resolved type path");
    Ok(Arc::clone(ty))
}

/// A type reference memoized after its first successful resolution.
///
/// Concurrent first resolutions block on one another, so the loader is
/// consulted once. A failed resolution is not cached.
#[derive(Clone, Default)]
pub struct LazyType {
    reference: TypeRef,
    resolved: OnceCell<Option<Arc<dyn DataType>>>,
}

impl LazyType {
    /// Wraps a reference without resolving it.
    #[must_use]
    pub fn new(reference: TypeRef) -> Self {
        Self {
            reference,
            resolved: OnceCell::new(),
        }
    }

    /// Returns the declared reference.
    #[must_use]
    pub fn reference(&self) -> &TypeRef {
        &self.reference
    }

    /// Returns true once the reference has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Returns the resolved type without triggering resolution.
    #[must_use]
    pub fn peek(&self) -> Option<&Arc<dyn DataType>> {
        self.resolved.get().and_then(Option::as_ref)
    }

    /// Resolves the reference, consulting `loader` only the first time.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the path cannot be resolved.
    pub fn get(&self, loader: &dyn TypeLoader) -> Result<Option<&Arc<dyn DataType>>> {
        self.resolved
            .get_or_try_init(|| resolve_class(&self.reference, loader))
            .map(Option::as_ref)
    }

    /// Replaces the reference and forgets any earlier resolution.
    pub fn set(&mut self, reference: TypeRef) {
        self.reference = reference;
        self.resolved = OnceCell::new();
    }
}

impl fmt::Debug for LazyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyType")
            .field("reference", &self.reference)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl From<TypeRef> for LazyType {
    fn from(reference: TypeRef) -> Self {
        Self::new(reference)
    }
}
