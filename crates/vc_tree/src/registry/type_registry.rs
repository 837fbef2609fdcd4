use core::any::TypeId;
use std::sync::{Arc, LazyLock, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::error::ReconstructError;
use crate::registry::TypeRegistration;
use crate::rich::{ConfigSerializable, Fields, SerializableSet};
use crate::serde::TYPE_KEY;
use crate::value::Value;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of [`ConfigSerializable`] types.
///
/// The deserializer looks up the alias stored under [`TYPE_KEY`] here to
/// rebuild rich values. Each type is reachable by its
/// [`ALIAS`](ConfigSerializable::ALIAS) and by its Rust type path.
///
/// # Example
///
/// ```
/// use vc_tree::{Fields, TYPE_KEY, TypeRegistry, Value};
///
/// let registry = TypeRegistry::new();
/// assert!(registry.contains_alias("Set"));
///
/// let fields = Fields::new()
///     .with(TYPE_KEY, "Set")
///     .with("values", vec![Value::from("a"), Value::from("b")]);
///
/// let value = registry.reconstruct(&fields).unwrap();
/// assert_eq!(value.as_set().map(|set| set.len()), Some(2));
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    registrations: TypeIdMap<TypeRegistration>,
    alias_to_id: HashMap<&'static str, TypeId>,
    type_path_to_id: HashMap<&'static str, TypeId>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    ///
    /// Note that sets cannot be loaded back without [`SerializableSet`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            registrations: TypeIdMap::new(),
            alias_to_id: HashMap::with_hasher(FixedHashState),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Create a type registry with the built-in registrations.
    ///
    /// - [`SerializableSet`] as `"Set"`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<SerializableSet>();
        registry
    }

    /// Registers `T` if it has not been registered yet.
    ///
    /// Returns `false` if `T` was already present, leaving the registry as is.
    ///
    /// If another type already owns `T::ALIAS`, the alias now resolves to `T`.
    /// The other type stays reachable through its type path.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_tree::{SerializableSet, TypeRegistry};
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.register::<SerializableSet>());
    /// assert!(!registry.register::<SerializableSet>());
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn register<T: ConfigSerializable>(&mut self) -> bool {
        let registration = TypeRegistration::of::<T>();
        let type_id = registration.type_id();
        if self.registrations.contains(&type_id) {
            return false;
        }

        if let Some(previous) = self.alias_to_id.insert(registration.alias(), type_id) {
            let previous_path = self
                .registrations
                .get(&previous)
                .map_or("<unknown>", TypeRegistration::type_path);
            log::warn!(
                "alias `{}` was registered by `{}`, it now resolves to `{}`",
                registration.alias(),
                previous_path,
                registration.type_path(),
            );
        }
        self.type_path_to_id
            .insert(registration.type_path(), type_id);
        self.registrations.insert(type_id, registration);
        true
    }

    /// Removes `T`. Returns `false` if it was not registered.
    ///
    /// If `T` had taken over an alias, the alias goes back to another
    /// registered type using it, if any.
    pub fn unregister<T: ConfigSerializable>(&mut self) -> bool {
        let type_id = TypeId::of::<T>();
        let Some(registration) = self.registrations.remove(&type_id) else {
            return false;
        };

        self.type_path_to_id.remove(registration.type_path());
        if self.alias_to_id.get(registration.alias()) == Some(&type_id) {
            self.alias_to_id.remove(registration.alias());
            if let Some(other) = self
                .registrations
                .values()
                .find(|other| other.alias() == registration.alias())
            {
                self.alias_to_id.insert(other.alias(), other.type_id());
            }
        }
        true
    }

    /// Registers every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Equivalent to calling [`register`](Self::register) for each of them, so
    /// repeated calls do not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current platform.
    ///
    /// ## Feature Dependency
    ///
    /// Requires the `auto_register` feature. When disabled, this does nothing
    /// and returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Whether the type with given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.registrations.contains(&type_id)
    }

    /// Whether a tag with this alias or type path would resolve.
    #[inline]
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.get_with_alias(alias).is_some()
    }

    /// Returns the registration of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeRegistration> {
        self.registrations.get(&type_id)
    }

    /// Returns the registration a tag resolves to.
    ///
    /// Aliases are tried first, then type paths.
    pub fn get_with_alias(&self, alias: &str) -> Option<&TypeRegistration> {
        // Manual inline
        match self.alias_to_id.get(alias) {
            Some(id) => self.get(*id),
            None => match self.type_path_to_id.get(alias) {
                Some(id) => self.get(*id),
                None => None,
            },
        }
    }

    /// Returns the alias the type with the given [`TypeId`] is written with.
    #[inline]
    pub fn alias_of(&self, type_id: TypeId) -> Option<&'static str> {
        self.get(type_id).map(TypeRegistration::alias)
    }

    /// Returns an iterator over the registrations, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeRegistration> {
        self.registrations.values()
    }

    /// Number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Rebuilds the value described by a tagged field map.
    ///
    /// `fields` must hold the alias under [`TYPE_KEY`]; nested rich values are
    /// expected to be rebuilt already.
    ///
    /// # Errors
    ///
    /// - [`ReconstructError::MissingTypeKey`] if there is no tag.
    /// - [`ReconstructError::InvalidTypeKey`] if the tag is not a string.
    /// - [`ReconstructError::UnknownAlias`] if nothing is registered under it.
    /// - Any error of the type's [`from_fields`](ConfigSerializable::from_fields).
    pub fn reconstruct(&self, fields: &Fields) -> Result<Value, ReconstructError> {
        let tag = fields
            .get_raw(TYPE_KEY)
            .ok_or(ReconstructError::MissingTypeKey)?;
        let alias = tag
            .as_str()
            .ok_or_else(|| ReconstructError::InvalidTypeKey(tag.kind_name()))?;
        let registration = self
            .get_with_alias(alias)
            .ok_or_else(|| ReconstructError::UnknownAlias(alias.to_owned()))?;
        registration.reconstruct(fields)
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared [`TypeRegistry`].
///
/// Lock poisoning is ignored: registration never leaves the registry in a
/// partially updated state.
#[derive(Clone, Default, Debug)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

static GLOBAL_REGISTRY: LazyLock<TypeRegistryArc> = LazyLock::new(|| {
    let mut registry = TypeRegistry::new();
    if !registry.auto_register() {
        log::debug!("automatic type registration is unavailable");
    }
    TypeRegistryArc::new(registry)
});

impl TypeRegistryArc {
    /// Wraps a registry.
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// The process-wide registry.
    ///
    /// Built on first use from [`TypeRegistry::new`] followed by
    /// [`TypeRegistry::auto_register`].
    #[inline]
    pub fn global() -> &'static TypeRegistryArc {
        &GLOBAL_REGISTRY
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<TypeRegistry> for TypeRegistryArc {
    #[inline]
    fn from(registry: TypeRegistry) -> Self {
        Self::new(registry)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::{TypeRegistry, TypeRegistryArc};
    use crate::error::{ReconstructError, SerializeError};
    use crate::rich::{ConfigSerializable, Fields, SerializableSet};
    use crate::serde::TYPE_KEY;
    use crate::value::Value;

    #[derive(Clone, Debug, PartialEq)]
    struct Point {
        x: f64,
        y: f64,
    }

    impl ConfigSerializable for Point {
        const ALIAS: &'static str = "Point";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Ok(Fields::new().with("x", self.x).with("y", self.y))
        }

        fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
            Ok(Point {
                x: fields.get("x")?,
                y: fields.get("y")?,
            })
        }
    }

    mod other {
        use crate::error::{ReconstructError, SerializeError};
        use crate::rich::{ConfigSerializable, Fields};

        #[derive(Clone, Debug, PartialEq)]
        pub struct Point;

        impl ConfigSerializable for Point {
            const ALIAS: &'static str = "Point";

            fn export_fields(&self) -> Result<Fields, SerializeError> {
                Ok(Fields::new())
            }

            fn from_fields(_: &Fields) -> Result<Self, ReconstructError> {
                Ok(Point)
            }
        }
    }

    crate::auto_register!(Point);

    fn point_fields(tag: Value) -> Fields {
        Fields::new()
            .with(TYPE_KEY, tag)
            .with("x", 1.0)
            .with("y", -2.5)
    }

    #[test]
    fn builtins() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.alias_of(TypeId::of::<SerializableSet>()), Some("Set"));
        assert!(TypeRegistry::empty().is_empty());
    }

    #[test]
    fn reconstruct_by_alias_and_type_path() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Point>();

        let value = registry.reconstruct(&point_fields("Point".into())).unwrap();
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: 1.0, y: -2.5 }));

        let path = core::any::type_name::<Point>();
        assert!(registry.contains_alias(path));
        assert!(registry.reconstruct(&point_fields(path.into())).is_ok());
    }

    #[test]
    fn reconstruct_errors() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.reconstruct(&Fields::new().with("x", 1)),
            Err(ReconstructError::MissingTypeKey)
        );
        assert_eq!(
            registry.reconstruct(&point_fields(Value::Int(3))),
            Err(ReconstructError::InvalidTypeKey("integer"))
        );
        assert_eq!(
            registry.reconstruct(&point_fields("Point".into())),
            Err(ReconstructError::UnknownAlias("Point".into()))
        );
    }

    #[test]
    fn alias_take_over_and_restore() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.register::<Point>());
        assert!(registry.register::<other::Point>());

        let id = registry.get_with_alias("Point").map(|r| r.type_id());
        assert_eq!(id, Some(TypeId::of::<other::Point>()));
        assert!(registry.contains_alias(core::any::type_name::<Point>()));

        assert!(registry.unregister::<other::Point>());
        assert!(!registry.unregister::<other::Point>());
        let id = registry.get_with_alias("Point").map(|r| r.type_id());
        assert_eq!(id, Some(TypeId::of::<Point>()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn auto_register_collects_submitted_types() {
        let mut registry = TypeRegistry::empty();
        if registry.auto_register() {
            assert!(registry.contains(TypeId::of::<Point>()));
            // Repeated calls add nothing.
            let len = registry.len();
            assert!(registry.auto_register());
            assert_eq!(registry.len(), len);
        }
    }

    #[test]
    fn shared_registry() {
        let shared = TypeRegistryArc::new(TypeRegistry::empty());
        let clone = shared.clone();
        clone.write().register::<Point>();
        assert!(shared.read().contains_alias("Point"));
        assert!(TypeRegistryArc::global().read().contains_alias("Set"));
    }
}
