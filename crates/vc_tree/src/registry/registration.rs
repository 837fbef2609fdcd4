use core::any::{TypeId, type_name};
use core::fmt;

use crate::error::ReconstructError;
use crate::rich::{ConfigSerializable, Fields};
use crate::value::Value;

// -----------------------------------------------------------------------------
// TypeRegistration

/// Runtime entry of a [`ConfigSerializable`] type, stored in the
/// [`TypeRegistry`](crate::TypeRegistry).
///
/// # Example
///
/// ```
/// use vc_tree::{Fields, SerializableSet, TYPE_KEY, Value};
/// use vc_tree::registry::TypeRegistration;
///
/// let registration = TypeRegistration::of::<SerializableSet>();
/// assert_eq!(registration.alias(), "Set");
///
/// let fields = Fields::new()
///     .with(TYPE_KEY, "Set")
///     .with("values", vec![Value::from(1)]);
/// let value = registration.reconstruct(&fields).unwrap();
/// assert!(value.as_set().is_some());
/// ```
#[derive(Clone, Copy)]
pub struct TypeRegistration {
    type_id: TypeId,
    type_path: &'static str,
    alias: &'static str,
    reconstruct: fn(&Fields) -> Result<Value, ReconstructError>,
}

impl TypeRegistration {
    /// Creates the registration of `T`.
    #[inline]
    pub fn of<T: ConfigSerializable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            alias: T::ALIAS,
            reconstruct: reconstruct_as::<T>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The Rust type name; also accepted as a tag by the registry.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn alias(&self) -> &'static str {
        self.alias
    }

    /// Rebuilds a value of this type from resolved fields.
    #[inline]
    pub fn reconstruct(&self, fields: &Fields) -> Result<Value, ReconstructError> {
        (self.reconstruct)(fields)
    }
}

fn reconstruct_as<T: ConfigSerializable>(fields: &Fields) -> Result<Value, ReconstructError> {
    T::from_fields(fields).map(ConfigSerializable::into_value)
}

impl fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("alias", &self.alias)
            .field("type_path", &self.type_path)
            .finish_non_exhaustive()
    }
}
