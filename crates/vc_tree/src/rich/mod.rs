//! Rich values: domain objects persisted as tagged maps.
//!
//! ## Menu
//!
//! - [`ConfigSerializable`]: implemented by a domain type to export its fields
//!   and to rebuild itself from them.
//! - [`RichValue`]: the object-safe side, blanket-implemented for every
//!   `ConfigSerializable`, stored in [`Value::Object`].
//! - [`Fields`]: the ordered field map exchanged in both directions.
//! - [`SerializableSet`]: the built-in wrapper persisting [`Value::Set`].
//!
//! A type becomes loadable once it is registered in a
//! [`TypeRegistry`](crate::TypeRegistry) under its [`ALIAS`](ConfigSerializable::ALIAS).

// -----------------------------------------------------------------------------
// Modules

mod fields;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use fields::Fields;
pub use set::SerializableSet;

use core::any::{Any, type_name};
use core::fmt;

use crate::error::{ReconstructError, SerializeError};
use crate::value::Value;

// -----------------------------------------------------------------------------
// ConfigSerializable

/// A domain type that persists as a map of its fields.
///
/// # Examples
///
/// ```
/// use vc_tree::{ConfigSerializable, Fields, ReconstructError, SerializeError};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl ConfigSerializable for Point {
///     const ALIAS: &'static str = "Point";
///
///     fn export_fields(&self) -> Result<Fields, SerializeError> {
///         Ok(Fields::new().with("x", self.x).with("y", self.y))
///     }
///
///     fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
///         Ok(Point {
///             x: fields.get("x")?,
///             y: fields.get("y")?,
///         })
///     }
/// }
/// ```
pub trait ConfigSerializable: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The alias written under [`TYPE_KEY`](crate::TYPE_KEY).
    ///
    /// Persisted data refers to the type by this name, so it should not change.
    const ALIAS: &'static str;

    /// Exports the fields of this value.
    ///
    /// Field values may themselves be rich objects; they are tagged recursively.
    fn export_fields(&self) -> Result<Fields, SerializeError>;

    /// Rebuilds a value from its fields.
    ///
    /// Nested rich objects have already been rebuilt when this is called.
    /// `fields` still contains the type key.
    fn from_fields(fields: &Fields) -> Result<Self, ReconstructError>;

    /// Places a rebuilt value into a tree.
    ///
    /// Defaults to [`Value::Object`]; wrappers around native values may unwrap here.
    #[inline]
    fn into_value(self) -> Value {
        Value::Object(Box::new(self))
    }
}

// -----------------------------------------------------------------------------
// RichValue

/// Object-safe view of a [`ConfigSerializable`] value.
///
/// Implemented for every `ConfigSerializable` type; not meant to be
/// implemented by hand.
pub trait RichValue: Any + Send + Sync {
    /// The alias written under [`TYPE_KEY`](crate::TYPE_KEY).
    fn registry_alias(&self) -> &'static str;

    /// The Rust type name, only for diagnostics.
    fn type_path(&self) -> &'static str;

    /// See [`ConfigSerializable::export_fields`].
    fn export_fields(&self) -> Result<Fields, SerializeError>;

    /// Clones into a new box.
    fn clone_boxed(&self) -> Box<dyn RichValue>;

    /// Equality against another rich value of any type.
    fn rich_eq(&self, other: &dyn RichValue) -> bool;

    /// Debug formatting of the concrete value.
    fn rich_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: ConfigSerializable> RichValue for T {
    #[inline]
    fn registry_alias(&self) -> &'static str {
        T::ALIAS
    }

    #[inline]
    fn type_path(&self) -> &'static str {
        type_name::<T>()
    }

    #[inline]
    fn export_fields(&self) -> Result<Fields, SerializeError> {
        ConfigSerializable::export_fields(self)
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn RichValue> {
        Box::new(self.clone())
    }

    fn rich_eq(&self, other: &dyn RichValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    #[inline]
    fn rich_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn RichValue {
    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns a reference to the concrete value if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Takes the concrete value out of the box, or gives the box back.
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<dyn RichValue>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => unreachable!("type was checked"),
            }
        } else {
            Err(self)
        }
    }
}

impl Clone for Box<dyn RichValue> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for dyn RichValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.rich_eq(other)
    }
}

impl fmt::Debug for dyn RichValue {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rich_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
