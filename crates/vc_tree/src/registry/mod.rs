//! Alias based lookup of rich value types.
//!
//! ## Menu
//!
//! - [`TypeRegistration`]: alias, type path and reconstruction function of one type.
//! - [`TypeRegistry`]: the alias table consulted by the deserializer.
//! - [`TypeRegistryArc`]: a shared, lockable registry, with a lazily built
//!   [global](TypeRegistryArc::global) instance.
//! - [`auto_register!`](crate::auto_register): submits types at compile time,
//!   collected by [`TypeRegistry::auto_register`].
//!
//! ## auto_register
//!
//! We use the [`inventory`] crate to implement static registration. Not every
//! platform supports it, although the major ones do; on the others
//! [`TypeRegistry::auto_register`] registers nothing and returns `false`.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod registration;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use registration::TypeRegistration;
pub use type_registry::{TypeRegistry, TypeRegistryArc};

// -----------------------------------------------------------------------------
// auto_register!

/// Submits types for [`TypeRegistry::auto_register`].
///
/// Every listed type must implement [`ConfigSerializable`](crate::ConfigSerializable).
/// Generic types must be listed with concrete parameters.
///
/// Without the `auto_register` feature the macro only checks the bounds.
///
/// # Examples
///
/// ```
/// use vc_tree::{ConfigSerializable, Fields, ReconstructError, SerializeError, TypeRegistry};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Spawn(i64);
///
/// impl ConfigSerializable for Spawn {
///     const ALIAS: &'static str = "Spawn";
///
///     fn export_fields(&self) -> Result<Fields, SerializeError> {
///         Ok(Fields::new().with("y", self.0))
///     }
///
///     fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
///         fields.get("y").map(Spawn)
///     }
/// }
///
/// vc_tree::auto_register!(Spawn);
///
/// let mut registry = TypeRegistry::new();
/// if registry.auto_register() {
///     assert!(registry.contains_alias("Spawn"));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: () = {
                fn __register(registry: &mut $crate::TypeRegistry) {
                    registry.register::<$ty>();
                }

                $crate::__macro_exports::auto_register::inventory::submit! {
                    $crate::__macro_exports::auto_register::__AutoRegisterFunc(__register)
                }
            };
        )+
    };
}

/// Submits types for [`TypeRegistry::auto_register`].
///
/// The `auto_register` feature is disabled, so this only checks the bounds.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: () = {
                fn __check<T: $crate::ConfigSerializable>() {}
                let _ = __check::<$ty>;
            };
        )+
    };
}
