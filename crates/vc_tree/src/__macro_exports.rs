//! Items used by the expansion of [`auto_register!`](crate::auto_register).

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::TypeRegistry;

    /// A registration function submitted by `auto_register!`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    // Submitted once by this crate. Seeing it at runtime means the platform
    // runs `inventory` constructors.
    pub struct __AvailFlag;

    inventory::collect!(__AvailFlag);

    inventory::submit! { __AvailFlag }

    /// Runs every submitted function, returns `false` if the platform
    /// collected nothing.
    pub fn __register_types(registry: &mut TypeRegistry) -> bool {
        if inventory::iter::<__AvailFlag>.into_iter().next().is_none() {
            return false;
        }
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
        true
    }
}
