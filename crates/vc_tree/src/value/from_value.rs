use super::{Atom, AtomSet, Value, ValueMap};

/// Extraction of a concrete type from a borrowed [`Value`].
///
/// Used by [`Fields::get`](crate::Fields::get) while a rich type rebuilds
/// itself. Conversions are intentionally narrow: integers widen to floats and
/// nothing else is coerced.
pub trait FromValue: Sized {
    /// Name of the expected kind, used in error messages.
    const EXPECTED: &'static str;

    /// Returns `None` if `value` has another kind or is out of range.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromValue for u32 {
    const EXPECTED: &'static str = "unsigned 32-bit integer";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "float";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromValue for Atom {
    const EXPECTED: &'static str = "bool, integer or string";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        Atom::from_value(value)
    }
}

impl FromValue for Vec<Value> {
    const EXPECTED: &'static str = "list";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_list().map(<[Value]>::to_vec)
    }
}

impl FromValue for ValueMap {
    const EXPECTED: &'static str = "map";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Map(map) => Some(map.clone()),
            Value::Section(section) => Some(section.values(false)),
            _ => None,
        }
    }
}

impl FromValue for AtomSet {
    const EXPECTED: &'static str = "set";

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_set().cloned()
    }
}

// -----------------------------------------------------------------------------
// Tests
