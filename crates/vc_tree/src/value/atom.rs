use core::fmt;

use vc_utils::collections::IndexSet;

use super::Value;

/// Insertion-ordered set of [`Atom`]s, the element type of [`Value::Set`].
pub type AtomSet = IndexSet<Atom>;

// -----------------------------------------------------------------------------
// Atom

/// A hashable scalar, usable as a set element.
///
/// Floats are excluded since they have no total equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Atom {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Atom {
    /// Converts a scalar [`Value`] into an atom.
    ///
    /// Returns `None` for floats, null and every non-scalar.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(Self::Bool(*v)),
            Value::Int(v) => Some(Self::Int(*v)),
            Value::String(v) => Some(Self::String(v.clone())),
            _ => None,
        }
    }

    /// Converts the atom into the matching [`Value`] scalar.
    #[inline]
    pub fn into_value(self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(v),
            Self::Int(v) => Value::Int(v),
            Self::String(v) => Value::String(v),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Atom {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Atom {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Atom {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<String> for Atom {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Atom {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Atom, AtomSet};
    use crate::value::Value;

    #[test]
    fn from_value_rejects_non_hashable() {
        assert_eq!(Atom::from_value(&Value::from(7)), Some(Atom::Int(7)));
        assert_eq!(Atom::from_value(&Value::Float(1.0)), None);
        assert_eq!(Atom::from_value(&Value::Null), None);
        assert_eq!(Atom::from_value(&Value::List(Vec::new())), None);
    }

    #[test]
    fn display() {
        assert_eq!(Atom::from("stone").to_string(), "stone");
        assert_eq!(Atom::from(-3).to_string(), "-3");
        assert_eq!(Atom::from(true).to_string(), "true");
    }

    #[test]
    fn set_dedups_in_order() {
        let set: AtomSet = ["b", "a", "b"].into_iter().map(Atom::from).collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_index(0), Some(&Atom::from("b")));
    }
}
