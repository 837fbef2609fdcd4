use crate::error::{ReconstructError, SerializeError};
use crate::rich::{ConfigSerializable, Fields};
use crate::value::{Atom, AtomSet, Value};

// -----------------------------------------------------------------------------
// SerializableSet

/// Persisted form of [`Value::Set`].
///
/// The serializer wraps every native set in this type, so a set is written as
/// `{"__type__": "Set", "values": [...]}`. Rebuilding it yields a plain
/// [`Value::Set`] again rather than a rich object.
///
/// Registered by [`TypeRegistry::new`](crate::TypeRegistry::new).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SerializableSet(pub AtomSet);

impl SerializableSet {
    /// Field holding the elements.
    pub const VALUES: &'static str = "values";
}

impl ConfigSerializable for SerializableSet {
    const ALIAS: &'static str = "Set";

    fn export_fields(&self) -> Result<Fields, SerializeError> {
        let values: Vec<Value> = self.0.iter().cloned().map(Atom::into_value).collect();
        Ok(Fields::new().with(Self::VALUES, values))
    }

    fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
        let values: Vec<Value> = fields.get(Self::VALUES)?;
        let mut set = AtomSet::with_capacity_and_hasher(values.len(), Default::default());
        for value in &values {
            let atom = Atom::from_value(value).ok_or_else(|| ReconstructError::InvalidField {
                field: Self::VALUES.to_owned(),
                expected: "list of bool, integer or string",
                found: value.kind_name(),
            })?;
            set.insert(atom);
        }
        Ok(Self(set))
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Set(self.0)
    }
}

impl From<AtomSet> for SerializableSet {
    #[inline]
    fn from(set: AtomSet) -> Self {
        Self(set)
    }
}

// -----------------------------------------------------------------------------
// Tests
