use core::any::Any;
use core::ops::Index;

use vc_utils::collections::indexmap;

use crate::error::ReconstructError;
use crate::serde::TYPE_KEY;
use crate::value::{FromValue, Value, ValueMap};

// -----------------------------------------------------------------------------
// Fields

/// The ordered fields of a rich value.
///
/// Produced by [`export_fields`](crate::ConfigSerializable::export_fields) and
/// consumed by [`from_fields`](crate::ConfigSerializable::from_fields). Field
/// order is kept and becomes the key order of the persisted map.
///
/// # Examples
///
/// ```
/// use vc_tree::{Fields, ReconstructError};
///
/// let fields = Fields::new().with("name", "gravel").with("amount", 3);
///
/// assert_eq!(fields.get::<String>("name").unwrap(), "gravel");
/// assert_eq!(fields.get::<f64>("amount").unwrap(), 3.0);
/// assert_eq!(
///     fields.get::<i64>("weight"),
///     Err(ReconstructError::MissingField("weight".into())),
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields {
    entries: ValueMap,
}

impl Fields {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a field; a replaced field keeps its position.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a field, keeping the order of the rest.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Returns the field as stored.
    #[inline]
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Extracts a required field.
    ///
    /// # Errors
    ///
    /// [`ReconstructError::MissingField`] if absent, and
    /// [`ReconstructError::InvalidField`] if the stored kind does not convert.
    pub fn get<T: FromValue>(&self, key: &str) -> Result<T, ReconstructError> {
        let value = self
            .get_raw(key)
            .ok_or_else(|| ReconstructError::MissingField(key.to_owned()))?;
        T::from_value(value).ok_or_else(|| invalid(key, T::EXPECTED, value))
    }

    /// Extracts an optional field. Absent and null fields give `None`.
    pub fn get_opt<T: FromValue>(&self, key: &str) -> Result<Option<T>, ReconstructError> {
        match self.get_raw(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| invalid(key, T::EXPECTED, value)),
        }
    }

    /// Extracts a required field holding an already rebuilt rich value.
    pub fn get_object<T: Any + Clone>(&self, key: &str) -> Result<T, ReconstructError> {
        self.get_object_opt(key)?
            .ok_or_else(|| ReconstructError::MissingField(key.to_owned()))
    }

    /// Extracts an optional rich value field. Absent and null fields give `None`.
    pub fn get_object_opt<T: Any + Clone>(&self, key: &str) -> Result<Option<T>, ReconstructError> {
        match self.get_raw(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .downcast_ref::<T>()
                .cloned()
                .map(Some)
                .ok_or_else(|| invalid(key, "rich object", value)),
        }
    }

    /// The alias under [`TYPE_KEY`], present when rebuilding.
    #[inline]
    pub fn alias(&self) -> Option<&str> {
        self.get_raw(TYPE_KEY).and_then(Value::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    #[inline]
    pub fn as_map(&self) -> &ValueMap {
        &self.entries
    }

    #[inline]
    pub fn into_map(self) -> ValueMap {
        self.entries
    }
}

#[cold]
fn invalid(key: &str, expected: &'static str, found: &Value) -> ReconstructError {
    ReconstructError::InvalidField {
        field: key.to_owned(),
        expected,
        found: found.kind_name(),
    }
}

impl From<ValueMap> for Fields {
    #[inline]
    fn from(entries: ValueMap) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Index<&str> for Fields {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the field is absent.
    #[inline]
    fn index(&self, key: &str) -> &Value {
        &self.entries[key]
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Fields;
    use crate::error::ReconstructError;
    use crate::serde::TYPE_KEY;
    use crate::value::Value;

    #[test]
    fn keeps_insertion_order() {
        let mut fields = Fields::new().with("b", 1).with("a", 2).with("c", 3);
        fields.insert("b", 10);
        fields.remove("a");
        assert!(fields.iter().map(|(k, _)| k.as_str()).eq(["b", "c"]));
        assert_eq!(fields["b"], Value::Int(10));
    }

    #[test]
    fn invalid_field_reports_kinds() {
        let fields = Fields::new().with("rating", "high");
        assert_eq!(
            fields.get::<f64>("rating"),
            Err(ReconstructError::InvalidField {
                field: "rating".into(),
                expected: "float",
                found: "string",
            })
        );
    }

    #[test]
    fn optional_fields() {
        let fields = Fields::new().with("none", Value::Null).with("some", true);
        assert_eq!(fields.get_opt::<bool>("none"), Ok(None));
        assert_eq!(fields.get_opt::<bool>("missing"), Ok(None));
        assert_eq!(fields.get_opt::<bool>("some"), Ok(Some(true)));
        assert!(fields.get_opt::<i64>("some").is_err());
    }

    #[test]
    fn object_fields_must_be_rebuilt() {
        let fields = Fields::new().with("inner", Value::Map(Default::default()));
        assert!(matches!(
            fields.get_object::<crate::SerializableSet>("inner"),
            Err(ReconstructError::InvalidField { found: "map", .. })
        ));
        assert!(matches!(
            fields.get_object::<crate::SerializableSet>("absent"),
            Err(ReconstructError::MissingField(_))
        ));
    }

    #[test]
    fn alias_reads_type_key() {
        let fields: Fields = [(TYPE_KEY, Value::from("Point")), ("x", Value::from(1))]
            .into_iter()
            .collect();
        assert_eq!(fields.alias(), Some("Point"));
        assert_eq!(fields.len(), 2);
        assert_eq!(Fields::new().alias(), None);
    }
}
