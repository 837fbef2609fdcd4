use core::fmt;

use serde_core::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use vc_utils::collections::{IndexMap, index_map_with_capacity};

use crate::serde::is_tagged;

/// Insertion-ordered mapping of a [`PlainValue`] tree.
pub type PlainMap = IndexMap<String, PlainValue>;

// -----------------------------------------------------------------------------
// PlainValue

/// A node of a persisted configuration tree.
///
/// Only scalars, lists and string-keyed maps, so any text format carrying
/// `serde` data model values can hold it. A map holding
/// [`TYPE_KEY`](crate::TYPE_KEY) marks a rich object.
///
/// # Examples
///
/// ```
/// use vc_tree::PlainValue;
///
/// let value: PlainValue = serde_json::from_str(r#"{"b": [1, 2.5], "a": null}"#).unwrap();
/// let map = value.as_map().unwrap();
///
/// // Keys keep their textual order.
/// assert!(map.keys().eq(["b", "a"]));
/// assert_eq!(map["b"], PlainValue::List(vec![PlainValue::Int(1), PlainValue::Float(2.5)]));
///
/// let text = serde_json::to_string(&value).unwrap();
/// assert_eq!(text, r#"{"b":[1,2.5],"a":null}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum PlainValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<PlainValue>),
    Map(PlainMap),
}

impl PlainValue {
    /// A short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Returns `true` if this is a map carrying the type key.
    #[inline]
    pub fn is_tagged(&self) -> bool {
        matches!(self, Self::Map(map) if is_tagged(map))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[PlainValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&PlainMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Takes the map out of a `Map` node.
    #[inline]
    pub fn into_map(self) -> Result<PlainMap, Self> {
        match self {
            Self::Map(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl From<bool> for PlainValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PlainValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PlainValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for PlainValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for PlainValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PlainValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<PlainValue>> for PlainValue {
    #[inline]
    fn from(value: Vec<PlainValue>) -> Self {
        Self::List(value)
    }
}

impl From<PlainMap> for PlainValue {
    #[inline]
    fn from(value: PlainMap) -> Self {
        Self::Map(value)
    }
}

impl FromIterator<PlainValue> for PlainValue {
    fn from_iter<I: IntoIterator<Item = PlainValue>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, PlainValue)> for PlainValue {
    fn from_iter<I: IntoIterator<Item = (K, PlainValue)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for PlainValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

impl<'de> Deserialize<'de> for PlainValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PlainValueVisitor)
    }
}

struct PlainValueVisitor;

// Guards against hostile size hints.
const MAX_PREALLOC: usize = 4096;

impl<'de> Visitor<'de> for PlainValueVisitor {
    type Value = PlainValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar, a sequence or a map")
    }

    #[inline]
    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(PlainValue::Bool(v))
    }

    #[inline]
    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PlainValue::Int(v))
    }

    #[inline]
    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map_or(PlainValue::Float(v as f64), PlainValue::Int))
    }

    #[inline]
    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(PlainValue::Float(v))
    }

    #[inline]
    fn visit_char<E>(self, v: char) -> Result<Self::Value, E> {
        Ok(PlainValue::String(v.to_string()))
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PlainValue::String(v.to_owned()))
    }

    #[inline]
    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(PlainValue::String(v))
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(PlainValue::Null)
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(PlainValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        PlainValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut list = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(element) = seq.next_element::<PlainValue>()? {
            list.push(element);
        }
        Ok(PlainValue::List(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut output = index_map_with_capacity(map.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some((key, value)) = map.next_entry::<String, PlainValue>()? {
            output.insert(key, value);
        }
        Ok(PlainValue::Map(output))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{PlainMap, PlainValue};
    use crate::serde::TYPE_KEY;

    #[test]
    fn json_numbers() {
        let value: PlainValue = serde_json::from_str("[1, -2, 3.5, 18446744073709551615]").unwrap();
        assert_eq!(
            value,
            PlainValue::List(vec![
                PlainValue::Int(1),
                PlainValue::Int(-2),
                PlainValue::Float(3.5),
                PlainValue::Float(u64::MAX as f64),
            ])
        );
    }

    #[test]
    fn json_keeps_key_order() {
        let text = r#"{"zeta":1,"alpha":{"y":true,"x":"s"},"mid":[null]}"#;
        let value: PlainValue = serde_json::from_str(text).unwrap();
        let map = value.as_map().unwrap();
        assert!(map.keys().eq(["zeta", "alpha", "mid"]));
        assert_eq!(serde_json::to_string(&value).unwrap(), text);
    }

    #[test]
    fn ron_round_trip() {
        let value: PlainValue = [
            ("name", PlainValue::from("gravel")),
            ("amount", PlainValue::from(3)),
            ("tags", PlainValue::from(vec![PlainValue::from("a")])),
        ]
        .into_iter()
        .collect();

        let text = ron::to_string(&value).unwrap();
        let back: PlainValue = ron::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn tagged_detection() {
        let mut map = PlainMap::default();
        map.insert("x".into(), PlainValue::Int(1));
        assert!(!PlainValue::Map(map.clone()).is_tagged());

        map.insert(TYPE_KEY.into(), PlainValue::from("Point"));
        assert!(PlainValue::Map(map).is_tagged());
        assert!(!PlainValue::from(TYPE_KEY).is_tagged());
    }

    #[test]
    fn into_map() {
        assert!(PlainValue::Map(PlainMap::default()).into_map().is_ok());
        assert_eq!(PlainValue::Int(1).into_map(), Err(PlainValue::Int(1)));
    }
}
