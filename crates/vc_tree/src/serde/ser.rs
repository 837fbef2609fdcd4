use vc_utils::collections::index_map_with_capacity;

use crate::error::SerializeError;
use crate::rich::{RichValue, SerializableSet};
use crate::serde::TYPE_KEY;
use crate::value::{PlainMap, PlainValue, Section, Value, ValueMap};

// -----------------------------------------------------------------------------
// EntryFailurePolicy

/// What a container does when one of its entries cannot be serialized.
///
/// The failure is always logged with `log::warn!`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntryFailurePolicy {
    /// Drop the failing entry and keep converting its siblings.
    #[default]
    SkipEntry,
    /// Stop at the failing entry and keep only the entries converted before it.
    Truncate,
}

// -----------------------------------------------------------------------------
// SerializeDriver

/// Turns a [`Value`] tree into a [`PlainValue`] tree.
///
/// # Serialization Rules
///
/// Each node is dispatched on its variant, in this order:
///
/// 1. [`Value::Array`] is written as a list, in order.
/// 2. [`Value::Set`] is wrapped in [`SerializableSet`] and written as a rich object.
/// 3. [`Value::Section`] contributes its direct entries, the same entries as
///    [`Section::values(false)`](Section::values), to a map.
/// 4. [`Value::Map`] is written as a map, in key order.
/// 5. [`Value::List`] is written as a list, in order.
/// 6. [`Value::Object`] is written as a map holding [`TYPE_KEY`] first, then
///    the exported fields. A field named like the tag replaces it in place.
/// 7. Scalars are copied.
///
/// Containers recurse into every entry. An entry whose rich object fails to
/// export is handled by the [`EntryFailurePolicy`] of the closest container.
/// Serialization itself never fails.
///
/// # Examples
///
/// ```
/// use vc_tree::{PlainValue, SerializeDriver, Section, Value};
///
/// let mut root = Section::new();
/// root.set("spawn.x", 12);
/// root.set("names", vec![Value::from("a"), Value::from("b")]);
///
/// let plain = SerializeDriver::new().serialize(&Value::Section(root));
///
/// let output = serde_json::to_string(&plain).unwrap();
/// assert_eq!(output, r#"{"spawn":{"x":12},"names":["a","b"]}"#);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SerializeDriver {
    policy: EntryFailurePolicy,
}

impl SerializeDriver {
    /// Creates a driver skipping failing entries.
    #[inline]
    pub const fn new() -> Self {
        Self::with_policy(EntryFailurePolicy::SkipEntry)
    }

    #[inline]
    pub const fn with_policy(policy: EntryFailurePolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub const fn policy(&self) -> EntryFailurePolicy {
        self.policy
    }

    /// Serializes a value.
    ///
    /// A top-level rich object that fails to export becomes [`PlainValue::Null`].
    pub fn serialize(&self, value: &Value) -> PlainValue {
        match self.normalize(value) {
            Ok(plain) => plain,
            Err(err) => {
                log::warn!("error while serializing a configuration value: {err}");
                PlainValue::Null
            }
        }
    }

    /// Serializes the direct entries of a section into a map.
    ///
    /// Same as serializing [`Value::Section`] without wrapping the result.
    pub fn serialize_section(&self, section: &Section) -> PlainMap {
        self.build_map(section.entries())
    }

    /// Serializes a map.
    pub fn serialize_map(&self, map: &ValueMap) -> PlainMap {
        self.build_map(map.iter())
    }

    // The only error is a rich object at this very node failing to export;
    // failures below are absorbed by the containers.
    fn normalize(&self, value: &Value) -> Result<PlainValue, SerializeError> {
        match value {
            Value::Array(items) => Ok(PlainValue::List(self.build_list(items))),
            Value::Set(set) => self.normalize_rich(&SerializableSet(set.clone())),
            Value::Section(section) => Ok(PlainValue::Map(self.serialize_section(section))),
            Value::Map(map) => Ok(PlainValue::Map(self.serialize_map(map))),
            Value::List(items) => Ok(PlainValue::List(self.build_list(items))),
            Value::Object(object) => self.normalize_rich(&**object),
            Value::Null => Ok(PlainValue::Null),
            Value::Bool(v) => Ok(PlainValue::Bool(*v)),
            Value::Int(v) => Ok(PlainValue::Int(*v)),
            Value::Float(v) => Ok(PlainValue::Float(*v)),
            Value::String(v) => Ok(PlainValue::String(v.clone())),
        }
    }

    fn normalize_rich(&self, object: &dyn RichValue) -> Result<PlainValue, SerializeError> {
        let fields = object.export_fields()?;

        let mut tagged: ValueMap = index_map_with_capacity(fields.len() + 1);
        tagged.insert(TYPE_KEY.to_owned(), Value::from(object.registry_alias()));
        tagged.extend(fields);

        Ok(PlainValue::Map(self.serialize_map(&tagged)))
    }

    fn build_map<'v>(
        &self,
        entries: impl ExactSizeIterator<Item = (&'v String, &'v Value)>,
    ) -> PlainMap {
        let mut result = index_map_with_capacity(entries.len());
        for (key, value) in entries {
            match self.normalize(value) {
                Ok(plain) => {
                    result.insert(key.clone(), plain);
                }
                Err(err) => {
                    log::warn!("error while building configuration map at `{key}`: {err}");
                    match self.policy {
                        EntryFailurePolicy::SkipEntry => continue,
                        EntryFailurePolicy::Truncate => break,
                    }
                }
            }
        }
        result
    }

    fn build_list(&self, items: &[Value]) -> Vec<PlainValue> {
        let mut result = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.normalize(item) {
                Ok(plain) => result.push(plain),
                Err(err) => {
                    log::warn!("error while building configuration list at {index}: {err}");
                    match self.policy {
                        EntryFailurePolicy::SkipEntry => continue,
                        EntryFailurePolicy::Truncate => break,
                    }
                }
            }
        }
        result
    }
}

// -----------------------------------------------------------------------------
// Tests
