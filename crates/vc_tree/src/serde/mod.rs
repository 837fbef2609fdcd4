//! Conversion between [`Value`] trees and [`PlainValue`] trees.
//!
//! # Overview
//!
//! ## Serialization
//!
//! - [`SerializeDriver`]: walks a `Value` and produces plain data. Rich values
//!   become maps carrying their alias under [`TYPE_KEY`], sets are persisted
//!   through [`SerializableSet`](crate::SerializableSet).
//! - [`EntryFailurePolicy`]: what a container does with an entry that cannot
//!   be converted.
//! - [`serialize`]: shorthand for the default driver.
//!
//! ## Deserialization
//!
//! - [`DeserializeDriver`]: rebuilds a `Value` bottom-up, asking a
//!   [`TypeRegistry`] to reconstruct every tagged map.
//! - [`deserialize`]: shorthand for a driver with an explicit error mode.
//!
//! The two walks share only [`TYPE_KEY`] and [`is_tagged`].
//!
//! # Examples
//!
//! ```
//! use vc_tree::{Atom, AtomSet, TypeRegistry, Value, ValueMap};
//!
//! let tags: AtomSet = ["a", "b"].into_iter().map(Atom::from).collect();
//! let mut map = ValueMap::default();
//! map.insert("tags".into(), Value::Set(tags));
//! let input = Value::Map(map);
//!
//! let plain = vc_tree::serialize(&input);
//! let text = serde_json::to_string(&plain).unwrap();
//! assert_eq!(text, r#"{"tags":{"__type__":"Set","values":["a","b"]}}"#);
//!
//! let registry = TypeRegistry::new();
//! let output = vc_tree::deserialize(plain.into_map().unwrap(), &registry, false).unwrap();
//! assert_eq!(output, input);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::DeserializeDriver;
pub use ser::{EntryFailurePolicy, SerializeDriver};

use vc_utils::collections::IndexMap;

use crate::error::SerializationFailure;
use crate::registry::TypeRegistry;
use crate::value::{PlainMap, PlainValue, Value};

/// The reserved key marking a map as a rich value; it holds the alias.
pub const TYPE_KEY: &str = "__type__";

/// Returns `true` if the map carries [`TYPE_KEY`].
#[inline]
pub fn is_tagged<V>(map: &IndexMap<String, V>) -> bool {
    map.contains_key(TYPE_KEY)
}

/// Serializes a value with the default [`SerializeDriver`].
///
/// Never fails; see [`SerializeDriver::serialize`].
#[inline]
pub fn serialize(value: &Value) -> PlainValue {
    SerializeDriver::new().serialize(value)
}

/// Deserializes a map, see [`DeserializeDriver`].
///
/// With `continue_on_error == false` the first tagged map that cannot be
/// rebuilt aborts the call; otherwise it becomes [`Value::Null`].
#[inline]
pub fn deserialize(
    input: PlainMap,
    registry: &TypeRegistry,
    continue_on_error: bool,
) -> Result<Value, SerializationFailure> {
    DeserializeDriver::new(registry)
        .continue_on_error(continue_on_error)
        .deserialize(input)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::{TYPE_KEY, deserialize, serialize};
    use crate::error::{ReconstructError, SerializeError};
    use crate::registry::TypeRegistry;
    use crate::rich::{ConfigSerializable, Fields};
    use crate::value::{Atom, AtomSet, PlainMap, PlainValue, Section, Value, ValueMap};

    #[derive(Clone, Debug, PartialEq)]
    struct Inner {
        name: String,
    }

    impl ConfigSerializable for Inner {
        const ALIAS: &'static str = "Inner";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Ok(Fields::new().with("name", self.name.as_str()))
        }

        fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
            Ok(Inner {
                name: fields.get("name")?,
            })
        }
    }

    // Fails unless its child was rebuilt into an `Inner` first.
    #[derive(Clone, Debug, PartialEq)]
    struct Outer {
        inner: Inner,
        rating: f32,
    }

    impl ConfigSerializable for Outer {
        const ALIAS: &'static str = "Outer";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Ok(Fields::new()
                .with("inner", Value::object(self.inner.clone()))
                .with("rating", self.rating))
        }

        fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
            Ok(Outer {
                inner: fields.get_object("inner")?,
                rating: fields.get("rating")?,
            })
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Counted;

    impl ConfigSerializable for Counted {
        const ALIAS: &'static str = "Counted";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Ok(Fields::new())
        }

        fn from_fields(_: &Fields) -> Result<Self, ReconstructError> {
            Ok(Counted)
        }
    }

    // Only rebuilt by `fail_fast_skips_remaining_siblings`.
    static SENTINEL_BUILDS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Clone, Debug, PartialEq)]
    struct Sentinel;

    impl ConfigSerializable for Sentinel {
        const ALIAS: &'static str = "Sentinel";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Ok(Fields::new())
        }

        fn from_fields(_: &Fields) -> Result<Self, ReconstructError> {
            SENTINEL_BUILDS.fetch_add(1, Ordering::SeqCst);
            Ok(Sentinel)
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Inner>();
        registry.register::<Outer>();
        registry.register::<Counted>();
        registry.register::<Sentinel>();
        registry
    }

    fn tagged(alias: &str) -> PlainValue {
        [(TYPE_KEY, PlainValue::from(alias))].into_iter().collect()
    }

    fn round_trip(value: &Value) -> Value {
        let plain = serialize(value);
        let mut wrapper = PlainMap::default();
        wrapper.insert("v".into(), plain);
        let output = deserialize(wrapper, &registry(), false).unwrap();
        output.as_map().unwrap()["v"].clone()
    }

    #[test]
    fn round_trip_values() {
        let set: AtomSet = [Atom::from(3), Atom::from("x")].into_iter().collect();
        let mut map = ValueMap::default();
        map.insert("k2".into(), Value::from(2.5));
        map.insert("k1".into(), Value::from(vec![Value::from(true), Value::Null]));

        let outer = Outer {
            inner: Inner { name: "gravel".into() },
            rating: 2.34,
        };

        for value in [
            Value::from(1),
            Value::from("text"),
            Value::from(vec![Value::from(1), Value::from("two")]),
            Value::Map(map),
            Value::Set(set),
            Value::object(outer),
        ] {
            assert_eq!(round_trip(&value), value);
        }
    }

    #[test]
    fn array_and_section_come_back_as_list_and_map() {
        let array = Value::Array(vec![Value::from(1)].into_boxed_slice());
        assert_eq!(round_trip(&array), Value::List(vec![Value::from(1)]));

        let mut section = Section::new();
        section.set("a.b", 1);
        let back = round_trip(&Value::Section(section.clone()));
        assert_eq!(back, Value::Map(section.into_map()));
    }

    #[test]
    fn bottom_up_reconstruction() {
        let text = r#"{
            "item": {
                "__type__": "Outer",
                "inner": {"__type__": "Inner", "name": "stone"},
                "rating": 1.5
            }
        }"#;
        let input = serde_json::from_str::<PlainValue>(text).unwrap().into_map().unwrap();
        let output = deserialize(input, &registry(), false).unwrap();

        let outer = output.as_map().unwrap()["item"].downcast_ref::<Outer>().cloned();
        assert_eq!(
            outer,
            Some(Outer {
                inner: Inner { name: "stone".into() },
                rating: 1.5,
            })
        );
    }

    #[test]
    fn fail_fast_skips_remaining_siblings() {
        let mut input = PlainMap::default();
        input.insert("bad".into(), tagged("NoSuchType"));
        input.insert("good".into(), tagged("Sentinel"));

        let err = deserialize(input, &registry(), false).unwrap_err();
        assert_eq!(err.cause(), &ReconstructError::UnknownAlias("NoSuchType".into()));
        assert_eq!(SENTINEL_BUILDS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn best_effort_continues_with_siblings() {
        let mut input = PlainMap::default();
        input.insert("bad".into(), tagged("NoSuchType"));
        input.insert("good".into(), tagged("Counted"));

        let output = deserialize(input, &registry(), true).unwrap();
        let map = output.as_map().unwrap();
        assert_eq!(map["bad"], Value::Null);
        assert!(map["good"].downcast_ref::<Counted>().is_some());
    }

    #[test]
    fn invalid_field_aborts_with_cause() {
        let text = r#"{"x": {"__type__": "Inner", "name": 5}}"#;
        let input = serde_json::from_str::<PlainValue>(text).unwrap().into_map().unwrap();
        let err = deserialize(input, &registry(), false).unwrap_err();
        assert_eq!(err.to_string(), "invalid field `name`: expected string, found integer");
    }

    #[test]
    fn failed_child_fails_parent_in_best_effort() {
        // The child becomes null, so the parent cannot find its `Inner`.
        let text = r#"{"x": {
            "__type__": "Outer",
            "inner": {"__type__": "Inner"},
            "rating": 1.0
        }}"#;
        let input = serde_json::from_str::<PlainValue>(text).unwrap().into_map().unwrap();
        let output = deserialize(input, &registry(), true).unwrap();
        assert_eq!(output.as_map().unwrap()["x"], Value::Null);
    }

    #[test]
    fn top_level_tagged_map() {
        let input = tagged("Counted").into_map().unwrap();
        let output = deserialize(input, &registry(), false).unwrap();
        assert!(output.downcast_ref::<Counted>().is_some());
    }
}
