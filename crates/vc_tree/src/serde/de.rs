use vc_utils::collections::index_map_with_capacity;

use crate::error::SerializationFailure;
use crate::registry::TypeRegistry;
use crate::rich::Fields;
use crate::serde::is_tagged;
use crate::value::{PlainMap, PlainValue, Value};

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Turns a [`PlainValue`] tree back into a [`Value`] tree.
///
/// # Deserialization Rules
///
/// Reconstruction is bottom-up: the entries of a map are resolved first, and
/// only then is the resolved map checked for [`TYPE_KEY`](crate::TYPE_KEY).
/// A rich value's [`from_fields`](crate::ConfigSerializable::from_fields)
/// therefore sees its nested rich values already rebuilt.
///
/// - A map without the tag becomes [`Value::Map`], keys in input order.
/// - A tagged map is rebuilt through [`TypeRegistry::reconstruct`].
/// - Lists are resolved element by element, in order. A list is never a
///   rich value itself.
/// - Scalars are copied.
///
/// When a tagged map cannot be rebuilt the map is logged with `log::error!`.
/// By default the whole call then fails with [`SerializationFailure`], and the
/// maps not visited yet are never rebuilt. With
/// [`continue_on_error`](Self::continue_on_error) the node becomes
/// [`Value::Null`] and its siblings are still processed.
///
/// # Examples
///
/// ```
/// use vc_tree::{DeserializeDriver, PlainValue, TypeRegistry, Value};
///
/// let input: PlainValue = serde_json::from_str(r#"{
///     "tags": {"__type__": "Set", "values": ["a", "b"]},
///     "broken": {"__type__": "Unknown"}
/// }"#).unwrap();
/// let input = input.into_map().unwrap();
///
/// let registry = TypeRegistry::new();
///
/// let strict = DeserializeDriver::new(&registry);
/// assert!(strict.deserialize(input.clone()).is_err());
///
/// let lenient = DeserializeDriver::new(&registry).continue_on_error(true);
/// let output = lenient.deserialize(input).unwrap();
/// let output = output.as_map().unwrap();
/// assert_eq!(output["tags"].as_set().map(|set| set.len()), Some(2));
/// assert_eq!(output["broken"], Value::Null);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DeserializeDriver<'a> {
    registry: &'a TypeRegistry,
    continue_on_error: bool,
}

impl<'a> DeserializeDriver<'a> {
    /// Creates a fail-fast driver looking types up in `registry`.
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            continue_on_error: false,
        }
    }

    /// Whether a tagged map that cannot be rebuilt becomes [`Value::Null`]
    /// instead of failing the whole call.
    #[inline]
    pub const fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    #[inline]
    pub const fn is_continue_on_error(&self) -> bool {
        self.continue_on_error
    }

    #[inline]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Deserializes a map.
    ///
    /// The result is a [`Value::Map`], a rebuilt rich value if the map itself
    /// is tagged, or [`Value::Null`] if that rebuild failed in lenient mode.
    pub fn deserialize(&self, input: PlainMap) -> Result<Value, SerializationFailure> {
        self.visit_map(input)
    }

    /// Deserializes any node.
    pub fn deserialize_value(&self, input: PlainValue) -> Result<Value, SerializationFailure> {
        match input {
            PlainValue::Map(map) => self.visit_map(map),
            PlainValue::List(list) => self.visit_list(list),
            PlainValue::Null => Ok(Value::Null),
            PlainValue::Bool(v) => Ok(Value::Bool(v)),
            PlainValue::Int(v) => Ok(Value::Int(v)),
            PlainValue::Float(v) => Ok(Value::Float(v)),
            PlainValue::String(v) => Ok(Value::String(v)),
        }
    }

    fn visit_map(&self, input: PlainMap) -> Result<Value, SerializationFailure> {
        let mut output = index_map_with_capacity(input.len());
        for (key, value) in input {
            output.insert(key, self.deserialize_value(value)?);
        }

        if !is_tagged(&output) {
            return Ok(Value::Map(output));
        }

        let fields = Fields::from(output);
        match self.registry.reconstruct(&fields) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::error!(
                    "could not deserialize the following object ({err}): {:?}",
                    fields.as_map()
                );
                if self.continue_on_error {
                    Ok(Value::Null)
                } else {
                    Err(SerializationFailure::new(err))
                }
            }
        }
    }

    fn visit_list(&self, input: Vec<PlainValue>) -> Result<Value, SerializationFailure> {
        let mut output = Vec::with_capacity(input.len());
        for element in input {
            output.push(self.deserialize_value(element)?);
        }
        Ok(Value::List(output))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::DeserializeDriver;
    use crate::error::ReconstructError;
    use crate::registry::TypeRegistry;
    use crate::serde::TYPE_KEY;
    use crate::value::{PlainMap, PlainValue, Value};

    fn parse(text: &str) -> PlainMap {
        serde_json::from_str::<PlainValue>(text)
            .unwrap()
            .into_map()
            .unwrap()
    }

    #[test]
    fn untagged_maps_keep_order() {
        let registry = TypeRegistry::empty();
        let value = DeserializeDriver::new(&registry)
            .deserialize(parse(r#"{"z": 1, "a": {"y": [true, "x"], "b": null}}"#))
            .unwrap();

        let map = value.as_map().unwrap();
        assert!(map.keys().eq(["z", "a"]));
        let inner = map["a"].as_map().unwrap();
        assert!(inner.keys().eq(["y", "b"]));
        assert_eq!(
            inner["y"],
            Value::List(vec![Value::Bool(true), Value::from("x")])
        );
    }

    #[test]
    fn tagged_unknown_alias_is_never_plain() {
        let registry = TypeRegistry::empty();
        let input = parse(r#"{"__type__": "Missing", "x": 1}"#);

        let err = DeserializeDriver::new(&registry)
            .deserialize(input.clone())
            .unwrap_err();
        assert_eq!(err.cause(), &ReconstructError::UnknownAlias("Missing".into()));
        assert_eq!(err.to_string(), "specified type does not exist: `Missing`");

        let value = DeserializeDriver::new(&registry)
            .continue_on_error(true)
            .deserialize(input)
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn non_string_tag() {
        let registry = TypeRegistry::new();
        let err = DeserializeDriver::new(&registry)
            .deserialize(parse(r#"{"__type__": 7}"#))
            .unwrap_err();
        assert_eq!(err.cause(), &ReconstructError::InvalidTypeKey("integer"));
    }

    #[test]
    fn lists_are_resolved_in_order() {
        let registry = TypeRegistry::new();
        let value = DeserializeDriver::new(&registry)
            .deserialize_value(
                serde_json::from_str(r#"[[{"__type__": "Set", "values": [1]}], 2]"#).unwrap(),
            )
            .unwrap();

        let list = value.as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].as_list().unwrap()[0].as_set().is_some());
        assert_eq!(list[1], Value::Int(2));
    }

    #[test]
    fn lenient_nulls_inside_lists() {
        let registry = TypeRegistry::new();
        let mut input = PlainMap::default();
        input.insert(
            "items".into(),
            PlainValue::List(vec![
                [(TYPE_KEY, PlainValue::from("Nope"))].into_iter().collect(),
                PlainValue::Int(5),
            ]),
        );

        let value = DeserializeDriver::new(&registry)
            .continue_on_error(true)
            .deserialize(input)
            .unwrap();
        assert_eq!(
            value.as_map().unwrap()["items"],
            Value::List(vec![Value::Null, Value::Int(5)])
        );
    }

    #[test]
    fn scalars_are_copied() {
        let registry = TypeRegistry::empty();
        let driver = DeserializeDriver::new(&registry);
        for (plain, value) in [
            (PlainValue::Null, Value::Null),
            (PlainValue::Bool(true), Value::Bool(true)),
            (PlainValue::Int(-9), Value::Int(-9)),
            (PlainValue::Float(1.5), Value::Float(1.5)),
            (PlainValue::from("s"), Value::from("s")),
        ] {
            assert_eq!(driver.deserialize_value(plain).unwrap(), value);
        }
        assert!(!driver.is_continue_on_error());
    }
}
