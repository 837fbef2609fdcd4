//! The two trees the transform moves between.
//!
//! - [`Value`]: the in-memory tree. Besides scalars and containers it may hold
//!   native arrays, sets, live [`Section`]s and rich objects.
//! - [`PlainValue`]: the persisted tree, only scalars, lists and string-keyed maps.
//!   A map holding [`TYPE_KEY`](crate::TYPE_KEY) stands for a rich object.
//!
//! [`serialize`](crate::serialize) turns a `Value` into a `PlainValue`,
//! [`deserialize`](crate::deserialize) goes the other way.

// -----------------------------------------------------------------------------
// Modules

mod atom;
mod from_value;
mod plain;
mod section;

// -----------------------------------------------------------------------------
// Exports

pub use atom::{Atom, AtomSet};
pub use from_value::FromValue;
pub use plain::{PlainMap, PlainValue};
pub use section::{DEFAULT_SEPARATOR, Section};

use core::any::Any;

use vc_utils::collections::IndexMap;

use crate::rich::{ConfigSerializable, RichValue};

// -----------------------------------------------------------------------------
// Value

/// Insertion-ordered mapping of a [`Value`] tree.
pub type ValueMap = IndexMap<String, Value>;

/// A node of an in-memory configuration tree.
///
/// The variants are a closed set, so the serializer dispatches with a single
/// `match` in a fixed precedence order.
///
/// # Examples
///
/// ```
/// use vc_tree::{Value, ValueMap};
///
/// let mut map = ValueMap::default();
/// map.insert("name".to_owned(), Value::from("spawn"));
/// map.insert("radius".to_owned(), Value::from(16));
///
/// let value = Value::Map(map);
/// assert_eq!(value.kind_name(), "map");
/// assert_eq!(value.as_map().unwrap()["radius"].as_i64(), Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// Absent value, also the placeholder for a dropped rich object.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A fixed native array, serialized as a list.
    Array(Box<[Value]>),
    List(Vec<Value>),
    /// A native set, serialized through [`SerializableSet`](crate::SerializableSet).
    Set(AtomSet),
    Map(ValueMap),
    /// A nested configuration section; only its direct entries are visited per level.
    Section(Section),
    /// A rich object exporting its own fields.
    Object(Box<dyn RichValue>),
}

impl Value {
    /// Boxes a rich object.
    #[inline]
    pub fn object<T: ConfigSerializable>(value: T) -> Self {
        Self::Object(Box::new(value))
    }

    /// A short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Section(_) => "section",
            Self::Object(_) => "object",
        }
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

    /// Returns floats, and integers widened to `f64`.
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

    /// Returns the elements of a list or an array.
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_set(&self) -> Option<&AtomSet> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Self::Section(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&dyn RichValue> {
        match self {
            Self::Object(v) => Some(&**v),
            _ => None,
        }
    }

    /// Returns the rich object if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(|obj| obj.downcast_ref::<T>())
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $expr:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from($v: $ty) -> Self {
                    $expr
                }
            }
        )*
    };
}

impl_from! {
    bool => |v| Value::Bool(v),
    i64 => |v| Value::Int(v),
    i32 => |v| Value::Int(v as i64),
    u32 => |v| Value::Int(v as i64),
    f64 => |v| Value::Float(v),
    f32 => |v| Value::Float(v as f64),
    String => |v| Value::String(v),
    &str => |v| Value::String(v.to_owned()),
    Vec<Value> => |v| Value::List(v),
    Box<[Value]> => |v| Value::Array(v),
    AtomSet => |v| Value::Set(v),
    ValueMap => |v| Value::Map(v),
    Section => |v| Value::Section(v),
    Atom => |v| v.into_value(),
    Box<dyn RichValue> => |v| Value::Object(v),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}

// -----------------------------------------------------------------------------
// Tests
