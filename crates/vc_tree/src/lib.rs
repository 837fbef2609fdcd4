#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod registry;
pub mod rich;
pub mod serde;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::{ReconstructError, SerializationFailure, SerializeError};
pub use registry::{TypeRegistry, TypeRegistryArc};
pub use rich::{ConfigSerializable, Fields, RichValue, SerializableSet};
pub use serde::{DeserializeDriver, EntryFailurePolicy, SerializeDriver, TYPE_KEY};
pub use serde::{deserialize, serialize};
pub use value::{Atom, AtomSet, FromValue, PlainMap, PlainValue, Section, Value, ValueMap};
