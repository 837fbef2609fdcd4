//! Insertion-ordered containers, re-exports *indexmap*.
//!
//! Configuration trees must keep the order in which keys were written, so the
//! maps and sets here iterate in insertion order. Both use [`FixedHashState`].
//!
//! Since the hash state is not `RandomState`, construct them with
//! `Default::default()` or the `*_and_hasher` constructors.
//!
//! # Examples
//!
//! ```
//! use vc_utils::collections::IndexMap;
//!
//! let mut map: IndexMap<&str, i32> = IndexMap::default();
//! map.insert("c", 3);
//! map.insert("a", 1);
//! map.insert("b", 2);
//!
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, ["c", "a", "b"]);
//! ```

use crate::hash::FixedHashState;

// -----------------------------------------------------------------------------
// Re-export crates

pub use indexmap;

// -----------------------------------------------------------------------------
// Aliases

/// An insertion-ordered map.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, FixedHashState>;

/// An insertion-ordered set.
pub type IndexSet<T> = indexmap::IndexSet<T, FixedHashState>;

/// Creates an empty [`IndexMap`] with at least the given capacity.
#[inline]
pub fn index_map_with_capacity<K, V>(capacity: usize) -> IndexMap<K, V> {
    IndexMap::with_capacity_and_hasher(capacity, FixedHashState)
}

// -----------------------------------------------------------------------------
// Tests
