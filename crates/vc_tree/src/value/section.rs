use core::any::Any;

use vc_utils::collections::index_map_with_capacity;

use super::{Value, ValueMap};

/// The path separator used unless another one is configured.
pub const DEFAULT_SEPARATOR: char = '.';

// -----------------------------------------------------------------------------
// Section

/// A mutable, path-addressed level of a configuration tree.
///
/// A path such as `"world.spawn.x"` walks nested sections split at the
/// separator. Nested sections created through a section inherit its separator.
///
/// The serializer only reads [`values(false)`](Section::values), the direct
/// entries of one level, and recurses into nested sections on its own.
///
/// # Examples
///
/// ```
/// use vc_tree::{Section, Value};
///
/// let mut root = Section::new();
/// root.set("world.spawn.x", 86.5);
/// root.set("world.name", "overworld");
///
/// assert_eq!(root.get_f64("world.spawn.x"), Some(86.5));
/// assert!(root.section("world.spawn").is_some());
/// assert_eq!(root.keys(false), ["world"]);
/// assert_eq!(root.keys(true), ["world", "world.spawn", "world.spawn.x", "world.name"]);
///
/// // Setting null removes the entry.
/// root.set("world.name", Value::Null);
/// assert!(!root.contains("world.name"));
/// ```
#[derive(Clone, Debug)]
pub struct Section {
    entries: ValueMap,
    separator: char,
}

impl PartialEq for Section {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Default for Section {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Section {
    /// Creates an empty section using [`DEFAULT_SEPARATOR`].
    #[inline]
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    /// Creates an empty section using `separator` between path segments.
    #[inline]
    pub fn with_separator(separator: char) -> Self {
        Self {
            entries: ValueMap::default(),
            separator,
        }
    }

    /// Builds a section from a map, turning nested maps into sections.
    ///
    /// Maps inside lists are kept as maps. Keys are taken verbatim, they are
    /// not split at the separator.
    pub fn from_map(map: ValueMap, separator: char) -> Self {
        let mut entries = index_map_with_capacity(map.len());
        for (key, value) in map {
            let value = match value {
                Value::Map(inner) => Value::Section(Self::from_map(inner, separator)),
                other => other,
            };
            entries.insert(key, value);
        }
        Self { entries, separator }
    }

    /// Converts the section back into a map, nested sections included.
    pub fn into_map(self) -> ValueMap {
        self.entries
            .into_iter()
            .map(|(key, value)| match value {
                Value::Section(inner) => (key, Value::Map(inner.into_map())),
                other => (key, other),
            })
            .collect()
    }

    #[inline]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Number of direct entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Direct entries of this level, in insertion order.
    #[inline]
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Direct entries as a map reference.
    #[inline]
    pub fn as_map(&self) -> &ValueMap {
        &self.entries
    }

    /// Collects entries keyed by path.
    ///
    /// With `deep == false` this is the direct entries of this level only.
    /// With `deep == true` nested sections are listed, followed by their own
    /// entries under full paths.
    pub fn values(&self, deep: bool) -> ValueMap {
        let mut output: ValueMap = index_map_with_capacity(self.entries.len());
        self.collect(&mut output, "", deep, &mut |out, path, value| {
            out.insert(path, value.clone());
        });
        output
    }

    /// Collects keys, see [`values`](Self::values) for `deep`.
    pub fn keys(&self, deep: bool) -> Vec<String> {
        let mut output: Vec<String> = Vec::with_capacity(self.entries.len());
        self.collect(&mut output, "", deep, &mut |out, path, _| out.push(path));
        output
    }

    fn collect<O>(
        &self,
        output: &mut O,
        prefix: &str,
        deep: bool,
        visit: &mut impl FnMut(&mut O, String, &Value),
    ) {
        for (key, value) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{}{key}", self.separator)
            };
            match value {
                Value::Section(child) if deep => {
                    visit(output, path.clone(), value);
                    child.collect(output, &path, deep, visit);
                }
                _ => visit(output, path, value),
            }
        }
    }

    /// Returns the value at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        match path.split_once(self.separator) {
            None => self.entries.get(path),
            Some((head, rest)) => match self.entries.get(head)? {
                Value::Section(child) => child.get(rest),
                _ => None,
            },
        }
    }

    /// Returns the value at `path` mutably.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        match path.split_once(self.separator) {
            None => self.entries.get_mut(path),
            Some((head, rest)) => match self.entries.get_mut(head)? {
                Value::Section(child) => child.get_mut(rest),
                _ => None,
            },
        }
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Stores `value` at `path`.
    ///
    /// Missing intermediate sections are created, and an intermediate entry
    /// that is not a section is replaced by one. Storing [`Value::Null`]
    /// removes the entry instead.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        match path.split_once(self.separator) {
            None if value.is_null() => {
                self.entries.shift_remove(path);
            }
            None => {
                self.entries.insert(path.to_owned(), value);
            }
            Some((head, rest)) if value.is_null() => {
                if let Some(Value::Section(child)) = self.entries.get_mut(head) {
                    child.set(rest, value);
                }
            }
            Some((head, rest)) => self.child_mut(head).set(rest, value),
        }
    }

    /// Removes and returns the value at `path`, keeping the order of the rest.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        match path.split_once(self.separator) {
            None => self.entries.shift_remove(path),
            Some((head, rest)) => match self.entries.get_mut(head)? {
                Value::Section(child) => child.remove(rest),
                _ => None,
            },
        }
    }

    /// Creates an empty section at `path`, replacing whatever was there.
    pub fn create_section(&mut self, path: &str) -> &mut Section {
        match path.split_once(self.separator) {
            None => {
                let child = Section::with_separator(self.separator);
                self.entries.insert(path.to_owned(), Value::Section(child));
                match self.entries.get_mut(path) {
                    Some(Value::Section(child)) => child,
                    _ => unreachable!("section was just inserted"),
                }
            }
            Some((head, rest)) => self.child_mut(head).create_section(rest),
        }
    }

    /// Returns the section at `path`.
    #[inline]
    pub fn section(&self, path: &str) -> Option<&Section> {
        self.get(path).and_then(Value::as_section)
    }

    /// Returns the section at `path` mutably.
    #[inline]
    pub fn section_mut(&mut self, path: &str) -> Option<&mut Section> {
        self.get_mut(path).and_then(Value::as_section_mut)
    }

    // Direct child section under `key`, created or replacing a non-section.
    fn child_mut(&mut self, key: &str) -> &mut Section {
        let separator = self.separator;
        let slot = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Value::Section(Section::with_separator(separator)));
        if !matches!(slot, Value::Section(_)) {
            *slot = Value::Section(Section::with_separator(separator));
        }
        match slot {
            Value::Section(child) => child,
            _ => unreachable!("slot was just made a section"),
        }
    }

    #[inline]
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    #[inline]
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    #[inline]
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    #[inline]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    #[inline]
    pub fn get_list(&self, path: &str) -> Option<&[Value]> {
        self.get(path).and_then(Value::as_list)
    }

    /// Returns the rich object at `path` if it is a `T`.
    #[inline]
    pub fn get_object<T: Any>(&self, path: &str) -> Option<&T> {
        self.get(path).and_then(Value::downcast_ref::<T>)
    }
}

// -----------------------------------------------------------------------------
// Tests
