// SPDX-License-Identifier: MIT OR Apache-2.0
//! Insertion-ordered string-keyed dictionary of values.
//!
//! Used for metadata and as the field container of schema objects.
//! Iteration order equals insertion order; replacing the value of an
//! existing key keeps the key where it was, and removing a key leaves the
//! remaining keys in their relative order.

use crate::error::{InterchangeError, Result};
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// Ordered mapping from unique string keys to values
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: IndexMap<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dictionary with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a mutable value stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Get the value stored under `key`, failing with `NotFound`
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.entries.get(key).ok_or_else(|| InterchangeError::NotFound {
            key: key.to_string(),
        })
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, returning the previous value for `key`.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Replace the value of an existing key, returning the old value
    pub fn replace(&mut self, key: &str, value: impl Into<Value>) -> Result<Value> {
        match self.entries.get_mut(key) {
            Some(slot) => Ok(std::mem::replace(slot, value.into())),
            None => Err(InterchangeError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Remove `key`, returning whether it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Remove `key` and return its value
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.keys().map(String::as_str)
    }

    /// Values in insertion order
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Value> + ExactSizeIterator {
        self.entries.values()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Value)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entry at a position in insertion order
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.entries.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    /// Bidirectional cursor positioned before the first entry
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            dictionary: self,
            position: 0,
        }
    }

    /// Bidirectional cursor positioned after the last entry
    pub fn cursor_at_end(&self) -> Cursor<'_> {
        Cursor {
            dictionary: self,
            position: self.len(),
        }
    }

    /// Deep structural comparison; key order is ignored
    pub fn is_equivalent_to(&self, other: &Dictionary) -> bool {
        crate::equivalence::Equivalence::new().dictionaries(self, other)
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent_to(other)
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::DebugRenderer::new(f).dictionary(self)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        for (key, value) in iter {
            dictionary.insert(key, value);
        }
        dictionary
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Dictionary {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Cursor walking a [`Dictionary`] in either direction.
///
/// The cursor sits between entries: [`Iterator::next`] yields the entry
/// after it and advances, [`Cursor::previous`] yields the entry before it
/// and steps back. It borrows the dictionary, so the dictionary cannot be
/// structurally modified while a cursor is alive.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    dictionary: &'a Dictionary,
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Whether an entry follows the cursor
    pub fn has_next(&self) -> bool {
        self.position < self.dictionary.len()
    }

    /// Whether an entry precedes the cursor
    pub fn has_previous(&self) -> bool {
        self.position > 0
    }

    /// Step back and return the entry before the cursor
    pub fn previous(&mut self) -> Option<(&'a str, &'a Value)> {
        if !self.has_previous() {
            return None;
        }
        self.position -= 1;
        self.dictionary.get_index(self.position)
    }

    /// Number of entries before the cursor
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.dictionary.get_index(self.position)?;
        self.position += 1;
        Some(entry)
    }
}
