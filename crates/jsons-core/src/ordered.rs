//! `OrderedMap`: a JSON object that remembers the order its keys were last
//! introduced in.
//!
//! Backed by an [`IndexMap`], which keeps insertion order and hashed lookup in
//! one structure. Mutation goes through [`OrderedMap::set`],
//! [`OrderedMap::remove`] and [`OrderedMap::retain`], all of which preserve the
//! relative order of the surviving keys.

use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::types::Value;

#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    entries: IndexMap<String, Value>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Set `key` to `value`.
    ///
    /// A new key is appended to the end of the key order; an existing key keeps
    /// its position and has its value overwritten. Returns the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Remove `key`, closing the gap it leaves in the key order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Keep only the entries for which `keep` returns `true`, in one pass.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &mut Value) -> bool,
    {
        self.entries.retain(|key, value| keep(key.as_str(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in serialization order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in serialization order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Mutable access to every value, in key order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.values_mut()
    }

    /// Sort keys ascending, recursively through nested objects (including
    /// objects inside arrays).
    pub fn sort_keys(&mut self) {
        self.sort_keys_by(&|a: &str, b: &str| a.cmp(b));
    }

    /// Like [`OrderedMap::sort_keys`] with a caller-supplied key comparator.
    pub fn sort_keys_by(&mut self, cmp: &dyn Fn(&str, &str) -> Ordering) {
        self.entries.sort_by(|a, _, b, _| cmp(a, b));
        for value in self.entries.values_mut() {
            sort_value_keys(value, cmp);
        }
    }
}

fn sort_value_keys(value: &mut Value, cmp: &dyn Fn(&str, &str) -> Ordering) {
    match value {
        Value::Object(map) => map.sort_keys_by(cmp),
        Value::Array(items) => {
            for item in items {
                sort_value_keys(item, cmp);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Two maps are equal only if they hold the same entries in the same order.
impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Borrowing iterator over an [`OrderedMap`] in key order.
pub struct Iter<'a>(indexmap::map::Iter<'a, String, Value>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderedMap {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over an [`OrderedMap`] in key order.
pub struct IntoIter(indexmap::map::IntoIter<String, Value>);

impl Iterator for IntoIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {}

impl IntoIterator for OrderedMap {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.entries.into_iter())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = OrderedMap::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

/// Build from an unordered map. The resulting key order is the hash map's
/// iteration order, i.e. unspecified.
impl From<HashMap<String, Value>> for OrderedMap {
    fn from(values: HashMap<String, Value>) -> Self {
        values.into_iter().collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for OrderedMap {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl From<OrderedMap> for serde_json::Map<String, serde_json::Value> {
    fn from(map: OrderedMap) -> Self {
        map.into_iter().map(|(k, v)| (k, v.into())).collect()
    }
}
