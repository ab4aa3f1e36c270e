//! Ordered map type for object nodes.
//!
//! [`JsonObject`] wraps an [`IndexMap`] so entries enumerate in insertion order.
//! Inserting an existing key overwrites the value in place, keeping the key's
//! original position.
//!
//! Mutable indexing on a [`Node`] may leave a [`Node::Lazy`] placeholder under a
//! key until a value is assigned through it. Placeholders are skipped by every
//! read method here, so an unassigned slot behaves as if it were absent.
//!
//! ## Examples
//!
//! ```rust
//! use json_node::{JsonObject, Node};
//!
//! let mut map = JsonObject::new();
//! map.insert("name", Node::from("Alice"));
//! map.insert("age", Node::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Node;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to nodes.
#[derive(Debug, Clone, Default)]
pub struct JsonObject(IndexMap<String, Node>);

impl JsonObject {
    /// Creates an empty `JsonObject`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::JsonObject;
    ///
    /// let map = JsonObject::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        JsonObject(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonObject(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place and
    /// the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::{JsonObject, Node};
    ///
    /// let mut map = JsonObject::new();
    /// assert!(map.insert("key", Node::from(42)).is_none());
    /// assert!(map.insert("key", Node::from(43)).is_some());
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        if self.0.get(&key).is_some_and(Node::is_lazy) {
            self.0.shift_remove(&key);
        }
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key).filter(|v| !v.is_lazy())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.0.get_mut(key).filter(|v| !v.is_lazy())
    }

    /// Returns the entry at `index` in enumeration order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&String, &Node)> {
        self.iter().nth(index)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.0.shift_remove(key).filter(|v| !v.is_lazy())
    }

    pub fn remove_index(&mut self, index: usize) -> Option<(String, Node)> {
        let raw = self.raw_index(index)?;
        self.0.shift_remove_index(raw)
    }

    /// Removes the first entry whose value equals `node`.
    pub fn remove_value(&mut self, node: &Node) -> Option<Node> {
        let index = self.0.values().position(|v| !v.is_lazy() && v == node)?;
        self.0.shift_remove_index(index).map(|(_, v)| v)
    }

    /// Returns the number of materialized entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::{JsonObject, Node};
    ///
    /// let mut map = JsonObject::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert("key", Node::from(42));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().filter(|v| !v.is_lazy()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Node> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> + '_ {
        self.0.iter().filter(|(_, v)| !v.is_lazy())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> + '_ {
        self.0.iter_mut().filter(|(_, v)| !v.is_lazy())
    }

    /// Mutable slot for `key`, holding a placeholder if the key was absent.
    ///
    /// A placeholder is always the last entry, so a value assigned through it
    /// lands after everything inserted before the assignment.
    pub(crate) fn slot(&mut self, key: &str) -> &mut Node {
        let last = self.0.len().saturating_sub(1);
        match self.0.get_index_of(key) {
            Some(raw) => {
                if raw != last && self.0[raw].is_lazy() {
                    self.0.move_index(raw, last);
                    return &mut self.0[last];
                }
                &mut self.0[raw]
            }
            None => self.0.entry(key.to_string()).or_insert(Node::Lazy),
        }
    }

    /// Mutable slot at logical `index`; past the end a placeholder is added
    /// under the index rendered as a key.
    pub(crate) fn slot_at(&mut self, index: usize) -> &mut Node {
        match self.raw_index(index) {
            Some(raw) => &mut self.0[raw],
            None => self.slot(&index.to_string()),
        }
    }

    /// Storage position of the entry at logical `index`.
    fn raw_index(&self, index: usize) -> Option<usize> {
        self.0
            .values()
            .enumerate()
            .filter(|(_, v)| !v.is_lazy())
            .nth(index)
            .map(|(raw, _)| raw)
    }

    /// Moves the values out, leaving the map empty.
    pub(crate) fn take_nodes(&mut self) -> indexmap::map::IntoValues<String, Node> {
        std::mem::take(&mut self.0).into_values()
    }

    /// Smallest unused numeric key, used when a keyless value is added.
    pub(crate) fn next_free_key(&self) -> String {
        (self.len()..)
            .map(|n| n.to_string())
            .find(|k| !self.contains_key(k))
            .unwrap_or_default()
    }
}

impl Drop for JsonObject {
    fn drop(&mut self) {
        if self.0.values().any(Node::is_container) {
            crate::value::release(self.take_nodes().collect());
        }
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl From<HashMap<String, Node>> for JsonObject {
    fn from(map: HashMap<String, Node>) -> Self {
        JsonObject(map.into_iter().collect())
    }
}

impl From<JsonObject> for HashMap<String, Node> {
    fn from(map: JsonObject) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for JsonObject {
    type Item = (String, Node);
    type IntoIter = std::iter::Filter<
        indexmap::map::IntoIter<String, Node>,
        fn(&(String, Node)) -> bool,
    >;

    fn into_iter(mut self) -> Self::IntoIter {
        fn materialized(entry: &(String, Node)) -> bool {
            !entry.1.is_lazy()
        }
        std::mem::take(&mut self.0)
            .into_iter()
            .filter(materialized as fn(&(String, Node)) -> bool)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for JsonObject {
    fn from_iter<T: IntoIterator<Item = (K, Node)>>(iter: T) -> Self {
        JsonObject(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = JsonObject::new();
        map.insert("a", Node::from(1));
        map.insert("b", Node::from(2));
        map.insert("a", Node::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a").map(Node::as_int), Some(3));
    }

    #[test]
    fn test_placeholders_are_invisible() {
        let mut map = JsonObject::new();
        map.insert("a", Node::from(1));
        let _ = map.slot("pending");

        assert_eq!(map.len(), 1);
        assert!(map.get("pending").is_none());
        assert!(!map.contains_key("pending"));
        assert_eq!(map.iter().count(), 1);

        let mut plain = JsonObject::new();
        plain.insert("a", Node::from(1));
        assert_eq!(map, plain);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut map: JsonObject = vec![("a", Node::from(1)), ("b", Node::from(2)), ("c", Node::from(3))]
            .into_iter()
            .collect();
        assert_eq!(map.remove("b").map(|n| n.as_int()), Some(2));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert!(map.remove("missing").is_none());
    }

    #[test]
    fn test_remove_value_and_index() {
        let mut map = JsonObject::new();
        map.insert("a", Node::from("x"));
        map.insert("b", Node::from("y"));

        assert!(map.remove_value(&Node::from("y")).is_some());
        assert_eq!(map.len(), 1);
        let (key, _) = map.remove_index(0).unwrap();
        assert_eq!(key, "a");
        assert!(map.is_empty());
    }

    #[test]
    fn test_next_free_key() {
        let mut map = JsonObject::new();
        map.insert("1", Node::from(true));
        assert_eq!(map.next_free_key(), "2");
    }

    #[test]
    fn test_positions_skip_unassigned_slots() {
        let mut map = JsonObject::new();
        let _ = map.slot("ghost");
        map.insert("a", Node::from(1));

        assert_eq!(map.get_index(0).map(|(k, _)| k.as_str()), Some("a"));
        assert_eq!(map.remove_index(0).map(|(k, _)| k), Some("a".to_string()));
        assert!(map.remove_index(0).is_none());
    }

    #[test]
    fn test_late_assignment_through_slot_appends() {
        let mut map = JsonObject::new();
        let _ = map.slot("late");
        map.insert("a", Node::from(1));
        *map.slot("late") = Node::from(2);

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "late"]);
        assert_eq!(map.get_index(1).map(|(_, v)| v.as_int()), Some(2));
    }

    #[test]
    fn test_insert_over_placeholder_appends() {
        let mut map = JsonObject::new();
        let _ = map.slot("k");
        map.insert("a", Node::from(1));
        assert!(map.insert("k", Node::from(2)).is_none());

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "k"]);
    }
}
