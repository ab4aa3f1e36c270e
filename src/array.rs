//! Ordered sequence type for array nodes.

use crate::Node;

/// An ordered, index-addressable sequence of nodes.
///
/// Like [`JsonObject`](crate::JsonObject), unassigned placeholders left by
/// mutable indexing are skipped by [`len`](JsonArray::len) and the iterators.
///
/// # Examples
///
/// ```rust
/// use json_node::{JsonArray, Node};
///
/// let mut tags = JsonArray::new();
/// tags.push(Node::from("x"));
/// tags.push(Node::from("y"));
///
/// assert_eq!(tags.count(), 2);
/// assert_eq!(tags.to_string_list(), vec!["x", "y"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonArray(Vec<Node>);

impl JsonArray {
    #[must_use]
    pub fn new() -> Self {
        JsonArray(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonArray(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, node: Node) {
        self.trim();
        self.0.push(node);
    }

    /// Element at logical `index`, counting only assigned elements.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.iter().nth(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.iter_mut().nth(index)
    }

    /// Removes and returns the element at `index`, or `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        let raw = self.raw_index(index)?;
        Some(self.0.remove(raw))
    }

    /// Removes the first element equal to `node`.
    pub fn remove_value(&mut self, node: &Node) -> Option<Node> {
        let index = self.0.iter().position(|n| !n.is_lazy() && n == node)?;
        Some(self.0.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Alias of [`len`](JsonArray::len).
    #[must_use]
    pub fn count(&self) -> usize {
        self.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.0.iter().filter(|n| !n.is_lazy())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.0.iter_mut().filter(|n| !n.is_lazy())
    }

    /// String projection of every element.
    #[must_use]
    pub fn to_string_list(&self) -> Vec<String> {
        self.iter().map(|n| n.value().into_owned()).collect()
    }

    /// Appends a placeholder and returns it for write-through assignment.
    pub(crate) fn push_lazy(&mut self) -> &mut Node {
        self.trim();
        self.0.push(Node::Lazy);
        let last = self.0.len() - 1;
        &mut self.0[last]
    }

    /// Existing slot at `index`, or a fresh placeholder appended at the end.
    pub(crate) fn slot(&mut self, index: usize) -> &mut Node {
        match self.raw_index(index) {
            Some(raw) => &mut self.0[raw],
            None => self.push_lazy(),
        }
    }

    /// Storage position of the element at logical `index`.
    fn raw_index(&self, index: usize) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_lazy())
            .nth(index)
            .map(|(raw, _)| raw)
    }

    /// Drops unassigned placeholders left at the end by earlier slots.
    fn trim(&mut self) {
        while self.0.last().is_some_and(Node::is_lazy) {
            self.0.pop();
        }
    }

    /// Moves the children out, leaving the array empty.
    pub(crate) fn take_nodes(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.0)
    }
}

impl Drop for JsonArray {
    fn drop(&mut self) {
        if self.0.iter().any(Node::is_container) {
            crate::value::release(self.take_nodes());
        }
    }
}

impl PartialEq for JsonArray {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl From<Vec<Node>> for JsonArray {
    fn from(nodes: Vec<Node>) -> Self {
        JsonArray(nodes)
    }
}

impl From<JsonArray> for Vec<Node> {
    fn from(mut array: JsonArray) -> Self {
        let mut nodes = array.take_nodes();
        nodes.retain(|n| !n.is_lazy());
        nodes
    }
}

impl FromIterator<Node> for JsonArray {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        JsonArray(iter.into_iter().collect())
    }
}

impl IntoIterator for JsonArray {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        Vec::from(self).into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a Node;
    type IntoIter = Box<dyn Iterator<Item = &'a Node> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
