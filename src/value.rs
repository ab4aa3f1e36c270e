//! Dynamic node representation.
//!
//! This module provides the [`Node`] enum, the single tree type produced by the
//! parser, by [`from_object`](crate::from_object) and by the
//! [`json_node!`](crate::json_node) macro.
//!
//! ## Core Types
//!
//! - [`Node`]: a scalar leaf, an array, an object or an unassigned placeholder
//! - [`Scalar`]: a string-backed leaf with lenient typed views
//!
//! ## Usage Patterns
//!
//! ### Reading
//!
//! Reads never panic. A missing key or index yields a shared placeholder whose
//! typed views are zero-equivalents:
//!
//! ```rust
//! use json_node::parse;
//!
//! let node = parse(r#"{"n":"abc","list":[1,2]}"#).unwrap();
//! assert_eq!(node["n"].as_int(), 0);
//! assert!(node["n"].as_bool());
//! assert_eq!(node["list"][1].as_int(), 2);
//! assert!(node["missing"]["deeper"].is_null());
//! ```
//!
//! ### Writing through missing paths
//!
//! ```rust
//! use json_node::{Kind, Node};
//!
//! let mut root = Node::object();
//! root["x"]["y"] = Node::from(5);
//! root["flags"][0].set_bool(true);
//!
//! assert_eq!(root["x"]["y"].as_int(), 5);
//! assert_eq!(root["x"].kind(), Kind::Object);
//! assert_eq!(root.to_compact_string(), r#"{"x":{"y":5},"flags":[true]}"#);
//! ```

use crate::coerce::{self, Kind};
use crate::{JsonArray, JsonObject};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use std::sync::OnceLock;

static LAZY: Node = Node::Lazy;

/// A dynamically-typed JSON tree node.
///
/// # Examples
///
/// ```rust
/// use json_node::{Kind, Node};
///
/// let text = Node::from("hello");
/// let number = Node::from(42);
/// let list = Node::from(vec![Node::from(1), Node::from(2)]);
///
/// assert_eq!(text.kind(), Kind::String);
/// assert_eq!(number.kind(), Kind::Integer);
/// assert_eq!(list.count(), 2);
/// assert!(Node::default().is_lazy());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Node {
    Scalar(Scalar),
    Array(JsonArray),
    Object(JsonObject),
    /// Unassigned slot. Never rendered, never enumerated.
    #[default]
    Lazy,
}

/// A leaf holding one string-backed value.
///
/// The inferred [`Kind`] is computed on first request and cached until the value
/// is written again. The `quoted` flag records whether the value came from a JSON
/// string; only the YAML renderer consults it.
#[derive(Clone)]
pub struct Scalar {
    value: String,
    quoted: bool,
    kind: OnceLock<Kind>,
}

impl Scalar {
    /// Creates an unquoted scalar, as if read from a bare token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::{Kind, Scalar};
    ///
    /// let raw = Scalar::new("3.5");
    /// assert_eq!(raw.kind(), Kind::Float);
    /// assert!(!raw.is_quoted());
    /// ```
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self::from_token(value.into(), false)
    }

    /// Creates a scalar that originated as a JSON string.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::from_token(value.into(), true)
    }

    #[must_use]
    pub fn null() -> Self {
        Self::new("null")
    }

    pub(crate) fn from_token(value: String, quoted: bool) -> Self {
        Scalar {
            value,
            quoted,
            kind: OnceLock::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        *self.kind.get_or_init(|| coerce::classify(&self.value))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        coerce::is_null_text(&self.value)
    }

    /// Replaces the value with string content.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.write(value.into(), true);
    }

    fn write(&mut self, value: String, quoted: bool) {
        self.value = value;
        self.quoted = quoted;
        self.kind = OnceLock::new();
    }

    #[must_use]
    pub fn as_int(&self) -> i32 {
        coerce::parse_int(&self.value)
    }

    #[must_use]
    pub fn as_long(&self) -> i64 {
        coerce::parse_long(&self.value)
    }

    #[must_use]
    pub fn as_float(&self) -> f32 {
        coerce::parse_float(&self.value)
    }

    #[must_use]
    pub fn as_double(&self) -> f64 {
        coerce::parse_double(&self.value)
    }

    #[must_use]
    pub fn as_bool(&self) -> bool {
        coerce::parse_bool(&self.value)
    }

    pub fn set_int(&mut self, value: i32) {
        self.write(value.to_string(), false);
    }

    pub fn set_long(&mut self, value: i64) {
        self.write(value.to_string(), false);
    }

    pub fn set_float(&mut self, value: f32) {
        self.write(value.to_string(), false);
    }

    pub fn set_double(&mut self, value: f64) {
        self.write(value.to_string(), false);
    }

    pub fn set_bool(&mut self, value: bool) {
        self.write(coerce::render_bool(value).to_string(), false);
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "{:?}", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

impl Node {
    /// A `null` leaf.
    #[must_use]
    pub fn null() -> Self {
        Node::Scalar(Scalar::null())
    }

    #[must_use]
    pub fn array() -> Self {
        Node::Array(JsonArray::new())
    }

    #[must_use]
    pub fn object() -> Self {
        Node::Object(JsonObject::new())
    }

    /// An unquoted leaf whose kind is inferred from `text`.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::new(text))
    }

    #[inline]
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        matches!(self, Node::Lazy)
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// Array or object.
    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Object(_))
    }

    /// Returns `true` for the placeholder, an empty value, or the literal `null`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::Node;
    ///
    /// assert!(Node::null().is_null());
    /// assert!(Node::from("").is_null());
    /// assert!(Node::default().is_null());
    /// assert!(!Node::object().is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Node::Scalar(s) => s.is_null(),
            Node::Lazy => true,
            Node::Array(_) | Node::Object(_) => false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Node::Scalar(s) => s.kind(),
            Node::Array(_) => Kind::Array,
            Node::Object(_) => Kind::Object,
            Node::Lazy => Kind::Null,
        }
    }

    /// String projection of the node.
    ///
    /// Scalars return their stored text, containers their compact JSON, and the
    /// placeholder an empty string.
    #[must_use]
    pub fn value(&self) -> Cow<'_, str> {
        match self {
            Node::Scalar(s) => Cow::Borrowed(s.value()),
            Node::Lazy => Cow::Borrowed(""),
            Node::Array(_) | Node::Object(_) => Cow::Owned(self.to_compact_string()),
        }
    }

    /// Returns the stored text of a scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s.value()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable array view. A placeholder becomes an empty array first.
    pub fn as_array_mut(&mut self) -> Option<&mut JsonArray> {
        if self.is_lazy() {
            *self = Node::array();
        }
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable object view. A placeholder becomes an empty object first.
    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        if self.is_lazy() {
            *self = Node::object();
        }
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> i32 {
        match self {
            Node::Scalar(s) => s.as_int(),
            _ => coerce::parse_int(&self.value()),
        }
    }

    #[must_use]
    pub fn as_long(&self) -> i64 {
        match self {
            Node::Scalar(s) => s.as_long(),
            _ => coerce::parse_long(&self.value()),
        }
    }

    #[must_use]
    pub fn as_float(&self) -> f32 {
        match self {
            Node::Scalar(s) => s.as_float(),
            _ => coerce::parse_float(&self.value()),
        }
    }

    #[must_use]
    pub fn as_double(&self) -> f64 {
        match self {
            Node::Scalar(s) => s.as_double(),
            _ => coerce::parse_double(&self.value()),
        }
    }

    /// Boolean view; text other than `true`/`false` counts as `true` when non-empty.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Node::Scalar(s) => s.as_bool(),
            _ => coerce::parse_bool(&self.value()),
        }
    }

    #[must_use]
    pub fn as_int_or(&self, default: i32) -> i32 {
        if self.is_null() {
            default
        } else {
            self.as_int()
        }
    }

    #[must_use]
    pub fn as_long_or(&self, default: i64) -> i64 {
        if self.is_null() {
            default
        } else {
            self.as_long()
        }
    }

    #[must_use]
    pub fn as_float_or(&self, default: f32) -> f32 {
        if self.is_null() {
            default
        } else {
            self.as_float()
        }
    }

    #[must_use]
    pub fn as_double_or(&self, default: f64) -> f64 {
        if self.is_null() {
            default
        } else {
            self.as_double()
        }
    }

    #[must_use]
    pub fn as_bool_or(&self, default: bool) -> bool {
        if self.is_null() {
            default
        } else {
            self.as_bool()
        }
    }

    /// Scalar to write through, materializing a placeholder. Containers yield `None`.
    fn scalar_mut(&mut self) -> Option<&mut Scalar> {
        if self.is_lazy() {
            *self = Node::null();
        }
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Replaces a leaf's value with string content. No-op on containers.
    pub fn set_value(&mut self, value: impl Into<String>) {
        if let Some(s) = self.scalar_mut() {
            s.set_value(value);
        }
    }

    pub fn set_int(&mut self, value: i32) {
        if let Some(s) = self.scalar_mut() {
            s.set_int(value);
        }
    }

    pub fn set_long(&mut self, value: i64) {
        if let Some(s) = self.scalar_mut() {
            s.set_long(value);
        }
    }

    pub fn set_float(&mut self, value: f32) {
        if let Some(s) = self.scalar_mut() {
            s.set_float(value);
        }
    }

    pub fn set_double(&mut self, value: f64) {
        if let Some(s) = self.scalar_mut() {
            s.set_double(value);
        }
    }

    pub fn set_bool(&mut self, value: bool) {
        if let Some(s) = self.scalar_mut() {
            s.set_bool(value);
        }
    }

    /// Number of children; zero for leaves and the placeholder.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Node::Array(items) => items.len(),
            Node::Object(map) => map.len(),
            Node::Scalar(_) | Node::Lazy => 0,
        }
    }

    /// Alias of [`count`](Node::count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Object member lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Positional lookup: array elements, or object values in enumeration order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        match self {
            Node::Array(items) => items.get(index),
            Node::Object(map) => map.get_index(index).map(|(_, v)| v),
            Node::Scalar(_) | Node::Lazy => None,
        }
    }

    /// Object member that is present and not null.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::parse;
    ///
    /// let node = parse(r#"{"a":1,"b":null}"#).unwrap();
    /// assert!(node.try_get("a").is_some());
    /// assert!(node.try_get("b").is_none());
    /// assert!(!node.contains_key("b"));
    /// ```
    #[must_use]
    pub fn try_get(&self, key: &str) -> Option<&Node> {
        self.get(key).filter(|n| !n.is_null())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.try_get(key).is_some()
    }

    /// Object keys in enumeration order; empty for anything else.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Key/child pairs. Array elements are paired with an empty key.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Node)> + '_> {
        match self {
            Node::Array(items) => Box::new(items.iter().map(|n| ("", n))),
            Node::Object(map) => Box::new(map.iter().map(|(k, v)| (k.as_str(), v))),
            Node::Scalar(_) | Node::Lazy => Box::new(std::iter::empty()),
        }
    }

    /// Direct children in order.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match self {
            Node::Array(items) => Box::new(items.iter()),
            Node::Object(map) => Box::new(map.values()),
            Node::Scalar(_) | Node::Lazy => Box::new(std::iter::empty()),
        }
    }

    /// Every leaf below this node, depth-first in document order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::parse;
    ///
    /// let node = parse(r#"{"a":[1,{"b":2}],"c":3}"#).unwrap();
    /// let leaves: Vec<i32> = node.deep_children().map(|n| n.as_int()).collect();
    /// assert_eq!(leaves, vec![1, 2, 3]);
    /// ```
    pub fn deep_children(&self) -> DeepChildren<'_> {
        let mut stack: Vec<&Node> = self.children().collect();
        stack.reverse();
        DeepChildren { stack }
    }

    /// Appends a child. Objects store it under the next free numeric key; a
    /// placeholder becomes an array first. No-op on leaves.
    pub fn add(&mut self, node: Node) {
        if self.is_lazy() {
            *self = Node::array();
        }
        match self {
            Node::Array(items) => items.push(node),
            Node::Object(map) => {
                let key = map.next_free_key();
                map.insert(key, node);
            }
            Node::Scalar(_) | Node::Lazy => {}
        }
    }

    /// Inserts a keyed child. Arrays ignore the key and append; a placeholder
    /// becomes an object first. No-op on leaves.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        if self.is_lazy() {
            *self = Node::object();
        }
        match self {
            Node::Object(map) => {
                map.insert(key, node);
            }
            Node::Array(items) => items.push(node),
            Node::Scalar(_) | Node::Lazy => {}
        }
    }

    pub fn remove_key(&mut self, key: &str) -> Option<Node> {
        match self {
            Node::Object(map) => map.remove(key),
            _ => None,
        }
    }

    pub fn remove_index(&mut self, index: usize) -> Option<Node> {
        match self {
            Node::Array(items) => items.remove(index),
            Node::Object(map) => map.remove_index(index).map(|(_, v)| v),
            Node::Scalar(_) | Node::Lazy => None,
        }
    }

    /// Removes the first child equal to `node`.
    pub fn remove_node(&mut self, node: &Node) -> Option<Node> {
        match self {
            Node::Array(items) => items.remove_value(node),
            Node::Object(map) => map.remove_value(node),
            Node::Scalar(_) | Node::Lazy => None,
        }
    }
}

/// Tears down a subtree with a heap stack instead of nested drop calls.
///
/// Each popped container hands its children to the stack before it is
/// dropped, so no drop ever runs more than one level deep.
pub(crate) fn release(nodes: Vec<Node>) {
    let mut stack = nodes;
    while let Some(mut node) = stack.pop() {
        match &mut node {
            Node::Array(items) => stack.append(&mut items.take_nodes()),
            Node::Object(map) => stack.extend(map.take_nodes()),
            Node::Scalar(_) | Node::Lazy => {}
        }
    }
}

/// Iterator returned by [`Node::deep_children`].
pub struct DeepChildren<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for DeepChildren<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Array(_) | Node::Object(_) => {
                    let start = self.stack.len();
                    self.stack.extend(node.children());
                    self.stack[start..].reverse();
                }
                Node::Scalar(_) => return Some(node),
                Node::Lazy => {}
            }
        }
        None
    }
}

impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        self.get(key).unwrap_or(&LAZY)
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        self.get_index(index).unwrap_or(&LAZY)
    }
}

impl IndexMut<&str> for Node {
    /// Slot for `key`. Leaves and placeholders become objects; arrays append.
    fn index_mut(&mut self, key: &str) -> &mut Node {
        if !matches!(self, Node::Object(_) | Node::Array(_)) {
            *self = Node::object();
        }
        match self {
            Node::Object(map) => map.slot(key),
            Node::Array(items) => items.push_lazy(),
            Node::Scalar(_) | Node::Lazy => unreachable!("replaced with an object above"),
        }
    }
}

impl IndexMut<usize> for Node {
    /// Slot at `index`. Leaves and placeholders become arrays; indices past the
    /// end append.
    fn index_mut(&mut self, index: usize) -> &mut Node {
        if !matches!(self, Node::Object(_) | Node::Array(_)) {
            *self = Node::array();
        }
        match self {
            Node::Array(items) => items.slot(index),
            Node::Object(map) => map.slot_at(index),
            Node::Scalar(_) | Node::Lazy => unreachable!("replaced with an array above"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_compact_string())
    }
}

impl FromStr for Node {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        crate::parse(s)
    }
}

impl Serialize for Node {
    /// Goes out as a newtype struct: [`NodeSerializer`](crate::NodeSerializer)
    /// takes the node over unchanged, other serializers see it by kind.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(crate::ser::NODE_PASSTHROUGH, &ByKind(self))
    }
}

/// A node written through the serde data model according to its kind.
struct ByKind<'a>(&'a Node);

impl Serialize for ByKind<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if crate::ser::hand_over(self.0) {
            return serializer.serialize_unit();
        }
        match self.0 {
            Node::Scalar(s) => match s.kind() {
                Kind::Null if !s.is_quoted() || s.value() == "null" => serializer.serialize_unit(),
                Kind::Boolean => serializer.serialize_bool(s.as_bool()),
                Kind::Integer => serializer.serialize_i32(s.as_int()),
                Kind::Float => {
                    if let Ok(n) = s.value().parse::<i64>() {
                        serializer.serialize_i64(n)
                    } else if let Ok(n) = s.value().parse::<u64>() {
                        serializer.serialize_u64(n)
                    } else {
                        serializer.serialize_f64(s.as_double())
                    }
                }
                _ => serializer.serialize_str(s.value()),
            },
            Node::Array(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Node::Object(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Node::Lazy => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Node::null())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Node::null())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = JsonArray::new();
                while let Some(elem) = seq.next_element()? {
                    items.push(elem);
                }
                Ok(Node::Array(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = JsonObject::new();
                while let Some((key, value)) = map.next_entry::<String, Node>()? {
                    values.insert(key, value);
                }
                Ok(Node::Object(values))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::raw(coerce::render_bool(value))
    }
}

macro_rules! from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::raw(value.to_string())
                }
            }
        )*
    };
}

from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(Scalar::string(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(Scalar::string(value))
    }
}

impl From<char> for Node {
    fn from(value: char) -> Self {
        Node::Scalar(Scalar::string(value.to_string()))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Node::null, Into::into)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(JsonArray::from(value))
    }
}

impl From<JsonArray> for Node {
    fn from(value: JsonArray) -> Self {
        Node::Array(value)
    }
}

impl From<JsonObject> for Node {
    fn from(value: JsonObject) -> Self {
        Node::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_cache_resets_on_write() {
        let mut node = Node::from(7);
        assert_eq!(node.kind(), Kind::Integer);
        node.set_value("seven");
        assert_eq!(node.kind(), Kind::String);
        node.set_bool(false);
        assert_eq!(node.kind(), Kind::Boolean);
        node.set_double(2.5);
        assert_eq!(node.kind(), Kind::Float);
    }

    #[test]
    fn test_quoted_flag_does_not_affect_kind() {
        let quoted = Node::from("42");
        let bare = Node::raw("42");
        assert_eq!(quoted.kind(), Kind::Integer);
        assert_eq!(quoted, bare);
        assert!(quoted.as_scalar().unwrap().is_quoted());
        assert!(!bare.as_scalar().unwrap().is_quoted());
    }

    #[test]
    fn test_missing_reads_yield_defaults() {
        let node = Node::object();
        assert!(node["a"]["b"][3].is_lazy());
        assert_eq!(node["a"].as_int(), 0);
        assert!(!node["a"].as_bool());
        assert_eq!(node["a"].as_int_or(9), 9);
        assert_eq!(node["a"].value(), "");
        assert_eq!(Node::from(5)[0].kind(), Kind::Null);
    }

    #[test]
    fn test_write_through_materializes() {
        let mut node = Node::object();
        node["x"]["y"] = Node::from(5);
        assert_eq!(node["x"]["y"].as_int(), 5);
        assert_eq!(node["x"].kind(), Kind::Object);

        node["list"][10] = Node::from("a");
        node["list"][10] = Node::from("b");
        assert_eq!(node["list"].count(), 2);
        assert_eq!(node["list"][1].value(), "b");
    }

    #[test]
    fn test_unassigned_slot_stays_invisible() {
        let mut node = Node::object();
        let _ = &mut node["ghost"];
        assert_eq!(node.count(), 0);
        assert_eq!(node.children().count(), 0);
        assert_eq!(node, Node::object());
    }

    #[test]
    fn test_setter_on_container_is_noop() {
        let mut node = Node::array();
        node.set_int(3);
        assert!(node.is_array());
        assert!(node.is_empty());
    }

    #[test]
    fn test_add_and_insert_materialize() {
        let mut list = Node::default();
        list.add(Node::from(1));
        assert!(list.is_array());

        let mut map = Node::default();
        map.insert("k", Node::from(true));
        assert!(map.is_object());

        map.add(Node::from(2));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["k", "1"]);
    }

    #[test]
    fn test_remove_variants() {
        let mut node = Node::object();
        node.insert("a", Node::from(1));
        node.insert("b", Node::from(2));
        node.insert("c", Node::from(3));

        assert_eq!(node.remove_key("a").map(|n| n.as_int()), Some(1));
        assert_eq!(node.remove_index(5), None);
        assert_eq!(node.remove_node(&Node::from(3)).map(|n| n.as_int()), Some(3));
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_deep_tree_drops_without_recursion() {
        let mut node = Node::null();
        for level in 0..200_000 {
            let mut parent = if level % 2 == 0 { Node::array() } else { Node::object() };
            parent.add(node);
            node = parent;
        }
        assert_eq!(node.count(), 1);
        assert_eq!(node.deep_children().count(), 1);
        drop(node);
    }

    #[test]
    fn test_numeric_from_impls() {
        assert_eq!(Node::from(3.5f64).kind(), Kind::Float);
        assert_eq!(Node::from(u64::MAX).kind(), Kind::Float);
        assert_eq!(Node::from(f64::NAN).kind(), Kind::String);
        assert_eq!(Node::from(None::<i32>).kind(), Kind::Null);
        assert_eq!(Node::from(Some('x')).value(), "x");
    }
}
