//! Text parsing and typed extraction.
//!
//! This module holds two halves:
//!
//! - the [`Parser`], a single-pass scanner that turns JSON-ish text into a
//!   [`Node`] tree using an explicit stack of open containers
//! - [`NodeDeserializer`], a `serde` deserializer over a borrowed tree, backing
//!   [`to_typed`](crate::to_typed)
//!
//! ## Leniency
//!
//! The scanner never rejects a token. Bare words, numbers with odd formatting and
//! unquoted keys are all kept as text, and kind inference happens later on the
//! leaf. Only an unterminated string and a closing bracket with nothing open
//! abort a parse:
//!
//! ```rust
//! use json_node::parse;
//!
//! let node = parse("{name: Alice, tags: [x, y], n: 3.5}").unwrap();
//! assert_eq!(node["name"].value(), "Alice");
//! assert_eq!(node["tags"].count(), 2);
//!
//! assert!(parse(r#"{"a":1}}"#).is_err());
//! assert!(parse(r#"{"a":"unterminated"#).is_err());
//! ```
//!
//! ## Typed extraction
//!
//! ```rust
//! use json_node::{parse, to_typed};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let node = parse(r#"{"x":"10","y":"abc"}"#).unwrap();
//! let point: Point = to_typed(&node).unwrap();
//! assert_eq!(point, Point { x: 10, y: 0 });
//! ```

use crate::coerce::{self, Kind};
use crate::normalize::{normalize, read_unicode_escape};
use crate::{Error, JsonArray, JsonObject, Node, ParseOptions, Result, Scalar};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use std::borrow::Cow;

/// Where a container goes once it is closed.
enum Slot {
    Root,
    Element,
    Key(String),
    Dropped,
}

struct Frame {
    container: Node,
    slot: Slot,
}

/// The text-to-tree scanner.
///
/// Created via [`Parser::new`], consumed by [`Parser::parse`]. Most callers
/// should use [`parse`](crate::parse) instead.
pub struct Parser<'a> {
    input: Cow<'a, str>,
    position: usize,
    line: usize,
    column: usize,
    stack: Vec<Frame>,
    root: Option<Node>,
    token: String,
    key: String,
    in_quotes: bool,
    token_quoted: bool,
    quote_start: (usize, usize),
}

impl<'a> Parser<'a> {
    /// Prepares `input` for scanning, applying the normalization pass first.
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        Parser {
            input: normalize(input, options),
            position: 0,
            line: 1,
            column: 1,
            stack: Vec::with_capacity(8),
            root: None,
            token: String::with_capacity(64),
            key: String::with_capacity(32),
            in_quotes: false,
            token_quoted: false,
            quote_start: (1, 1),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Runs the scan to completion.
    pub fn parse(mut self) -> Result<Node> {
        while let Some(ch) = self.peek_char() {
            let (line, col) = (self.line, self.column);
            self.next_char();

            match ch {
                '{' | '[' if !self.in_quotes => self.open(ch == '{'),
                '}' | ']' if !self.in_quotes => {
                    if self.stack.is_empty() {
                        return Err(Error::unbalanced_bracket(line, col, ch));
                    }
                    self.flush();
                    self.close();
                }
                ':' if !self.in_quotes && self.top_is_object() => {
                    self.key.push_str(&self.token);
                    self.token.clear();
                    self.token_quoted = false;
                }
                ',' if !self.in_quotes => self.flush(),
                '"' => {
                    self.in_quotes = !self.in_quotes;
                    if self.in_quotes {
                        self.token_quoted = true;
                        self.quote_start = (line, col);
                    }
                }
                '\r' | '\n' => {}
                ' ' | '\t' => {
                    if self.in_quotes {
                        self.token.push(ch);
                    }
                }
                '\\' => self.escape(),
                _ => self.token.push(ch),
            }
        }

        if self.in_quotes {
            let (line, col) = self.quote_start;
            return Err(Error::unterminated_string(line, col));
        }
        Ok(self.finish())
    }

    fn top_is_object(&self) -> bool {
        matches!(self.stack.last(), Some(Frame { container: Node::Object(_), .. }))
    }

    fn open(&mut self, is_object: bool) {
        let slot = match self.stack.last() {
            None if self.root.is_none() => Slot::Root,
            None => Slot::Dropped,
            Some(Frame { container: Node::Array(_), .. }) => Slot::Element,
            Some(_) => {
                let key = self.key.trim();
                if key.is_empty() {
                    Slot::Dropped
                } else {
                    Slot::Key(key.to_string())
                }
            }
        };
        let container = if is_object {
            Node::Object(JsonObject::new())
        } else {
            Node::Array(JsonArray::new())
        };
        self.stack.push(Frame { container, slot });
        self.clear();
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.slot {
            Slot::Root => self.root = Some(frame.container),
            Slot::Element => {
                if let Some(Frame { container: Node::Array(items), .. }) = self.stack.last_mut() {
                    items.push(frame.container);
                }
            }
            Slot::Key(key) => {
                if let Some(Frame { container: Node::Object(map), .. }) = self.stack.last_mut() {
                    map.insert(key, frame.container);
                }
            }
            Slot::Dropped => {}
        }
    }

    /// Commits the pending token as a member of the open container.
    fn flush(&mut self) {
        if !self.token.is_empty() || self.token_quoted {
            let leaf = Node::Scalar(Scalar::from_token(
                std::mem::take(&mut self.token),
                self.token_quoted,
            ));
            match self.stack.last_mut() {
                Some(Frame { container: Node::Array(items), .. }) => items.push(leaf),
                Some(Frame { container: Node::Object(map), .. }) => {
                    let key = self.key.trim();
                    if !key.is_empty() {
                        map.insert(key, leaf);
                    }
                }
                _ => {}
            }
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.token.clear();
        self.key.clear();
        self.token_quoted = false;
    }

    fn escape(&mut self) {
        let Some(escaped) = self.next_char() else {
            return;
        };
        if !self.in_quotes {
            self.token.push(escaped);
            return;
        }
        match escaped {
            't' => self.token.push('\t'),
            'r' => self.token.push('\r'),
            'n' => self.token.push('\n'),
            'b' => self.token.push('\u{8}'),
            'f' => self.token.push('\u{c}'),
            'u' => match read_unicode_escape(&self.input[self.position..]) {
                Some((decoded, used)) => {
                    self.token.push(decoded);
                    for _ in 0..used {
                        self.next_char();
                    }
                }
                None => self.token.push('u'),
            },
            other => self.token.push(other),
        }
    }

    /// Folds still-open containers into their parents and picks the result.
    fn finish(mut self) -> Node {
        if !self.stack.is_empty() {
            self.flush();
            while !self.stack.is_empty() {
                self.close();
            }
        }
        if let Some(root) = self.root {
            return root;
        }
        if !self.token.is_empty() || self.token_quoted {
            return Node::Scalar(Scalar::from_token(self.token, self.token_quoted));
        }
        Node::object()
    }
}

/// A `serde` deserializer reading from a borrowed [`Node`].
///
/// Scalars are read through the lenient coercions, so `"abc"` extracts as `0`
/// for any integer type and as `true` for `bool`. Shape mismatches such as an
/// array where a struct is expected are errors.
pub struct NodeDeserializer<'de> {
    node: &'de Node,
}

impl<'de> NodeDeserializer<'de> {
    pub fn new(node: &'de Node) -> Self {
        NodeDeserializer { node }
    }

    fn leaf_text(&self) -> Result<Cow<'de, str>> {
        match self.node {
            Node::Scalar(s) => Ok(Cow::Borrowed(s.value())),
            Node::Lazy => Ok(Cow::Borrowed("")),
            other => Err(Error::type_mismatch("scalar", other.kind().as_str())),
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.node.kind().as_str())
    }
}

macro_rules! deserialize_signed {
    ($($method:ident),*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let text = self.leaf_text()?;
                visitor.visit_i64(coerce::parse_long(&text))
            }
        )*
    };
}

macro_rules! deserialize_unsigned {
    ($($method:ident),*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let text = self.leaf_text()?;
                visitor.visit_u64(coerce::parse_ulong(&text))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for NodeDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Scalar(s) => match s.kind() {
                Kind::Null => visitor.visit_unit(),
                Kind::Boolean => visitor.visit_bool(s.as_bool()),
                Kind::Integer => visitor.visit_i64(s.as_long()),
                Kind::Float => visitor.visit_f64(s.as_double()),
                _ => visitor.visit_borrowed_str(s.value()),
            },
            Node::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Node::Object(map) => visitor.visit_map(MapDeserializer::new(map)),
            Node::Lazy => visitor.visit_unit(),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.leaf_text()?;
        visitor.visit_bool(coerce::parse_bool(&text))
    }

    deserialize_signed!(deserialize_i8, deserialize_i16, deserialize_i32, deserialize_i64);

    deserialize_unsigned!(deserialize_u8, deserialize_u16, deserialize_u32, deserialize_u64);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.leaf_text()?;
        visitor.visit_f32(coerce::parse_float(&text))
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.leaf_text()?;
        visitor.visit_f64(coerce::parse_double(&text))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Scalar(s) => visitor.visit_borrowed_str(s.value()),
            Node::Lazy => visitor.visit_borrowed_str(""),
            other => visitor.visit_string(other.to_compact_string()),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.node.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            _ => Err(self.mismatch("array")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Object(map) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(self.mismatch("object")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Scalar(s) => visitor.visit_enum(s.value().into_deserializer()),
            Node::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((variant, value)) => {
                    visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
                }
                None => Err(self.mismatch("enum")),
            },
            _ => Err(self.mismatch("enum")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i128 u128 bytes byte_buf
    }
}

struct SeqDeserializer<'de> {
    iter: Box<dyn Iterator<Item = &'de Node> + 'de>,
}

impl<'de> SeqDeserializer<'de> {
    fn new(items: &'de JsonArray) -> Self {
        SeqDeserializer {
            iter: Box::new(items.iter()),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }
}

struct MapDeserializer<'de> {
    iter: Box<dyn Iterator<Item = (&'de String, &'de Node)> + 'de>,
    value: Option<&'de Node>,
}

impl<'de> MapDeserializer<'de> {
    fn new(map: &'de JsonObject) -> Self {
        MapDeserializer {
            iter: Box::new(map.iter()),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(NodeDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }
}

/// Object keys, parsed on demand for maps keyed by numbers or booleans.
struct KeyDeserializer<'de> {
    key: &'de str,
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident: $ty:ty),*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.key.trim().parse::<$ty>() {
                    Ok(parsed) => visitor.$visit(parsed),
                    Err(_) => Err(Error::type_mismatch(stringify!($ty), self.key)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.key)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.key.into_deserializer())
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    deserialize_parsed_key!(
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64
    );

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf option unit unit_struct seq
        tuple tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer<'de> {
    variant: &'de str,
    value: Option<&'de Node>,
}

impl<'de> EnumDeserializer<'de> {
    fn new(variant: &'de str, value: Option<&'de Node>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(KeyDeserializer { key: self.variant })?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'de> {
    value: Option<&'de Node>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(node) if node.is_null() => Ok(()),
            Some(_) => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Node::Array(items)) => visitor.visit_seq(SeqDeserializer::new(items)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Node::Object(map)) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}
