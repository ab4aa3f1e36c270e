//! JSON rendering and `Serialize`-to-node conversion.
//!
//! ## Rendering
//!
//! Two JSON renderers share one set of leaf rules:
//!
//! - booleans render bare and lowercase
//! - integer and float literals render bare
//! - the literal `null` (and an empty unquoted value) renders as bare `null`
//! - everything else is a quoted string with `\\ \" \n \r \t \b \f` escaped
//!
//! ```rust
//! use json_node::parse;
//!
//! let node = parse(r#"{"name":"A","tags":["x","y"],"n":3.5,"ok":"TRUE"}"#).unwrap();
//! assert_eq!(
//!     node.to_compact_string(),
//!     r#"{"name":"A","tags":["x","y"],"n":3.5,"ok":true}"#
//! );
//! assert!(node.to_pretty_string().contains("    \"n\": 3.5"));
//! ```
//!
//! ## Conversion
//!
//! [`NodeSerializer`] builds a [`Node`] from any `Serialize` value. It backs
//! [`from_object`](crate::from_object), which never fails: a struct field whose
//! conversion errors becomes `null` and the rest of the value is still built.
//!
//! ```rust
//! use json_node::{from_object, Kind};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Reply { id: u32, tags: Vec<&'static str>, note: Option<String> }
//!
//! let node = from_object(&Reply { id: 7, tags: vec!["a"], note: None });
//! assert_eq!(node["id"].kind(), Kind::Integer);
//! assert_eq!(node.to_compact_string(), r#"{"id":7,"tags":["a"],"note":null}"#);
//! ```

use crate::coerce::Kind;
use crate::{Error, FormatOptions, JsonArray, JsonObject, Node, Result, Scalar};
use serde::{ser, Serialize};
use std::cell::{Cell, RefCell};

impl Node {
    /// Minified JSON.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        let mut output = String::new();
        write_json(&mut output, self, None);
        output
    }

    /// Indented JSON with four spaces per level.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        self.to_pretty_string_with(&FormatOptions::json())
    }

    /// Indented JSON with custom indentation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::{parse, FormatOptions};
    ///
    /// let node = parse(r#"{"a":[1],"b":{}}"#).unwrap();
    /// let text = node.to_pretty_string_with(&FormatOptions::json().with_indent(2));
    /// assert_eq!(text, "{\n  \"a\": [\n    1\n  ],\n  \"b\": {}\n}");
    /// ```
    #[must_use]
    pub fn to_pretty_string_with(&self, options: &FormatOptions) -> String {
        let mut output = String::new();
        write_json(&mut output, self, Some(options));
        output
    }
}

/// A container whose entries are still being written.
struct Open<'a> {
    entries: Box<dyn Iterator<Item = (&'a str, &'a Node)> + 'a>,
    keyed: bool,
    written: usize,
}

/// Compact JSON when `options` is `None`, indented JSON otherwise.
///
/// Walks the tree with a heap stack of open containers, so depth is limited
/// by memory only.
fn write_json(output: &mut String, root: &Node, options: Option<&FormatOptions>) {
    let mut stack: Vec<Open<'_>> = Vec::new();
    let mut pending = Some(root);
    loop {
        match pending.take() {
            Some(Node::Scalar(s)) => write_scalar(output, s),
            Some(node @ (Node::Array(_) | Node::Object(_))) => {
                let keyed = node.is_object();
                output.push(if keyed { '{' } else { '[' });
                stack.push(Open {
                    entries: node.iter(),
                    keyed,
                    written: 0,
                });
            }
            Some(Node::Lazy) | None => {}
        }

        let depth = stack.len();
        let Some(open) = stack.last_mut() else {
            break;
        };
        match open.entries.next() {
            Some((key, child)) => {
                if open.written > 0 {
                    output.push(',');
                }
                open.written += 1;
                if let Some(options) = options {
                    output.push('\n');
                    output.push_str(&options.pad(depth));
                }
                if open.keyed {
                    write_quoted(output, key);
                    output.push_str(if options.is_some() { ": " } else { ":" });
                }
                pending = Some(child);
            }
            None => {
                if let Some(options) = options.filter(|_| open.written > 0) {
                    output.push('\n');
                    output.push_str(&options.pad(depth - 1));
                }
                output.push(if open.keyed { '}' } else { ']' });
                stack.pop();
            }
        }
    }
}

fn write_scalar(output: &mut String, scalar: &Scalar) {
    match scalar.kind() {
        Kind::Boolean => output.push_str(&scalar.value().to_ascii_lowercase()),
        Kind::Integer | Kind::Float => output.push_str(scalar.value()),
        Kind::Null if !scalar.is_quoted() || scalar.value() == "null" => output.push_str("null"),
        _ => write_quoted(output, scalar.value()),
    }
}

fn write_quoted(output: &mut String, text: &str) {
    output.push('"');
    for c in text.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{8}' => output.push_str("\\b"),
            '\u{c}' => output.push_str("\\f"),
            _ => output.push(c),
        }
    }
    output.push('"');
}

/// Newtype name a [`Node`] serializes under.
pub(crate) const NODE_PASSTHROUGH: &str = "$json_node::private::Node";

thread_local! {
    /// Set while [`NodeSerializer`] waits for a node to hand itself over.
    static EXPECTING_NODE: Cell<bool> = const { Cell::new(false) };
    static HANDED_OVER: RefCell<Option<Node>> = const { RefCell::new(None) };
}

/// Gives `node` to a waiting [`NodeSerializer`]. Returns `false` when no
/// conversion is waiting, in which case the caller serializes normally.
pub(crate) fn hand_over(node: &Node) -> bool {
    if !EXPECTING_NODE.with(|flag| flag.replace(false)) {
        return false;
    }
    HANDED_OVER.with(|slot| *slot.borrow_mut() = Some(node.clone()));
    true
}

fn take_over<T>(value: &T) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    let outer = EXPECTING_NODE.with(|flag| flag.replace(true));
    let rebuilt = value.serialize(NodeSerializer);
    EXPECTING_NODE.with(|flag| flag.set(outer));
    match HANDED_OVER.with(|slot| slot.borrow_mut().take()) {
        Some(node) => Ok(node),
        None => rebuilt,
    }
}

/// Builds a [`Node`] from any `Serialize` value.
///
/// A `Node` met anywhere inside the value is copied over unchanged, keeping
/// its text, its quoting and any key order.
pub struct NodeSerializer;

pub struct SerializeVec {
    items: JsonArray,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: JsonObject,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        Ok(Node::raw(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        Ok(Node::raw(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        Ok(Node::Array(v.iter().map(|&b| Node::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::from(variant))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        if name == NODE_PASSTHROUGH {
            return take_over(value);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        let mut map = JsonObject::new();
        map.insert(variant, to_node(value)?);
        Ok(Node::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

/// Wraps `node` as `{variant: node}` when building an enum variant.
fn wrap_variant(variant: Option<&'static str>, node: Node) -> Node {
    match variant {
        Some(name) => {
            let mut map = JsonObject::new();
            map.insert(name, node);
            Node::Object(map)
        }
        None => node,
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            items: JsonArray::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn finish(self) -> Node {
        wrap_variant(self.variant, Node::Array(self.items))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: JsonObject::new(),
            current_key: None,
            variant,
        }
    }

    /// Converts a member value, degrading a failure to `null`.
    fn insert_lenient<T: ?Sized + Serialize>(&mut self, key: String, value: &T) {
        let node = to_node(value).unwrap_or_else(|err| {
            tracing::warn!(field = %key, error = %err, "member conversion failed, storing null");
            Node::null()
        });
        self.map.insert(key, node);
    }

    fn finish(self) -> Node {
        wrap_variant(self.variant, Node::Object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_node(key)? {
            Node::Scalar(s) => {
                self.current_key = Some(s.value().to_string());
                Ok(())
            }
            other => Err(Error::type_mismatch("scalar map key", other.kind().as_str())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert_lenient(key, value);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert_lenient(key.to_string(), value);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert_lenient(key.to_string(), value);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

pub(crate) fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node> {
    value.serialize(NodeSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use std::collections::BTreeMap;

    #[test]
    fn test_compact_leaf_rules() {
        let node = Node::from(vec![
            Node::from("TRUE"),
            Node::from("12"),
            Node::null(),
            Node::raw(""),
            Node::from(""),
            Node::from("line\n\"q\"\t\\"),
        ]);
        assert_eq!(
            node.to_compact_string(),
            r#"[true,12,null,null,"","line\n\"q\"\t\\"]"#
        );
    }

    #[test]
    fn test_pretty_default_indent() {
        let node = parse(r#"{"a":{"b":[1,2]},"c":[]}"#).unwrap();
        let expected = "{\n    \"a\": {\n        \"b\": [\n            1,\n            2\n        ]\n    },\n    \"c\": []\n}";
        assert_eq!(node.to_pretty_string(), expected);
    }

    #[test]
    fn test_lazy_slots_not_rendered() {
        let mut node = Node::object();
        node.insert("a", Node::from(1));
        let _ = &mut node["pending"];
        assert_eq!(node.to_compact_string(), r#"{"a":1}"#);
        assert_eq!(Node::default().to_compact_string(), "");
    }

    #[derive(Serialize)]
    enum Event {
        Ping,
        Move(i32, i32),
        Rename { from: String },
        Wrap(u8),
    }

    #[test]
    fn test_enum_variants() {
        let events = vec![
            Event::Ping,
            Event::Move(1, -2),
            Event::Rename { from: "a".into() },
            Event::Wrap(9),
        ];
        let node = to_node(&events).unwrap();
        assert_eq!(
            node.to_compact_string(),
            r#"["Ping",{"Move":[1,-2]},{"Rename":{"from":"a"}},{"Wrap":9}]"#
        );
    }

    #[test]
    fn test_map_keys_are_stringified() {
        let mut map = BTreeMap::new();
        map.insert(2, "b");
        map.insert(1, "a");
        let node = to_node(&map).unwrap();
        assert_eq!(node.to_compact_string(), r#"{"1":"a","2":"b"}"#);
    }

    struct Failing;

    impl Serialize for Failing {
        fn serialize<S: ser::Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(ser::Error::custom("unsupported"))
        }
    }

    #[derive(Serialize)]
    struct Partial {
        ok: i32,
        bad: Failing,
    }

    #[test]
    fn test_member_failure_degrades_to_null() {
        let node = to_node(&Partial { ok: 1, bad: Failing }).unwrap();
        assert_eq!(node.to_compact_string(), r#"{"ok":1,"bad":null}"#);
    }

    #[test]
    fn test_node_passthrough_is_structural() {
        let original = parse(r#"{"a":[1,"x",true],"b":{"c":2.5}}"#).unwrap();
        assert_eq!(to_node(&original).unwrap(), original);
    }

    #[test]
    fn test_node_passthrough_keeps_text() {
        let original =
            parse(r#"{"empty":"","big":12345678901234567891,"pad":"1.50","flag":"TRUE"}"#).unwrap();
        let copied = to_node(&original).unwrap();

        assert_eq!(copied, original);
        assert_eq!(copied.to_compact_string(), original.to_compact_string());
        assert_eq!(copied["big"].as_str(), Some("12345678901234567891"));
        assert_eq!(copied["pad"].as_str(), Some("1.50"));
        assert!(copied["empty"].as_scalar().map(Scalar::is_quoted).unwrap_or(false));
        assert_eq!(copied.to_yaml_string(), original.to_yaml_string());
    }

    #[derive(Serialize)]
    struct Envelope {
        id: u8,
        body: Node,
        extra: Vec<Node>,
    }

    #[test]
    fn test_nested_nodes_are_copied() {
        let body = parse(r#"{"n":"007","x":1.50}"#).unwrap();
        let node = to_node(&Envelope {
            id: 1,
            body: body.clone(),
            extra: vec![Node::from(""), Node::raw("2.0")],
        })
        .unwrap();

        assert_eq!(node["body"], body);
        assert_eq!(node["body"]["x"].as_str(), Some("1.50"));
        assert_eq!(node.to_compact_string(), r#"{"id":1,"body":{"n":"007","x":1.50},"extra":["",2.0]}"#);
    }
}
