//! # json_node
//!
//! A lenient JSON node tree for payloads that arrive from loosely behaved peers:
//! tool calls, editor bridges, chat transcripts.
//!
//! ## What is a Node?
//!
//! Every value is kept as text plus a flag telling whether it was quoted on the
//! wire. Its JSON kind is inferred when you ask for it, so `"5"` and `5` both read
//! as integers and `"TRUE"` reads as a boolean. Reads never fail: a missing key or
//! an unparsable number gives back a neutral default.
//!
//! ## Key Features
//!
//! - **Double-encoding repair**: `"{\"a\":1}"` and `{\"a\":1}` parse as `{"a":1}`
//! - **Write-through paths**: `root["a"]["b"].set_int(1)` creates `a` and `b`
//! - **No recursion on deep input**: parsing, rendering and dropping a tree use
//!   heap stacks, so nesting depth is bounded by memory, not the call stack
//! - **Three renderers**: compact/pretty JSON, YAML-like text and a tagged binary format
//! - **Serde bridge**: [`from_object`] and [`to_typed`] convert to and from Rust types
//!
//! ## Quick Start
//!
//! ```rust
//! use json_node::parse;
//!
//! let node = parse(r#"{"name":"Cube","size":"2","tags":["a","b"]}"#).unwrap();
//! assert_eq!(node["name"].as_str(), Some("Cube"));
//! assert_eq!(node["size"].as_int(), 2);
//! assert_eq!(node["tags"].count(), 2);
//! assert!(node["missing"]["deeper"].is_lazy());
//! ```
//!
//! ### Building a response
//!
//! ```rust
//! use json_node::Node;
//!
//! let mut reply = Node::object();
//! reply["result"]["ok"].set_bool(true);
//! reply["result"]["items"].add(Node::from("first"));
//! assert_eq!(
//!     reply.to_compact_string(),
//!     r#"{"result":{"ok":true,"items":["first"]}}"#
//! );
//! ```
//!
//! ### Typed extraction
//!
//! ```rust
//! use json_node::{parse, to_typed};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Move { x: f32, y: f32, relative: bool }
//!
//! let node = parse(r#"{"x":"1.5","y":2,"relative":"true"}"#).unwrap();
//! let cmd: Move = to_typed(&node).unwrap();
//! assert_eq!(cmd, Move { x: 1.5, y: 2.0, relative: true });
//! ```
//!
//! ## Errors
//!
//! Only three things fail: malformed text in [`parse`], corrupt input in
//! [`Node::from_bytes`], and shape mismatches in [`to_typed`]. See [`Error`].
//!
//! ## Demos
//!
//! The `demos/` directory has runnable programs:
//!
//! - **`simple.rs`** - parsing, reading and writing values
//! - **`lazy_paths.rs`** - creating structure by assigning through missing keys
//! - **`renderers.rs`** - the same tree as JSON, YAML and binary
//!
//! Run any demo with: `cargo run --example <name>`

pub mod array;
pub mod binary;
pub mod coerce;
pub mod de;
pub mod error;
pub mod macros;
pub mod map;
mod normalize;
pub mod options;
pub mod ser;
pub mod value;
pub mod yaml;

pub use array::JsonArray;
pub use binary::BinaryTag;
pub use coerce::Kind;
pub use de::{NodeDeserializer, Parser};
pub use error::{Error, Result};
pub use map::JsonObject;
pub use options::{FormatOptions, ParseOptions};
pub use ser::NodeSerializer;
pub use value::{DeepChildren, Node, Scalar};

use serde::{Deserialize, Serialize};

/// Parse text into a [`Node`] with the default repair heuristics.
///
/// # Examples
///
/// ```rust
/// use json_node::parse;
///
/// let direct = parse(r#"{"a":1}"#).unwrap();
/// let doubled = parse(r#""{\"a\":1}""#).unwrap();
/// assert_eq!(direct, doubled);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnterminatedString`] or [`Error::UnbalancedBracket`] for
/// text that cannot be read as JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Node> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parse text with explicit control over the repair heuristics.
///
/// ```rust
/// use json_node::{parse_with_options, ParseOptions};
///
/// let node = parse_with_options(r#""{\"a\":1}""#, &ParseOptions::strict()).unwrap();
/// assert!(node.is_scalar());
/// ```
///
/// # Errors
///
/// Same as [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Node> {
    Parser::new(text, options).parse()
}

/// Convert any `T: Serialize` into a [`Node`].
///
/// This never fails. A member whose conversion errors becomes `null`; if the
/// whole value fails the result is `null`.
///
/// ```rust
/// use json_node::from_object;
///
/// let node = from_object(&vec![1, 2, 3]);
/// assert_eq!(node.to_compact_string(), "[1,2,3]");
/// ```
pub fn from_object<T>(value: &T) -> Node
where
    T: ?Sized + Serialize,
{
    match ser::to_node(value) {
        Ok(node) => node,
        Err(err) => {
            tracing::warn!(error = %err, "value could not be converted, using null");
            Node::null()
        }
    }
}

/// Deserialize a `T` from a [`Node`].
///
/// Scalars are coerced leniently: `"5"` fills an `i32` and `"abc"` fills it
/// with `0`.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when a container stands where a scalar is
/// expected or the reverse, and [`Error::Custom`] for errors raised by `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_typed<'de, T>(node: &'de Node) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(NodeDeserializer::new(node))
}
