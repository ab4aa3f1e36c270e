//! Compact binary tag encoding.
//!
//! Every node is written as a one-byte [`BinaryTag`] followed by its payload:
//!
//! | Tag | Payload |
//! |-----|---------|
//! | `Array` | `i32` LE count, then each element |
//! | `Object` | `i32` LE count, then key string + value for each entry |
//! | `String` | string |
//! | `Int` | `i32` LE |
//! | `Double` | `f64` LE |
//! | `Bool` | one byte, non-zero is `true` |
//! | `Float` | `f32` LE |
//!
//! Strings are a 7-bit variable-length byte count followed by UTF-8 bytes.
//!
//! A scalar is stored under the first of `Int`, `Float`, `Double`, `Bool` whose
//! typed value renders back to exactly the stored text, and as a `String`
//! otherwise. Decoding therefore restores both the text and the numeric subtype.
//!
//! Encoding walks the tree with a heap stack and accepts any depth; decoding
//! rejects input nested deeper than 512 containers.
//!
//! ```rust
//! use json_node::{parse, Node};
//!
//! let node = parse(r#"{"id":7,"ratio":0.25,"name":"x","on":true}"#).unwrap();
//! let bytes = node.to_bytes().unwrap();
//! assert_eq!(Node::from_bytes(&bytes).unwrap(), node);
//! ```

use crate::coerce;
use crate::{Error, JsonArray, JsonObject, Node, Result, Scalar};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Nesting limit applied while decoding.
const MAX_DEPTH: usize = 512;

/// Binary type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BinaryTag {
    Array = 1,
    Object = 2,
    String = 3,
    Int = 4,
    Double = 5,
    Bool = 6,
    Float = 7,
}

impl BinaryTag {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(BinaryTag::Array),
            2 => Some(BinaryTag::Object),
            3 => Some(BinaryTag::String),
            4 => Some(BinaryTag::Int),
            5 => Some(BinaryTag::Double),
            6 => Some(BinaryTag::Bool),
            7 => Some(BinaryTag::Float),
            _ => None,
        }
    }

    /// Tag chosen for a scalar's text.
    pub fn for_scalar(value: &str) -> Self {
        let tag = if coerce::parse_int(value).to_string() == value {
            BinaryTag::Int
        } else if coerce::parse_float(value).to_string() == value {
            BinaryTag::Float
        } else if coerce::parse_double(value).to_string() == value {
            BinaryTag::Double
        } else if coerce::render_bool(coerce::parse_bool(value)) == value {
            BinaryTag::Bool
        } else {
            BinaryTag::String
        };
        tracing::trace!(?tag, value, "selected scalar tag");
        tag
    }
}

/// Pending output while walking a tree.
enum Step<'a> {
    Key(&'a str),
    Value(&'a Node),
}

/// Writes `node` to `writer`.
///
/// An unassigned placeholder at the top level is written as an empty string.
pub fn serialize<W: Write>(node: &Node, writer: &mut W) -> Result<()> {
    let mut steps = vec![Step::Value(node)];
    while let Some(step) = steps.pop() {
        let node = match step {
            Step::Key(key) => {
                write_string(writer, key)?;
                continue;
            }
            Step::Value(node) => node,
        };
        let start = steps.len();
        match node {
            Node::Array(items) => {
                writer.write_all(&[BinaryTag::Array as u8])?;
                write_count(writer, items.len())?;
                steps.extend(items.iter().map(Step::Value));
            }
            Node::Object(map) => {
                writer.write_all(&[BinaryTag::Object as u8])?;
                write_count(writer, map.len())?;
                for (key, value) in map.iter() {
                    steps.push(Step::Key(key));
                    steps.push(Step::Value(value));
                }
            }
            Node::Scalar(s) => write_scalar(writer, s)?,
            Node::Lazy => {
                writer.write_all(&[BinaryTag::String as u8])?;
                write_string(writer, "")?;
            }
        }
        steps[start..].reverse();
    }
    Ok(())
}

fn write_scalar<W: Write>(writer: &mut W, scalar: &Scalar) -> Result<()> {
    let tag = BinaryTag::for_scalar(scalar.value());
    writer.write_all(&[tag as u8])?;
    match tag {
        BinaryTag::Int => writer.write_all(&scalar.as_int().to_le_bytes())?,
        BinaryTag::Float => writer.write_all(&scalar.as_float().to_le_bytes())?,
        BinaryTag::Double => writer.write_all(&scalar.as_double().to_le_bytes())?,
        BinaryTag::Bool => writer.write_all(&[u8::from(scalar.as_bool())])?,
        _ => write_string(writer, scalar.value())?,
    }
    Ok(())
}

fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<()> {
    let count = i32::try_from(count)
        .map_err(|_| Error::custom(format!("container of {count} entries is too large to encode")))?;
    writer.write_all(&count.to_le_bytes())?;
    Ok(())
}

fn write_string<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut len = u32::try_from(bytes.len())
        .map_err(|_| Error::custom("string is too long to encode"))?;
    while len >= 0x80 {
        writer.write_all(&[(len as u8) | 0x80])?;
        len >>= 7;
    }
    writer.write_all(&[len as u8])?;
    writer.write_all(bytes)?;
    Ok(())
}

/// Reads one node from `reader`.
pub fn deserialize<R: Read>(reader: &mut R) -> Result<Node> {
    let mut reader = OffsetReader {
        inner: reader,
        offset: 0,
    };
    read_node(&mut reader, 0)
}

/// Tracks the byte offset so errors can point at the failing position.
struct OffsetReader<'r, R> {
    inner: &'r mut R,
    offset: u64,
}

impl<R: Read> OffsetReader<'_, R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                Error::invalid_data(self.offset, "unexpected end of input")
            } else {
                Error::from(err)
            }
        })?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_count(&mut self) -> Result<usize> {
        let at = self.offset;
        let count = i32::from_le_bytes(self.read_array()?);
        usize::try_from(count).map_err(|_| Error::invalid_data(at, "negative count"))
    }

    fn read_string(&mut self) -> Result<String> {
        let at = self.offset;
        let mut len: u32 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8()?;
            if shift == 28 && byte > 0x0F {
                return Err(Error::invalid_data(at, "string length is overlong"));
            }
            len |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        if len > i32::MAX as u32 {
            return Err(Error::invalid_data(at, "string length is overlong"));
        }

        let mut bytes = Vec::with_capacity((len as usize).min(4096));
        let start = self.offset;
        self.inner
            .by_ref()
            .take(u64::from(len))
            .read_to_end(&mut bytes)?;
        self.offset += bytes.len() as u64;
        if bytes.len() != len as usize {
            return Err(Error::invalid_data(self.offset, "unexpected end of input"));
        }
        String::from_utf8(bytes).map_err(|_| Error::invalid_data(start, "invalid UTF-8 in string"))
    }
}

fn read_node<R: Read>(reader: &mut OffsetReader<'_, R>, depth: usize) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(Error::invalid_data(reader.offset, "nesting too deep"));
    }
    let at = reader.offset;
    let tag_byte = reader.read_u8()?;
    let tag = BinaryTag::from_u8(tag_byte).ok_or_else(|| Error::unknown_tag(tag_byte, at))?;

    let node = match tag {
        BinaryTag::Array => {
            let count = reader.read_count()?;
            let mut items = JsonArray::with_capacity(count.min(1024));
            for _ in 0..count {
                items.push(read_node(reader, depth + 1)?);
            }
            Node::Array(items)
        }
        BinaryTag::Object => {
            let count = reader.read_count()?;
            let mut map = JsonObject::with_capacity(count.min(1024));
            for _ in 0..count {
                let key = reader.read_string()?;
                let value = read_node(reader, depth + 1)?;
                map.insert(key, value);
            }
            Node::Object(map)
        }
        BinaryTag::String => Node::from(reader.read_string()?),
        BinaryTag::Int => Node::from(i32::from_le_bytes(reader.read_array()?)),
        BinaryTag::Double => Node::from(f64::from_le_bytes(reader.read_array()?)),
        BinaryTag::Bool => Node::from(reader.read_u8()? != 0),
        BinaryTag::Float => Node::from(f32::from_le_bytes(reader.read_array()?)),
    };
    Ok(node)
}

impl Node {
    /// Writes the binary encoding to `writer`.
    pub fn serialize_binary<W: Write>(&self, writer: &mut W) -> Result<()> {
        serialize(self, writer)
    }

    /// Reads one binary-encoded node from `reader`.
    pub fn deserialize_binary<R: Read>(reader: &mut R) -> Result<Node> {
        deserialize(reader)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        serialize(self, &mut bytes)?;
        Ok(bytes)
    }

    /// Decodes a node from the start of `bytes`; trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Node> {
        let mut cursor = bytes;
        deserialize(&mut cursor)
    }

    /// Writes the binary encoding to a file, creating or truncating it.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|err| Error::io(format!("cannot create {}: {err}", path.display())))?;
        let mut writer = BufWriter::new(file);
        serialize(self, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a file written by [`save_to_file`](Node::save_to_file).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Node> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| Error::io(format!("cannot open {}: {err}", path.display())))?;
        deserialize(&mut BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    #[test]
    fn test_missing_file_names_the_path() {
        let path = std::env::temp_dir().join("json_node_missing_dir").join("absent.bin");
        match Node::load_from_file(&path) {
            Err(Error::Io(msg)) => {
                assert!(msg.starts_with("cannot open"));
                assert!(msg.contains("absent.bin"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(Node::null().save_to_file(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_scalar_tag_selection_order() {
        assert_eq!(BinaryTag::for_scalar("42"), BinaryTag::Int);
        assert_eq!(BinaryTag::for_scalar("-7"), BinaryTag::Int);
        assert_eq!(BinaryTag::for_scalar("3.5"), BinaryTag::Float);
        assert_eq!(BinaryTag::for_scalar("0.1"), BinaryTag::Float);
        assert_eq!(BinaryTag::for_scalar("3000000000"), BinaryTag::Float);
        assert_eq!(BinaryTag::for_scalar("0.30000000000000004"), BinaryTag::Double);
        assert_eq!(BinaryTag::for_scalar("true"), BinaryTag::Bool);
        assert_eq!(BinaryTag::for_scalar("True"), BinaryTag::String);
        assert_eq!(BinaryTag::for_scalar("007"), BinaryTag::String);
        assert_eq!(BinaryTag::for_scalar(""), BinaryTag::String);
    }

    #[test]
    fn test_int_layout() {
        let bytes = Node::from(258).to_bytes().unwrap();
        assert_eq!(bytes, vec![BinaryTag::Int as u8, 2, 1, 0, 0]);
    }

    #[test]
    fn test_object_layout() {
        let mut node = Node::object();
        node.insert("k", Node::from("v"));
        let bytes = node.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                BinaryTag::Object as u8, 1, 0, 0, 0,
                1, b'k',
                BinaryTag::String as u8, 1, b'v',
            ]
        );
    }

    #[test]
    fn test_long_string_uses_varint_length() {
        let text = "x".repeat(300);
        let bytes = Node::from(text.as_str()).to_bytes().unwrap();
        assert_eq!(&bytes[..3], &[BinaryTag::String as u8, 0xAC, 0x02]);
        assert_eq!(Node::from_bytes(&bytes).unwrap().value(), text);
    }

    #[test]
    fn test_subtypes_survive() {
        let node = crate::parse("[1, 2.5, 0.30000000000000004, false, \"s\"]").unwrap();
        let back = Node::from_bytes(&node.to_bytes().unwrap()).unwrap();
        let kinds: Vec<Kind> = back.children().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![Kind::Integer, Kind::Float, Kind::Float, Kind::Boolean, Kind::String]
        );
        assert_eq!(back, node);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Node::from_bytes(&[9]),
            Err(Error::UnknownTag { tag: 9, offset: 0 })
        ));
        assert!(matches!(
            Node::from_bytes(&[BinaryTag::Array as u8, 0xFF, 0xFF, 0xFF, 0xFF]),
            Err(Error::InvalidData { offset: 1, .. })
        ));
        assert!(matches!(
            Node::from_bytes(&[BinaryTag::Int as u8, 1, 2]),
            Err(Error::InvalidData { .. })
        ));
        assert!(matches!(
            Node::from_bytes(&[BinaryTag::String as u8, 2, 0xC3, 0x28]),
            Err(Error::InvalidData { offset: 2, .. })
        ));
        assert!(matches!(
            Node::from_bytes(&[BinaryTag::String as u8, 5, b'a']),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_lazy_root_encodes_as_empty_string() {
        let bytes = Node::default().to_bytes().unwrap();
        assert_eq!(bytes, vec![BinaryTag::String as u8, 0]);
    }
}
