//! YAML-like block rendering.
//!
//! The output is block-style YAML intended for human-readable tool responses.
//! It is not a YAML emitter and has no reader counterpart.
//!
//! ```rust
//! use json_node::parse;
//!
//! let node = parse(r#"{"name":"A","tags":["x","y"],"flag":"true","items":[{"id":1,"ok":false}]}"#).unwrap();
//! assert_eq!(
//!     node.to_yaml_string(),
//!     "name: A\ntags:\n  - x\n  - y\nflag: \"true\"\nitems:\n  - id: 1\n    ok: false"
//! );
//! ```

use crate::coerce::{self, Kind};
use crate::{FormatOptions, Node, Scalar};

impl Node {
    /// YAML-like text with two spaces per level.
    #[must_use]
    pub fn to_yaml_string(&self) -> String {
        self.to_yaml_string_with(&FormatOptions::yaml())
    }

    #[must_use]
    pub fn to_yaml_string_with(&self, options: &FormatOptions) -> String {
        let mut output = String::new();
        if is_block(self) {
            write_block(&mut output, self, options);
        } else {
            write_inline(&mut output, self);
        }
        output
    }
}

/// Non-empty containers are laid out over several lines.
fn is_block(node: &Node) -> bool {
    match node {
        Node::Array(_) | Node::Object(_) => !node.is_empty(),
        Node::Scalar(_) | Node::Lazy => false,
    }
}

/// A block container whose entries are still being written.
struct Block<'a> {
    entries: Box<dyn Iterator<Item = (&'a str, &'a Node)> + 'a>,
    keyed: bool,
    level: usize,
    /// The first entry continues the dash line of an enclosing list item.
    continues_line: bool,
    written: usize,
}

impl<'a> Block<'a> {
    fn new(node: &'a Node, level: usize, continues_line: bool) -> Self {
        Block {
            entries: node.iter(),
            keyed: node.is_object(),
            level,
            continues_line,
            written: 0,
        }
    }
}

/// Lays out a non-empty container, one entry per line.
///
/// An object inside a list puts its first key on the dash line and the rest
/// one level in. Nesting is tracked on a heap stack.
fn write_block(output: &mut String, root: &Node, options: &FormatOptions) {
    let mut stack = vec![Block::new(root, 0, false)];
    while let Some(block) = stack.last_mut() {
        let Some((key, value)) = block.entries.next() else {
            stack.pop();
            continue;
        };
        if block.written > 0 {
            output.push('\n');
        }
        if block.written > 0 || !block.continues_line {
            output.push_str(&options.pad(block.level));
        }
        block.written += 1;
        let level = block.level;

        if block.keyed {
            write_key(output, key);
            output.push(':');
            if is_block(value) {
                output.push('\n');
                stack.push(Block::new(value, level + 1, false));
            } else {
                output.push(' ');
                write_inline(output, value);
            }
            continue;
        }

        output.push('-');
        match value {
            Node::Object(_) if is_block(value) => {
                output.push(' ');
                stack.push(Block::new(value, level + 1, true));
            }
            Node::Array(_) if is_block(value) => {
                output.push('\n');
                stack.push(Block::new(value, level + 1, false));
            }
            _ => {
                output.push(' ');
                write_inline(output, value);
            }
        }
    }
}

fn write_inline(output: &mut String, node: &Node) {
    match node {
        Node::Scalar(s) => write_scalar(output, s),
        Node::Array(_) => output.push_str("[]"),
        Node::Object(_) => output.push_str("{}"),
        Node::Lazy => {}
    }
}

fn write_key(output: &mut String, key: &str) {
    let needs_quotes = key.is_empty()
        || key
            .chars()
            .any(|c| matches!(c, ':' | '#' | ' ' | '[' | ']' | '{' | '}'));
    if needs_quotes {
        output.push('"');
        output.push_str(&key.replace('"', "\\\""));
        output.push('"');
    } else {
        output.push_str(key);
    }
}

/// Values that came from JSON strings always go through string quoting, so a
/// string `"true"` never reads back as a boolean.
fn write_scalar(output: &mut String, scalar: &Scalar) {
    if scalar.is_quoted() {
        write_string(output, scalar.value());
        return;
    }
    match scalar.kind() {
        Kind::Null => output.push_str("null"),
        Kind::Boolean => output.push_str(&scalar.value().to_ascii_lowercase()),
        Kind::Integer | Kind::Float => output.push_str(scalar.value()),
        _ => write_string(output, scalar.value()),
    }
}

fn write_string(output: &mut String, value: &str) {
    if !needs_quotes(value) {
        output.push_str(value);
        return;
    }
    output.push('"');
    for c in value.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            _ => output.push(c),
        }
    }
    output.push('"');
}

const KEYWORDS: [&str; 8] = ["true", "false", "null", "~", "yes", "no", "on", "off"];

fn needs_quotes(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let special = value.chars().any(|c| {
        matches!(
            c,
            ':' | '#'
                | '['
                | ']'
                | '{'
                | '}'
                | ','
                | '&'
                | '*'
                | '!'
                | '|'
                | '>'
                | '\''
                | '"'
                | '%'
                | '@'
                | '`'
                | '\n'
                | '\r'
        )
    });
    special
        || value.starts_with(|c: char| matches!(c, '-' | '?' | ' '))
        || value.ends_with(' ')
        || KEYWORDS.iter().any(|k| value.eq_ignore_ascii_case(k))
        || coerce::looks_numeric(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_scalar_top_level() {
        assert_eq!(Node::from(5).to_yaml_string(), "5");
        assert_eq!(Node::from("plain").to_yaml_string(), "plain");
        assert_eq!(Node::null().to_yaml_string(), "null");
        assert_eq!(Node::object().to_yaml_string(), "{}");
    }

    #[test]
    fn test_string_quoting_rules() {
        let cases = [
            ("", "\"\""),
            ("a: b", "\"a: b\""),
            ("-dash", "\"-dash\""),
            (" padded", "\" padded\""),
            ("Yes", "\"Yes\""),
            ("~", "\"~\""),
            ("12", "\"12\""),
            ("1e5", "\"1e5\""),
            ("two\nlines", "\"two\\nlines\""),
            ("say \"hi\"", "\"say \\\"hi\\\"\""),
            ("hello world", "hello world"),
        ];
        for (input, expected) in cases {
            assert_eq!(Node::from(input).to_yaml_string(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_bare_tokens_keep_their_kind() {
        let node = parse("[true, 12, 2.5, null, TRUE, NaN]").unwrap();
        assert_eq!(
            node.to_yaml_string(),
            "- true\n- 12\n- 2.5\n- null\n- true\n- \"NaN\""
        );
    }

    #[test]
    fn test_key_quoting() {
        let node = parse(r#"{"a b":1,"c:d":2,"plain":3}"#).unwrap();
        assert_eq!(node.to_yaml_string(), "\"a b\": 1\n\"c:d\": 2\nplain: 3");
    }

    #[test]
    fn test_nested_layout() {
        let node = parse(r#"{"a":{"b":{"c":1},"d":[]},"e":[[1,2],{}]}"#).unwrap();
        let expected = "a:\n  b:\n    c: 1\n  d: []\ne:\n  -\n    - 1\n    - 2\n  - {}";
        assert_eq!(node.to_yaml_string(), expected);
    }

    #[test]
    fn test_object_item_with_nested_values() {
        let node = parse(r#"[{"id":1,"tags":["x"],"meta":{"k":"v"}}]"#).unwrap();
        let expected = "- id: 1\n  tags:\n    - x\n  meta:\n    k: v";
        assert_eq!(node.to_yaml_string(), expected);
    }

    #[test]
    fn test_custom_indent() {
        let node = parse(r#"{"a":{"b":1}}"#).unwrap();
        let text = node.to_yaml_string_with(&FormatOptions::yaml().with_indent(4));
        assert_eq!(text, "a:\n    b: 1");
    }
}
