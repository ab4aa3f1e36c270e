//! Kind inference and lenient typed views over a scalar's text.
//!
//! Every scalar stores its value as a string. The functions here turn that string
//! into typed views with deterministic fallbacks: numeric parses that fail yield
//! zero, and a boolean parse that fails yields "the string is non-empty".

use std::fmt;

/// Classification of a node.
///
/// Scalars are classified from their text in the priority order
/// `Null -> Boolean -> Integer -> Float -> String`; containers report
/// `Array` or `Object`.
///
/// # Examples
///
/// ```rust
/// use json_node::{Kind, Node};
///
/// assert_eq!(Node::from("42").kind(), Kind::Integer);
/// assert_eq!(Node::from("4.2").kind(), Kind::Float);
/// assert_eq!(Node::from("True").kind(), Kind::Boolean);
/// assert_eq!(Node::from("").kind(), Kind::Null);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Object,
    Array,
    String,
    Integer,
    Float,
    Boolean,
}

impl Kind {
    #[inline]
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self, Kind::Integer | Kind::Float)
    }

    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Object)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies scalar text.
pub(crate) fn classify(text: &str) -> Kind {
    if is_null_text(text) {
        Kind::Null
    } else if parse_bool_strict(text).is_some() {
        Kind::Boolean
    } else if is_numeric_literal(text) {
        if text.parse::<i32>().is_ok() {
            Kind::Integer
        } else {
            Kind::Float
        }
    } else {
        Kind::String
    }
}

#[inline]
pub(crate) fn is_null_text(text: &str) -> bool {
    text.is_empty() || text == "null"
}

/// `true`/`false` in any ASCII case.
pub(crate) fn parse_bool_strict(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Text that may be emitted unquoted as a JSON number.
///
/// Follows the JSON number grammar, `-?(0|[1-9][0-9]*)(.[0-9]+)?([eE][+-]?[0-9]+)?`,
/// so `01`, `1.`, `.5`, `+5`, `NaN` and `inf` stay strings. The value must also
/// be finite as an `f64`.
pub(crate) fn is_numeric_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let start = usize::from(bytes.first() == Some(&b'-'));
    let mut at = skip_digits(bytes, start);
    let integer = &bytes[start..at];
    if integer.is_empty() || (integer.len() > 1 && integer[0] == b'0') {
        return false;
    }
    if bytes.get(at) == Some(&b'.') {
        let end = skip_digits(bytes, at + 1);
        if end == at + 1 {
            return false;
        }
        at = end;
    }
    if matches!(bytes.get(at), Some(b'e' | b'E')) {
        at += 1;
        if matches!(bytes.get(at), Some(b'+' | b'-')) {
            at += 1;
        }
        let end = skip_digits(bytes, at);
        if end == at {
            return false;
        }
        at = end;
    }
    at == bytes.len() && text.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

fn skip_digits(bytes: &[u8], from: usize) -> usize {
    from + bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Anything Rust's float parser accepts, including `NaN` and `inf`.
pub(crate) fn looks_numeric(text: &str) -> bool {
    text.parse::<i64>().is_ok() || text.parse::<f64>().is_ok()
}

#[inline]
pub(crate) fn parse_int(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

#[inline]
pub(crate) fn parse_long(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

#[inline]
pub(crate) fn parse_ulong(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}

#[inline]
pub(crate) fn parse_float(text: &str) -> f32 {
    text.trim().parse().unwrap_or(0.0)
}

#[inline]
pub(crate) fn parse_double(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

/// Falls back to "non-empty" rather than `false`.
#[inline]
pub(crate) fn parse_bool(text: &str) -> bool {
    parse_bool_strict(text.trim()).unwrap_or(!text.is_empty())
}

#[inline]
pub(crate) fn render_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify(""), Kind::Null);
        assert_eq!(classify("null"), Kind::Null);
        assert_eq!(classify("true"), Kind::Boolean);
        assert_eq!(classify("FALSE"), Kind::Boolean);
        assert_eq!(classify("0"), Kind::Integer);
        assert_eq!(classify("-17"), Kind::Integer);
        assert_eq!(classify("3.5"), Kind::Float);
        assert_eq!(classify("1e3"), Kind::Float);
        assert_eq!(classify("99999999999"), Kind::Float);
        assert_eq!(classify("abc"), Kind::String);
        assert_eq!(classify("Null"), Kind::String);
    }

    #[test]
    fn test_non_json_numbers_stay_strings() {
        assert_eq!(classify("+5"), Kind::String);
        assert_eq!(classify("NaN"), Kind::String);
        assert_eq!(classify("inf"), Kind::String);
        assert_eq!(classify(" 5"), Kind::String);
        assert_eq!(classify("1e400"), Kind::String);
        assert_eq!(classify("-"), Kind::String);
    }

    #[test]
    fn test_number_grammar_is_strict() {
        for text in ["0", "-0", "10", "0.5", "-1.25e-3", "2E+8", "12345678901234567891"] {
            assert!(is_numeric_literal(text), "{text}");
        }
        for text in ["01", "-012", "1.", "-.5", ".5", "1e", "1e+", "1.e3", "--1", "1-2", "0x10", "1_000"] {
            assert!(!is_numeric_literal(text), "{text}");
        }
        assert_eq!(classify("007"), Kind::String);
        assert_eq!(classify("1."), Kind::String);
    }

    #[test]
    fn test_numeric_fallbacks() {
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("3.5"), 0);
        assert_eq!(parse_long("9000000000"), 9_000_000_000);
        assert_eq!(parse_float("2.5"), 2.5);
        assert_eq!(parse_double("x"), 0.0);
    }

    #[test]
    fn test_bool_fallback_is_non_empty() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("false"));
        assert!(parse_bool("abc"));
        assert!(parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("12"));
        assert!(looks_numeric("1.5e-3"));
        assert!(looks_numeric("NaN"));
        assert!(!looks_numeric("12a"));
    }
}
