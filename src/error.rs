//! Error types for parsing, binary decoding and typed extraction.
//!
//! Parsing is lenient by design, so only two conditions abort it:
//!
//! - **Unterminated string**: input ended while still inside a quoted string
//! - **Unbalanced bracket**: a `}` or `]` arrived with no open container
//!
//! Both carry the line and column where the problem was detected. The remaining
//! variants come from the binary decoder and from [`to_typed`](crate::to_typed).
//!
//! ## Examples
//!
//! ```rust
//! use json_node::{parse, Error};
//!
//! let result = parse("{\"a\":1}}");
//! assert!(matches!(result, Err(Error::UnbalancedBracket { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents every error this crate can return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input ended while a quoted string was still open.
    #[error("Unterminated string starting at line {line}, column {col}")]
    UnterminatedString { line: usize, col: usize },

    /// A closing bracket arrived with no matching open container.
    #[error("Unbalanced closing bracket '{bracket}' at line {line}, column {col}")]
    UnbalancedBracket {
        line: usize,
        col: usize,
        bracket: char,
    },

    /// Unknown tag byte in the binary encoding.
    #[error("Unknown binary tag 0x{tag:02X} at byte offset {offset}")]
    UnknownTag { tag: u8, offset: u64 },

    /// Structurally invalid binary payload (negative count, bad UTF-8, overlong length).
    #[error("Invalid binary data at byte offset {offset}: {msg}")]
    InvalidData { offset: u64, msg: String },

    /// A node could not be extracted as the requested Rust type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unterminated-string error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::Error;
    ///
    /// let err = Error::unterminated_string(3, 7);
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn unterminated_string(line: usize, col: usize) -> Self {
        Error::UnterminatedString { line, col }
    }

    /// Creates an unbalanced-bracket error for the offending `bracket`.
    pub fn unbalanced_bracket(line: usize, col: usize, bracket: char) -> Self {
        Error::UnbalancedBracket { line, col, bracket }
    }

    pub fn unknown_tag(tag: u8, offset: u64) -> Self {
        Error::UnknownTag { tag, offset }
    }

    pub fn invalid_data(offset: u64, msg: &str) -> Self {
        Error::InvalidData {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates a type mismatch error when extraction fails due to incompatible shapes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::Error;
    ///
    /// let err = Error::type_mismatch("array", "string");
    /// assert!(err.to_string().contains("expected array"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for the two conditions that abort parsing.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::UnterminatedString { .. } | Error::UnbalancedBracket { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(err)
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_classification() {
        assert!(Error::unterminated_string(1, 1).is_parse_error());
        assert!(Error::unbalanced_bracket(1, 8, '}').is_parse_error());
        assert!(!Error::unknown_tag(9, 0).is_parse_error());
        assert!(!Error::custom("x").is_parse_error());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = Error::unbalanced_bracket(2, 5, ']');
        let msg = err.to_string();
        assert!(msg.contains("']'"));
        assert!(msg.contains("line 2"));
        assert!(msg.contains("column 5"));

        let err = Error::unknown_tag(0x2a, 17);
        assert!(err.to_string().contains("0x2A"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(ref m) if m.contains("short read")));
    }
}
