//! Configuration options for rendering and parsing.
//!
//! - [`FormatOptions`]: indentation for the pretty JSON and YAML renderers
//! - [`ParseOptions`]: switches for the double-encoding repair heuristics
//!
//! ## Examples
//!
//! ```rust
//! use json_node::{parse, parse_with_options, FormatOptions, ParseOptions};
//!
//! let node = parse(r#"{"a":[1,2]}"#).unwrap();
//! let two_space = node.to_pretty_string_with(&FormatOptions::json().with_indent(2));
//! assert!(two_space.contains("\n  \"a\""));
//!
//! // Keep a quoted payload as a plain string instead of unwrapping it
//! let raw = parse_with_options(r#""{\"a\":1}""#, &ParseOptions::strict()).unwrap();
//! assert!(raw.is_scalar());
//! ```

/// Indentation settings for the multi-line renderers.
///
/// # Examples
///
/// ```rust
/// use json_node::FormatOptions;
///
/// assert_eq!(FormatOptions::json().indent, 4);
/// assert_eq!(FormatOptions::yaml().indent, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::json()
    }
}

impl FormatOptions {
    /// Creates default options (the pretty JSON preset).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Four spaces per level, used by [`Node::to_pretty_string`](crate::Node::to_pretty_string).
    #[must_use]
    pub const fn json() -> Self {
        FormatOptions { indent: 4 }
    }

    /// Two spaces per level, used by [`Node::to_yaml_string`](crate::Node::to_yaml_string).
    #[must_use]
    pub const fn yaml() -> Self {
        FormatOptions { indent: 2 }
    }

    /// Sets the number of spaces per nesting level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::FormatOptions;
    ///
    /// let options = FormatOptions::yaml().with_indent(4);
    /// assert_eq!(options.indent, 4);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub(crate) fn pad(&self, level: usize) -> String {
        " ".repeat(level * self.indent)
    }
}

/// Controls the normalization pass that runs before scanning.
///
/// Both heuristics are pattern matches rather than a grammar, so a genuine string
/// payload that happens to look like escaped JSON is rewritten too. Use
/// [`ParseOptions::strict`] when inputs are known to be well-formed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum quote layers peeled off a fully quoted payload.
    pub unwrap_rounds: usize,
    /// Unwrap text fully wrapped in quotes when its content is a container.
    pub unwrap_quoted: bool,
    /// Unescape bare `{\"k\":\"v\"}` text that has no unescaped quotes.
    pub unescape_bare: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            unwrap_rounds: 3,
            unwrap_quoted: true,
            unescape_bare: true,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables both normalization heuristics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_node::ParseOptions;
    ///
    /// let options = ParseOptions::strict();
    /// assert!(!options.unwrap_quoted);
    /// assert!(!options.unescape_bare);
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        ParseOptions {
            unwrap_quoted: false,
            unescape_bare: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_unwrap_rounds(mut self, rounds: usize) -> Self {
        self.unwrap_rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_unwrap_quoted(mut self, enabled: bool) -> Self {
        self.unwrap_quoted = enabled;
        self
    }

    #[must_use]
    pub fn with_unescape_bare(mut self, enabled: bool) -> Self {
        self.unescape_bare = enabled;
        self
    }
}
