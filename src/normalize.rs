//! Repair of double-encoded JSON before scanning.
//!
//! Tool payloads frequently arrive as JSON that was serialized a second time,
//! either as a complete string literal (`"{\"a\":1}"`) or with its quotes escaped
//! but no outer quotes (`{\"a\":1}`). Both shapes are detected here and rewritten
//! to plain JSON. The input is returned unchanged when neither applies.

use crate::ParseOptions;
use std::borrow::Cow;

pub(crate) fn normalize<'a>(text: &'a str, options: &ParseOptions) -> Cow<'a, str> {
    if options.unwrap_quoted {
        if let Some(unwrapped) = unwrap_quoted(text, options.unwrap_rounds) {
            return Cow::Owned(unwrapped);
        }
    }
    if options.unescape_bare {
        if let Some(unescaped) = unescape_bare(text) {
            tracing::debug!(len = text.len(), "unescaped bare escaped JSON");
            return Cow::Owned(unescaped);
        }
    }
    Cow::Borrowed(text)
}

/// Peels quote layers until a container appears, at most `rounds` times.
fn unwrap_quoted(text: &str, rounds: usize) -> Option<String> {
    let mut current = text.trim().to_string();
    for round in 1..=rounds {
        if !is_wrapped_in_quotes(&current) {
            break;
        }
        current = unescape(&current[1..current.len() - 1]).trim().to_string();
        if is_container_shaped(&current) {
            tracing::debug!(rounds = round, "unwrapped quoted JSON payload");
            return Some(current);
        }
    }
    None
}

fn unescape_bare(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    if !trimmed.contains("\\\"") || has_unescaped_quote(trimmed) {
        return None;
    }
    let unescaped = unescape(trimmed).trim().to_string();
    is_container_shaped(&unescaped).then_some(unescaped)
}

#[inline]
fn is_wrapped_in_quotes(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

fn is_container_shaped(text: &str) -> bool {
    text.len() > 1
        && ((text.starts_with('{') && text.ends_with('}'))
            || (text.starts_with('[') && text.ends_with(']')))
}

fn has_unescaped_quote(text: &str) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return true;
        }
    }
    false
}

/// Decodes JSON string escapes in `text`. Unknown escapes keep the escaped
/// character; a trailing lone backslash is kept.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices();
    while let Some((_, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((at, escaped)) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => match read_unicode_escape(&text[at + 1..]) {
                Some((decoded, used)) => {
                    out.push(decoded);
                    for _ in 0..used {
                        chars.next();
                    }
                }
                None => out.push('u'),
            },
            other => out.push(other),
        }
    }
    out
}

/// Reads the hex digits following `\u` at the start of `rest`.
///
/// Returns the decoded character and the number of bytes consumed. A high
/// surrogate followed by `\uXXXX` holding a low surrogate is combined into one
/// character; any other surrogate decodes to U+FFFD.
pub(crate) fn read_unicode_escape(rest: &str) -> Option<(char, usize)> {
    let high = hex4(rest)?;
    match high {
        0xD800..=0xDBFF => {
            let low = rest
                .get(4..)
                .and_then(|tail| tail.strip_prefix("\\u"))
                .and_then(hex4)
                .filter(|low| (0xDC00..=0xDFFF).contains(low));
            match low {
                Some(low) => {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    Some((char::from_u32(code).unwrap_or('\u{FFFD}'), 10))
                }
                None => Some(('\u{FFFD}', 4)),
            }
        }
        0xDC00..=0xDFFF => Some(('\u{FFFD}', 4)),
        code => Some((char::from_u32(code).unwrap_or('\u{FFFD}'), 4)),
    }
}

fn hex4(text: &str) -> Option<u32> {
    let digits = text.get(..4)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> String {
        normalize(text, &ParseOptions::default()).into_owned()
    }

    #[test]
    fn test_plain_json_is_borrowed() {
        let text = r#"{"a":"b"}"#;
        assert!(matches!(
            normalize(text, &ParseOptions::default()),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_unwrap_single_layer() {
        assert_eq!(run(r#""{\"a\":1}""#), r#"{"a":1}"#);
        assert_eq!(run(r#"  "[1,2]"  "#), "[1,2]");
    }

    #[test]
    fn test_unwrap_nested_layers() {
        let twice = r#""\"{\\\"a\\\":1}\"""#;
        assert_eq!(run(twice), r#"{"a":1}"#);
        let options = ParseOptions::default().with_unwrap_rounds(1);
        assert_eq!(normalize(twice, &options), twice);
    }

    #[test]
    fn test_quoted_non_container_untouched() {
        assert_eq!(run(r#""hello""#), r#""hello""#);
        assert_eq!(run(r#""""#), r#""""#);
    }

    #[test]
    fn test_bare_escaped_json() {
        assert_eq!(run(r#"{\"a\":\"b\"}"#), r#"{"a":"b"}"#);
        // A real quote anywhere disables the heuristic.
        let mixed = r#"{"a":"say \"hi\""}"#;
        assert_eq!(run(mixed), mixed);
    }

    #[test]
    fn test_strict_disables_both() {
        let options = ParseOptions::strict();
        assert_eq!(normalize(r#""{\"a\":1}""#, &options), r#""{\"a\":1}""#);
        assert_eq!(normalize(r#"{\"a\":1}"#, &options), r#"{\"a\":1}"#);
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape(r#"a\nb\tc\/d\\e\"f"#), "a\nb\tc/d\\e\"f");
        assert_eq!(unescape(r"\u0041\u00e9"), "A\u{e9}");
        assert_eq!(unescape(r"\ud83d\ude00"), "\u{1F600}");
        assert_eq!(unescape(r"\ud83dx"), "\u{FFFD}x");
        assert_eq!(unescape(r"\uZZ"), "uZZ");
        assert_eq!(unescape("end\\"), "end\\");
    }
}
