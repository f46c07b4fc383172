//! Evaluation of Python literal nodes.
//!
//! Docstrings, field descriptions, and literal type arguments are all read
//! from literal syntax without executing anything. This module turns those
//! nodes into the text Python's `str()` would give for the same value.
//!
//! # Supported Literals
//!
//! | Node kind | Example | Value |
//! |-----------|---------|-------|
//! | `string` | `'a\tb'` | `a<TAB>b` |
//! | `concatenated_string` | `"a" 'b'` | `ab` |
//! | `integer` | `0x1F`, `1_000` | `31`, `1000` |
//! | `float` | `1e20`, `2.` | `1e+20`, `2.0` |
//! | `true` / `false` / `none` | `None` | `None` |
//! | `ellipsis` | `...` | `Ellipsis` |
//!
//! Formatted strings (`f"..."`) have no static value and yield `None`.

use std::iter::Peekable;
use std::str::Chars;

use tree_sitter::Node;

/// Whether a string literal denotes text or bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// A `str` literal.
    Text,
    /// A `bytes` literal (`b"..."`).
    Bytes,
}

/// The decoded value of a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// Text or bytes.
    pub kind: StringKind,
    /// Decoded contents, without prefix or quotes.
    pub value: String,
}

impl StringLiteral {
    /// Renders the value the way `str()` would.
    ///
    /// Bytes keep their `b'...'` wrapper.
    #[must_use]
    pub fn display(&self) -> String {
        match self.kind {
            StringKind::Text => self.value.clone(),
            StringKind::Bytes => format!("b'{}'", self.value),
        }
    }
}

/// Returns the UTF-8 text of `node`, or an empty string if it is not valid UTF-8.
#[inline]
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or_default()
}

/// Looks through redundant parentheses, which Python's own parser discards.
pub(crate) fn unparenthesized(node: Node<'_>) -> Node<'_> {
    let mut node = node;
    while node.kind() == "parenthesized_expression" {
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Evaluates a `string` or `concatenated_string` node.
///
/// Returns `None` for formatted strings, for concatenations that mix text
/// and bytes, and for any other node kind.
#[must_use]
pub fn string_literal(node: Node<'_>, source: &[u8]) -> Option<StringLiteral> {
    match node.kind() {
        "string" => decode_string(node_text(node, source)),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut combined: Option<StringLiteral> = None;
            for part in node.named_children(&mut cursor) {
                if part.kind() != "string" {
                    continue;
                }
                let piece = decode_string(node_text(part, source))?;
                match combined.as_mut() {
                    None => combined = Some(piece),
                    Some(acc) if acc.kind == piece.kind => acc.value.push_str(&piece.value),
                    Some(_) => return None,
                }
            }
            combined
        }
        _ => None,
    }
}

/// Evaluates a node that must be a plain `str` literal.
#[must_use]
pub fn text_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    string_literal(unparenthesized(node), source)
        .filter(|literal| literal.kind == StringKind::Text)
        .map(|literal| literal.value)
}

/// Returns the `str()` rendering of any constant literal node.
#[must_use]
pub fn constant_text(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" | "concatenated_string" => string_literal(node, source).map(|s| s.display()),
        "integer" => Some(integer_text(node_text(node, source))),
        "float" => Some(float_text(node_text(node, source))),
        "true" => Some("True".to_owned()),
        "false" => Some("False".to_owned()),
        "none" => Some("None".to_owned()),
        "ellipsis" => Some("Ellipsis".to_owned()),
        _ => None,
    }
}

/// Decodes the full source text of one string token, prefix and quotes included.
fn decode_string(raw: &str) -> Option<StringLiteral> {
    let quote_at = raw.find(['\'', '"'])?;
    let (prefix, quoted) = raw.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();

    if prefix.contains('f') || prefix.contains('t') {
        return None;
    }

    let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        3
    } else {
        1
    };
    if quoted.len() < quote_len * 2 {
        return None;
    }
    let body = quoted.get(quote_len..quoted.len() - quote_len)?;
    let body = body.replace("\r\n", "\n");

    let kind = if prefix.contains('b') {
        StringKind::Bytes
    } else {
        StringKind::Text
    };
    let value = if prefix.contains('r') {
        body
    } else {
        unescape(&body, kind)
    };

    Some(StringLiteral { kind, value })
}

/// Resolves backslash escapes in a non-raw string body.
fn unescape(body: &str, kind: StringKind) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(&d) if ('0'..='7').contains(&d) => {
                            digits.push(d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                push_code_point(&mut out, u32::from_str_radix(&digits, 8).ok(), next, &digits);
            }
            'x' => push_hex_escape(&mut out, &mut chars, 'x', 2),
            'u' if kind == StringKind::Text => push_hex_escape(&mut out, &mut chars, 'u', 4),
            'U' if kind == StringKind::Text => push_hex_escape(&mut out, &mut chars, 'U', 8),
            other => {
                // Unknown escapes, and `\N{...}`, stay as written.
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Consumes exactly `width` hex digits after `\<marker>` and pushes the code point.
///
/// Malformed escapes are copied through unchanged.
fn push_hex_escape(out: &mut String, chars: &mut Peekable<Chars<'_>>, marker: char, width: usize) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.peek() {
            Some(&d) if d.is_ascii_hexdigit() => {
                digits.push(d);
                chars.next();
            }
            _ => break,
        }
    }

    let value = if digits.len() == width {
        u32::from_str_radix(&digits, 16).ok()
    } else {
        None
    };
    push_code_point(out, value, marker, &digits);
}

fn push_code_point(out: &mut String, value: Option<u32>, marker: char, digits: &str) {
    match value.and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => {
            out.push('\\');
            if marker.is_ascii_digit() {
                out.push_str(digits);
            } else {
                out.push(marker);
                out.push_str(digits);
            }
        }
    }
}

/// Normalises an integer token to its decimal value.
///
/// Imaginary literals (`3j`) are delegated to the float rules.
fn integer_text(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    if cleaned.ends_with(['j', 'J']) {
        return float_text(&cleaned);
    }
    let cleaned = cleaned.trim_end_matches(['l', 'L']);

    let lower = cleaned.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse::<u128>().ok()
    };

    match parsed {
        Some(value) => value.to_string(),
        None => {
            let trimmed = cleaned.trim_start_matches('0');
            if trimmed.is_empty() {
                "0".to_owned()
            } else {
                trimmed.to_owned()
            }
        }
    }
}

/// Renders a float (or imaginary) token the way Python's `repr` does.
fn float_text(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();

    if let Some(imag) = cleaned.strip_suffix(['j', 'J']) {
        let Ok(value) = imag.parse::<f64>() else {
            return cleaned;
        };
        let repr = python_float_repr(value);
        let repr = repr.strip_suffix(".0").unwrap_or(&repr);
        return format!("{repr}j");
    }

    match cleaned.parse::<f64>() {
        Ok(value) => python_float_repr(value),
        Err(_) => cleaned,
    }
}

/// Formats `value` like Python's `float.__repr__`.
///
/// Shortest round-trip digits; scientific notation when the decimal exponent
/// is below -4 or at least 16.
#[must_use]
pub fn python_float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_owned();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map_or((scientific.as_str(), 0), |(m, e)| {
            (m, e.parse::<i32>().unwrap_or_default())
        });

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}
