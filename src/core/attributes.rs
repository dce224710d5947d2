//! HTML Attribute Parsing
//!
//! Splits the region between a tag name and its '>' into attribute
//! name/value spans. Values are kept raw: no entity decoding.

use super::scanner::is_whitespace;
use crate::index::Span;

/// A parsed attribute as spans into the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name
    pub name: Span,
    /// Attribute value without quotes (empty for boolean attributes)
    pub value: Span,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: Span, value: Span) -> Self {
        Attribute { name, value }
    }
}

/// Check if byte can appear in an attribute name
#[inline]
fn is_name_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'=' | b'/' | b'>' | b'"' | b'\'' | b'<')
}

/// Parse attributes from `input[start..end]`
///
/// `start` is just past the tag name, `end` is the position of '>'.
/// Returned spans are absolute offsets into `input`.
pub fn parse_attributes(input: &[u8], start: usize, end: usize) -> Vec<Attribute> {
    let mut attrs = Vec::new();
    let end = end.min(input.len());
    let mut pos = start;

    while pos < end {
        // Skip whitespace and stray slashes (self-closing marker)
        while pos < end && (is_whitespace(input[pos]) || input[pos] == b'/') {
            pos += 1;
        }

        if pos >= end {
            break;
        }

        // Parse attribute name
        let name_start = pos;
        while pos < end && is_name_char(input[pos]) {
            pos += 1;
        }

        if pos == name_start {
            // Junk such as a lone quote or '='; skip it
            pos += 1;
            continue;
        }

        let name = Span::from_range(name_start, pos);

        // Skip whitespace around '='
        let after_name = pos;
        while pos < end && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= end || input[pos] != b'=' {
            // Attribute without value (HTML boolean attribute)
            attrs.push(Attribute::new(name, Span::from_range(after_name, after_name)));
            pos = after_name;
            continue;
        }

        pos += 1; // Skip '='

        while pos < end && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= end {
            attrs.push(Attribute::new(name, Span::from_range(end, end)));
            break;
        }

        let quote = input[pos];
        if quote != b'"' && quote != b'\'' {
            // Unquoted value
            let value_start = pos;
            while pos < end && !is_whitespace(input[pos]) {
                pos += 1;
            }
            // A trailing '/' belongs to "/>" rather than the value
            let mut value_end = pos;
            if value_end == end && value_end > value_start && input[value_end - 1] == b'/' {
                value_end -= 1;
            }
            attrs.push(Attribute::new(name, Span::from_range(value_start, value_end)));
            continue;
        }

        pos += 1; // Skip opening quote
        let value_start = pos;
        while pos < end && input[pos] != quote {
            pos += 1;
        }
        attrs.push(Attribute::new(name, Span::from_range(value_start, pos)));

        if pos < end {
            pos += 1; // Skip closing quote
        }
    }

    attrs
}
