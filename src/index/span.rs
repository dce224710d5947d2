//! Span - half-open byte range into a buffer
//!
//! Zero-copy reference to a portion of the input document (or of a
//! `SpanBuffer`). Used for tokens, tag names, attributes and text content.

/// A half-open `[begin, end)` byte range.
///
/// Offsets are `u32`; the tokenizer refuses inputs longer than
/// `MAX_INPUT_LEN` so every offset it hands out fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte
    pub begin: u32,
    /// Byte offset one past the last byte
    pub end: u32,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }

    /// Create a span from `usize` offsets
    ///
    /// Offsets must fit in `u32`.
    #[inline]
    pub fn from_range(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "inverted span {begin}..{end}");
        debug_assert!(end <= u32::MAX as usize, "span end {end} exceeds u32");
        Self::new(begin as u32, end as u32)
    }

    /// Create an empty span (used for "no value")
    #[inline]
    pub const fn empty() -> Self {
        Self { begin: 0, end: 0 }
    }

    /// Length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.begin) as usize
    }

    /// Check if this span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// Extract the byte slice from input
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        let start = self.begin as usize;
        let end = self.end as usize;
        if start <= end && end <= input.len() {
            &input[start..end]
        } else {
            &[]
        }
    }

    /// Extract as UTF-8 string from input
    #[inline]
    pub fn as_str<'a>(&self, input: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.slice(input)).ok()
    }
}
