//! SIMD-accelerated HTML scanning using memchr
//!
//! Stateless helpers over a byte buffer plus a positional `Scanner` that
//! the tokenizer drives. All positions are byte offsets into one buffer.

use memchr::memchr;

/// Check if byte is whitespace in the C `isspace` sense (space, tab, LF, VT, FF, CR)
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Skip whitespace starting at `pos`, returning the first non-whitespace position
#[inline]
pub fn skip_whitespace(buf: &[u8], mut pos: usize) -> usize {
    while pos < buf.len() && is_whitespace(buf[pos]) {
        pos += 1;
    }
    pos
}

/// Sub-slice `[start, end)`, clamped to the buffer; empty when the range is inverted
#[inline]
pub fn extract(buf: &[u8], start: usize, end: usize) -> &[u8] {
    let end = end.min(buf.len());
    if start >= end {
        return &[];
    }
    &buf[start..end]
}

/// Find the next occurrence of `ch` at or after `pos`
#[inline]
pub fn find_next_char(buf: &[u8], pos: usize, ch: u8) -> Option<usize> {
    if pos >= buf.len() {
        return None;
    }
    memchr(ch, &buf[pos..]).map(|i| pos + i)
}

/// Find the next byte at or after `pos` that is any of `set`
#[inline]
pub fn find_next_any_of(buf: &[u8], pos: usize, set: &[u8]) -> Option<usize> {
    if pos >= buf.len() {
        return None;
    }
    buf[pos..]
        .iter()
        .position(|b| set.contains(b))
        .map(|i| pos + i)
}

/// Find `ch` at or after `pos` and return the position just past it
#[inline]
pub fn skip_until_char(buf: &[u8], pos: usize, ch: u8) -> Option<usize> {
    find_next_char(buf, pos, ch).map(|found| found + 1)
}

/// Positional scanner over an input buffer
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the underlying input
    #[inline]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip whitespace characters
    #[inline]
    pub fn skip_whitespace(&mut self) {
        self.pos = skip_whitespace(self.input, self.pos);
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        find_next_char(self.input, self.pos, b'<')
    }

    /// Position just past the next '>' (tag end)
    ///
    /// Does not look at quotes: a '>' inside an attribute value ends the tag.
    #[inline]
    pub fn find_past_tag_end(&self) -> Option<usize> {
        skip_until_char(self.input, self.pos, b'>')
    }

    /// Advance over a name that ends at any of `delimiters` (or end of input)
    ///
    /// Returns the `[start, end)` range of the name, which may be empty.
    pub fn read_until_any(&mut self, delimiters: &[u8]) -> (usize, usize) {
        let start = self.pos;
        let end = find_next_any_of(self.input, start, delimiters).unwrap_or(self.input.len());
        self.pos = end.max(start);
        (start, self.pos)
    }
}
