//! Span Buffer - owned byte arena for materialized text
//!
//! Text that cannot be a single zero-copy span into the input (an element's
//! own text gathered from several runs) is copied here. Spans issued by the
//! buffer are offsets, so they stay valid across any reallocation.
//!
//! The buffer reserves the input length up front: without entity decoding,
//! materialized text is never larger than the input it came from.

use crate::index::Span;
use tracing::debug;

/// Append-only byte arena handing out `Span`s into itself
#[derive(Debug, Default, Clone)]
pub struct SpanBuffer {
    data: Vec<u8>,
    reserved: usize,
}

impl SpanBuffer {
    /// Create an empty buffer with no reservation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer reserving `capacity` bytes (normally the input length)
    pub fn with_capacity(capacity: usize) -> Self {
        SpanBuffer {
            data: Vec::with_capacity(capacity),
            reserved: capacity,
        }
    }

    /// Current write position
    #[inline]
    pub fn cursor(&self) -> u32 {
        self.data.len() as u32
    }

    /// Copy `bytes` into the buffer, returning the span of the written region
    pub fn append(&mut self, bytes: &[u8]) -> Span {
        let begin = self.data.len();
        if begin + bytes.len() > self.reserved {
            debug!(
                reserved = self.reserved,
                needed = begin + bytes.len(),
                "span buffer grew past its reservation"
            );
            self.reserved = begin + bytes.len();
        }
        self.data.extend_from_slice(bytes);
        Span::from_range(begin, self.data.len())
    }

    /// Resolve a span issued by this buffer
    #[inline]
    pub fn get(&self, span: Span) -> &[u8] {
        span.slice(&self.data)
    }

    /// Bytes written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_span() {
        let mut buf = SpanBuffer::with_capacity(32);
        let hello = buf.append(b"hello");
        let world = buf.append(b"world");

        assert_eq!(hello, Span::new(0, 5));
        assert_eq!(world, Span::new(5, 10));
        assert_eq!(buf.get(hello), b"hello");
        assert_eq!(buf.get(world), b"world");
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_cursor_builds_incremental_spans() {
        let mut buf = SpanBuffer::with_capacity(16);
        buf.append(b"xx");
        let start = buf.cursor();
        buf.append(b"foo ");
        buf.append(b"bar");
        let joined = Span::new(start, buf.cursor());
        assert_eq!(buf.get(joined), b"foo bar");
    }

    #[test]
    fn test_spans_survive_growth() {
        let mut buf = SpanBuffer::with_capacity(4);
        let first = buf.append(b"abcd");
        for _ in 0..100 {
            buf.append(b"0123456789");
        }
        assert_eq!(buf.get(first), b"abcd");
    }

    #[test]
    fn test_empty() {
        let mut buf = SpanBuffer::new();
        assert!(buf.is_empty());
        let span = buf.append(b"");
        assert!(span.is_empty());
        assert_eq!(buf.get(span), b"");
        assert_eq!(buf.get(Span::new(3, 9)), b"");
    }
}
