//! HTML Tokenizer - push-style scanner for open/text/close tag events
//!
//! Scans the input left to right with three states:
//! - Text: anything up to the next '<'
//! - Open tag: `<name ...>`
//! - Close tag: `</name ...>`
//!
//! Each token is moved into a `TokenHandler`. A handler returning `false`
//! aborts the scan immediately.

use super::attributes::{parse_attributes, Attribute};
use super::scanner::{extract, Scanner};
use super::tag::{is_void_tag, tag_from_name, Tag};
use crate::error::ParseError;
use crate::index::Span;
use tracing::debug;

/// Delimiters that end an open tag name
const OPEN_NAME_DELIMITERS: &[u8] = b" />\t\r\n";

/// Delimiters that end a close tag name
const CLOSE_NAME_DELIMITERS: &[u8] = b"> \t\r\n";

/// Largest input the tokenizer accepts
///
/// Offsets are `u32`. Every node takes at least one input byte and two
/// Euler ticks, so half the `u32` range keeps the builder's timer in range too.
pub const MAX_INPUT_LEN: usize = (u32::MAX / 2) as usize;

fn check_input_len(len: usize) -> Result<(), ParseError> {
    if len > MAX_INPUT_LEN {
        return Err(ParseError::InputTooLarge {
            len,
            max: MAX_INPUT_LEN,
        });
    }
    Ok(())
}

/// `<name attr=...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenToken {
    /// Whole tag, from '<' to just past '>'
    pub span: Span,
    /// Raw tag name as written
    pub name: Span,
    pub tag: Tag,
    pub is_void: bool,
    pub attributes: Vec<Attribute>,
}

/// Run of text between tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextToken {
    pub span: Span,
}

/// `</name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseToken {
    /// Whole tag, from '<' to just past '>'
    pub span: Span,
    /// Raw tag name as written
    pub name: Span,
    pub tag: Tag,
}

/// Consumer of tokenizer events
///
/// Every method returns `true` to continue or `false` to abort the scan.
/// The defaults accept everything, so a handler only overrides the events
/// it cares about.
pub trait TokenHandler {
    /// Called for each open tag
    fn on_open(&mut self, _token: OpenToken) -> bool {
        true
    }

    /// Called for each non-empty text run
    fn on_text(&mut self, _token: TextToken) -> bool {
        true
    }

    /// Called for each close tag
    fn on_close(&mut self, _token: CloseToken) -> bool {
        true
    }
}

/// No consumer: the scan succeeds or fails on syntax alone
impl TokenHandler for () {}

/// HTML tokenizer over a borrowed input buffer
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    error: Option<ParseError>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            error: None,
        }
    }

    /// Get the input being scanned
    #[inline]
    pub fn input(&self) -> &'a [u8] {
        self.scanner.input()
    }

    /// Cause of the last failed `parse`, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Byte offset reached by the last scan
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Scan the whole input, feeding `handler`
    ///
    /// Returns `true` iff the scan reached end of input with no syntax
    /// failure and no handler abort. Each call rescans from the start.
    pub fn parse<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> bool {
        self.scanner.set_position(0);
        self.error = None;

        debug!(len = self.input().len(), "tokenizer scan started");

        match check_input_len(self.input().len()).and_then(|()| self.run(handler)) {
            Ok(()) => {
                debug!("tokenizer scan finished");
                true
            }
            Err(err) => {
                debug!(%err, "tokenizer scan failed");
                self.error = Some(err);
                false
            }
        }
    }

    fn run<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        while !self.scanner.is_eof() {
            if self.scanner.peek() != Some(b'<') {
                self.scan_text(handler)?;
            } else if self.scanner.peek_at(1) == Some(b'/') {
                self.scan_close(handler)?;
            } else {
                self.scan_open(handler)?;
            }
        }
        Ok(())
    }

    /// Text state: everything up to the next '<'
    ///
    /// Text that runs to end of input is still emitted, then the scan fails.
    fn scan_text<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_start();
        let stop = end.unwrap_or(self.input().len());

        if stop > start {
            let token = TextToken {
                span: Span::from_range(start, stop),
            };
            if !handler.on_text(token) {
                return Err(ParseError::Aborted { position: start });
            }
        }

        self.scanner.set_position(stop);
        match end {
            Some(_) => Ok(()),
            None => Err(ParseError::UnterminatedText { position: start }),
        }
    }

    /// Read a tag name after `prefix_len` bytes of '<' or '</'
    ///
    /// On success the scanner sits just past the terminating '>'.
    fn scan_tag(&mut self, prefix_len: usize, delimiters: &[u8]) -> Result<TagBounds, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(prefix_len);
        self.scanner.skip_whitespace();

        let (name_start, name_end) = self.scanner.read_until_any(delimiters);
        if name_start == name_end {
            return Err(ParseError::EmptyTagName { position: start });
        }

        let end = self
            .scanner
            .find_past_tag_end()
            .ok_or(ParseError::UnterminatedTag { position: start })?;
        self.scanner.set_position(end);

        Ok(TagBounds {
            start,
            name_start,
            name_end,
            end,
        })
    }

    fn scan_open<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        let bounds = self.scan_tag(1, OPEN_NAME_DELIMITERS)?;

        let input = self.input();
        let tag = tag_from_name(extract(input, bounds.name_start, bounds.name_end));
        let attributes = parse_attributes(input, bounds.name_end, bounds.end - 1);

        let token = OpenToken {
            span: Span::from_range(bounds.start, bounds.end),
            name: Span::from_range(bounds.name_start, bounds.name_end),
            tag,
            is_void: is_void_tag(tag),
            attributes,
        };
        if !handler.on_open(token) {
            return Err(ParseError::Aborted { position: bounds.start });
        }
        Ok(())
    }

    fn scan_close<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        let bounds = self.scan_tag(2, CLOSE_NAME_DELIMITERS)?;

        let tag = tag_from_name(extract(self.input(), bounds.name_start, bounds.name_end));

        let token = CloseToken {
            span: Span::from_range(bounds.start, bounds.end),
            name: Span::from_range(bounds.name_start, bounds.name_end),
            tag,
        };
        if !handler.on_close(token) {
            return Err(ParseError::Aborted { position: bounds.start });
        }
        Ok(())
    }
}

/// Offsets of one scanned tag
struct TagBounds {
    /// The '<'
    start: usize,
    name_start: usize,
    name_end: usize,
    /// Just past the '>'
    end: usize,
}
