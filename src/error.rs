//! Parse errors
//!
//! Stages talk to each other with booleans; the cause of the first failure
//! is kept as a `ParseError` so callers can see why a parse stopped.

use crate::core::tag::Tag;

/// Coarse classification of a `ParseError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty tag name or no terminating '>'
    MalformedTag,
    /// A scan reached end of input without its delimiter
    UnterminatedScan,
    /// Close or text token that breaks the open-element stack
    StackViolation,
    /// A token handler returned false
    ConsumerAbort,
    /// Elements left open at the end of input (strict mode)
    Incomplete,
    /// Input or tree too large for 32-bit offsets and ids
    LimitExceeded,
}

/// Why a parse session stopped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty tag name at byte {position}")]
    EmptyTagName { position: usize },

    #[error("tag at byte {position} has no terminating '>'")]
    UnterminatedTag { position: usize },

    #[error("text at byte {position} runs to end of input without a following tag")]
    UnterminatedText { position: usize },

    #[error("close tag </{tag}> at byte {position} has no open element")]
    UnexpectedClose { tag: Tag, position: usize },

    #[error("close tag </{found}> at byte {position} does not match open <{expected}>")]
    MismatchedClose {
        expected: Tag,
        found: Tag,
        position: usize,
    },

    #[error("text at byte {position} has no open element")]
    OrphanText { position: usize },

    #[error("token handler aborted at byte {position}")]
    Aborted { position: usize },

    #[error("{open} element(s) left unclosed at end of input")]
    Unclosed { open: usize },

    #[error("input of {len} bytes exceeds the limit of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    #[error("node limit of {max} reached at byte {position}")]
    TooManyNodes { max: usize, position: usize },
}

impl ParseError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::EmptyTagName { .. } | ParseError::UnterminatedTag { .. } => {
                ErrorKind::MalformedTag
            }
            ParseError::UnterminatedText { .. } => ErrorKind::UnterminatedScan,
            ParseError::UnexpectedClose { .. }
            | ParseError::MismatchedClose { .. }
            | ParseError::OrphanText { .. } => ErrorKind::StackViolation,
            ParseError::Aborted { .. } => ErrorKind::ConsumerAbort,
            ParseError::Unclosed { .. } => ErrorKind::Incomplete,
            ParseError::InputTooLarge { .. } | ParseError::TooManyNodes { .. } => {
                ErrorKind::LimitExceeded
            }
        }
    }

    /// Byte offset where the failing construct started, if any
    pub fn position(&self) -> Option<usize> {
        match *self {
            ParseError::EmptyTagName { position }
            | ParseError::UnterminatedTag { position }
            | ParseError::UnterminatedText { position }
            | ParseError::UnexpectedClose { position, .. }
            | ParseError::MismatchedClose { position, .. }
            | ParseError::OrphanText { position }
            | ParseError::Aborted { position }
            | ParseError::TooManyNodes { position, .. } => Some(position),
            ParseError::Unclosed { .. } | ParseError::InputTooLarge { .. } => None,
        }
    }
}
