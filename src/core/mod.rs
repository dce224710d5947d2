//! Core HTML scanning primitives
//!
//! This module contains the building blocks the tree builder consumes:
//! - Scanner: memchr-backed delimiter search and whitespace skipping
//! - Tag: closed tag catalog, `TagSet` bitset, void classification
//! - Attributes: attribute spans inside an open tag
//! - Tokenizer: push-style open/text/close state machine

pub mod attributes;
pub mod scanner;
pub mod tag;
pub mod tokenizer;

pub use attributes::Attribute;
pub use tag::{is_void_tag, tag_from_name, Tag, TagSet, VOID_TAGS};
pub use tokenizer::{CloseToken, OpenToken, TextToken, TokenHandler, Tokenizer, MAX_INPUT_LEN};
