//! Span and lookup index module
//!
//! - `Span`: half-open byte range used by tokens, names and text
//! - `Indexer`: tag/class/id tables built while the tree is constructed

pub mod indexer;
pub mod span;

pub use indexer::Indexer;
pub use span::Span;
