//! DOM Module - Arena-based HTML Document
//!
//! Implements the tree side of the pipeline:
//! - Arena allocation for nodes, `NodeId` (u32) indices
//! - Stack-discipline builder with Euler-tour timestamps
//! - Span buffer for text that cannot stay zero-copy
//! - `Document`, the owned result of one parse session

pub mod builder;
pub mod document;
pub mod node;
pub mod strings;

pub use builder::{BuiltTree, NodeObserver, TreeBuilder, MAX_NODES};
pub use document::Document;
pub use node::{ElementData, Node, NodeId, NodeKind, TextData, TextRef};
pub use strings::SpanBuffer;
