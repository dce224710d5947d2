//! Arboris - HTML tree building and structural queries
//!
//! Pipeline:
//! A: Tokenizer scans the input into open/text/close events (`core`)
//! B: TreeBuilder turns events into an arena tree with Euler-tour times (`dom`)
//! C: Indexer fills tag/class/id tables as elements are created (`index`)
//! D: Query engine evaluates `QueryOptions` against the finished tree (`query`)
//! E: Parallel batch parsing and querying (`strategy`)
//!
//! ```
//! use arboris::{Document, QueryOptions, Tag};
//!
//! let doc = Document::parse("<div class=\"a\"><p>hi</p></div>");
//! assert!(doc.is_valid());
//!
//! let hits = doc.find(&QueryOptions::new().with_tags_any([Tag::P]));
//! assert_eq!(doc.text_content(hits[0]), Some("hi"));
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod index;
pub mod query;
pub mod strategy;

pub use crate::core::{is_void_tag, tag_from_name, Tag, TagSet, TokenHandler, Tokenizer};
pub use dom::{Document, Node, NodeId, NodeKind, NodeObserver, TreeBuilder};
pub use error::{ErrorKind, ParseError};
pub use index::{Indexer, Span};
pub use query::{find, find_all, QueryOptions, TextCondition};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Parse a document (lenient: partial structure is kept on failure)
pub fn parse(input: impl Into<Vec<u8>>) -> Document {
    Document::parse(input)
}

/// Parse a document, failing on any parse error or unclosed element
pub fn parse_strict(input: impl Into<Vec<u8>>) -> Result<Document, ParseError> {
    Document::parse_strict(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let doc = parse(
            "<html><body><div id=\"nav\" class=\"menu\"><a href=\"/\">Home</a>\
             <a href=\"/about\" class=\"active\">About</a></div></body></html>",
        );
        assert!(doc.is_parsed());
        assert!(doc.is_valid());

        let nav = doc.get_element_by_id("nav").unwrap();
        let links = doc.find_in(nav, &QueryOptions::new().with_tags_any([Tag::A]));
        assert_eq!(links.len(), 2);

        let active = doc.find(
            &QueryOptions::new()
                .with_tags_any([Tag::A])
                .with_classes_all(["active"])
                .with_attributes_all([("href", "/about")]),
        );
        assert_eq!(active.len(), 1);
        assert_eq!(doc.text_content(active[0]), Some("About"));
        assert!(doc.is_ancestor(nav, active[0]));
    }

    #[test]
    fn test_strict_rejects_unclosed() {
        assert!(parse_strict("<div>").is_err());
        assert!(parse_strict("<div></div>").is_ok());
    }
}
