//! HTML Document - one parse session
//!
//! Owns the input, the node arena, the span buffer and the index. Parsing
//! wires tokenizer, builder and indexer together; afterwards the document
//! is read-only and can be shared across threads.

use super::builder::TreeBuilder;
use super::node::{Node, NodeId, NodeKind, TextRef};
use super::strings::SpanBuffer;
use crate::core::tag::Tag;
use crate::core::tokenizer::Tokenizer;
use crate::error::ParseError;
use crate::index::Indexer;
use crate::query::{self, QueryOptions};
use std::borrow::Cow;
use tracing::debug;

/// Parsed HTML document
#[derive(Debug, Clone)]
pub struct Document {
    input: Vec<u8>,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    strings: SpanBuffer,
    index: Indexer,
    parsed: bool,
    valid: bool,
    error: Option<ParseError>,
}

impl Document {
    /// Parse a document, keeping whatever structure was built on failure
    pub fn parse(input: impl Into<Vec<u8>>) -> Self {
        let input = input.into();
        debug!(len = input.len(), "parse session started");

        let (tree, parsed, valid, error) = {
            let mut builder = TreeBuilder::new(&input);
            let mut tokenizer = Tokenizer::new(&input);
            let parsed = tokenizer.parse(&mut builder);
            let valid = builder.validate();
            // The builder knows why it aborted the scan
            let error = builder.error().or(tokenizer.error()).cloned();
            (builder.finish(), parsed, valid, error)
        };
        // builder and tokenizer are dropped here, releasing the borrow on input

        debug!(
            parsed,
            valid,
            nodes = tree.nodes.len(),
            error = error.as_ref().map(tracing::field::display),
            "parse session finished"
        );

        Document {
            input,
            nodes: tree.nodes,
            roots: tree.roots,
            strings: tree.strings,
            index: tree.observer,
            parsed,
            valid,
            error,
        }
    }

    /// Parse a document, failing on any parse error or unclosed element
    pub fn parse_strict(input: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        let doc = Self::parse(input);
        if let Some(err) = &doc.error {
            return Err(err.clone());
        }
        if !doc.valid {
            let open = doc.nodes.iter().filter(|n| n.is_element() && !n.is_closed()).count();
            return Err(ParseError::Unclosed { open });
        }
        Ok(doc)
    }

    /// The scan reached end of input without failure
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Every opened element was closed
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Why the scan stopped, if it failed
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Original input bytes
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Get a node by ID
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// All nodes in creation (pre-order) order
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node count
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a node (empty for text nodes and unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Ancestors from nearest to outermost
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Descendants in pre-order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let root = self.node(id);
        let start = (id as usize).saturating_add(1).min(self.nodes.len());
        self.nodes[start..]
            .iter()
            .take_while(move |n| root.is_some_and(|r| r.contains(n)))
            .map(|n| n.id)
    }

    /// Check if `ancestor` is a proper ancestor of `descendant`
    pub fn is_ancestor(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        match (self.node(ancestor), self.node(descendant)) {
            (Some(a), Some(d)) => ancestor != descendant && a.contains(d),
            _ => false,
        }
    }

    /// Raw bytes of a text node, or of an element's own text
    ///
    /// None when the node is missing or the element has no own text.
    pub fn text_bytes(&self, id: NodeId) -> Option<&[u8]> {
        match &self.node(id)?.kind {
            NodeKind::Text(text) => Some(text.span.slice(&self.input)),
            NodeKind::Element(element) => match element.text? {
                TextRef::Input(span) => Some(span.slice(&self.input)),
                TextRef::Pooled(span) => Some(self.strings.get(span)),
            },
        }
    }

    /// Text of a text node, or an element's own text
    ///
    /// None also when the bytes are not valid UTF-8; see `text_lossy`.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        std::str::from_utf8(self.text_bytes(id)?).ok()
    }

    /// Like `text_content`, replacing invalid UTF-8 with U+FFFD
    pub fn text_lossy(&self, id: NodeId) -> Option<Cow<'_, str>> {
        self.text_bytes(id).map(String::from_utf8_lossy)
    }

    /// Tag name as written in the input
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.as_element()?.name.as_str(&self.input)
    }

    /// Get attribute value by (lowercase) name
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.as_element()?.attribute(name)
    }

    /// First element declaring `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.index.by_id(id)
    }

    /// Elements with `tag`, in document order
    pub fn elements_by_tag(&self, tag: Tag) -> &[NodeId] {
        self.index.by_tag(tag).unwrap_or_default()
    }

    /// Elements carrying `class`, in document order
    pub fn elements_by_class(&self, class: &str) -> &[NodeId] {
        self.index.by_class(class).unwrap_or_default()
    }

    pub fn index(&self) -> &Indexer {
        &self.index
    }

    /// Pooled text storage
    pub fn strings(&self) -> &SpanBuffer {
        &self.strings
    }

    /// Query the whole document
    pub fn find(&self, options: &QueryOptions) -> Vec<NodeId> {
        query::find_all(self, options)
    }

    /// Query the subtree of `root` (inclusive)
    pub fn find_in(&self, root: NodeId, options: &QueryOptions) -> Vec<NodeId> {
        query::find(self, root, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_simple() {
        let doc = Document::parse("<div><p>hi</p></div>");
        assert!(doc.is_parsed());
        assert!(doc.is_valid());
        assert!(doc.error().is_none());
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.roots(), &[0]);
        assert_eq!(doc.children(0), &[1]);
        assert_eq!(doc.children(1), &[2]);
        assert_eq!(doc.text_content(1), Some("hi"));
        assert_eq!(doc.text_content(2), Some("hi"));
        assert_eq!(doc.text_content(0), None);
    }

    #[test]
    fn test_parse_empty() {
        let doc = Document::parse("");
        assert!(doc.is_parsed());
        assert!(doc.is_valid());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_multiple_roots() {
        let doc = Document::parse("<p></p><br><p></p>");
        assert!(doc.is_valid());
        assert_eq!(doc.roots(), &[0, 1, 2]);
        assert_eq!(doc.parent(1), None);
    }

    #[test]
    fn test_mismatch_reports_builder_cause() {
        let doc = Document::parse("<div><p></div>");
        assert!(!doc.is_parsed());
        assert!(!doc.is_valid());
        assert_eq!(
            doc.error(),
            Some(&ParseError::MismatchedClose {
                expected: Tag::P,
                found: Tag::Div,
                position: 8
            })
        );
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_orphan_text() {
        let doc = Document::parse("hello<p></p>");
        assert!(!doc.is_parsed());
        assert!(doc.is_valid());
        assert_eq!(doc.error().map(ParseError::kind), Some(ErrorKind::StackViolation));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_trailing_text_keeps_tree() {
        let doc = Document::parse("<p>a</p>\n");
        assert!(!doc.is_parsed());
        assert!(doc.is_valid());
        assert_eq!(doc.error(), Some(&ParseError::OrphanText { position: 8 }));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_strict() {
        assert!(Document::parse_strict("<div><p></p></div>").is_ok());
        assert_eq!(
            Document::parse_strict("<div><p></p>").unwrap_err(),
            ParseError::Unclosed { open: 1 }
        );
        assert_eq!(
            Document::parse_strict("<div").unwrap_err().kind(),
            ErrorKind::MalformedTag
        );
        assert_eq!(
            Document::parse_strict("<div>text").unwrap_err(),
            ParseError::UnterminatedText { position: 5 }
        );
    }

    #[test]
    fn test_navigation() {
        let doc = Document::parse("<html><body><ul><li>a</li><li>b</li></ul></body></html>");
        // html0 body1 ul2 li3 text4 li5 text6
        assert_eq!(doc.ancestors(6).collect::<Vec<_>>(), vec![5, 2, 1, 0]);
        assert_eq!(doc.descendants(2).collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert_eq!(doc.descendants(3).collect::<Vec<_>>(), vec![4]);
        assert_eq!(doc.descendants(6).count(), 0);
        assert!(doc.is_ancestor(0, 6));
        assert!(doc.is_ancestor(2, 5));
        assert!(!doc.is_ancestor(3, 5));
        assert!(!doc.is_ancestor(2, 2));
        assert!(!doc.is_ancestor(0, 99));
    }

    #[test]
    fn test_euler_containment_matches_parent_chain() {
        let doc = Document::parse(
            "<div><section><p>x<b>y</b></p><p>z</p></section><ul><li>w</li></ul></div>",
        );
        assert!(doc.is_valid());
        for n in doc.nodes() {
            for m in doc.nodes() {
                let by_chain = n.id == m.id || doc.ancestors(m.id).any(|a| a == n.id);
                assert_eq!(n.contains(m), by_chain, "{} vs {}", n.id, m.id);
            }
            assert!(n.in_time > 0 && n.out_time > n.in_time);
        }
    }

    #[test]
    fn test_ids_monotonic() {
        let doc = Document::parse("<a><b></b>t<c><d></d></c></a>");
        for (i, node) in doc.nodes().iter().enumerate() {
            assert_eq!(node.id as usize, i);
        }
    }

    #[test]
    fn test_element_lookups() {
        let doc = Document::parse(
            "<div id=\"main\" class=\"box wide\"><a href=\"/x\" class=\"box\">go</a></div>",
        );
        assert_eq!(doc.get_element_by_id("main"), Some(0));
        assert_eq!(doc.elements_by_tag(Tag::A), &[1]);
        assert_eq!(doc.elements_by_class("box"), &[0, 1]);
        assert!(doc.elements_by_class("none").is_empty());
        assert_eq!(doc.attribute(1, "href"), Some("/x"));
        assert_eq!(doc.attribute(2, "href"), None);
        assert_eq!(doc.tag_name(0), Some("div"));
    }

    #[test]
    fn test_tag_name_keeps_case_and_unknown() {
        let doc = Document::parse("<My-Widget></My-Widget>");
        assert_eq!(doc.tag_name(0), Some("My-Widget"));
        assert_eq!(doc.node(0).and_then(Node::tag), Some(Tag::Unknown));
    }

    #[test]
    fn test_find_methods() {
        let doc = Document::parse("<div><p>a</p></div><p>b</p>");
        let all_p = doc.find(&QueryOptions::new().with_tags_any([Tag::P]));
        assert_eq!(all_p, vec![1, 3]);
        assert_eq!(doc.find_in(0, &QueryOptions::new().with_tags_any([Tag::P])), vec![1]);
    }

    #[test]
    fn test_document_is_send_sync() {
        fn assert_traits<T: Send + Sync>() {}
        assert_traits::<Document>();
    }
}
