//! HTML Node representation
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by
//! `NodeId` (u32). Ownership runs parent to child through the children
//! list; the parent link is a plain id used only for upward traversal.

use crate::core::tag::Tag;
use crate::index::Span;
use std::collections::HashMap;

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Where an element's own text lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRef {
    /// A single run, zero-copy in the input
    Input(Span),
    /// Several runs joined in the span buffer
    Pooled(Span),
}

impl TextRef {
    pub fn span(&self) -> Span {
        match *self {
            TextRef::Input(span) | TextRef::Pooled(span) => span,
        }
    }
}

/// Element-only fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: Tag,
    /// Raw tag name as written in the input
    pub name: Span,
    /// Open tag span in the input
    pub span: Span,
    /// Attribute map; the first occurrence of a duplicate key wins
    pub attributes: HashMap<String, String>,
    /// Whitespace-separated `class` tokens, deduplicated, in order
    pub classes: Vec<String>,
    /// Non-empty `id` attribute
    pub element_id: Option<String>,
    pub children: Vec<NodeId>,
    /// Own text (direct text runs), set when the element closes
    pub text: Option<TextRef>,
}

impl ElementData {
    pub fn new(tag: Tag, name: Span, span: Span) -> Self {
        ElementData {
            tag,
            name,
            span,
            attributes: HashMap::new(),
            classes: Vec::new(),
            element_id: None,
            children: Vec::new(),
            text: None,
        }
    }

    /// Get attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check if the element carries a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Text-only fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextData {
    pub span: Span,
}

/// Variant-specific node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(TextData),
}

/// A node in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Parent element (None for top-level nodes)
    pub parent: Option<NodeId>,
    /// Euler entry time, 0 until assigned
    pub in_time: u32,
    /// Euler exit time, 0 while the node is still open
    pub out_time: u32,
    pub kind: NodeKind,
}

impl Node {
    /// Create a new element node
    pub fn element(id: NodeId, parent: Option<NodeId>, data: ElementData) -> Self {
        Node {
            id,
            parent,
            in_time: 0,
            out_time: 0,
            kind: NodeKind::Element(data),
        }
    }

    /// Create a new text node
    pub fn text(id: NodeId, parent: Option<NodeId>, span: Span) -> Self {
        Node {
            id,
            parent,
            in_time: 0,
            out_time: 0,
            kind: NodeKind::Text(TextData { span }),
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&TextData> {
        match &self.kind {
            NodeKind::Text(data) => Some(data),
            NodeKind::Element(_) => None,
        }
    }

    /// Element tag, None for text nodes
    #[inline]
    pub fn tag(&self) -> Option<Tag> {
        self.as_element().map(|e| e.tag)
    }

    /// Children of an element (empty for text nodes)
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Element(data) => &data.children,
            NodeKind::Text(_) => &[],
        }
    }

    /// Check if the exit time has been assigned
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.out_time > 0
    }

    /// Exit time, with a still-open node extending to the end of the tour
    #[inline]
    pub fn effective_out(&self) -> u32 {
        if self.is_closed() {
            self.out_time
        } else {
            u32::MAX
        }
    }

    /// O(1) descendant-or-self test via Euler intervals
    #[inline]
    pub fn contains(&self, other: &Node) -> bool {
        self.in_time > 0
            && self.in_time <= other.in_time
            && other.effective_out() <= self.effective_out()
    }
}
