//! Tree Builder
//!
//! Consumes tokenizer events under a stack discipline, allocating nodes in
//! an arena and stamping them with Euler-tour times. Implements
//! `TokenHandler` so it can be fed straight from a `Tokenizer`.
//!
//! Every element is reported to a `NodeObserver` once its attributes,
//! classes and id are in place.

use super::node::{ElementData, Node, NodeId, TextRef};
use super::strings::SpanBuffer;
use crate::core::tag::Tag;
use crate::core::tokenizer::{CloseToken, OpenToken, TextToken, TokenHandler};
use crate::error::ParseError;
use crate::index::{Indexer, Span};
use tracing::{debug, trace};

/// Most nodes one tree can hold
///
/// Each node takes two Euler ticks, so the timer stays within `u32`.
pub const MAX_NODES: usize = (u32::MAX / 2) as usize;

/// Receives each element node right after it is created
pub trait NodeObserver {
    fn node_created(&mut self, node: &Node);
}

/// No observer
impl NodeObserver for () {
    fn node_created(&mut self, _node: &Node) {}
}

/// An element on the open stack plus the text runs seen directly inside it
#[derive(Debug)]
struct OpenElement {
    id: NodeId,
    runs: Vec<Span>,
}

/// Finished builder output
#[derive(Debug)]
pub struct BuiltTree<O> {
    pub nodes: Vec<Node>,
    /// Top-level nodes, children of the implicit root
    pub roots: Vec<NodeId>,
    pub strings: SpanBuffer,
    pub observer: O,
}

/// Stack-discipline tree builder
pub struct TreeBuilder<'a, O: NodeObserver = Indexer> {
    input: &'a [u8],
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    stack: Vec<OpenElement>,
    strings: SpanBuffer,
    observer: O,
    /// Euler timer; last value handed out
    timer: u32,
    node_limit: usize,
    error: Option<ParseError>,
}

impl<'a> TreeBuilder<'a, Indexer> {
    /// Create a builder that indexes every element it creates
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_observer(input, Indexer::new())
    }
}

impl<'a, O: NodeObserver> TreeBuilder<'a, O> {
    /// Create a builder reporting to `observer`
    pub fn with_observer(input: &'a [u8], observer: O) -> Self {
        // Typical markup: roughly one node (element or text) per 24 bytes
        let estimated_nodes = (input.len() / 24).max(16);

        TreeBuilder {
            input,
            nodes: Vec::with_capacity(estimated_nodes),
            roots: Vec::new(),
            stack: Vec::with_capacity(32),
            strings: SpanBuffer::with_capacity(input.len()),
            observer,
            timer: 0,
            node_limit: MAX_NODES,
            error: None,
        }
    }

    /// Reject any token that would create more than `limit` nodes
    ///
    /// Clamped to `MAX_NODES`.
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit.min(MAX_NODES);
        self
    }

    /// Handle an open tag
    pub fn feed_open(&mut self, token: OpenToken) -> bool {
        let Some(id) = self.next_id(token.span) else {
            return false;
        };
        let parent = self.current_parent();

        let mut data = ElementData::new(token.tag, token.name, token.span);
        self.fill_attributes(&mut data, &token);

        let mut node = Node::element(id, parent, data);
        self.timer += 1;
        node.in_time = self.timer;
        self.nodes.push(node);
        self.link(parent, id);
        self.stack.push(OpenElement {
            id,
            runs: Vec::new(),
        });
        trace!(id, tag = %token.tag, depth = self.stack.len(), "push");

        self.observer.node_created(&self.nodes[id as usize]);

        if token.is_void {
            self.close_top();
        }
        true
    }

    /// Handle a text run; rejected when no element is open
    pub fn feed_text(&mut self, token: TextToken) -> bool {
        let Some(parent) = self.current_parent() else {
            let err = ParseError::OrphanText {
                position: token.span.begin as usize,
            };
            debug!(%err, "builder rejected text");
            self.error = Some(err);
            return false;
        };
        let Some(id) = self.next_id(token.span) else {
            return false;
        };
        if let Some(top) = self.stack.last_mut() {
            top.runs.push(token.span);
        }

        let mut node = Node::text(id, Some(parent), token.span);
        node.in_time = self.timer + 1;
        node.out_time = self.timer + 2;
        self.timer += 2;
        self.nodes.push(node);
        self.link(Some(parent), id);
        true
    }

    /// Handle a close tag; it must match the innermost open element
    pub fn feed_close(&mut self, token: CloseToken) -> bool {
        let position = token.span.begin as usize;
        let Some(top) = self.stack.last() else {
            return self.reject(ParseError::UnexpectedClose {
                tag: token.tag,
                position,
            });
        };

        let expected = self.nodes[top.id as usize].tag().unwrap_or(Tag::Unknown);
        if expected != token.tag {
            return self.reject(ParseError::MismatchedClose {
                expected,
                found: token.tag,
                position,
            });
        }

        self.close_top();
        true
    }

    /// True when every opened element has been closed
    #[inline]
    pub fn validate(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of elements currently open
    #[inline]
    pub fn open_depth(&self) -> usize {
        self.stack.len()
    }

    /// Cause of the last rejected feed, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Nodes created so far, indexed by id
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Top-level nodes created so far
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Finish building
    ///
    /// Elements still open keep `out_time == 0` but get their own text.
    pub fn finish(mut self) -> BuiltTree<O> {
        let open = std::mem::take(&mut self.stack);
        for element in open {
            self.resolve_text(element);
        }

        debug!(
            nodes = self.nodes.len(),
            roots = self.roots.len(),
            pooled_bytes = self.strings.len(),
            "tree built"
        );

        BuiltTree {
            nodes: self.nodes,
            roots: self.roots,
            strings: self.strings,
            observer: self.observer,
        }
    }

    /// Id for the next node, or None once the node limit is reached
    fn next_id(&mut self, span: Span) -> Option<NodeId> {
        let next = self.nodes.len();
        if next >= self.node_limit {
            let err = ParseError::TooManyNodes {
                max: self.node_limit,
                position: span.begin as usize,
            };
            debug!(%err, "builder rejected token");
            self.error = Some(err);
            return None;
        }
        // node_limit <= MAX_NODES, so the id fits
        Some(next as NodeId)
    }

    #[inline]
    fn current_parent(&self) -> Option<NodeId> {
        self.stack.last().map(|e| e.id)
    }

    fn link(&mut self, parent: Option<NodeId>, child: NodeId) {
        match parent.and_then(|p| self.nodes[p as usize].as_element_mut()) {
            Some(element) => element.children.push(child),
            None => self.roots.push(child),
        }
    }

    fn reject(&mut self, err: ParseError) -> bool {
        debug!(%err, depth = self.stack.len(), "builder rejected close tag");
        self.error = Some(err);
        false
    }

    /// Pop the innermost element and assign its exit time
    fn close_top(&mut self) {
        let Some(element) = self.stack.pop() else {
            return;
        };
        self.timer += 1;
        self.nodes[element.id as usize].out_time = self.timer;
        trace!(id = element.id, depth = self.stack.len(), "pop");
        self.resolve_text(element);
    }

    /// Store an element's own text: one run stays in the input, several
    /// are joined in the span buffer
    fn resolve_text(&mut self, element: OpenElement) {
        let text = match element.runs.as_slice() {
            [] => None,
            [single] => Some(TextRef::Input(*single)),
            runs => {
                let begin = self.strings.cursor();
                for run in runs {
                    self.strings.append(run.slice(self.input));
                }
                Some(TextRef::Pooled(Span::new(begin, self.strings.cursor())))
            }
        };

        if let Some(data) = self.nodes[element.id as usize].as_element_mut() {
            data.text = text;
        }
    }

    /// Copy attributes, classes and id from the token's spans
    fn fill_attributes(&self, data: &mut ElementData, token: &OpenToken) {
        for attr in &token.attributes {
            let name = String::from_utf8_lossy(attr.name.slice(self.input)).to_ascii_lowercase();
            let value = String::from_utf8_lossy(attr.value.slice(self.input)).into_owned();
            data.attributes.entry(name).or_insert(value);
        }

        if let Some(class) = data.attributes.get("class") {
            for name in class.split_ascii_whitespace() {
                if !data.classes.iter().any(|c| c == name) {
                    data.classes.push(name.to_string());
                }
            }
        }

        data.element_id = data
            .attributes
            .get("id")
            .filter(|id| !id.is_empty())
            .cloned();
    }
}

impl<O: NodeObserver> TokenHandler for TreeBuilder<'_, O> {
    fn on_open(&mut self, token: OpenToken) -> bool {
        self.feed_open(token)
    }

    fn on_text(&mut self, token: TextToken) -> bool {
        self.feed_text(token)
    }

    fn on_close(&mut self, token: CloseToken) -> bool {
        self.feed_close(token)
    }
}
