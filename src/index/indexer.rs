//! Tag/class/id lookup tables
//!
//! Filled incrementally as the builder creates element nodes. Buckets keep
//! insertion order, which is document order because ids are assigned in
//! creation order.

use crate::core::tag::Tag;
use crate::dom::builder::NodeObserver;
use crate::dom::node::{Node, NodeId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Lookup tables over element nodes
#[derive(Debug, Default, Clone)]
pub struct Indexer {
    tags: HashMap<Tag, Vec<NodeId>>,
    classes: HashMap<String, Vec<NodeId>>,
    ids: HashMap<String, NodeId>,
    /// Ids declared by more than one element
    duplicate_ids: HashSet<String>,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element node; text nodes are ignored
    ///
    /// On an id collision the first registered node keeps the id.
    pub fn add_node(&mut self, node: &Node) {
        let Some(element) = node.as_element() else {
            return;
        };

        self.tags.entry(element.tag).or_default().push(node.id);

        for class in &element.classes {
            self.classes.entry(class.clone()).or_default().push(node.id);
        }

        if let Some(id) = &element.element_id {
            match self.ids.get(id) {
                Some(&first) => {
                    debug!(id = %id, first, duplicate = node.id, "duplicate element id");
                    self.duplicate_ids.insert(id.clone());
                }
                None => {
                    self.ids.insert(id.clone(), node.id);
                }
            }
        }
    }

    /// Elements with `tag`, in document order
    pub fn by_tag(&self, tag: Tag) -> Option<&[NodeId]> {
        self.tags.get(&tag).map(Vec::as_slice)
    }

    /// Elements carrying `class`, in document order
    pub fn by_class(&self, class: &str) -> Option<&[NodeId]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    /// Element declaring `id`
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Check if more than one element declared `id`
    pub fn is_duplicate_id(&self, id: &str) -> bool {
        self.duplicate_ids.contains(id)
    }

    /// Number of distinct tags seen
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Number of distinct classes seen
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of registered ids
    pub fn id_count(&self) -> usize {
        self.ids.len()
    }
}

impl NodeObserver for Indexer {
    fn node_created(&mut self, node: &Node) {
        self.add_node(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::ElementData;
    use crate::index::Span;

    fn element(id: NodeId, tag: Tag, classes: &[&str], element_id: Option<&str>) -> Node {
        let mut data = ElementData::new(tag, Span::empty(), Span::empty());
        data.classes = classes.iter().map(|c| c.to_string()).collect();
        data.element_id = element_id.map(str::to_string);
        Node::element(id, None, data)
    }

    #[test]
    fn test_tag_buckets_keep_order() {
        let mut index = Indexer::new();
        index.add_node(&element(0, Tag::Div, &[], None));
        index.add_node(&element(1, Tag::P, &[], None));
        index.add_node(&element(2, Tag::Div, &[], None));

        assert_eq!(index.by_tag(Tag::Div), Some(&[0, 2][..]));
        assert_eq!(index.by_tag(Tag::P), Some(&[1][..]));
        assert_eq!(index.by_tag(Tag::Span), None);
        assert_eq!(index.tag_count(), 2);
    }

    #[test]
    fn test_class_buckets() {
        let mut index = Indexer::new();
        index.add_node(&element(0, Tag::Div, &["a", "b"], None));
        index.add_node(&element(1, Tag::Span, &["b"], None));

        assert_eq!(index.by_class("a"), Some(&[0][..]));
        assert_eq!(index.by_class("b"), Some(&[0, 1][..]));
        assert_eq!(index.by_class("c"), None);
        assert_eq!(index.class_count(), 2);
    }

    #[test]
    fn test_id_first_registration_wins() {
        let mut index = Indexer::new();
        index.add_node(&element(0, Tag::Div, &[], Some("main")));
        index.add_node(&element(1, Tag::Div, &[], Some("main")));
        index.add_node(&element(2, Tag::Div, &[], Some("side")));

        assert_eq!(index.by_id("main"), Some(0));
        assert_eq!(index.by_id("side"), Some(2));
        assert_eq!(index.by_id("none"), None);
        assert_eq!(index.id_count(), 2);
        assert!(index.is_duplicate_id("main"));
        assert!(!index.is_duplicate_id("side"));
    }

    #[test]
    fn test_text_nodes_ignored() {
        let mut index = Indexer::new();
        index.node_created(&Node::text(0, None, Span::new(0, 3)));
        assert_eq!(index.tag_count(), 0);
    }
}
