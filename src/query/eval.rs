//! Query evaluation
//!
//! Candidates come from the cheapest source available (id index, tag
//! index, class index, or a pre-order walk of the subtree). Every path
//! then applies the same scope and criteria filter and sorts by entry time,
//! so the source never changes the result.

use super::options::QueryOptions;
use crate::dom::document::Document;
use crate::dom::node::{ElementData, Node, NodeId};
use tracing::trace;

/// Elements in the subtree of `root` (inclusive) matching `options`,
/// in document order
pub fn find(doc: &Document, root: NodeId, options: &QueryOptions) -> Vec<NodeId> {
    let Some(scope) = doc.node(root) else {
        return Vec::new();
    };
    evaluate(doc, Some(scope), options)
}

/// Elements anywhere in the document matching `options`, in document order
pub fn find_all(doc: &Document, options: &QueryOptions) -> Vec<NodeId> {
    evaluate(doc, None, options)
}

/// Check a single node against every populated criterion
///
/// Only element nodes can match.
pub fn matches(doc: &Document, node: &Node, options: &QueryOptions) -> bool {
    let Some(element) = node.as_element() else {
        return false;
    };

    if let Some(tags) = &options.tags_all {
        if !tags.iter().all(|tag| tag == element.tag) {
            return false;
        }
    }

    if let Some(tags) = &options.tags_any {
        if !tags.contains(element.tag) {
            return false;
        }
    }

    if let Some(classes) = &options.classes_all {
        if !classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
    }

    if let Some(classes) = &options.classes_any {
        if !classes.iter().any(|c| element.has_class(c)) {
            return false;
        }
    }

    if let Some(attrs) = &options.attributes_all {
        if !attrs.iter().all(|(k, v)| has_attribute(element, k, v)) {
            return false;
        }
    }

    if let Some(attrs) = &options.attributes_any {
        if !attrs.iter().any(|(k, v)| has_attribute(element, k, v)) {
            return false;
        }
    }

    if let Some(ids) = &options.ids {
        let declared = element.element_id.as_deref();
        if !ids.iter().any(|id| declared == Some(id.as_str())) {
            return false;
        }
    }

    if let Some(condition) = &options.text {
        // No own text reads as ""; undecodable bytes still count as text
        let text = doc.text_lossy(node.id).unwrap_or_default();
        if !condition.evaluate(&text) {
            return false;
        }
    }

    true
}

#[inline]
fn has_attribute(element: &ElementData, key: &str, value: &str) -> bool {
    element.attribute(key) == Some(value)
}

fn evaluate(doc: &Document, scope: Option<&Node>, options: &QueryOptions) -> Vec<NodeId> {
    let mut results: Vec<NodeId> = match candidates(doc, options) {
        Some(ids) => ids
            .into_iter()
            .filter_map(|id| doc.node(id))
            .filter(|node| scope.map_or(true, |root| root.contains(node)))
            .filter(|node| matches(doc, node, options))
            .map(|node| node.id)
            .collect(),
        None if options.is_unconstrained() => walk(doc, scope)
            .filter(|node| node.is_element())
            .map(|node| node.id)
            .collect(),
        None => walk(doc, scope)
            .filter(|node| matches(doc, node, options))
            .map(|node| node.id)
            .collect(),
    };

    // Ids are assigned in pre-order, so id order is entry-time order
    results.sort_unstable();
    results.dedup();

    trace!(matched = results.len(), "query evaluated");
    results
}

/// Index-backed candidate list, or None when a walk is needed
fn candidates(doc: &Document, options: &QueryOptions) -> Option<Vec<NodeId>> {
    let index = doc.index();

    if options.is_id_lookup() {
        let ids = options.ids.as_deref().unwrap_or_default();
        // A duplicated id only indexes its first element; walk instead
        if ids.iter().any(|id| index.is_duplicate_id(id)) {
            return None;
        }
        return Some(ids.iter().filter_map(|id| index.by_id(id)).collect());
    }

    if let Some(tags) = &options.tags_any {
        return Some(
            tags.iter()
                .filter_map(|tag| index.by_tag(tag))
                .flatten()
                .copied()
                .collect(),
        );
    }

    if let Some(classes) = options.classes_all.as_deref().filter(|c| !c.is_empty()) {
        // Every match carries every class: the smallest bucket is enough
        let smallest = classes
            .iter()
            .map(|c| index.by_class(c).unwrap_or_default())
            .min_by_key(|bucket| bucket.len())
            .unwrap_or_default();
        return Some(smallest.to_vec());
    }

    if let Some(classes) = &options.classes_any {
        return Some(
            classes
                .iter()
                .filter_map(|c| index.by_class(c))
                .flatten()
                .copied()
                .collect(),
        );
    }

    None
}

/// Pre-order walk of the subtree of `scope` (or the whole document)
///
/// Pre-order ids are contiguous per subtree, so the walk is a range scan
/// that stops at the first node outside the root's Euler interval.
fn walk<'d>(doc: &'d Document, scope: Option<&'d Node>) -> impl Iterator<Item = &'d Node> + 'd {
    let start = scope.map_or(0, |root| root.id as usize);
    doc.nodes()[start.min(doc.len())..]
        .iter()
        .take_while(move |node| scope.map_or(true, |root| root.contains(node)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tag::{Tag, TagSet};

    fn doc(input: &str) -> Document {
        Document::parse(input)
    }

    fn tags(doc: &Document, ids: &[NodeId]) -> Vec<Tag> {
        ids.iter().filter_map(|&id| doc.node(id)).filter_map(Node::tag).collect()
    }

    const PAGE: &str = "<html><body>\
        <div class=\"a\" id=\"first\"><p class=\"x y\">one</p></div>\
        <div class=\"b\"><span data-k=\"v\">two</span><p class=\"y\">three</p></div>\
        </body></html>";

    #[test]
    fn test_conjunction_tag_and_class() {
        let doc = doc("<div class=\"a\"></div><div class=\"b\"></div>");
        let result = find_all(&doc, &QueryOptions::new().with_tags_any([Tag::Div]).with_classes_any(["a"]));
        assert_eq!(result, vec![0]);
    }

    #[test]
    fn test_tags_all_with_two_tags_matches_nothing() {
        let doc = doc(PAGE);
        let result = find_all(&doc, &QueryOptions::new().with_tags_all([Tag::Div, Tag::Span]));
        assert!(result.is_empty());

        let single = find_all(&doc, &QueryOptions::new().with_tags_all([Tag::Div]));
        assert_eq!(tags(&doc, &single), vec![Tag::Div, Tag::Div]);

        // Vacuously true for an empty set
        let all = find_all(&doc, &QueryOptions::new().with_tags_all(TagSet::new()));
        assert_eq!(all, find_all(&doc, &QueryOptions::new()));
    }

    #[test]
    fn test_empty_any_matches_nothing() {
        let doc = doc(PAGE);
        assert!(find_all(&doc, &QueryOptions::new().with_tags_any(TagSet::new())).is_empty());
        assert!(find_all(&doc, &QueryOptions::new().with_classes_any(Vec::<String>::new())).is_empty());
        assert!(find_all(&doc, &QueryOptions::new().with_ids(Vec::<String>::new())).is_empty());
    }

    #[test]
    fn test_unconstrained_returns_all_elements() {
        let doc = doc(PAGE);
        let all = find_all(&doc, &QueryOptions::new());
        assert_eq!(all.len(), 7);
        assert!(all.iter().all(|&id| doc.node(id).is_some_and(Node::is_element)));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_find_in_subtree() {
        let doc = doc(PAGE);
        let second_div = find_all(&doc, &QueryOptions::new().with_classes_any(["b"]))[0];
        let ps = find(&doc, second_div, &QueryOptions::new().with_tags_any([Tag::P]));
        assert_eq!(ps.len(), 1);
        assert_eq!(doc.text_content(ps[0]), Some("three"));

        // Root itself is in scope
        let divs = find(&doc, second_div, &QueryOptions::new().with_tags_any([Tag::Div]));
        assert_eq!(divs, vec![second_div]);
    }

    #[test]
    fn test_classes_all() {
        let doc = doc(PAGE);
        let result = find_all(&doc, &QueryOptions::new().with_classes_all(["y", "x"]));
        assert_eq!(tags(&doc, &result), vec![Tag::P]);
        assert_eq!(doc.text_content(result[0]), Some("one"));

        let y = find_all(&doc, &QueryOptions::new().with_classes_all(["y"]));
        assert_eq!(y.len(), 2);
        assert!(find_all(&doc, &QueryOptions::new().with_classes_all(["y", "missing"])).is_empty());
    }

    #[test]
    fn test_attributes() {
        let doc = doc(PAGE);
        let hit = find_all(&doc, &QueryOptions::new().with_attributes_all([("data-k", "v")]));
        assert_eq!(tags(&doc, &hit), vec![Tag::Span]);

        let miss = find_all(&doc, &QueryOptions::new().with_attributes_all([("data-k", "v"), ("id", "z")]));
        assert!(miss.is_empty());

        let any = find_all(
            &doc,
            &QueryOptions::new().with_attributes_any([("data-k", "v"), ("id", "first")]),
        );
        assert_eq!(tags(&doc, &any), vec![Tag::Div, Tag::Span]);
    }

    #[test]
    fn test_ids() {
        let doc = doc(PAGE);
        let result = find_all(&doc, &QueryOptions::new().with_ids(["first", "nope"]));
        assert_eq!(tags(&doc, &result), vec![Tag::Div]);
    }

    #[test]
    fn test_duplicate_ids_match_walk() {
        let doc = doc("<div><p id=\"d\"></p><p id=\"d\"></p></div>");
        let by_id = find_all(&doc, &QueryOptions::new().with_ids(["d"]));
        assert_eq!(by_id, vec![1, 2]);
        assert_eq!(doc.get_element_by_id("d"), Some(1));
    }

    #[test]
    fn test_text_criteria() {
        let doc = doc(PAGE);
        let exact = find_all(&doc, &QueryOptions::new().with_text("two"));
        assert_eq!(tags(&doc, &exact), vec![Tag::Span]);

        let predicate = find_all(&doc, &QueryOptions::new().with_text_matching(|t| t.starts_with('t')));
        assert_eq!(tags(&doc, &predicate), vec![Tag::Span, Tag::P]);

        // Elements without own text see ""
        let empty = find_all(&doc, &QueryOptions::new().with_text(""));
        assert_eq!(tags(&doc, &empty), vec![Tag::Html, Tag::Body, Tag::Div, Tag::Div]);
    }

    #[test]
    fn test_text_criteria_on_invalid_utf8() {
        let doc = Document::parse(b"<p>\xff\xfe</p><div></div>".to_vec());
        assert_eq!(doc.text_content(0), None);
        assert_eq!(doc.text_bytes(0), Some(&b"\xff\xfe"[..]));

        // Undecodable text is still text, not ""
        let empty = find_all(&doc, &QueryOptions::new().with_text(""));
        assert_eq!(empty, vec![2]);

        let non_empty = find_all(&doc, &QueryOptions::new().with_text_matching(|t| !t.is_empty()));
        assert_eq!(non_empty, vec![0]);

        let replaced = find_all(&doc, &QueryOptions::new().with_text("\u{FFFD}\u{FFFD}"));
        assert_eq!(replaced, vec![0]);
    }

    #[test]
    fn test_unconstrained_walk_agrees_with_matches() {
        let doc = doc(PAGE);
        let options = QueryOptions::new();
        assert!(options.is_unconstrained());
        let walked: Vec<NodeId> = walk(&doc, None)
            .filter(|node| matches(&doc, node, &options))
            .map(|node| node.id)
            .collect();
        assert_eq!(find_all(&doc, &options), walked);
    }

    #[test]
    fn test_index_paths_agree_with_walk() {
        let doc = doc(PAGE);
        let queries = [
            QueryOptions::new().with_tags_any([Tag::P, Tag::Div]),
            QueryOptions::new().with_classes_any(["y", "a"]),
            QueryOptions::new().with_classes_all(["y"]),
            QueryOptions::new().with_ids(["first"]),
        ];
        for options in &queries {
            let walked: Vec<NodeId> = walk(&doc, None)
                .filter(|node| matches(&doc, node, options))
                .map(|node| node.id)
                .collect();
            assert_eq!(find_all(&doc, options), walked, "{options:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        let doc = doc(PAGE);
        let options = QueryOptions::new().with_tags_any([Tag::P]).with_classes_any(["y"]);
        assert_eq!(find_all(&doc, &options), find_all(&doc, &options));
    }

    #[test]
    fn test_missing_root() {
        let doc = doc(PAGE);
        assert!(find(&doc, 999, &QueryOptions::new()).is_empty());
    }

    #[test]
    fn test_open_root_scope() {
        // body is still open when the trailing text fails the scan
        let doc = doc("<body><p>a</p><p>b</p>tail");
        let ps = find(&doc, 0, &QueryOptions::new().with_tags_any([Tag::P]));
        assert_eq!(ps.len(), 2);
    }
}
