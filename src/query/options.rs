//! Query criteria
//!
//! A `QueryOptions` is a conjunction of optional criteria. `None` means
//! "no constraint". A populated `_any` list that is empty matches nothing;
//! a populated `_all` list that is empty matches everything.

use crate::core::tag::TagSet;
use std::fmt;
use std::sync::Arc;

/// Predicate over an element's own text
pub type TextPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Text criterion: exact match or arbitrary predicate
#[derive(Clone)]
pub enum TextCondition {
    Exact(String),
    Predicate(TextPredicate),
}

impl TextCondition {
    /// Check `text` against this condition
    pub fn evaluate(&self, text: &str) -> bool {
        match self {
            TextCondition::Exact(expected) => expected == text,
            TextCondition::Predicate(predicate) => predicate(text),
        }
    }
}

impl fmt::Debug for TextCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextCondition::Exact(text) => f.debug_tuple("Exact").field(text).finish(),
            TextCondition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Conjunction of structural criteria
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Node tag equals every tag in the set
    pub tags_all: Option<TagSet>,
    /// Node tag is in the set
    pub tags_any: Option<TagSet>,
    pub classes_all: Option<Vec<String>>,
    pub classes_any: Option<Vec<String>>,
    /// (key, value) pairs; keys are matched against lowercased attribute names
    pub attributes_all: Option<Vec<(String, String)>>,
    pub attributes_any: Option<Vec<(String, String)>>,
    /// Node's declared id is one of these
    pub ids: Option<Vec<String>>,
    pub text: Option<TextCondition>,
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

fn pairs<I, K, V>(items: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    items.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

impl QueryOptions {
    /// Options with no criteria (matches every element)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags_all(mut self, tags: impl Into<TagSet>) -> Self {
        self.tags_all = Some(tags.into());
        self
    }

    pub fn with_tags_any(mut self, tags: impl Into<TagSet>) -> Self {
        self.tags_any = Some(tags.into());
        self
    }

    pub fn with_classes_all<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes_all = Some(strings(classes));
        self
    }

    pub fn with_classes_any<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes_any = Some(strings(classes));
        self
    }

    pub fn with_attributes_all<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes_all = Some(pairs(attributes));
        self
    }

    pub fn with_attributes_any<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes_any = Some(pairs(attributes));
        self
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(strings(ids));
        self
    }

    /// Own text must equal `text`
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(TextCondition::Exact(text.into()));
        self
    }

    /// Own text must satisfy `predicate`
    pub fn with_text_matching<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.text = Some(TextCondition::Predicate(Arc::new(predicate)));
        self
    }

    /// True when no criterion is set
    pub fn is_unconstrained(&self) -> bool {
        self.ids.is_none() && self.is_id_lookup_candidate()
    }

    /// True when `ids` is the only criterion set
    pub fn is_id_lookup(&self) -> bool {
        self.ids.is_some() && self.is_id_lookup_candidate()
    }

    /// Every criterion other than `ids` is unset
    fn is_id_lookup_candidate(&self) -> bool {
        self.tags_all.is_none()
            && self.tags_any.is_none()
            && self.classes_all.is_none()
            && self.classes_any.is_none()
            && self.attributes_all.is_none()
            && self.attributes_any.is_none()
            && self.text.is_none()
    }
}
