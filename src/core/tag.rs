//! HTML Tag Catalog
//!
//! Closed enumeration of known HTML element names, a compact bitset over
//! them, and the void-element classification used by the tokenizer and
//! the tree builder.

use std::fmt;

/// Defines `Tag` and the name table from one list.
///
/// The list must stay sorted by name: lookups binary-search the table and
/// the variant order doubles as the table index.
macro_rules! define_tags {
    ($($variant:ident => $name:literal,)*) => {
        /// Known HTML element names plus the `Unknown` sentinel
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Tag {
            $($variant,)*
            /// Any name not in the catalog
            Unknown,
        }

        /// (name, tag) pairs sorted by name, indexed by `Tag as usize`
        const TAG_TABLE: &[(&str, Tag)] = &[$(($name, Tag::$variant),)*];

        impl Tag {
            /// Canonical lowercase name, empty for `Unknown`
            pub const fn name(self) -> &'static str {
                match self {
                    $(Tag::$variant => $name,)*
                    Tag::Unknown => "",
                }
            }
        }
    };
}

define_tags! {
    A => "a",
    Abbr => "abbr",
    Address => "address",
    Area => "area",
    Article => "article",
    Aside => "aside",
    Audio => "audio",
    B => "b",
    Base => "base",
    Bdi => "bdi",
    Bdo => "bdo",
    Blockquote => "blockquote",
    Body => "body",
    Br => "br",
    Button => "button",
    Canvas => "canvas",
    Caption => "caption",
    Cite => "cite",
    Code => "code",
    Col => "col",
    Colgroup => "colgroup",
    Data => "data",
    Datalist => "datalist",
    Dd => "dd",
    Del => "del",
    Details => "details",
    Dfn => "dfn",
    Dialog => "dialog",
    Div => "div",
    Dl => "dl",
    Dt => "dt",
    Em => "em",
    Embed => "embed",
    Fieldset => "fieldset",
    Figcaption => "figcaption",
    Figure => "figure",
    Footer => "footer",
    Form => "form",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    H4 => "h4",
    H5 => "h5",
    H6 => "h6",
    Head => "head",
    Header => "header",
    Hgroup => "hgroup",
    Hr => "hr",
    Html => "html",
    I => "i",
    Iframe => "iframe",
    Img => "img",
    Input => "input",
    Ins => "ins",
    Kbd => "kbd",
    Label => "label",
    Legend => "legend",
    Li => "li",
    Link => "link",
    Main => "main",
    Map => "map",
    Mark => "mark",
    Menu => "menu",
    Meta => "meta",
    Meter => "meter",
    Nav => "nav",
    Noscript => "noscript",
    Object => "object",
    Ol => "ol",
    Optgroup => "optgroup",
    Option => "option",
    Output => "output",
    P => "p",
    Picture => "picture",
    Pre => "pre",
    Progress => "progress",
    Q => "q",
    Rp => "rp",
    Rt => "rt",
    Ruby => "ruby",
    S => "s",
    Samp => "samp",
    Script => "script",
    Search => "search",
    Section => "section",
    Select => "select",
    Small => "small",
    Source => "source",
    Span => "span",
    Strong => "strong",
    Style => "style",
    Sub => "sub",
    Summary => "summary",
    Sup => "sup",
    Table => "table",
    Tbody => "tbody",
    Td => "td",
    Template => "template",
    Textarea => "textarea",
    Tfoot => "tfoot",
    Th => "th",
    Thead => "thead",
    Time => "time",
    Title => "title",
    Tr => "tr",
    Track => "track",
    U => "u",
    Ul => "ul",
    Var => "var",
    Video => "video",
    Wbr => "wbr",
}

/// Longest catalog name ("blockquote", "figcaption")
const MAX_TAG_NAME_LEN: usize = 10;

impl Tag {
    /// Tag for a table index, `None` past the catalog
    #[inline]
    pub fn from_index(index: usize) -> Option<Tag> {
        if index == Tag::Unknown as usize {
            Some(Tag::Unknown)
        } else {
            TAG_TABLE.get(index).map(|&(_, tag)| tag)
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Unknown => f.write_str("unknown"),
            tag => f.write_str(tag.name()),
        }
    }
}

/// Resolve a tag name (ASCII case-insensitive)
///
/// Unrecognized names map to `Tag::Unknown`, never an error.
pub fn tag_from_name(name: &[u8]) -> Tag {
    if name.is_empty() || name.len() > MAX_TAG_NAME_LEN {
        return Tag::Unknown;
    }

    let mut buf = [0u8; MAX_TAG_NAME_LEN];
    let lower = &mut buf[..name.len()];
    lower.copy_from_slice(name);
    lower.make_ascii_lowercase();

    TAG_TABLE
        .binary_search_by(|(candidate, _)| candidate.as_bytes().cmp(lower))
        .map(|idx| TAG_TABLE[idx].1)
        .unwrap_or(Tag::Unknown)
}

/// Compact bitset over `Tag` values
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagSet {
    bits: [u64; 2],
}

impl TagSet {
    /// Create an empty set
    pub const fn new() -> Self {
        TagSet { bits: [0; 2] }
    }

    /// Build a set from a slice (usable in const context)
    pub const fn from_tags(tags: &[Tag]) -> Self {
        let mut set = TagSet::new();
        let mut i = 0;
        while i < tags.len() {
            let idx = tags[i] as usize;
            set.bits[idx >> 6] |= 1u64 << (idx & 63);
            i += 1;
        }
        set
    }

    /// O(1) membership test
    #[inline]
    pub const fn contains(&self, tag: Tag) -> bool {
        let idx = tag as usize;
        self.bits[idx >> 6] & (1u64 << (idx & 63)) != 0
    }

    /// Add a tag, returning true if it was not present
    #[inline]
    pub fn insert(&mut self, tag: Tag) -> bool {
        let idx = tag as usize;
        let mask = 1u64 << (idx & 63);
        let absent = self.bits[idx >> 6] & mask == 0;
        self.bits[idx >> 6] |= mask;
        absent
    }

    /// Number of tags in the set
    #[inline]
    pub fn len(&self) -> usize {
        (self.bits[0].count_ones() + self.bits[1].count_ones()) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == [0; 2]
    }

    /// Iterate members in tag order
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        (0..=Tag::Unknown as usize)
            .filter(move |&idx| self.bits[idx >> 6] & (1u64 << (idx & 63)) != 0)
            .filter_map(Tag::from_index)
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<const N: usize> From<[Tag; N]> for TagSet {
    fn from(tags: [Tag; N]) -> Self {
        TagSet::from_tags(&tags)
    }
}

/// Elements that never hold content and have no closing tag
pub const VOID_TAGS: TagSet = TagSet::from_tags(&[
    Tag::Area,
    Tag::Base,
    Tag::Br,
    Tag::Col,
    Tag::Embed,
    Tag::Hr,
    Tag::Img,
    Tag::Input,
    Tag::Link,
    Tag::Meta,
    Tag::Source,
    Tag::Track,
    Tag::Wbr,
]);

/// Check if a tag is a void element
#[inline]
pub fn is_void_tag(tag: Tag) -> bool {
    VOID_TAGS.contains(tag)
}
