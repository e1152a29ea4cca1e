//! Read-only document tree the extractors walk.
//!
//! Markup is parsed with `scraper` (html5ever) and converted once into a
//! closed two-variant tree: elements with their tag, ordered attributes and
//! children, and text nodes. Comments, doctypes and processing instructions
//! are dropped. The converted tree owns all of its data, so it can be handed
//! from a fetch task to the extraction code without borrowing the parser.

use crate::error::{Result, ScanError};
use scraper::{ElementRef, Html, Node};

/// Deepest element nesting accepted from a page, counting `<html>` as 1.
///
/// Everything that walks a [`DocumentNode`] recurses once per level, so this
/// bounds the stack used on hostile or broken markup.
pub const MAX_DEPTH: usize = 256;

/// A node of a parsed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Element(Element),
    Text(String),
}

/// An element node.
///
/// Attribute keys keep document order and are not deduplicated here; lookups
/// return the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<DocumentNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<DocumentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(DocumentNode::Text(text.into()))
    }

    /// Value of the first attribute named `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any attribute named `key` has exactly `value`.
    pub fn has_attr(&self, key: &str, value: &str) -> bool {
        self.attrs.iter().any(|(k, v)| k == key && v == value)
    }
}

impl From<Element> for DocumentNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl DocumentNode {
    /// Parse a full HTML document. The root is the `<html>` element.
    ///
    /// Fails with [`ScanError::DocumentTooDeep`] when elements nest deeper
    /// than [`MAX_DEPTH`].
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        convert(document.root_element(), 1)
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    /// The element if it has tag `tag`.
    pub fn element_named(&self, tag: &str) -> Option<&Element> {
        self.as_element().filter(|element| element.tag == tag)
    }

    /// Children in document order; text nodes have none.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            Self::Element(element) => &element.children,
            Self::Text(_) => &[],
        }
    }

    /// Concatenated text of this node and all of its descendants.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        match self {
            Self::Text(text) => buf.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(buf);
                }
            }
        }
    }

    /// First node in pre-order (this node included) satisfying `predicate`.
    ///
    /// Subtrees after the match are never visited.
    pub fn find<P>(&self, predicate: P) -> Option<&DocumentNode>
    where
        P: Fn(&DocumentNode) -> bool,
    {
        self.find_ref(&predicate)
    }

    fn find_ref<P>(&self, predicate: &P) -> Option<&DocumentNode>
    where
        P: Fn(&DocumentNode) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find_ref(predicate))
    }
}

fn convert(element: ElementRef<'_>, depth: usize) -> Result<DocumentNode> {
    if depth > MAX_DEPTH {
        return Err(ScanError::DocumentTooDeep { limit: MAX_DEPTH });
    }

    let value = element.value();
    let mut converted = Element {
        tag: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children: Vec::new(),
    };

    for child in element.children() {
        match child.value() {
            Node::Text(text) => converted
                .children
                .push(DocumentNode::Text(String::from(&**text))),
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    converted.children.push(convert(child_ref, depth + 1)?);
                }
            }
            _ => {}
        }
    }

    Ok(DocumentNode::Element(converted))
}
