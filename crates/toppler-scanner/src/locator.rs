//! Finds the node holding a page's result listings.

use crate::document::DocumentNode;
use crate::error::{Result, ScanError};
use std::fmt;
use toppler_core::Site;

/// Class Amazon puts on the results list.
pub const AMAZON_RESULTS_CLASS: &str = "s-main-slot s-result-list s-search-results sg-row";

/// Describes the results container of a site: a tag, optionally with one
/// attribute that must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSpec {
    pub tag: &'static str,
    pub attr: Option<(&'static str, &'static str)>,
}

impl ContainerSpec {
    pub const fn tag(tag: &'static str) -> Self {
        Self { tag, attr: None }
    }

    pub const fn with_attr(tag: &'static str, key: &'static str, value: &'static str) -> Self {
        Self {
            tag,
            attr: Some((key, value)),
        }
    }

    /// Container of the given site's search result page.
    pub const fn for_site(site: Site) -> Self {
        match site {
            Site::Amazon => Self::with_attr("div", "class", AMAZON_RESULTS_CLASS),
            Site::Goodreads => Self::tag("tbody"),
        }
    }

    pub fn matches(&self, node: &DocumentNode) -> bool {
        node.element_named(self.tag).is_some_and(|element| {
            self.attr
                .map_or(true, |(key, value)| element.has_attr(key, value))
        })
    }
}

impl fmt::Display for ContainerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attr {
            Some((key, value)) => write!(f, "<{} {}=\"{}\">", self.tag, key, value),
            None => write!(f, "<{}>", self.tag),
        }
    }
}

/// First node in document order matching `spec`.
///
/// Pre-order depth-first; once a match is found the rest of the tree is not
/// visited. A page without the container yields `ContainerNotFound`, which
/// callers treat as "no results on this page".
pub fn locate<'a>(root: &'a DocumentNode, spec: &ContainerSpec) -> Result<&'a DocumentNode> {
    root.find(|node| spec.matches(node))
        .ok_or_else(|| ScanError::ContainerNotFound {
            container: spec.to_string(),
        })
}
