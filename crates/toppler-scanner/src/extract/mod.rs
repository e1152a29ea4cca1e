//! Per-site field extractors.
//!
//! Every extractor looks at one node and either recognizes its exact shape
//! and returns the field value, or returns `None`. None of them look at the
//! node's descendants to decide whether they match; the record builder
//! visits every node of a row and offers it to every extractor, so a field
//! is found at whatever depth the current markup puts it.

pub mod amazon;
pub mod goodreads;

use crate::document::DocumentNode;
use crate::error::{Result, ScanError};
use toppler_core::{BookRecord, Site};
use url::Url;

/// A node offered to the extractors, with the element that follows it
/// among its siblings (whitespace-only text in between is skipped).
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a DocumentNode,
    pub next_sibling: Option<&'a DocumentNode>,
}

impl<'a> Visit<'a> {
    pub fn new(node: &'a DocumentNode) -> Self {
        Self {
            node,
            next_sibling: None,
        }
    }

    #[must_use]
    pub fn followed_by(mut self, next_sibling: &'a DocumentNode) -> Self {
        self.next_sibling = Some(next_sibling);
        self
    }
}

/// Applies every extractor of a site to one visited node.
pub type ApplyFn = fn(&mut BookRecord, Visit<'_>);

/// The extractor set for `site`.
pub fn extractors_for(site: Site) -> ApplyFn {
    match site {
        Site::Amazon => amazon::apply,
        Site::Goodreads => goodreads::apply,
    }
}

/// Whether an immediate child of the results container is a listing row.
pub fn is_row(site: Site, node: &DocumentNode) -> bool {
    match site {
        Site::Amazon => node.as_element().is_some(),
        Site::Goodreads => node.element_named("tr").is_some(),
    }
}

/// Store `value` unless an earlier node already supplied the field.
pub(crate) fn fill_text(slot: &mut String, value: String) {
    if slot.is_empty() {
        *slot = value;
    }
}

pub(crate) fn fill_rating(slot: &mut f32, value: f32) {
    if *slot == 0.0 {
        *slot = value;
    }
}

pub(crate) fn fill_count(slot: &mut u32, value: u32) {
    if *slot == 0 {
        *slot = value;
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve `href` against the site root. Empty or unresolvable links yield `None`.
pub fn absolute_url(site: Site, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    Url::parse(site.base_url())
        .and_then(|base| base.join(href))
        .map(String::from)
        .ok()
}

/// Parse a count such as `"1,234"`, ignoring surrounding whitespace.
pub fn parse_count(text: &str) -> Result<u32> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse().map_err(|_| ScanError::MalformedField {
        field: "review count",
        value: text.trim().to_string(),
    })
}

/// Parse a rating and check it lies on the 0 to 5 scale.
pub fn parse_rating(text: &str) -> Result<f32> {
    let malformed = || ScanError::MalformedField {
        field: "rating",
        value: text.trim().to_string(),
    };
    let rating: f32 = text.trim().parse().map_err(|_| malformed())?;
    if rating.is_finite() && (0.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err(malformed())
    }
}

/// Log a field that matched structurally but could not be converted.
pub(crate) fn log_malformed(err: &ScanError) {
    tracing::debug!("Leaving field at sentinel: {}", err);
}
