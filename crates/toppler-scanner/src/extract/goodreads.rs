//! Field extractors for Goodreads search result rows.
//!
//! Goodreads marks both the book title and the author name with
//! `itemprop="name"`. The title span also carries `role` and `aria-level`,
//! the author span carries nothing else, so the two are told apart by
//! attribute count alone. This breaks as soon as either span gains or loses
//! an attribute; [`title`] and [`author`] are kept separate so each can get
//! its own predicate when that happens.

use super::{
    absolute_url, clean_text, fill_count, fill_rating, fill_text, log_malformed, parse_count,
    parse_rating, Visit,
};
use crate::document::{DocumentNode, Element};
use toppler_core::{BookRecord, Site};

/// Rating and rating count read from a `minirating` span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniRating {
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
}

/// Run every Goodreads extractor against one node of a result row.
pub fn apply(record: &mut BookRecord, visit: Visit<'_>) {
    let node = visit.node;

    if let Some(found) = mini_rating(node) {
        if let Some(rating) = found.rating {
            fill_rating(&mut record.rating, rating);
        }
        if let Some(count) = found.review_count {
            fill_count(&mut record.review_count, count);
        }
    }
    if let Some(name) = title(node) {
        fill_text(&mut record.title, name);
    }
    if let Some(name) = author(node) {
        fill_text(&mut record.author, name);
    }
    if let Some(url) = detail_url(node) {
        fill_text(&mut record.reviews_url, url.clone());
        fill_text(&mut record.detail_url, url);
    }
    if let Some(src) = image(node) {
        fill_text(&mut record.image_url, src);
    }
}

/// `<span class="minirating">4.28 avg rating — 1,467,512 ratings</span>`.
///
/// The text is split on whitespace; the first token is the rating and the
/// fifth the number of ratings. Either may be missing or malformed without
/// affecting the other.
pub fn mini_rating(node: &DocumentNode) -> Option<MiniRating> {
    let span = node.element_named("span")?;
    if !span.has_attr("class", "minirating") {
        return None;
    }

    let text = node.text();
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let rating = tokens.first().and_then(|token| match parse_rating(token) {
        Ok(rating) => Some(rating),
        Err(e) => {
            log_malformed(&e);
            None
        }
    });
    let review_count = tokens.get(4).and_then(|token| match parse_count(token) {
        Ok(count) => Some(count),
        Err(e) => {
            log_malformed(&e);
            None
        }
    });

    Some(MiniRating {
        rating,
        review_count,
    })
}

fn itemprop_name(node: &DocumentNode) -> Option<&Element> {
    node.as_element()
        .filter(|element| element.has_attr("itemprop", "name"))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// `itemprop="name"` with further attributes: the book title.
pub fn title(node: &DocumentNode) -> Option<String> {
    let element = itemprop_name(node)?;
    if element.attrs.len() <= 1 {
        return None;
    }
    non_empty(clean_text(&node.text()))
}

/// `itemprop="name"` and nothing else: the author.
pub fn author(node: &DocumentNode) -> Option<String> {
    let element = itemprop_name(node)?;
    if element.attrs.len() > 1 {
        return None;
    }
    non_empty(clean_text(&node.text()))
}

/// `<a class="bookTitle" href=…>` yields the book page, which also hosts the reviews.
pub fn detail_url(node: &DocumentNode) -> Option<String> {
    let anchor = node.element_named("a")?;
    if !anchor.has_attr("class", "bookTitle") {
        return None;
    }
    absolute_url(Site::Goodreads, anchor.attr("href")?)
}

/// `<img class="bookCover" src=…>` yields the cover image.
pub fn image(node: &DocumentNode) -> Option<String> {
    let img = node.element_named("img")?;
    if !img.has_attr("class", "bookCover") {
        return None;
    }
    img.attr("src").map(str::to_string)
}
