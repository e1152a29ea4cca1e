//! Field extractors for Amazon result cards.

use super::{
    absolute_url, clean_text, fill_count, fill_rating, fill_text, log_malformed, parse_count,
    Visit,
};
use crate::document::DocumentNode;
use crate::error::{Result, ScanError};
use regex::Regex;
use std::sync::OnceLock;
use toppler_core::{BookRecord, Site};

/// Title text of a card's heading and the product link inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLink {
    pub title: String,
    pub link: Option<String>,
}

/// Review count and the link to the reviews section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLink {
    pub count: Option<u32>,
    pub url: Option<String>,
}

/// Run every Amazon extractor against one node of a result card.
pub fn apply(record: &mut BookRecord, visit: Visit<'_>) {
    let node = visit.node;

    if let Some(src) = image(node) {
        fill_text(&mut record.image_url, src);
    }
    if let Some(found) = title_and_link(node) {
        fill_text(&mut record.title, found.title);
        if let Some(link) = found.link {
            fill_text(&mut record.detail_url, link);
        }
    }
    if let Some(name) = author(visit) {
        fill_text(&mut record.author, name);
    }
    if let Some(stars) = rating(node) {
        fill_rating(&mut record.rating, stars);
    }
    if let Some(found) = reviews(node) {
        if let Some(count) = found.count {
            fill_count(&mut record.review_count, count);
        }
        if let Some(url) = found.url {
            fill_text(&mut record.reviews_url, url);
        }
    }
}

/// `<img class="s-image" src=…>` yields the cover image.
pub fn image(node: &DocumentNode) -> Option<String> {
    let img = node.element_named("img")?;
    if !img.has_attr("class", "s-image") {
        return None;
    }
    img.attr("src").map(str::to_string)
}

/// `<h2>` yields the title (all text under it) and the first link under it.
pub fn title_and_link(node: &DocumentNode) -> Option<TitleLink> {
    node.element_named("h2")?;

    let link = node
        .find(|n| n.element_named("a").and_then(|a| a.attr("href")).is_some())
        .and_then(DocumentNode::as_element)
        .and_then(|a| a.attr("href"))
        .and_then(|href| absolute_url(Site::Amazon, href));

    Some(TitleLink {
        title: clean_text(&node.text()),
        link,
    })
}

/// `<span>by </span>` followed by an element naming the author.
pub fn author(visit: Visit<'_>) -> Option<String> {
    let span = visit.node.element_named("span")?;
    let lead = span.children.first()?.as_text()?;
    if lead.trim() != "by" {
        return None;
    }

    let name = clean_text(&visit.next_sibling?.text());
    (!name.is_empty()).then_some(name)
}

fn rating_pattern() -> &'static Regex {
    static RATING: OnceLock<Regex> = OnceLock::new();
    RATING.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?) out of (\d+(?:\.\d+)?) stars").expect("valid regex")
    })
}

/// Text node reading `"4.7 out of 5 stars"`.
///
/// Leading whitespace and whole-number values are accepted. Ratings given
/// on a scale other than 5 are rescaled to it.
pub fn rating(node: &DocumentNode) -> Option<f32> {
    let text = node.as_text()?;
    let caps = rating_pattern().captures(text)?;

    match normalize_rating(&caps[1], &caps[2]) {
        Ok(stars) => Some(stars),
        Err(e) => {
            log_malformed(&e);
            None
        }
    }
}

fn normalize_rating(value: &str, scale: &str) -> Result<f32> {
    let malformed = || ScanError::MalformedField {
        field: "rating",
        value: format!("{value} out of {scale}"),
    };
    let value: f32 = value.parse().map_err(|_| malformed())?;
    let scale: f32 = scale.parse().map_err(|_| malformed())?;
    if scale <= 0.0 || value > scale {
        return Err(malformed());
    }

    if (scale - 5.0).abs() < f32::EPSILON {
        Ok(value)
    } else {
        Ok(value * 5.0 / scale)
    }
}

/// `<a href="…#customerReviews">1,234</a>` yields the review count and link.
///
/// A matching anchor whose text is not a number still yields the link.
pub fn reviews(node: &DocumentNode) -> Option<ReviewLink> {
    let anchor = node.element_named("a")?;
    let href = anchor
        .attrs
        .iter()
        .find(|(k, v)| k == "href" && v.contains("#customerReviews"))
        .map(|(_, v)| v.as_str())?;

    let count = match parse_count(&node.text()) {
        Ok(count) => Some(count),
        Err(e) => {
            log_malformed(&e);
            None
        }
    };

    Some(ReviewLink {
        count,
        url: absolute_url(Site::Amazon, href),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    #[test]
    fn test_image() {
        let img: DocumentNode = Element::new("img")
            .with_attr("class", "s-image")
            .with_attr("src", "https://m.media-amazon.com/images/I/dune.jpg")
            .into();
        assert_eq!(
            image(&img).as_deref(),
            Some("https://m.media-amazon.com/images/I/dune.jpg")
        );

        let other: DocumentNode = Element::new("img")
            .with_attr("class", "s-logo")
            .with_attr("src", "logo.png")
            .into();
        assert_eq!(image(&other), None);

        let no_src: DocumentNode = Element::new("img").with_attr("class", "s-image").into();
        assert_eq!(image(&no_src), None);
    }

    #[test]
    fn test_title_and_link() {
        let h2: DocumentNode = Element::new("h2")
            .with_child(
                Element::new("a")
                    .with_attr("class", "a-link-normal")
                    .with_attr("href", "/Dune-Frank-Herbert/dp/0441172717")
                    .with_child(Element::new("span").with_text("\n  Dune  ")),
            )
            .into();

        let found = title_and_link(&h2).expect("h2 matches");
        assert_eq!(found.title, "Dune");
        assert_eq!(
            found.link.as_deref(),
            Some("https://www.amazon.com/Dune-Frank-Herbert/dp/0441172717")
        );
    }

    #[test]
    fn test_title_without_link() {
        let h2: DocumentNode = Element::new("h2").with_text("Results").into();
        let found = title_and_link(&h2).expect("h2 matches");
        assert_eq!(found.title, "Results");
        assert_eq!(found.link, None);

        let h3: DocumentNode = Element::new("h3").with_text("Dune").into();
        assert_eq!(title_and_link(&h3), None);
    }

    #[test]
    fn test_author_from_sibling() {
        let by: DocumentNode = Element::new("span")
            .with_attr("class", "a-size-base")
            .with_text("by ")
            .into();
        let name: DocumentNode = Element::new("a")
            .with_attr("href", "/Frank-Herbert/e/B000AQ0MJK")
            .with_text("Frank Herbert")
            .into();

        assert_eq!(
            author(Visit::new(&by).followed_by(&name)).as_deref(),
            Some("Frank Herbert")
        );
        assert_eq!(author(Visit::new(&by)), None);
        assert_eq!(author(Visit::new(&name).followed_by(&by)), None);
    }

    #[test]
    fn test_author_requires_by_as_first_child() {
        let span: DocumentNode = Element::new("span").with_text("Paperback").into();
        let next: DocumentNode = Element::new("a").with_text("Frank Herbert").into();
        assert_eq!(author(Visit::new(&span).followed_by(&next)), None);
    }

    #[test]
    fn test_rating() {
        let text = DocumentNode::text_node("4.7 out of 5 stars");
        assert_eq!(rating(&text), Some(4.7));

        let padded = DocumentNode::text_node("  4.2 out of 5 stars, 312 ratings");
        assert_eq!(rating(&padded), Some(4.2));

        let whole = DocumentNode::text_node("5 out of 5 stars");
        assert_eq!(rating(&whole), Some(5.0));

        let ten_point = DocumentNode::text_node("9.0 out of 10 stars");
        assert_eq!(rating(&ten_point), Some(4.5));
    }

    #[test]
    fn test_rating_rejects_other_text() {
        assert_eq!(rating(&DocumentNode::text_node("4,7 von 5 Sternen")), None);
        assert_eq!(rating(&DocumentNode::text_node("Rated 4.7 out of 5 stars")), None);
        assert_eq!(rating(&DocumentNode::text_node("6.0 out of 5 stars")), None);

        let element: DocumentNode = Element::new("span").with_text("4.7 out of 5 stars").into();
        assert_eq!(rating(&element), None);
    }

    #[test]
    fn test_reviews() {
        let anchor: DocumentNode = Element::new("a")
            .with_attr("class", "a-link-normal")
            .with_attr("href", "/Dune/dp/0441172717#customerReviews")
            .with_child(Element::new("span").with_text("1,234"))
            .into();

        let found = reviews(&anchor).expect("anchor matches");
        assert_eq!(found.count, Some(1234));
        assert_eq!(
            found.url.as_deref(),
            Some("https://www.amazon.com/Dune/dp/0441172717#customerReviews")
        );
    }

    #[test]
    fn test_reviews_malformed_count_keeps_link() {
        let anchor: DocumentNode = Element::new("a")
            .with_attr("href", "/Dune/dp/0441172717#customerReviews")
            .with_text("4.7 out of 5 stars")
            .into();

        let found = reviews(&anchor).expect("anchor matches");
        assert_eq!(found.count, None);
        assert!(found.url.is_some());

        let plain: DocumentNode = Element::new("a").with_attr("href", "/Dune").with_text("12").into();
        assert_eq!(reviews(&plain), None);
    }

    #[test]
    fn test_apply_first_match_wins() {
        let mut record = BookRecord::empty(Site::Amazon);
        let first = DocumentNode::text_node("4.7 out of 5 stars");
        let second = DocumentNode::text_node("3.1 out of 5 stars");

        apply(&mut record, Visit::new(&first));
        apply(&mut record, Visit::new(&second));
        assert_eq!(record.rating, 4.7);
    }
}
