//! Shared types used across the Toppler crates.
//!
//! `Site` identifies where a listing came from and `BookRecord` is the
//! single record shape every extractor fills in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Book sites Toppler knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// Amazon book search (card-based result list).
    Amazon,
    /// Goodreads book search (table-based result list).
    Goodreads,
}

impl Site {
    /// All supported sites, in the order results are presented.
    pub const ALL: [Self; 2] = [Self::Amazon, Self::Goodreads];

    /// Host name the site's search pages are served from.
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Amazon => "www.amazon.com",
            Self::Goodreads => "www.goodreads.com",
        }
    }

    /// Scheme and host, used to absolutize relative links.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Amazon => "https://www.amazon.com",
            Self::Goodreads => "https://www.goodreads.com",
        }
    }

    /// Resolve a site from a URL host. Only exact hosts are accepted.
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|site| site.host() == host)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amazon => write!(f, "Amazon"),
            Self::Goodreads => write!(f, "Goodreads"),
        }
    }
}

/// One scraped book listing.
///
/// Fields start at their sentinel values (empty string, `0.0`, `0`) and are
/// filled in while a result row is walked. A sentinel means the field was not
/// found, not that the book has a legitimately empty or zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// Average rating on a 0.0 to 5.0 scale.
    pub rating: f32,
    pub review_count: u32,
    pub image_url: String,
    pub detail_url: String,
    pub reviews_url: String,
    pub source: Site,
}

impl BookRecord {
    /// Create a record with every field at its sentinel.
    #[must_use]
    pub fn empty(source: Site) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            rating: 0.0,
            review_count: 0,
            image_url: String::new(),
            detail_url: String::new(),
            reviews_url: String::new(),
            source,
        }
    }

    /// Whether the record is worth keeping.
    ///
    /// A detail link and a non-zero rating are what distinguish a product row
    /// from decorative chrome that happens to sit in the results container.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.detail_url.is_empty() && self.rating != 0.0
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Average rating: {:.1}", self.rating)?;
        writeln!(f, "Total reviews: {}", self.review_count)?;
        writeln!(f, "Image: {}", self.image_url)?;
        writeln!(f, "Link: {}", self.detail_url)?;
        writeln!(f, "Browse reviews: {}", self.reviews_url)?;
        write!(f, "Book source: {}", self.source)
    }
}

/// Render a numbered listing of records, one block per book.
#[must_use]
pub fn format_listing(records: &[BookRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("# {}\n{record}\n====\n", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
