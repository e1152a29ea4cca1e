//! Per-site ranking of extracted records.

use std::cmp::Ordering;
use toppler_core::{BookRecord, Site, SiteConfig};

/// Thresholds applied by [`rank`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankPolicy {
    /// Records must rate strictly above this.
    pub min_rating: f32,
    /// Maximum number of records returned.
    pub top_n: usize,
}

impl RankPolicy {
    pub const AMAZON: Self = Self {
        min_rating: 4.5,
        top_n: 12,
    };

    pub const GOODREADS: Self = Self {
        min_rating: 3.7,
        top_n: 12,
    };

    #[must_use]
    pub const fn for_site(site: Site) -> Self {
        match site {
            Site::Amazon => Self::AMAZON,
            Site::Goodreads => Self::GOODREADS,
        }
    }
}

impl From<&SiteConfig> for RankPolicy {
    fn from(config: &SiteConfig) -> Self {
        Self {
            min_rating: config.min_rating,
            top_n: config.top_n,
        }
    }
}

/// Select the best records from `site`.
///
/// The most reviewed `top_n` records rated above the threshold are kept and
/// then ordered by rating, ties broken by review count. Both sorts are stable,
/// so records equal on both keys stay in input order. Fewer than `top_n`
/// qualifying records are returned as they are.
#[must_use]
pub fn rank(records: &[BookRecord], site: Site, policy: RankPolicy) -> Vec<BookRecord> {
    let mut ranked: Vec<BookRecord> = records
        .iter()
        .filter(|r| r.source == site && r.rating > policy.min_rating)
        .cloned()
        .collect();

    ranked.sort_by(|a, b| b.review_count.cmp(&a.review_count));
    ranked.truncate(policy.top_n);
    ranked.sort_by(by_rating_then_reviews);

    tracing::debug!(
        "{}: ranked {} of {} records",
        site,
        ranked.len(),
        records.len()
    );
    ranked
}

fn by_rating_then_reviews(a: &BookRecord, b: &BookRecord) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.review_count.cmp(&a.review_count))
}

#[must_use]
pub fn rank_amazon(records: &[BookRecord]) -> Vec<BookRecord> {
    rank(records, Site::Amazon, RankPolicy::AMAZON)
}

#[must_use]
pub fn rank_goodreads(records: &[BookRecord]) -> Vec<BookRecord> {
    rank(records, Site::Goodreads, RankPolicy::GOODREADS)
}
