//! Book search orchestrator.
//!
//! This module provides the `BookOrchestrator`, which turns one query into
//! search URLs for every site, fetches the pages through a [`PageFetcher`]
//! with bounded concurrency, and merges the records extracted from each page.
//! A page that fails to fetch, parse or locate its results is logged and
//! skipped; the query only fails when no page could be parsed at all.

use crate::document::DocumentNode;
use crate::error::{Result, ScanError};
use crate::locator::{locate, ContainerSpec};
use crate::ranker::{self, RankPolicy};
use crate::records::build_records;
use crate::url_builder::{self, site_for_url};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use toppler_browser::{FetchSession, PageFetcher};
use toppler_core::{format_listing, BookRecord, Site, TopplerConfig};

/// Ranked records for one query, per site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Top Amazon results
    pub amazon: Vec<BookRecord>,
    /// Top Goodreads results
    pub goodreads: Vec<BookRecord>,
}

impl SearchResults {
    /// Ranked records for `site`.
    #[must_use]
    pub fn for_site(&self, site: Site) -> &[BookRecord] {
        match site {
            Site::Amazon => &self.amazon,
            Site::Goodreads => &self.goodreads,
        }
    }

    /// Plain-text listing of both sites, Amazon first.
    #[must_use]
    pub fn listing(&self) -> String {
        Site::ALL
            .into_iter()
            .map(|site| format!("== {site} ==\n{}", format_listing(self.for_site(site))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A fetched page parsed into a document tree.
struct ParsedPage {
    site: Site,
    root: DocumentNode,
}

/// Runs book searches against every supported site.
pub struct BookOrchestrator {
    config: TopplerConfig,
}

impl BookOrchestrator {
    /// Create an orchestrator using the page counts, ranking thresholds and
    /// fetch concurrency from `config`.
    #[must_use]
    pub fn new(config: TopplerConfig) -> Self {
        Self { config }
    }

    /// Set the maximum number of pages fetched at once.
    #[must_use]
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.config.fetch.max_concurrent = max;
        self
    }

    /// Configuration this orchestrator runs with.
    #[must_use]
    pub fn config(&self) -> &TopplerConfig {
        &self.config
    }

    /// Search URLs for `query`: every Amazon page, then every Goodreads page.
    #[must_use]
    pub fn search_urls(&self, query: &str) -> Vec<String> {
        url_builder::search_urls(&self.config, query)
    }

    /// Fetch every search page for `query` and return the merged, unranked
    /// records of all sites.
    ///
    /// Records are grouped by page in completion order, which is not page
    /// order. Pages that fail are skipped; [`ScanError::BatchFailure`] is
    /// returned only when none could be parsed.
    pub async fn get_books<F>(&self, fetcher: &F, query: &str) -> Result<Vec<BookRecord>>
    where
        F: PageFetcher + ?Sized,
    {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScanError::EmptyQuery);
        }

        let urls = self.search_urls(query);
        let attempted = urls.len();
        let max_concurrent = self.config.fetch.max_concurrent.max(1);

        let mut futures = FuturesUnordered::new();
        let mut records = Vec::new();
        let mut parsed = 0;

        for url in urls {
            futures.push(Self::fetch_page(fetcher, url));

            // Respect concurrency limit
            while futures.len() >= max_concurrent {
                if let Some((url, page)) = futures.next().await {
                    parsed += Self::collect_page(&url, page, &mut records);
                }
            }
        }

        // Collect remaining pages
        while let Some((url, page)) = futures.next().await {
            parsed += Self::collect_page(&url, page, &mut records);
        }

        if parsed == 0 {
            tracing::error!("No page could be parsed for '{}'", query);
            return Err(ScanError::BatchFailure {
                query: query.to_string(),
                attempted,
            });
        }

        tracing::info!(
            "Extracted {} records from {} of {} pages for '{}'",
            records.len(),
            parsed,
            attempted,
            query
        );
        Ok(records)
    }

    /// Fetch one search page and parse it. The URL is handed back alongside
    /// the outcome so failures can be reported against it.
    async fn fetch_page<F>(fetcher: &F, url: String) -> (String, Result<ParsedPage>)
    where
        F: PageFetcher + ?Sized,
    {
        let page = Self::load_page(fetcher, &url).await;
        (url, page)
    }

    async fn load_page<F>(fetcher: &F, url: &str) -> Result<ParsedPage>
    where
        F: PageFetcher + ?Sized,
    {
        let site = site_for_url(url)?;
        let html = fetcher.fetch_html(url).await?;
        if html.trim().is_empty() {
            return Err(ScanError::ParseFailure {
                url: url.to_string(),
                reason: "empty document".to_string(),
            });
        }
        let root = DocumentNode::parse(&html).map_err(|e| ScanError::ParseFailure {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(ParsedPage { site, root })
    }

    /// Extract the records of one fetched page into `records`.
    ///
    /// Returns 1 if the page was parsed, whether or not its results container
    /// was present, and 0 if it was skipped before parsing.
    fn collect_page(url: &str, page: Result<ParsedPage>, records: &mut Vec<BookRecord>) -> usize {
        let page = match page {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping page {}: {}", url, e);
                return 0;
            }
        };

        match locate(&page.root, &ContainerSpec::for_site(page.site)) {
            Ok(container) => {
                let found = build_records(container, page.site);
                tracing::debug!("{} records from {}", found.len(), url);
                records.extend(found);
            }
            Err(e) => tracing::warn!("Skipping page {}: {}", url, e),
        }
        1
    }

    /// Rank `records` for `site` using the configured thresholds.
    #[must_use]
    pub fn rank(&self, records: &[BookRecord], site: Site) -> Vec<BookRecord> {
        ranker::rank(records, site, RankPolicy::from(self.config.site(site)))
    }

    /// Fetch and rank results for `query` on every site.
    pub async fn search<F>(&self, fetcher: &F, query: &str) -> Result<SearchResults>
    where
        F: PageFetcher + ?Sized,
    {
        let records = self.get_books(fetcher, query).await?;
        Ok(SearchResults {
            amazon: self.rank(&records, Site::Amazon),
            goodreads: self.rank(&records, Site::Goodreads),
        })
    }
}

/// Run one complete search with a fetch session opened for it.
///
/// The session is closed before returning, whether or not the search
/// succeeded. A failure to close is logged and does not hide the result.
pub async fn find_books(config: &TopplerConfig, query: &str) -> Result<SearchResults> {
    if query.trim().is_empty() {
        return Err(ScanError::EmptyQuery);
    }

    let session = FetchSession::open(config).await?;
    let results = BookOrchestrator::new(config.clone())
        .search(&session, query)
        .await;

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close fetch session: {}", e);
    }
    results
}
