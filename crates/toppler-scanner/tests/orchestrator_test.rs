use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use toppler_browser::{BrowserError, PageFetcher};
use toppler_core::{Site, TopplerConfig};
use toppler_scanner::{BookOrchestrator, ScanError};

const AMAZON_PAGE: &str = include_str!("fixtures/amazon_search.html");
const GOODREADS_PAGE: &str = include_str!("fixtures/goodreads_search.html");
const NO_RESULTS: &str = "<html><body><p>No results for your search.</p></body></html>";

/// Serves canned pages by URL and records how many fetches overlap.
#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    fn serve(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_html(&self, url: &str) -> toppler_browser::Result<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| BrowserError::NavigationError(format!("no page at {url}")))
    }
}

fn one_page_each() -> TopplerConfig {
    let mut config = TopplerConfig::default();
    config.amazon.pages = 1;
    config.goodreads.pages = 1;
    config
}

/// A fetcher serving every search URL of `orchestrator` with the site's fixture.
fn full_fetcher(orchestrator: &BookOrchestrator, query: &str) -> FakeFetcher {
    orchestrator
        .search_urls(query)
        .iter()
        .fold(FakeFetcher::default(), |fetcher, url| {
            let html = if url.starts_with(Site::Amazon.base_url()) {
                AMAZON_PAGE
            } else {
                GOODREADS_PAGE
            };
            fetcher.serve(url, html)
        })
}

#[tokio::test]
async fn test_get_books_merges_every_page() {
    let orchestrator = BookOrchestrator::new(TopplerConfig::default());
    let fetcher = full_fetcher(&orchestrator, "dune");

    let records = orchestrator
        .get_books(&fetcher, "dune")
        .await
        .expect("get books");

    // 2 Amazon pages of 3 complete cards, 3 Goodreads pages of 3 rows.
    assert_eq!(records.len(), 15);
    assert_eq!(records.iter().filter(|r| r.source == Site::Amazon).count(), 6);
    assert_eq!(records.iter().filter(|r| r.source == Site::Goodreads).count(), 9);
    assert!(records.iter().all(|r| !r.detail_url.is_empty() && r.rating > 0.0));
}

#[tokio::test]
async fn test_amazon_fields_from_fixture() {
    let orchestrator = BookOrchestrator::new(one_page_each());
    let fetcher = full_fetcher(&orchestrator, "dune");

    let records = orchestrator.get_books(&fetcher, "dune").await.expect("get books");
    let dune = records
        .iter()
        .find(|r| r.source == Site::Amazon && r.title == "Dune")
        .expect("Dune card");

    assert_eq!(dune.author, "Frank Herbert");
    assert!((dune.rating - 4.7).abs() < f32::EPSILON);
    assert_eq!(dune.review_count, 89_012);
    assert_eq!(
        dune.detail_url,
        "https://www.amazon.com/Dune-Frank-Herbert/dp/0441172717/ref=sr_1_1"
    );
    assert_eq!(
        dune.reviews_url,
        "https://www.amazon.com/Dune-Frank-Herbert/dp/0441172717/ref=sr_1_1#customerReviews"
    );
    assert_eq!(
        dune.image_url,
        "https://m.media-amazon.com/images/I/81ym3QUd3KL._AC_UY218_.jpg"
    );

    assert!(!records.iter().any(|r| r.title.starts_with("Sponsored")));
    assert!(!records.iter().any(|r| r.title == "RESULTS"));
}

#[tokio::test]
async fn test_goodreads_fields_from_fixture() {
    let orchestrator = BookOrchestrator::new(one_page_each());
    let fetcher = full_fetcher(&orchestrator, "dune");

    let records = orchestrator.get_books(&fetcher, "dune").await.expect("get books");
    let messiah = records
        .iter()
        .find(|r| r.source == Site::Goodreads && r.title == "Dune Messiah (Dune, #2)")
        .expect("Dune Messiah row");

    assert_eq!(messiah.author, "Frank Herbert");
    assert!((messiah.rating - 3.89).abs() < f32::EPSILON);
    assert_eq!(messiah.review_count, 312_405);
    assert_eq!(
        messiah.detail_url,
        "https://www.goodreads.com/book/show/44492285-dune-messiah?from_search=true"
    );
    assert_eq!(messiah.reviews_url, messiah.detail_url);
}

#[tokio::test]
async fn test_page_without_container_is_skipped() {
    let orchestrator = BookOrchestrator::new(TopplerConfig::default());
    let urls = orchestrator.search_urls("dune");
    let fetcher = full_fetcher(&orchestrator, "dune").serve(&urls[1], NO_RESULTS);

    let records = orchestrator.get_books(&fetcher, "dune").await.expect("get books");
    assert_eq!(records.iter().filter(|r| r.source == Site::Amazon).count(), 3);
    assert_eq!(records.iter().filter(|r| r.source == Site::Goodreads).count(), 9);
}

#[tokio::test]
async fn test_failed_and_empty_pages_are_skipped() {
    let orchestrator = BookOrchestrator::new(TopplerConfig::default());
    let urls = orchestrator.search_urls("dune");

    let mut fetcher = full_fetcher(&orchestrator, "dune").serve(&urls[3], "  \n ");
    fetcher.pages.remove(&urls[4]);

    let records = orchestrator.get_books(&fetcher, "dune").await.expect("get books");
    assert_eq!(records.iter().filter(|r| r.source == Site::Amazon).count(), 6);
    assert_eq!(records.iter().filter(|r| r.source == Site::Goodreads).count(), 3);
}

#[tokio::test]
async fn test_runaway_nesting_skips_only_that_page() {
    let orchestrator = BookOrchestrator::new(TopplerConfig::default());
    let urls = orchestrator.search_urls("dune");
    let deep = format!(
        "<html><body>{}{}</body></html>",
        "<div>".repeat(5_000),
        "</div>".repeat(5_000)
    );
    let fetcher = full_fetcher(&orchestrator, "dune").serve(&urls[0], &deep);

    let records = orchestrator.get_books(&fetcher, "dune").await.expect("get books");
    assert_eq!(records.iter().filter(|r| r.source == Site::Amazon).count(), 3);
    assert_eq!(records.iter().filter(|r| r.source == Site::Goodreads).count(), 9);
}

#[tokio::test]
async fn test_only_container_less_pages_still_succeeds() {
    let orchestrator = BookOrchestrator::new(one_page_each());
    let fetcher = orchestrator
        .search_urls("zzzz")
        .iter()
        .fold(FakeFetcher::default(), |fetcher, url| fetcher.serve(url, NO_RESULTS));

    let records = orchestrator.get_books(&fetcher, "zzzz").await.expect("get books");
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_all_fetches_failing_is_batch_failure() {
    let orchestrator = BookOrchestrator::new(TopplerConfig::default());
    let fetcher = FakeFetcher::default();

    let err = orchestrator.get_books(&fetcher, "dune").await.unwrap_err();
    match err {
        ScanError::BatchFailure { query, attempted } => {
            assert_eq!(query, "dune");
            assert_eq!(attempted, 5);
        }
        other => panic!("expected BatchFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_query_is_rejected() {
    let orchestrator = BookOrchestrator::new(TopplerConfig::default());
    let fetcher = FakeFetcher::default();

    let err = orchestrator.get_books(&fetcher, "   ").await.unwrap_err();
    assert!(matches!(err, ScanError::EmptyQuery));
}

#[tokio::test]
async fn test_fetch_concurrency_is_bounded() {
    let orchestrator =
        BookOrchestrator::new(TopplerConfig::default()).with_max_concurrent_fetches(2);
    let fetcher = full_fetcher(&orchestrator, "dune");

    let records = orchestrator.get_books(&fetcher, "dune").await.expect("get books");
    assert_eq!(records.len(), 15);
    assert!(fetcher.max_in_flight.load(Ordering::SeqCst) <= 2);
    assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_ranks_each_site() {
    let orchestrator = BookOrchestrator::new(one_page_each());
    let fetcher = full_fetcher(&orchestrator, "dune");

    let results = orchestrator.search(&fetcher, "dune").await.expect("search");

    let amazon: Vec<&str> = results.amazon.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(amazon, vec!["The Alchemist", "Dune"]);

    let goodreads: Vec<&str> = results.goodreads.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(goodreads, vec!["Dune (Dune, #1)", "Dune Messiah (Dune, #2)"]);

    let json = serde_json::to_value(&results).expect("serialize results");
    assert_eq!(json["amazon"][0]["source"], "amazon");
    assert_eq!(json["goodreads"][1]["review_count"], 312_405);
}
