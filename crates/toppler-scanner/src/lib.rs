//! Toppler Scanner - Book search extraction and ranking.
//!
//! This crate turns book-search result pages from Amazon and Goodreads into
//! [`BookRecord`](toppler_core::BookRecord)s and picks the best of them.
//!
//! # Features
//!
//! - Search URL construction per site, with configurable page counts
//! - Concurrent page fetching through any [`PageFetcher`](toppler_browser::PageFetcher)
//! - Results-container location and per-field extraction over a parsed tree
//! - Per-site ranking by popularity, then rating
//!
//! Pages that cannot be fetched, parsed or located are skipped. A query fails
//! only when none of its pages yield a document.
//!
//! # Example
//!
//! ```rust,ignore
//! use toppler_core::TopplerConfig;
//! use toppler_scanner::find_books;
//!
//! let config = TopplerConfig::load_with_env()?;
//! let results = find_books(&config, "dune").await?;
//! println!("{}", results.listing());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod document;
#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod extract;
#[allow(missing_docs)]
pub mod locator;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod ranker;
pub mod records;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use document::{DocumentNode, Element, MAX_DEPTH};
pub use error::{Result, ScanError};
pub use locator::{locate, ContainerSpec};
pub use orchestrator::{find_books, BookOrchestrator, SearchResults};
pub use ranker::{rank, rank_amazon, rank_goodreads, RankPolicy};
pub use records::build_records;
pub use url_builder::{build_search_urls, parse_search_url, SearchRequest};
