//! Page fetching for Toppler.
//!
//! Renders book-search pages in headless Chromium, or fetches them with a
//! plain HTTP GET, with per-domain request spacing and a desktop user agent.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod session;
mod throttle;

pub use actions::{extract_domain, PageFetcher};
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use http::HttpFetcher;
pub use session::FetchSession;
