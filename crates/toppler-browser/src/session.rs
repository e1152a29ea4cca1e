use crate::actions::PageFetcher;
use crate::engine::BrowserEngine;
use crate::error::Result;
use crate::http::HttpFetcher;
use toppler_core::{FetchBackend, TopplerConfig};

/// A fetch backend opened for the duration of one query.
///
/// Open it with [`FetchSession::open`] and release it with
/// [`FetchSession::close`] once every page of the query has been fetched.
pub enum FetchSession {
    Chromium(BrowserEngine),
    Http(HttpFetcher),
}

impl FetchSession {
    /// Open the backend selected in `config.fetch.backend`
    pub async fn open(config: &TopplerConfig) -> Result<Self> {
        match config.fetch.backend {
            FetchBackend::Chromium => Ok(Self::Chromium(
                BrowserEngine::launch(&config.browser).await?,
            )),
            FetchBackend::Http => Ok(Self::Http(HttpFetcher::new(&config.browser)?)),
        }
    }

    /// Release the backend
    pub async fn close(self) -> Result<()> {
        match self {
            Self::Chromium(engine) => engine.close().await,
            Self::Http(_) => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for FetchSession {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        match self {
            Self::Chromium(engine) => engine.fetch_html(url).await,
            Self::Http(fetcher) => fetcher.fetch_html(url).await,
        }
    }
}
