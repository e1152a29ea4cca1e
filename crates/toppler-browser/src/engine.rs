use crate::actions::{extract_domain, PageFetcher};
use crate::error::{BrowserError, Result};
use crate::fingerprint::Fingerprint;
use crate::throttle::DomainThrottle;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::error::CdpError;
use futures::stream::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use toppler_core::BrowserConfig;

/// Headless Chromium session.
///
/// One engine is launched per search query and shut down with
/// [`BrowserEngine::close`] when the query is done. Each fetch opens its own
/// tab, so concurrent fetches do not share page state.
pub struct BrowserEngine {
    browser: Browser,
    handler: JoinHandle<()>,
    throttle: DomainThrottle,
    navigation_timeout: Duration,
}

impl BrowserEngine {
    /// Launch a browser with the given settings
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let fingerprint = Fingerprint::from_config(config);
        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);

        let mut builder = ChromiumConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .request_timeout(navigation_timeout)
            .arg(format!("--user-agent={}", fingerprint.user_agent));
        if !config.headless {
            builder = builder.with_head();
        }
        let chromium_config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(chromium_config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                // Handle events if needed
                let _ = event;
            }
        });

        tracing::debug!("Launched browser as {}", fingerprint.user_agent);

        Ok(Self {
            browser,
            handler,
            throttle: DomainThrottle::new(config.min_delay_ms),
            navigation_timeout,
        })
    }

    /// Close the browser and stop its event handler.
    pub async fn close(mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        closed
    }

    async fn load(&self, url: &str) -> Result<String> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;

        let content: std::result::Result<String, CdpError> = async {
            page.wait_for_navigation().await?;
            page.content().await
        }
        .await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }

        content.map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))
    }
}

#[async_trait::async_trait]
impl PageFetcher for BrowserEngine {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let domain = extract_domain(url)?;
        self.throttle.wait_turn(&domain).await;

        tracing::debug!("Rendering {}", url);
        tokio::time::timeout(self.navigation_timeout, self.load(url))
            .await
            .map_err(|_| BrowserError::Timeout(url.to_string()))?
    }
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        // Stops the handler when the engine is dropped without close()
        self.handler.abort();
    }
}
