use crate::actions::{extract_domain, PageFetcher};
use crate::error::{BrowserError, Result};
use crate::fingerprint::Fingerprint;
use crate::throttle::DomainThrottle;
use std::time::Duration;
use toppler_core::BrowserConfig;

/// Fetches pages with a plain HTTP GET.
///
/// No scripts run, so this only sees what the server sends in the initial
/// response. It is much cheaper than a browser and works for Goodreads.
pub struct HttpFetcher {
    client: reqwest::Client,
    throttle: DomainThrottle,
}

impl HttpFetcher {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let fingerprint = Fingerprint::from_config(config);
        let client = reqwest::Client::builder()
            .user_agent(fingerprint.user_agent)
            .timeout(Duration::from_secs(config.navigation_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            throttle: DomainThrottle::new(config.min_delay_ms),
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let domain = extract_domain(url)?;
        self.throttle.wait_turn(&domain).await;

        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
