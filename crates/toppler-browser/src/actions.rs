use crate::error::{BrowserError, Result};

/// Retrieves the rendered markup of a page.
///
/// This is the only capability the scanner needs from the outside world.
/// Implementations must be safe to call concurrently for different URLs.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the full HTML of `url`.
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
