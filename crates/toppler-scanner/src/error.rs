use toppler_browser::BrowserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("results container {container} not found")]
    ContainerNotFound { container: String },

    #[error("could not parse page {url}: {reason}")]
    ParseFailure { url: String, reason: String },

    #[error("document nests elements deeper than {limit} levels")]
    DocumentTooDeep { limit: usize },

    #[error("malformed {field} value '{value}'")]
    MalformedField { field: &'static str, value: String },

    #[error("no usable pages for query '{query}' ({attempted} fetched)")]
    BatchFailure { query: String, attempted: usize },

    #[error("search query is empty")]
    EmptyQuery,

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
