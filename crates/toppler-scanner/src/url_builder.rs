use crate::error::{Result, ScanError};
use toppler_core::{Site, TopplerConfig};
use url::form_urlencoded;
use url::Url;

const AMAZON_SEARCH: &str = "https://www.amazon.com/Books-Search/s";
/// Restricts Amazon results to books rated four stars and up.
const AMAZON_TOP_RATED: &str = "&i=stripbooks&rh=n%3A283155%2Cp_72%3A1250221011&dc";
const GOODREADS_SEARCH: &str = "https://www.goodreads.com/search";

/// Form-encode a free-text query: spaces become `+`, a literal `+` becomes
/// `%2B`, and other reserved characters are percent-escaped.
pub fn encode_query(query: &str) -> String {
    form_urlencoded::byte_serialize(query.trim().as_bytes()).collect()
}

pub fn amazon_urls(query: &str, pages: u32) -> Vec<String> {
    let search = format!("{AMAZON_SEARCH}?k={}{AMAZON_TOP_RATED}", encode_query(query));
    (1..=pages)
        .map(|page| {
            format!("{search}&page={page}&qid=1634582114&rnid=1250219011&ref=sr_pg_{page}")
        })
        .collect()
}

pub fn goodreads_urls(query: &str, pages: u32) -> Vec<String> {
    let search = format!("{GOODREADS_SEARCH}?q={}", encode_query(query));
    (1..=pages)
        .map(|page| format!("{search}&page={page}&search_type=books"))
        .collect()
}

/// Search URLs for one site, in page order.
pub fn build_search_urls(site: Site, query: &str, pages: u32) -> Vec<String> {
    match site {
        Site::Amazon => amazon_urls(query, pages),
        Site::Goodreads => goodreads_urls(query, pages),
    }
}

/// Search URLs for every site, using each site's configured page count.
pub fn search_urls(config: &TopplerConfig, query: &str) -> Vec<String> {
    Site::ALL
        .into_iter()
        .flat_map(|site| build_search_urls(site, query, config.site(site).pages))
        .collect()
}

/// What a search URL asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub site: Site,
    pub query: String,
    pub page: u32,
}

/// The site a URL belongs to, by exact host.
pub fn site_for_url(url: &str) -> Result<Site> {
    let parsed = Url::parse(url).map_err(|e| parse_failure(url, &e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| parse_failure(url, "no host"))?;
    Site::from_host(host).ok_or_else(|| parse_failure(url, &format!("unknown site {host}")))
}

/// Recover the site, raw query text and page number from a search URL.
pub fn parse_search_url(url: &str) -> Result<SearchRequest> {
    let site = site_for_url(url)?;
    let parsed = Url::parse(url).map_err(|e| parse_failure(url, &e.to_string()))?;

    let query_key = match site {
        Site::Amazon => "k",
        Site::Goodreads => "q",
    };
    let mut query = None;
    let mut page = None;
    for (key, value) in parsed.query_pairs() {
        if key == query_key && query.is_none() {
            query = Some(value.into_owned());
        } else if key == "page" && page.is_none() {
            page = value.parse().ok();
        }
    }

    Ok(SearchRequest {
        site,
        query: query.ok_or_else(|| parse_failure(url, "no query parameter"))?,
        page: page.ok_or_else(|| parse_failure(url, "no page number"))?,
    })
}

fn parse_failure(url: &str, reason: &str) -> ScanError {
    ScanError::ParseFailure {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
