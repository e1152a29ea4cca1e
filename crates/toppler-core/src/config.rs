//! Configuration management for Toppler.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Site;
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main application configuration.
///
/// This is loaded from `~/.config/toppler/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopplerConfig {
    /// Amazon search and ranking settings
    #[serde(deserialize_with = "amazon_section")]
    pub amazon: SiteConfig,
    /// Goodreads search and ranking settings
    #[serde(deserialize_with = "goodreads_section")]
    pub goodreads: SiteConfig,
    /// Headless browser settings
    pub browser: BrowserConfig,
    /// Page fetching settings
    pub fetch: FetchConfig,
}

impl Default for TopplerConfig {
    fn default() -> Self {
        Self {
            amazon: SiteConfig::amazon(),
            goodreads: SiteConfig::goodreads(),
            browser: BrowserConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl TopplerConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML or fail validation
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, using defaults if it is absent.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        let config: Self = if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `TOPPLER_HEADLESS`: Override browser headless mode (true/false)
    /// - `TOPPLER_MAX_CONCURRENT_FETCHES`: Override fetch concurrency
    /// - `TOPPLER_GOODREADS_PAGES`: Override the number of Goodreads pages
    /// - `TOPPLER_FETCH_BACKEND`: `chromium` or `http`
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(headless) = lookup("TOPPLER_HEADLESS").and_then(|v| v.parse().ok()) {
            self.browser.headless = headless;
            tracing::debug!("Override browser.headless from env: {}", headless);
        }

        if let Some(max) = lookup("TOPPLER_MAX_CONCURRENT_FETCHES").and_then(|v| v.parse().ok()) {
            self.fetch.max_concurrent = max;
            tracing::debug!("Override fetch.max_concurrent from env: {}", max);
        }

        if let Some(pages) = lookup("TOPPLER_GOODREADS_PAGES").and_then(|v| v.parse().ok()) {
            self.goodreads.pages = pages;
            tracing::debug!("Override goodreads.pages from env: {}", pages);
        }

        if let Some(backend) = lookup("TOPPLER_FETCH_BACKEND").and_then(|v| v.parse().ok()) {
            self.fetch.backend = backend;
            tracing::debug!("Override fetch.backend from env: {:?}", backend);
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/toppler/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "toppler", "toppler").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Settings for one site.
    #[must_use]
    pub const fn site(&self, site: Site) -> &SiteConfig {
        match site {
            Site::Amazon => &self.amazon,
            Site::Goodreads => &self.goodreads,
        }
    }

    /// Reject values the scraper cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        self.amazon.validate("amazon")?;
        self.goodreads.validate("goodreads")?;

        if self.fetch.max_concurrent == 0 {
            return Err(invalid("fetch.max_concurrent", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Search and ranking settings for a single site.
///
/// There is no site-neutral default. A `[amazon]` or `[goodreads]` table
/// that sets only some keys takes the rest from that site's preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Number of result pages requested per query
    pub pages: u32,
    /// Records must rate strictly above this to be ranked
    pub min_rating: f32,
    /// Maximum number of ranked records
    pub top_n: usize,
}

impl SiteConfig {
    /// Amazon defaults: two pages, rating above 4.5, top 12.
    #[must_use]
    pub const fn amazon() -> Self {
        Self {
            pages: 2,
            min_rating: 4.5,
            top_n: 12,
        }
    }

    /// Goodreads defaults: three pages, rating above 3.7, top 12.
    #[must_use]
    pub const fn goodreads() -> Self {
        Self {
            pages: 3,
            min_rating: 3.7,
            top_n: 12,
        }
    }

    fn validate(&self, section: &str) -> ConfigResult<()> {
        if self.pages == 0 {
            return Err(invalid(&format!("{section}.pages"), "must be at least 1"));
        }
        if self.top_n == 0 {
            return Err(invalid(&format!("{section}.top_n"), "must be at least 1"));
        }
        if !(0.0..=5.0).contains(&self.min_rating) {
            return Err(invalid(
                &format!("{section}.min_rating"),
                "must be between 0 and 5",
            ));
        }
        Ok(())
    }
}

/// Keys present in a site table.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteOverrides {
    pages: Option<u32>,
    min_rating: Option<f32>,
    top_n: Option<usize>,
}

impl SiteOverrides {
    fn over(self, preset: SiteConfig) -> SiteConfig {
        SiteConfig {
            pages: self.pages.unwrap_or(preset.pages),
            min_rating: self.min_rating.unwrap_or(preset.min_rating),
            top_n: self.top_n.unwrap_or(preset.top_n),
        }
    }
}

fn amazon_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SiteConfig, D::Error> {
    SiteOverrides::deserialize(deserializer).map(|keys| keys.over(SiteConfig::amazon()))
}

fn goodreads_section<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SiteConfig, D::Error> {
    SiteOverrides::deserialize(deserializer).map(|keys| keys.over(SiteConfig::goodreads()))
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Fixed user agent; a common desktop agent is picked at random when unset
    pub user_agent: Option<String>,
    /// Minimum delay between two requests to the same domain, in milliseconds
    pub min_delay_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            user_agent: None,
            min_delay_ms: 250,
        }
    }
}

/// Which collaborator retrieves pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// Render pages in headless Chromium
    Chromium,
    /// Plain HTTP GET without script execution
    Http,
}

impl FromStr for FetchBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" => Ok(Self::Chromium),
            "http" => Ok(Self::Http),
            other => Err(invalid(
                "fetch.backend",
                &format!("unknown backend '{other}'"),
            )),
        }
    }
}

/// Page fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Fetch backend
    pub backend: FetchBackend,
    /// Maximum pages fetched at the same time
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backend: FetchBackend::Chromium,
            max_concurrent: 5,
        }
    }
}
