//! Toppler Core - Foundation crate for the Toppler book finder.
//!
//! This crate provides the shared record types, configuration management
//! and error types that the browser and scanner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - `Site` and `BookRecord`
//! - [`logging`] - tracing subscriber setup for embedding applications
//!
//! # Example
//!
//! ```rust
//! use toppler_core::{BookRecord, Site, TopplerConfig};
//!
//! let config = TopplerConfig::default();
//! assert_eq!(config.site(Site::Amazon).top_n, 12);
//!
//! let record = BookRecord::empty(Site::Goodreads);
//! assert!(!record.is_complete());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod logging;
#[allow(missing_docs)]
pub mod types;

// Re-export commonly used types
pub use config::{BrowserConfig, FetchBackend, FetchConfig, SiteConfig, TopplerConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{format_listing, BookRecord, Site};
