//! Sitescope: an SEO site crawler and auditor
//!
//! This crate crawls a single website, classifies every discovered page's
//! reachability, audits declared canonical-URL metadata, and resolves a
//! best-available last-modified timestamp per page. The output feeds sitemap
//! generation and link-cleanup reports.

pub mod canonical;
pub mod config;
pub mod crawler;
pub mod lastmod;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitescope operations
///
/// Only setup failures surface through this type: a crawl that starts always
/// runs to completion, recording per-page failures as data in the report.
#[derive(Debug, Error)]
pub enum SitescopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Root URL is required")]
    MissingRootUrl,

    #[error("Invalid root URL: {0}")]
    InvalidRootUrl(String),
}

/// Result type alias for Sitescope operations
pub type Result<T> = std::result::Result<T, SitescopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use canonical::{CanonicalInfo, CanonicalIssue, IssueType};
pub use config::CrawlOptions;
pub use crawler::crawl;
pub use state::{BrokenLinkTask, CrawlReport, CrawlState};
pub use url::{extract_host, is_excluded, normalize, normalize_root, same_host};
