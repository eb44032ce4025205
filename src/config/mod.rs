//! Crawl configuration
//!
//! Options controlling a single crawl run. Validation failures here are the
//! only way (besides a bad root URL) that a crawl refuses to start.

use crate::ConfigError;
use std::time::Duration;

/// Default worker count when the caller does not choose one
pub const DEFAULT_CONCURRENCY: usize = 5;

/// User-Agent header sent when the caller does not choose one
pub const DEFAULT_USER_AGENT: &str = "SiteScope-Bot/1.0";

/// Options for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Seed URL the crawl starts from
    pub root_url: String,

    /// Maximum link-hops away from the root; 0 means unlimited depth
    pub max_depth: u32,

    /// Maximum number of concurrent fetches
    pub concurrency: usize,

    /// User-Agent header sent on every request
    pub user_agent: String,

    /// Glob patterns; matching URLs are skipped during the crawl
    pub exclude_patterns: Vec<String>,

    /// Timeout for a single HTTP request; None means no timeout
    pub request_timeout: Option<Duration>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            root_url: String::new(),
            max_depth: 0,
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            exclude_patterns: Vec::new(),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl CrawlOptions {
    /// Creates options for the given root URL with defaults everywhere else
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            ..Self::default()
        }
    }

    /// Validates the options
    ///
    /// The root URL gets its own dedicated validation in `normalize_root`;
    /// this checks everything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency < 1 || self.concurrency > 100 {
            return Err(ConfigError::Validation(format!(
                "concurrency must be between 1 and 100, got {}",
                self.concurrency
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
