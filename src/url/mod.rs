//! URL handling module for Sitescope
//!
//! This module provides URL normalization, exclusion matching, and host
//! comparison. Every other component keys its maps and sets on the
//! normalized string form produced here, so two link-equivalent URLs always
//! collapse to one identity.

mod exclude;
mod normalize;

use ::url::Url;

// Re-export main functions
pub use exclude::{glob_match, is_excluded};
pub use normalize::{normalize, normalize_root};

/// Extracts the lowercase host from a URL
///
/// Returns `None` for URLs without a host, which cannot occur for the
/// HTTP(S) URLs the crawler works with.
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Compares the hosts of two URLs case-insensitively
///
/// The crawl boundary is defined by this comparison: only URLs whose host
/// matches the root host are ever fetched.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}
