use crate::canonical::CanonicalInfo;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Status sentinel recorded when a fetch produced no HTTP response at all
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Shared mutable state of one crawl run
///
/// All aggregates form one logical unit: the `valid`/`broken` mutual
/// exclusion spans two maps and must be updated as a single compound
/// operation, so handlers mutate this struct only through the `record_*`
/// methods, under one lock. After the worker pool drains the state is
/// read-only and gets frozen into a [`crate::state::CrawlReport`].
#[derive(Debug, Default, Clone)]
pub struct CrawlState {
    /// Every URL seen during the crawl, before any filtering
    pub discovered: HashSet<String>,

    /// URLs that answered with a 2xx/3xx status
    pub valid: HashSet<String>,

    /// URLs that failed, mapped to their status (0 = transport failure)
    pub broken: HashMap<String, u16>,

    /// For each link target, the set of pages that referenced it
    pub sources: HashMap<String, BTreeSet<String>>,

    /// Best-available last-modified timestamp per fetched page
    pub last_modified: HashMap<String, DateTime<Utc>>,

    /// Number of links skipped by exclusion patterns
    pub excluded_count: usize,

    /// Terminal HTTP status observed per fetched URL
    pub status_by_url: HashMap<String, u16>,

    /// Canonical tag extraction per fetched page, consumed at assembly
    pub canonical_by_page: HashMap<String, CanonicalInfo>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page that answered with a 2xx/3xx status
    ///
    /// Clears any earlier broken entry for the same URL; the latest observed
    /// status always wins.
    pub fn record_success(
        &mut self,
        url: &str,
        status: u16,
        last_modified: DateTime<Utc>,
        canonical: CanonicalInfo,
    ) {
        self.discovered.insert(url.to_string());
        self.valid.insert(url.to_string());
        self.broken.remove(url);
        self.status_by_url.insert(url.to_string(), status);
        self.last_modified.insert(url.to_string(), last_modified);
        self.canonical_by_page.insert(url.to_string(), canonical);
    }

    /// Records a page that failed, either with an HTTP error status or with
    /// the transport-failure sentinel
    pub fn record_failure(&mut self, url: &str, status: u16) {
        self.discovered.insert(url.to_string());
        self.broken.insert(url.to_string(), status);
        self.valid.remove(url);
        self.status_by_url.insert(url.to_string(), status);
    }

    /// Records a discovered link and the page it was found on
    ///
    /// Source accumulation is commutative, so handlers may call this in any
    /// order across worker threads.
    pub fn record_link(&mut self, target: &str, source: &str) {
        self.discovered.insert(target.to_string());
        self.sources
            .entry(target.to_string())
            .or_default()
            .insert(source.to_string());
    }

    /// Counts a link skipped by an exclusion pattern
    pub fn record_excluded(&mut self) {
        self.excluded_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_stub(url: &str) -> CanonicalInfo {
        CanonicalInfo {
            page_url: url.to_string(),
            canonical_url: None,
            tag_count: 0,
            multiple: false,
        }
    }

    #[test]
    fn test_success_records_all_aggregates() {
        let mut state = CrawlState::new();
        let now = Utc::now();
        state.record_success("https://x/a", 200, now, canonical_stub("https://x/a"));

        assert!(state.discovered.contains("https://x/a"));
        assert!(state.valid.contains("https://x/a"));
        assert_eq!(state.status_by_url.get("https://x/a"), Some(&200));
        assert_eq!(state.last_modified.get("https://x/a"), Some(&now));
        assert!(state.canonical_by_page.contains_key("https://x/a"));
    }

    #[test]
    fn test_valid_and_broken_are_disjoint() {
        let mut state = CrawlState::new();
        let now = Utc::now();

        state.record_failure("https://x/a", 500);
        state.record_success("https://x/a", 200, now, canonical_stub("https://x/a"));
        assert!(state.valid.contains("https://x/a"));
        assert!(!state.broken.contains_key("https://x/a"));

        state.record_failure("https://x/a", 404);
        assert!(!state.valid.contains("https://x/a"));
        assert_eq!(state.broken.get("https://x/a"), Some(&404));
    }

    #[test]
    fn test_latest_status_wins() {
        let mut state = CrawlState::new();
        state.record_failure("https://x/a", 500);
        state.record_failure("https://x/a", 404);
        assert_eq!(state.broken.get("https://x/a"), Some(&404));
        assert_eq!(state.status_by_url.get("https://x/a"), Some(&404));
    }

    #[test]
    fn test_transport_failure_sentinel() {
        let mut state = CrawlState::new();
        state.record_failure("https://x/a", TRANSPORT_FAILURE_STATUS);
        assert_eq!(state.broken.get("https://x/a"), Some(&0));
    }

    #[test]
    fn test_sources_accumulate_and_deduplicate() {
        let mut state = CrawlState::new();
        state.record_link("https://x/t", "https://x/b");
        state.record_link("https://x/t", "https://x/a");
        state.record_link("https://x/t", "https://x/b");

        let sources = state.sources.get("https://x/t").unwrap();
        let listed: Vec<_> = sources.iter().cloned().collect();
        assert_eq!(listed, vec!["https://x/a", "https://x/b"]);
        assert!(state.discovered.contains("https://x/t"));
    }

    #[test]
    fn test_excluded_counter() {
        let mut state = CrawlState::new();
        state.record_excluded();
        state.record_excluded();
        assert_eq!(state.excluded_count, 2);
    }
}
