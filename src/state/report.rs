use crate::canonical::{self, CanonicalIssue};
use crate::state::CrawlState;
use crate::url::is_excluded;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// A single broken link and every source page that references it
///
/// Consumed by the task-report writer to generate actionable fix lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLinkTask {
    pub url: String,
    /// HTTP status, or 0 when the request produced no response
    pub status: u16,
    /// Sorted, duplicate-free list of pages linking to this URL
    pub sources: Vec<String>,
}

/// Immutable result of a completed crawl
///
/// Every collection is sorted, so iteration order is deterministic for
/// downstream formatters regardless of worker scheduling during the crawl.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Every discovered URL that returned a 2xx/3xx status, sorted
    pub valid_urls: Vec<String>,

    /// Broken URL to status code (0 = transport failure)
    pub broken_links: BTreeMap<String, u16>,

    /// Broken links with their referencing pages, sorted by URL
    pub broken_link_tasks: Vec<BrokenLinkTask>,

    /// Valid URL to its best-available last-modified timestamp (UTC)
    pub last_modified: BTreeMap<String, DateTime<Utc>>,

    /// Canonical validation findings, sorted and deduplicated
    pub canonical_issues: Vec<CanonicalIssue>,

    /// Pages fetched without a usable canonical tag, sorted
    pub missing_canonical_pages: Vec<String>,

    /// Pages declaring more than one canonical tag, sorted
    pub multiple_canonical_pages: Vec<String>,

    /// Total number of unique URLs seen during the crawl
    pub discovered: usize,

    /// Number of links skipped by exclusion patterns
    pub excluded_urls: usize,
}

/// Freezes a drained `CrawlState` into a `CrawlReport`
///
/// Exclusion patterns are re-applied here because the root URL is fetched
/// unconditionally and may itself match a pattern.
pub fn assemble(state: CrawlState, exclude_patterns: &[String]) -> CrawlReport {
    let mut valid_urls: Vec<String> = state
        .valid
        .iter()
        .filter(|u| !is_excluded(u, exclude_patterns))
        .cloned()
        .collect();
    valid_urls.sort();

    let broken_links: BTreeMap<String, u16> = state
        .broken
        .iter()
        .filter(|(u, _)| !is_excluded(u, exclude_patterns))
        .map(|(u, s)| (u.clone(), *s))
        .collect();

    let broken_link_tasks: Vec<BrokenLinkTask> = broken_links
        .iter()
        .map(|(url, status)| BrokenLinkTask {
            url: url.clone(),
            status: *status,
            sources: state
                .sources
                .get(url)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
        })
        .collect();

    let last_modified: BTreeMap<String, DateTime<Utc>> = state.last_modified.into_iter().collect();

    let mut canonical_targets: HashMap<String, String> = HashMap::new();
    let mut missing_canonical_pages = Vec::new();
    let mut multiple_canonical_pages = Vec::new();
    for (page, info) in &state.canonical_by_page {
        match &info.canonical_url {
            Some(target) => {
                canonical_targets.insert(page.clone(), target.clone());
            }
            None => missing_canonical_pages.push(page.clone()),
        }
        if info.multiple {
            multiple_canonical_pages.push(page.clone());
        }
    }
    missing_canonical_pages.sort();
    multiple_canonical_pages.sort();

    let canonical_issues = canonical::validate(&canonical_targets, &state.status_by_url);

    CrawlReport {
        valid_urls,
        broken_links,
        broken_link_tasks,
        last_modified,
        canonical_issues,
        missing_canonical_pages,
        multiple_canonical_pages,
        discovered: state.discovered.len(),
        excluded_urls: state.excluded_count,
    }
}
