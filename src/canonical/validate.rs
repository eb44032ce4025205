use crate::canonical::{CanonicalIssue, IssueType};
use crate::url::same_host;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Validates declared canonicals against crawl statuses and the canonical
/// graph itself
///
/// `canonical_by_page` maps each page to its declared canonical target;
/// `status_by_url` holds the terminal status gathered for each URL during
/// the crawl (0 = transport failure). Per-page checks report the first
/// matching problem; the chain/loop check is independent and may co-occur.
/// The returned list is deduplicated and sorted by page URL, issue type,
/// canonical URL, then detail.
pub fn validate(
    canonical_by_page: &HashMap<String, String>,
    status_by_url: &HashMap<String, u16>,
) -> Vec<CanonicalIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (page, target) in canonical_by_page {
        if let Some(issue) = validate_pair(page, target, status_by_url) {
            let key = format!(
                "{}|{}|{}",
                issue.issue_type.as_str(),
                issue.page_url,
                issue.canonical_url
            );
            if seen.insert(key) {
                issues.push(issue);
            }
        }

        if let Some(issue) = detect_loop_or_chain(page, canonical_by_page) {
            let key = format!(
                "{}|{}|{}|{}",
                issue.issue_type.as_str(),
                issue.page_url,
                issue.canonical_url,
                issue.detail
            );
            if seen.insert(key) {
                issues.push(issue);
            }
        }
    }

    issues.sort_by(|a, b| {
        a.page_url
            .cmp(&b.page_url)
            .then_with(|| a.issue_type.as_str().cmp(b.issue_type.as_str()))
            .then_with(|| a.canonical_url.cmp(&b.canonical_url))
            .then_with(|| a.detail.cmp(&b.detail))
    });

    issues
}

/// Checks one page/target pair; first matching rule wins
fn validate_pair(
    page: &str,
    target: &str,
    status_by_url: &HashMap<String, u16>,
) -> Option<CanonicalIssue> {
    let parsed_target = Url::parse(target).ok()?;

    if parsed_target.scheme() != "http" && parsed_target.scheme() != "https" {
        return Some(CanonicalIssue {
            page_url: page.to_string(),
            canonical_url: target.to_string(),
            issue_type: IssueType::NonHttpScheme,
            detail: "canonical target is not HTTP(S)".to_string(),
        });
    }

    if let Ok(parsed_page) = Url::parse(page) {
        if !same_host(&parsed_page, &parsed_target) {
            return Some(CanonicalIssue {
                page_url: page.to_string(),
                canonical_url: target.to_string(),
                issue_type: IssueType::CrossDomain,
                detail: "canonical target is on a different host".to_string(),
            });
        }
    }

    if let Some(&status) = status_by_url.get(target) {
        if (300..400).contains(&status) {
            return Some(CanonicalIssue {
                page_url: page.to_string(),
                canonical_url: target.to_string(),
                issue_type: IssueType::TargetRedirect,
                detail: "canonical target responds with redirect".to_string(),
            });
        }
        if status == 0 || status >= 400 {
            return Some(CanonicalIssue {
                page_url: page.to_string(),
                canonical_url: target.to_string(),
                issue_type: IssueType::TargetBroken,
                detail: "canonical target is broken/unreachable".to_string(),
            });
        }
    }

    None
}

/// Walks the canonical-target chain starting at `start`
///
/// Self-canonical pages are never flagged. A chain that reaches two or more
/// hops before terminating is a defect even without a cycle; a page
/// reappearing in the path is a loop. The walk is iterative with a visited
/// map and a step bound of map size + 1, so it terminates on any input.
fn detect_loop_or_chain(
    start: &str,
    canonical_by_page: &HashMap<String, String>,
) -> Option<CanonicalIssue> {
    let target = canonical_by_page.get(start)?;
    if target.is_empty() || target == start {
        return None;
    }

    let chain_issue = |detail: &str| CanonicalIssue {
        page_url: start.to_string(),
        canonical_url: target.clone(),
        issue_type: IssueType::LoopOrChain,
        detail: detail.to_string(),
    };

    let mut visited: HashMap<&str, usize> = HashMap::new();
    visited.insert(start, 0);
    let mut current: &str = target;
    let mut steps = 1usize;
    let max_steps = canonical_by_page.len() + 1;

    loop {
        let next = match canonical_by_page.get(current) {
            Some(n) if !n.is_empty() => n,
            _ => {
                if steps >= 2 {
                    return Some(chain_issue("canonical chain detected"));
                }
                return None;
            }
        };

        if visited.contains_key(current) {
            return Some(chain_issue("canonical loop detected"));
        }
        visited.insert(current, steps);

        if next == current {
            if steps >= 2 {
                return Some(chain_issue("canonical chain detected"));
            }
            return None;
        }

        current = next;
        steps += 1;

        if steps > max_steps {
            return Some(chain_issue("canonical loop detected"));
        }
    }
}
