//! Canonical-URL extraction and validation
//!
//! Pages declare a preferred indexable URL via `<link rel="canonical">`.
//! Extraction runs once per fetched page during the crawl; validation runs
//! once after it, cross-referencing every declared canonical against crawl
//! statuses and against the canonical graph itself (chains and loops).

mod extract;
mod validate;

use serde::Serialize;
use std::fmt;

pub use extract::extract;
pub use validate::validate;

/// Canonical tag extraction details for one crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalInfo {
    pub page_url: String,

    /// The declared canonical target, resolved and normalized where
    /// possible; an unresolvable href is kept verbatim. `None` when the
    /// page has no usable canonical tag.
    pub canonical_url: Option<String>,

    /// Number of canonical tags in the document, including empty-href ones
    pub tag_count: usize,

    /// True when the page declares more than one canonical tag
    pub multiple: bool,
}

impl CanonicalInfo {
    /// True when the page has no usable canonical declaration
    pub fn is_missing(&self) -> bool {
        self.canonical_url.is_none()
    }
}

/// Canonical validation problem category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    NonHttpScheme,
    CrossDomain,
    TargetBroken,
    TargetRedirect,
    LoopOrChain,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::NonHttpScheme => "non_http_scheme",
            IssueType::CrossDomain => "cross_domain",
            IssueType::TargetBroken => "target_broken",
            IssueType::TargetRedirect => "target_redirect",
            IssueType::LoopOrChain => "loop_or_chain",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical validation finding for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalIssue {
    pub page_url: String,
    pub canonical_url: String,
    pub issue_type: IssueType,
    pub detail: String,
}
