//! Crawl coordination
//!
//! The coordinator drains the frontier through a bounded pool of fetch
//! tasks and folds every completion into the shared crawl state:
//! - workers fetch a page and reduce it to a [`PageEvent`] carrying only
//!   owned data (links, canonical info, last-modified timestamp)
//! - the reap path dispatches each event to a handler that mutates the
//!   state under one lock
//! - the crawl is complete when the frontier is empty and no fetch is in
//!   flight
//!
//! Only setup problems (bad root URL, bad options) are errors; every
//! per-page outcome ends up in the report.

use crate::canonical::{self, CanonicalInfo};
use crate::config::CrawlOptions;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::frontier::{Frontier, QueuedPage};
use crate::crawler::parser::extract_links;
use crate::lastmod;
use crate::state::{assemble, CrawlReport, CrawlState, TRANSPORT_FAILURE_STATUS};
use crate::url::{is_excluded, normalize, normalize_root, same_host};
use crate::SitescopeError;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::Client;
use scraper::Html;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Data extracted from a page that answered with a 2xx/3xx status
#[derive(Debug)]
pub struct PageSuccess {
    pub status: u16,
    /// Raw absolute link targets found in the body (HTML pages only)
    pub links: Vec<String>,
    pub canonical: CanonicalInfo,
    pub last_modified: DateTime<Utc>,
}

/// Completion event for one fetched page
#[derive(Debug)]
pub enum PageEvent {
    /// 2xx/3xx response
    Succeeded(PageSuccess),
    /// Any other HTTP status
    Failed { status: u16 },
    /// No HTTP response at all
    TransportFailed { error: String },
}

/// A page together with its fetch outcome, as returned by worker tasks
#[derive(Debug)]
struct FetchCompletion {
    page: QueuedPage,
    event: PageEvent,
}

/// Crawls a website starting from `options.root_url`
///
/// Blocks until the frontier is drained and all in-flight fetches are done,
/// then freezes the accumulated state into a [`CrawlReport`].
pub async fn crawl(options: CrawlOptions) -> Result<CrawlReport, SitescopeError> {
    options.validate()?;
    let root = normalize_root(&options.root_url)?;
    let client = build_http_client(&options.user_agent)?;

    tracing::info!(
        "starting crawl of {} (depth {}, {} workers)",
        root,
        options.max_depth,
        options.concurrency
    );

    let state = Mutex::new(CrawlState::new());
    let mut frontier = Frontier::new(options.max_depth);
    frontier.push(root.clone(), 0);

    let now = Utc::now();
    let mut in_flight: JoinSet<FetchCompletion> = JoinSet::new();
    let mut pages_fetched = 0usize;

    loop {
        // Top up the pool from the frontier.
        while in_flight.len() < options.concurrency {
            match frontier.pop() {
                Some(page) => {
                    in_flight.spawn(fetch_page(
                        client.clone(),
                        page,
                        options.request_timeout,
                        now,
                    ));
                }
                None => break,
            }
        }

        // Reap one completion; handlers may refill the frontier.
        match in_flight.join_next().await {
            Some(Ok(completion)) => {
                pages_fetched += 1;
                handle_completion(completion, &state, &mut frontier, &root, &options);

                if pages_fetched % 10 == 0 {
                    tracing::info!(
                        "progress: {} pages fetched, {} queued",
                        pages_fetched,
                        frontier.len()
                    );
                }
            }
            Some(Err(e)) => {
                tracing::error!("fetch task failed: {}", e);
            }
            None => {}
        }

        if frontier.is_empty() && in_flight.is_empty() {
            break;
        }
    }

    let state = state.into_inner().unwrap();
    let report = assemble(state, &options.exclude_patterns);

    tracing::info!(
        "crawl complete: {} discovered, {} valid, {} broken, {} excluded",
        report.discovered,
        report.valid_urls.len(),
        report.broken_links.len(),
        report.excluded_urls
    );

    Ok(report)
}

/// Worker task: fetch one page and reduce it to an event
async fn fetch_page(
    client: Client,
    page: QueuedPage,
    timeout: Option<Duration>,
    now: DateTime<Utc>,
) -> FetchCompletion {
    tracing::debug!("fetching {} (depth {})", page.url, page.depth);

    let event = match fetch_url(&client, page.url.as_str(), timeout).await {
        FetchOutcome::Response {
            status,
            headers,
            is_html,
            body,
        } => {
            if (200..400).contains(&status) {
                let success = match body {
                    Some(body) if is_html => process_html(&page.url, &body, &headers, status, now),
                    _ => PageSuccess {
                        status,
                        links: Vec::new(),
                        canonical: canonical::extract(page.url.as_str(), None),
                        last_modified: lastmod::get_last_modified(Some(&headers), None, now),
                    },
                };
                PageEvent::Succeeded(success)
            } else {
                PageEvent::Failed { status }
            }
        }
        FetchOutcome::Transport { error } => PageEvent::TransportFailed { error },
    };

    FetchCompletion { page, event }
}

/// Parses a fetched HTML body into the data the handlers need
///
/// Synchronous on purpose: `scraper::Html` is not `Send`, so it must never
/// live across an await point inside the worker future.
fn process_html(
    page_url: &Url,
    body: &str,
    headers: &HeaderMap,
    status: u16,
    now: DateTime<Utc>,
) -> PageSuccess {
    let doc = Html::parse_document(body);
    PageSuccess {
        status,
        links: extract_links(&doc, page_url),
        canonical: canonical::extract(page_url.as_str(), Some(&doc)),
        last_modified: lastmod::get_last_modified(Some(headers), Some(&doc), now),
    }
}

/// Dispatches one completion event to the matching handler
fn handle_completion(
    completion: FetchCompletion,
    state: &Mutex<CrawlState>,
    frontier: &mut Frontier,
    root: &Url,
    options: &CrawlOptions,
) {
    let FetchCompletion { page, event } = completion;

    match event {
        PageEvent::Succeeded(success) => {
            handle_success(&page, success, state, frontier, root, options);
        }
        PageEvent::Failed { status } => {
            tracing::debug!("page failed: {} ({})", page.url, status);
            state
                .lock()
                .unwrap()
                .record_failure(page.url.as_str(), status);
        }
        PageEvent::TransportFailed { error } => {
            tracing::debug!("transport failure for {}: {}", page.url, error);
            state
                .lock()
                .unwrap()
                .record_failure(page.url.as_str(), TRANSPORT_FAILURE_STATUS);
        }
    }
}

/// Handles a 2xx/3xx page: records it, then classifies every link it
/// carries
///
/// Links are normalized against the fetching page, counted when excluded,
/// otherwise recorded as discovered with their source. Only links on the
/// root host are enqueued; cross-host links stay recorded but are never
/// fetched.
fn handle_success(
    page: &QueuedPage,
    success: PageSuccess,
    state: &Mutex<CrawlState>,
    frontier: &mut Frontier,
    root: &Url,
    options: &CrawlOptions,
) {
    let mut to_enqueue = Vec::new();

    {
        let mut state = state.lock().unwrap();
        state.record_success(
            page.url.as_str(),
            success.status,
            success.last_modified,
            success.canonical,
        );

        for raw in &success.links {
            let link = match normalize(raw, Some(&page.url)) {
                Ok(link) => link,
                Err(e) => {
                    tracing::debug!("skipping unparseable link {}: {}", raw, e);
                    continue;
                }
            };

            if is_excluded(link.as_str(), &options.exclude_patterns) {
                state.record_excluded();
                continue;
            }

            state.record_link(link.as_str(), page.url.as_str());

            if same_host(root, &link) {
                to_enqueue.push(link);
            }
        }
    }

    for link in to_enqueue {
        frontier.push(link, page.depth + 1);
    }
}
