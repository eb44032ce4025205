//! Crawler module for Sitescope
//!
//! Orchestrates the whole crawl: the fetcher performs HTTP requests, the
//! parser extracts links from HTML, the frontier queues pages with visit
//! deduplication, and the coordinator ties them together through a bounded
//! worker pool feeding the shared crawl state.

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{crawl, PageEvent, PageSuccess};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use frontier::{Frontier, QueuedPage};
pub use parser::extract_links;
