//! HTTP fetcher
//!
//! Builds the shared HTTP client and performs single-page fetches. Every
//! outcome becomes a [`FetchOutcome`] value; this module never returns an
//! error for a failed page, because per-request failures are crawl data,
//! not crawl errors.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Result of fetching one URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered with some status
    Response {
        /// HTTP status code
        status: u16,
        /// Response headers
        headers: HeaderMap,
        /// Whether the Content-Type declares an HTML document
        is_html: bool,
        /// Response body; only read for successful HTML responses
        body: Option<String>,
    },

    /// No HTTP response at all (connect failure, timeout, TLS error)
    Transport {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for the whole crawl
///
/// Redirects are not followed: a 3xx answer is a terminal status the crawl
/// records for the page, which is what lets the canonical validator flag
/// redirecting canonical targets.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL
///
/// `timeout` bounds the whole request; when it elapses the result is a
/// `Transport` outcome like any other network failure.
pub async fn fetch_url(client: &Client, url: &str, timeout: Option<Duration>) -> FetchOutcome {
    let mut request = client.get(url);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let is_html = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("text/html"))
                .unwrap_or(false);

            let body = if response.status().is_success() && is_html {
                response.text().await.ok()
            } else {
                None
            };

            FetchOutcome::Response {
                status,
                headers,
                is_html,
                body,
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                "connection failed".to_string()
            } else {
                e.to_string()
            };

            FetchOutcome::Transport { error }
        }
    }
}
