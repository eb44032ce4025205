//! HTML link extraction
//!
//! Pulls followable links out of a parsed document. Only `<a href>` anchors
//! count; assets (images, scripts, stylesheets) are never crawled.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML document as absolute URLs
///
/// Skipped: empty hrefs, fragment-only anchors, `javascript:`/`mailto:`/
/// `tel:` links, data URIs, anchors carrying a `download` attribute, and
/// anything that does not resolve to an HTTP(S) URL.
pub fn extract_links(doc: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for anchor in doc.select(&selector) {
            if anchor.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = anchor.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base_url) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) => {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                Some(absolute.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn links_of(html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        extract_links(&doc, &base_url())
    }

    #[test]
    fn test_extract_absolute_link() {
        let links = links_of(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_link() {
        let links = links_of(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let links = links_of(r#"<html><body><a href="other">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let links = links_of(
            r#"<html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>x</h1>">Data</a>
            </body></html>"#,
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let links = links_of(r##"<html><body><a href="#section">Jump</a></body></html>"##);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let links = links_of(r#"<html><body><a href="/file.pdf" download>Get</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_non_http_resolution() {
        let links = links_of(r#"<html><body><a href="ftp://example.com/f">FTP</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_nofollow_links_are_followed() {
        let links = links_of(r#"<html><body><a href="/page2" rel="nofollow">L</a></body></html>"#);
        assert_eq!(links, vec!["https://example.com/page2"]);
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let links = links_of(
            r#"<html><body>
                <a href="/valid">V</a>
                <a href="javascript:alert('no')">I</a>
                <a href="/another-valid">V</a>
            </body></html>"#,
        );
        assert_eq!(links.len(), 2);
    }
}
