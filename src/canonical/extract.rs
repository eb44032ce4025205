use crate::canonical::CanonicalInfo;
use crate::url::normalize;
use scraper::{Html, Selector};
use url::Url;

/// Extracts canonical link information from a page document
///
/// The first canonical tag in document order with a non-empty href wins as
/// the reported canonical; additional tags still count toward `tag_count`
/// and set the `multiple` flag. The winning href is resolved against
/// `page_url` and normalized; when resolution fails the raw href is kept
/// verbatim so the validator can still report on it.
pub fn extract(page_url: &str, doc: Option<&Html>) -> CanonicalInfo {
    let mut info = CanonicalInfo {
        page_url: page_url.to_string(),
        canonical_url: None,
        tag_count: 0,
        multiple: false,
    };

    let Some(doc) = doc else {
        return info;
    };

    let Ok(selector) = Selector::parse(r#"link[rel="canonical"]"#) else {
        return info;
    };

    let tags: Vec<_> = doc.select(&selector).collect();
    info.tag_count = tags.len();
    if tags.is_empty() {
        return info;
    }
    info.multiple = tags.len() > 1;

    let found = tags.iter().find_map(|tag| {
        let href = tag.value().attr("href").unwrap_or("").trim();
        (!href.is_empty()).then(|| href.to_string())
    });

    let Some(href) = found else {
        return info;
    };

    let resolved = Url::parse(page_url)
        .ok()
        .and_then(|base| normalize(&href, Some(&base)).ok());

    info.canonical_url = Some(match resolved {
        Some(url) => url.to_string(),
        None => href,
    });

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_no_canonical_tag() {
        let doc = parse("<html><head></head><body></body></html>");
        let info = extract("https://example.com/page", Some(&doc));
        assert!(info.is_missing());
        assert_eq!(info.tag_count, 0);
        assert!(!info.multiple);
    }

    #[test]
    fn test_no_document() {
        let info = extract("https://example.com/page", None);
        assert!(info.is_missing());
        assert_eq!(info.tag_count, 0);
    }

    #[test]
    fn test_single_absolute_canonical() {
        let doc = parse(
            r#"<html><head><link rel="canonical" href="https://example.com/canonical" /></head></html>"#,
        );
        let info = extract("https://example.com/page", Some(&doc));
        assert_eq!(
            info.canonical_url.as_deref(),
            Some("https://example.com/canonical")
        );
        assert_eq!(info.tag_count, 1);
        assert!(!info.multiple);
    }

    #[test]
    fn test_relative_canonical_resolved_against_page() {
        let doc = parse(r#"<html><head><link rel="canonical" href="/other" /></head></html>"#);
        let info = extract("https://example.com/dir/page", Some(&doc));
        assert_eq!(
            info.canonical_url.as_deref(),
            Some("https://example.com/other")
        );
    }

    #[test]
    fn test_canonical_is_normalized() {
        let doc = parse(
            r#"<html><head><link rel="canonical" href="https://example.com/a/#frag" /></head></html>"#,
        );
        let info = extract("https://example.com/page", Some(&doc));
        assert_eq!(info.canonical_url.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn test_multiple_tags_first_nonempty_wins() {
        let doc = parse(
            r#"<html><head>
                <link rel="canonical" href="" />
                <link rel="canonical" href="https://example.com/first" />
                <link rel="canonical" href="https://example.com/second" />
            </head></html>"#,
        );
        let info = extract("https://example.com/page", Some(&doc));
        assert!(info.multiple);
        assert_eq!(info.tag_count, 3);
        assert_eq!(
            info.canonical_url.as_deref(),
            Some("https://example.com/first")
        );
    }

    #[test]
    fn test_all_empty_hrefs_is_missing() {
        let doc = parse(
            r#"<html><head>
                <link rel="canonical" href="" />
                <link rel="canonical" />
            </head></html>"#,
        );
        let info = extract("https://example.com/page", Some(&doc));
        assert!(info.is_missing());
        assert_eq!(info.tag_count, 2);
        assert!(info.multiple);
    }

    #[test]
    fn test_whitespace_href_counts_as_empty() {
        let doc = parse(r#"<html><head><link rel="canonical" href="   " /></head></html>"#);
        let info = extract("https://example.com/page", Some(&doc));
        assert!(info.is_missing());
        assert_eq!(info.tag_count, 1);
    }

    #[test]
    fn test_non_http_scheme_kept_for_validation() {
        let doc =
            parse(r#"<html><head><link rel="canonical" href="ftp://example.com/x" /></head></html>"#);
        let info = extract("https://example.com/page", Some(&doc));
        assert_eq!(info.canonical_url.as_deref(), Some("ftp://example.com/x"));
    }
}
