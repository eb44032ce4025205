//! Last-modified timestamp extraction
//!
//! Resolves the most trustworthy "last modified" time for a fetched page
//! using a priority hierarchy:
//!
//! 1. JSON-LD structured data (`dateModified`, including inside `@graph`)
//! 2. HTML meta tags (`article:modified_time`, then `og:updated_time`)
//! 3. HTTP `Last-Modified` header
//! 4. Fallback: the supplied crawl time
//!
//! Extraction never fails; every tier degrades to the next one. All results
//! are normalized to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::header::{HeaderMap, LAST_MODIFIED};
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

/// Returns the best available last-modified time for a page
pub fn get_last_modified(
    headers: Option<&HeaderMap>,
    doc: Option<&Html>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    if let Some(doc) = doc {
        if let Some(t) = from_json_ld(doc) {
            return t;
        }
        if let Some(t) = from_meta_tags(doc) {
            return t;
        }
    }

    if let Some(headers) = headers {
        if let Some(t) = from_header(headers) {
            return t;
        }
    }

    now
}

/// JSON-LD payloads come as a single object or an array of objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLd {
    Object(serde_json::Map<String, Value>),
    Array(Vec<serde_json::Map<String, Value>>),
}

/// Scans `<script type="application/ld+json">` blocks for a parseable
/// `dateModified`; the first one in document order wins. Malformed blocks
/// are skipped.
fn from_json_ld(doc: &Html) -> Option<DateTime<Utc>> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    for script in doc.select(&selector) {
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let decoded: JsonLd = match serde_json::from_str(raw) {
            Ok(d) => d,
            Err(_) => continue,
        };

        let found = match &decoded {
            JsonLd::Object(obj) => extract_date_modified(obj),
            JsonLd::Array(items) => items.iter().find_map(extract_date_modified),
        };

        if found.is_some() {
            return found;
        }
    }

    None
}

/// Looks for `dateModified` in a JSON-LD object, recursing into a nested
/// `@graph` list when the direct field is absent (common in WordPress
/// output)
fn extract_date_modified(obj: &serde_json::Map<String, Value>) -> Option<DateTime<Utc>> {
    if let Some(Value::String(s)) = obj.get("dateModified") {
        if let Some(t) = parse_date(s) {
            return Some(t);
        }
    }

    if let Some(Value::Array(items)) = obj.get("@graph") {
        for item in items {
            if let Value::Object(m) = item {
                if let Some(t) = extract_date_modified(m) {
                    return Some(t);
                }
            }
        }
    }

    None
}

/// Checks `article:modified_time` then `og:updated_time` meta tags
fn from_meta_tags(doc: &Html) -> Option<DateTime<Utc>> {
    const SELECTORS: [&str; 2] = [
        r#"meta[property="article:modified_time"]"#,
        r#"meta[property="og:updated_time"]"#,
    ];

    for raw_selector in SELECTORS {
        let Ok(selector) = Selector::parse(raw_selector) else {
            continue;
        };

        let content = doc
            .select(&selector)
            .next()
            .and_then(|tag| tag.value().attr("content"));

        if let Some(content) = content {
            if let Some(t) = parse_date(content.trim()) {
                return Some(t);
            }
        }
    }

    None
}

/// Parses the HTTP `Last-Modified` header
fn from_header(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let raw = headers.get(LAST_MODIFIED)?.to_str().ok()?;
    parse_date(raw.trim())
}

/// Attempts to parse a date string against all known layouts, in order
///
/// Layouts tried: RFC 3339, timezone-less ISO, bare date, RFC 2822 (covers
/// RFC 1123 with named or numeric zones and single-digit days), RFC 850,
/// and a last-resort day-name form for zone abbreviations RFC 2822 does not
/// know. Zone-less layouts are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }

    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(t.and_utc());
    }

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Some(t.and_utc());
        }
    }

    if let Ok(t) = DateTime::parse_from_rfc2822(raw) {
        return Some(t.with_timezone(&Utc));
    }

    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%A, %d-%b-%y %H:%M:%S %Z") {
        return Some(t.and_utc());
    }

    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S %Z") {
        return Some(t.and_utc());
    }

    None
}

/// Formats a timestamp as a W3C date (YYYY-MM-DD, UTC), the form sitemap
/// `<lastmod>` elements use
pub fn format_w3c(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    fn headers_with_last_modified(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LAST_MODIFIED, value.parse().unwrap());
        headers
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    const FULL_PAGE: &str = r#"<html><head>
        <script type="application/ld+json">{"dateModified": "2024-03-01T10:00:00Z"}</script>
        <meta property="article:modified_time" content="2024-02-01T10:00:00Z" />
    </head><body></body></html>"#;

    #[test]
    fn test_json_ld_wins_over_meta_and_header() {
        let d = doc(FULL_PAGE);
        let headers = headers_with_last_modified("Mon, 01 Jan 2024 10:00:00 GMT");
        let result = get_last_modified(Some(&headers), Some(&d), Utc::now());
        assert_eq!(result, utc(2024, 3, 1, 10, 0, 0));
    }

    #[test]
    fn test_meta_wins_over_header() {
        let d = doc(
            r#"<html><head>
                <meta property="article:modified_time" content="2024-02-01T10:00:00Z" />
            </head></html>"#,
        );
        let headers = headers_with_last_modified("Mon, 01 Jan 2024 10:00:00 GMT");
        let result = get_last_modified(Some(&headers), Some(&d), Utc::now());
        assert_eq!(result, utc(2024, 2, 1, 10, 0, 0));
    }

    #[test]
    fn test_header_wins_over_fallback() {
        let d = doc("<html><head></head><body></body></html>");
        let headers = headers_with_last_modified("Mon, 01 Jan 2024 10:00:00 GMT");
        let result = get_last_modified(Some(&headers), Some(&d), Utc::now());
        assert_eq!(result, utc(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_fallback_to_now() {
        let now = utc(2024, 6, 1, 0, 0, 0);
        let d = doc("<html><head></head><body></body></html>");
        let result = get_last_modified(None, Some(&d), now);
        assert_eq!(result, now);
    }

    #[test]
    fn test_no_document_uses_header() {
        let headers = headers_with_last_modified("Mon, 01 Jan 2024 10:00:00 GMT");
        let result = get_last_modified(Some(&headers), None, Utc::now());
        assert_eq!(result, utc(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_article_modified_time_beats_og_updated_time() {
        let d = doc(
            r#"<html><head>
                <meta property="og:updated_time" content="2024-05-01T00:00:00Z" />
                <meta property="article:modified_time" content="2024-04-01T00:00:00Z" />
            </head></html>"#,
        );
        let result = get_last_modified(None, Some(&d), Utc::now());
        assert_eq!(result, utc(2024, 4, 1, 0, 0, 0));
    }

    #[test]
    fn test_json_ld_array_shape() {
        let d = doc(
            r#"<html><head><script type="application/ld+json">
                [{"@type": "Person"}, {"dateModified": "2023-11-05T08:30:00Z"}]
            </script></head></html>"#,
        );
        let result = get_last_modified(None, Some(&d), Utc::now());
        assert_eq!(result, utc(2023, 11, 5, 8, 30, 0));
    }

    #[test]
    fn test_json_ld_graph_nesting() {
        let d = doc(
            r#"<html><head><script type="application/ld+json">
                {"@graph": [{"@type": "WebSite"}, {"dateModified": "2023-07-15T12:00:00Z"}]}
            </script></head></html>"#,
        );
        let result = get_last_modified(None, Some(&d), Utc::now());
        assert_eq!(result, utc(2023, 7, 15, 12, 0, 0));
    }

    #[test]
    fn test_malformed_json_ld_skipped() {
        let d = doc(
            r#"<html><head>
                <script type="application/ld+json">{not json at all</script>
                <script type="application/ld+json">{"dateModified": "2023-01-02T03:04:05Z"}</script>
            </head></html>"#,
        );
        let result = get_last_modified(None, Some(&d), Utc::now());
        assert_eq!(result, utc(2023, 1, 2, 3, 4, 5));
    }

    #[test]
    fn test_json_ld_without_date_falls_through_to_meta() {
        let d = doc(
            r#"<html><head>
                <script type="application/ld+json">{"@type": "WebSite"}</script>
                <meta property="og:updated_time" content="2024-05-02T00:00:00Z" />
            </head></html>"#,
        );
        let result = get_last_modified(None, Some(&d), Utc::now());
        assert_eq!(result, utc(2024, 5, 2, 0, 0, 0));
    }

    #[test]
    fn test_unparseable_meta_falls_through_to_header() {
        let d = doc(
            r#"<html><head>
                <meta property="article:modified_time" content="yesterday-ish" />
            </head></html>"#,
        );
        let headers = headers_with_last_modified("Mon, 01 Jan 2024 10:00:00 GMT");
        let result = get_last_modified(Some(&headers), Some(&d), Utc::now());
        assert_eq!(result, utc(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let result = parse_date("2024-01-01T12:00:00+02:00").unwrap();
        assert_eq!(result, utc(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_parse_iso_without_zone() {
        let result = parse_date("2024-01-01T12:00:00").unwrap();
        assert_eq!(result, utc(2024, 1, 1, 12, 0, 0));
    }

    #[test]
    fn test_parse_bare_date() {
        let result = parse_date("2024-01-15").unwrap();
        assert_eq!(result, utc(2024, 1, 15, 0, 0, 0));
    }

    #[test]
    fn test_parse_rfc1123_numeric_zone() {
        let result = parse_date("Mon, 01 Jan 2024 10:00:00 +0100").unwrap();
        assert_eq!(result, utc(2024, 1, 1, 9, 0, 0));
    }

    #[test]
    fn test_parse_rfc850() {
        let result = parse_date("Monday, 01-Jan-24 10:00:00 GMT").unwrap();
        assert_eq!(result, utc(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_parse_single_digit_day() {
        let result = parse_date("Mon, 1 Jan 2024 10:00:00 GMT").unwrap();
        assert_eq!(result, utc(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_date("").is_none());
        assert!(parse_date("not a date").is_none());
    }

    #[test]
    fn test_format_w3c() {
        assert_eq!(format_w3c(utc(2024, 3, 9, 23, 59, 59)), "2024-03-09");
    }
}
