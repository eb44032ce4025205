use crate::lastmod::format_w3c;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes a Sitemap 0.9 XML file for the given URLs
///
/// Each URL that has an entry in `last_modified` gets a `<lastmod>` element
/// with its W3C date. Parent directories are created automatically.
pub fn write_sitemap(
    path: &Path,
    urls: &[String],
    last_modified: &BTreeMap<String, DateTime<Utc>>,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(format_sitemap(urls, last_modified).as_bytes())?;
    Ok(())
}

/// Formats a Sitemap 0.9 XML document as a string
pub fn format_sitemap(urls: &[String], last_modified: &BTreeMap<String, DateTime<Utc>>) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(url)));
        if let Some(t) = last_modified.get(url) {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", format_w3c(*t)));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
