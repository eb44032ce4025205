use crate::UrlError;
use url::Url;

/// Normalizes a URL into its canonical string identity
///
/// # Normalization Steps
///
/// 1. Parse the URL, resolving it against `base` when one is supplied
/// 2. Remove the fragment (everything after #)
/// 3. Empty path becomes /
/// 4. Remove trailing slashes from non-root paths, so `/about/` and
///    `/about` collapse to the same entry
///
/// The query string is kept verbatim: parameters are never reordered or
/// deduplicated, so `?a=1&b=2` and `?b=2&a=1` stay distinct identities.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize, relative or absolute
/// * `base` - Base URL for resolving relative references
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The input did not parse as a URL
///
/// # Examples
///
/// ```
/// use sitescope::url::normalize;
///
/// let url = normalize("https://example.com/page/", None).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let mut url = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    url.set_fragment(None);

    // The url crate already gives HTTP(S) URLs an empty path as "/", so only
    // the trailing-slash rule needs handling here.
    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

/// Normalizes the crawl root URL, with looser input rules than `normalize`
///
/// Root URLs arrive from user input, so a missing scheme defaults to
/// `https://`. Empty or whitespace-only input fails with `MissingRootUrl`;
/// input that parses but yields no hostname fails with `InvalidRootUrl`.
pub fn normalize_root(raw: &str) -> Result<Url, UrlError> {
    let clean = raw.trim();
    if clean.is_empty() {
        return Err(UrlError::MissingRootUrl);
    }

    let with_scheme = if clean.starts_with("http://") || clean.starts_with("https://") {
        clean.to_string()
    } else {
        format!("https://{}", clean)
    };

    let url =
        normalize(&with_scheme, None).map_err(|e| UrlError::InvalidRootUrl(e.to_string()))?;

    if url.host_str().is_none() {
        return Err(UrlError::InvalidRootUrl("missing host".to_string()));
    }

    Ok(url)
}
