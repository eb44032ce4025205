use url::Url;

/// Matches a glob pattern against a string
///
/// Supports two metacharacters: `*` matches any run of characters
/// (including `/`) and `?` matches exactly one character. Everything else
/// matches literally. Matching is iterative with single-star backtracking,
/// so adversarial patterns cannot blow the stack.
///
/// # Examples
///
/// ```
/// use sitescope::url::glob_match;
///
/// assert!(glob_match("*.pdf", "file.pdf"));
/// assert!(glob_match("/admin/*", "/admin/users"));
/// assert!(glob_match("page-?", "page-7"));
/// assert!(!glob_match("*.pdf", "file.html"));
/// ```
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    let mut p = 0;
    let mut t = 0;
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while t < txt.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == '*' {
            // Tentatively match zero characters; remember where to resume.
            star = Some(p);
            mark = t;
            p += 1;
        } else if let Some(sp) = star {
            // Backtrack: let the last star swallow one more character.
            p = sp + 1;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }

    while p < pat.len() && pat[p] == '*' {
        p += 1;
    }

    p == pat.len()
}

/// Decides whether a URL is excluded by any of the given glob patterns
///
/// Each non-blank pattern is tested against four projections of the URL,
/// and any hit excludes it:
///
/// 1. The full URL string
/// 2. The path (e.g. `/admin/*`)
/// 3. The final path segment, so `*.pdf` matches `/dir/file.pdf`
/// 4. The path plus query, with and without the leading slash, so
///    query-only patterns like `*?lang=rs` work
pub fn is_excluded(link: &str, patterns: &[String]) -> bool {
    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }

        if glob_match(pattern, link) {
            return true;
        }

        let parsed = match Url::parse(link) {
            Ok(u) => u,
            Err(_) => continue,
        };

        let path = parsed.path();
        if glob_match(pattern, path) {
            return true;
        }

        let segment = match path.rsplit('/').next() {
            Some("") | None => "/",
            Some(s) => s,
        };
        if glob_match(pattern, segment) {
            return true;
        }

        if let Some(query) = parsed.query() {
            let with_query = format!("{}?{}", path, query);
            if glob_match(pattern, &with_query) {
                return true;
            }
            if glob_match(pattern, with_query.trim_start_matches('/')) {
                return true;
            }
        }
    }

    false
}
