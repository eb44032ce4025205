use crate::canonical::CanonicalIssue;
use crate::state::BrokenLinkTask;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes the broken-link cleanup checklist
pub fn write_issue_tasks(path: &Path, tasks: &[BrokenLinkTask]) -> std::io::Result<()> {
    write_report(path, &format_issue_tasks(tasks))
}

/// Formats broken links as a markdown checklist with their source pages
pub fn format_issue_tasks(tasks: &[BrokenLinkTask]) -> String {
    let mut md = String::new();
    md.push_str("# Link Cleanup Tasks\n\n");

    if tasks.is_empty() {
        md.push_str("No broken links were found in this crawl.\n");
        return md;
    }

    for (i, task) in tasks.iter().enumerate() {
        let status_label = if task.status == 0 {
            "request_failed".to_string()
        } else {
            task.status.to_string()
        };

        md.push_str(&format!("- [ ] Fix `{}` (status: {})\n", task.url, status_label));

        if task.sources.is_empty() {
            md.push_str("  - Found on: (source page not captured)\n");
        } else {
            for source in &task.sources {
                md.push_str(&format!("  - Found on: `{}`\n", source));
            }
        }

        if i < tasks.len() - 1 {
            md.push('\n');
        }
    }

    md
}

/// Writes the canonical-issue report
pub fn write_canonical_report(
    path: &Path,
    issues: &[CanonicalIssue],
    missing_pages: &[String],
    multiple_pages: &[String],
) -> std::io::Result<()> {
    write_report(path, &format_canonical_report(issues, missing_pages, multiple_pages))
}

/// Formats canonical validation findings as markdown
pub fn format_canonical_report(
    issues: &[CanonicalIssue],
    missing_pages: &[String],
    multiple_pages: &[String],
) -> String {
    let mut md = String::new();
    md.push_str("# Canonical URL Issues\n\n");

    if issues.is_empty() && missing_pages.is_empty() && multiple_pages.is_empty() {
        md.push_str("No canonical issues were found in this crawl.\n");
        return md;
    }

    if !issues.is_empty() {
        md.push_str("## Validation Issues\n\n");
        for issue in issues {
            md.push_str(&format!(
                "- [ ] `{}` -> `{}` ({}): {}\n",
                issue.page_url, issue.canonical_url, issue.issue_type, issue.detail
            ));
        }
        md.push('\n');
    }

    if !missing_pages.is_empty() {
        md.push_str(&format!(
            "## Pages Missing a Canonical Tag ({})\n\n",
            missing_pages.len()
        ));
        for page in missing_pages {
            md.push_str(&format!("- `{}`\n", page));
        }
        md.push('\n');
    }

    if !multiple_pages.is_empty() {
        md.push_str(&format!(
            "## Pages With Multiple Canonical Tags ({})\n\n",
            multiple_pages.len()
        ));
        for page in multiple_pages {
            md.push_str(&format!("- `{}`\n", page));
        }
    }

    md
}

fn write_report(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
