//! Output generation for crawl results
//!
//! Renders a `CrawlReport` into the files consumers actually use: a
//! Sitemap 0.9 XML document, a markdown broken-link task list, and a
//! markdown canonical-issue report. The crawl core owns none of these
//! formats; everything here reads the frozen report.

mod markdown;
mod sitemap;

pub use markdown::{
    format_canonical_report, format_issue_tasks, write_canonical_report, write_issue_tasks,
};
pub use sitemap::{format_sitemap, write_sitemap};
