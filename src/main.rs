//! Sitescope main entry point
//!
//! Command-line interface: crawl one site, then write the sitemap and the
//! cleanup reports.

use anyhow::Context;
use clap::Parser;
use sitescope::config::{CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_USER_AGENT};
use sitescope::crawl;
use sitescope::output::{write_canonical_report, write_issue_tasks, write_sitemap};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Sitescope: crawl a site, audit its links, and export a sitemap
///
/// Sitescope crawls every internal page of a website, reports broken links
/// with the pages that reference them, audits canonical-URL declarations,
/// and writes a Sitemap 0.9 XML file with last-modified dates.
#[derive(Parser, Debug)]
#[command(name = "sitescope")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a site, audit its links, and export a sitemap", long_about = None)]
struct Cli {
    /// Root URL to crawl (scheme defaults to https://)
    #[arg(value_name = "URL")]
    url: String,

    /// Output sitemap file path
    #[arg(short, long, default_value = "./sitemap.xml")]
    output: PathBuf,

    /// Output file for broken-link cleanup tasks
    #[arg(long, default_value = "./broken-link-tasks.md")]
    issues_output: PathBuf,

    /// Output file for canonical URL issues
    #[arg(long, default_value = "./canonical-issues.md")]
    canonical_output: PathBuf,

    /// Maximum concurrent crawler workers
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    threads: usize,

    /// Max crawl depth (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    depth: u32,

    /// Crawler user-agent
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Glob pattern to skip (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude_patterns: Vec<String>,

    /// Timeout per HTTP request, in seconds (0 = no timeout)
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let options = CrawlOptions {
        root_url: cli.url.clone(),
        max_depth: cli.depth,
        concurrency: cli.threads,
        user_agent: cli.user_agent.clone(),
        exclude_patterns: cli.exclude_patterns.clone(),
        request_timeout: (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)),
    };

    let report = crawl(options).await.context("crawl failed")?;

    write_sitemap(&cli.output, &report.valid_urls, &report.last_modified)
        .context("write sitemap")?;
    write_issue_tasks(&cli.issues_output, &report.broken_link_tasks)
        .context("write broken-link task report")?;
    write_canonical_report(
        &cli.canonical_output,
        &report.canonical_issues,
        &report.missing_canonical_pages,
        &report.multiple_canonical_pages,
    )
    .context("write canonical issue report")?;

    println!("Crawl complete");
    println!("  Discovered:         {}", report.discovered);
    println!("  Valid URLs:         {}", report.valid_urls.len());
    println!("  Broken links:       {}", report.broken_links.len());
    println!("  Excluded URLs:      {}", report.excluded_urls);
    println!("  Canonical issues:   {}", report.canonical_issues.len());
    println!(
        "  Missing canonical:  {}",
        report.missing_canonical_pages.len()
    );
    println!(
        "  Multiple canonical: {}",
        report.multiple_canonical_pages.len()
    );
    println!();
    println!("Sitemap written to {}", cli.output.display());
    println!(
        "Broken-link task report written to {}",
        cli.issues_output.display()
    );
    println!(
        "Canonical issue report written to {}",
        cli.canonical_output.display()
    );

    if !report.broken_links.is_empty() {
        eprintln!("\nBroken links found ({}):", report.broken_links.len());
        for (link, status) in &report.broken_links {
            eprintln!("  [{}] {}", status, link);
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitescope=info,warn"),
            1 => EnvFilter::new("sitescope=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
