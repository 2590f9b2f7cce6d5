//! Crawler module for finding a site's contact email
//!
//! This module contains the per-site crawling logic, including:
//! - HTTP fetching with a bounded per-request timeout
//! - Email extraction from raw page text
//! - HTML parsing and link extraction
//! - Breadth-first traversal with an early stop on the first email

mod extractor;
mod fetcher;
mod parser;
mod site;


pub use extractor::extract_emails;
pub use fetcher::{
    build_http_client, fetch_url, FetchResult, HttpFetcher, NetworkErrorKind, PageFetcher,
};
pub use parser::{HtmlLinkParser, LinkParser, ParsedLinks};
pub use site::{CrawlOutcome, CrawlSettings, SiteCrawler, StopReason};

use crate::config::Config;
use crate::Result;

/// Crawls a single site with settings from `config`
///
/// Convenience entry point for one-off crawls; batches should build one
/// [`SiteCrawler`] and share it.
///
/// # Example
///
/// ```no_run
/// use contact_ripple::config::Config;
/// use contact_ripple::crawler::crawl_site;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = crawl_site(&Config::default(), "https://example.com/").await?;
/// println!("{:?}", outcome.first_email());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_site(config: &Config, seed: &str) -> Result<CrawlOutcome> {
    SiteCrawler::from_config(config)?.crawl(seed).await
}
