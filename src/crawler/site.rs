//! Per-site crawler - breadth-first search for the first contact email
//!
//! One [`SiteCrawler::crawl`] call owns all of its traversal state (frontier,
//! visited set, collected emails). Nothing is shared between crawls except
//! the read-only fetcher and parser.

use crate::config::Config;
use crate::crawler::extractor::extract_emails;
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::parser::{HtmlLinkParser, LinkParser};
use crate::url::{base_origin, normalize_link, page_path};
use crate::{Result, RippleError};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

/// Per-crawl limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Maximum number of frontier pops before the crawl gives up
    pub max_pages: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self { max_pages: 100 }
    }
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page contained at least one email
    EmailFound,
    /// The page ceiling was exceeded
    PageLimit,
    /// No URLs were left to visit
    FrontierExhausted,
}

/// Result of one site crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Emails found; non-empty only when `stop` is `EmailFound`
    pub emails: BTreeSet<String>,

    /// Pages that were fetched successfully
    pub pages_fetched: usize,

    pub stop: StopReason,
}

impl CrawlOutcome {
    /// The email reported for the site: the smallest one in the set
    pub fn first_email(&self) -> Option<&str> {
        self.emails.iter().next().map(String::as_str)
    }
}

/// Traversal state for a single crawl
struct CrawlState {
    frontier: VecDeque<String>,
    /// Mirror of `frontier` for O(1) membership checks
    queued: HashSet<String>,
    visited: HashSet<String>,
    collected: BTreeSet<String>,
    page_count: usize,
}

impl CrawlState {
    fn new(seed: &str) -> Self {
        let mut state = Self {
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            collected: BTreeSet::new(),
            page_count: 0,
        };
        state.enqueue(seed.to_string());
        state
    }

    fn pop(&mut self) -> Option<String> {
        let url = self.frontier.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Appends `url` unless it was already visited or is still queued
    fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.frontier.push_back(url);
        true
    }

    fn finish(self, pages_fetched: usize, stop: StopReason) -> CrawlOutcome {
        CrawlOutcome {
            emails: self.collected,
            pages_fetched,
            stop,
        }
    }
}

/// Breadth-first email crawler for one website at a time
///
/// Cloning is cheap; clones share the fetcher and parser.
#[derive(Clone)]
pub struct SiteCrawler {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn LinkParser>,
    settings: CrawlSettings,
}

impl SiteCrawler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn LinkParser>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            parser,
            settings,
        }
    }

    /// Builds a crawler with the HTTP fetcher and HTML parser from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
        let parser = HtmlLinkParser::new(config.crawler.skip_extensions.clone());
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(parser),
            CrawlSettings {
                max_pages: config.crawler.max_pages,
            },
        ))
    }

    /// Returns a crawler sharing this one's fetcher and parser with a
    /// different page ceiling
    pub fn with_max_pages(&self, max_pages: usize) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            parser: Arc::clone(&self.parser),
            settings: CrawlSettings { max_pages },
        }
    }

    pub fn settings(&self) -> CrawlSettings {
        self.settings
    }

    /// Crawls outward from `seed` until a page yields an email
    ///
    /// # Algorithm
    ///
    /// Each iteration bumps the page counter before anything else, so pops
    /// of already-visited URLs and failed fetches also spend budget. Then:
    ///
    /// 1. pop the frontier head; skip it if already visited
    /// 2. fetch it; on any failure move on to the next entry
    /// 3. extract emails from the raw body; if any, stop immediately
    /// 4. otherwise queue every unseen normalized link at the tail
    ///
    /// # Errors
    ///
    /// * `InvalidSeed` - the seed is not an HTTP(S) URL; nothing is fetched
    /// * `SeedUnreachable` - the very first fetch failed at the network level
    ///
    /// HTTP error statuses, including on the seed, are not errors: they
    /// just end that branch of the search.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome> {
        base_origin(seed).map_err(|source| RippleError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;

        tracing::info!("Starting crawl: {}", seed);

        let mut state = CrawlState::new(seed);
        let mut pages_fetched = 0;

        loop {
            if state.frontier.is_empty() {
                tracing::info!("Frontier exhausted for {}", seed);
                return Ok(state.finish(pages_fetched, StopReason::FrontierExhausted));
            }

            state.page_count += 1;
            if state.page_count > self.settings.max_pages {
                tracing::info!(
                    "Reached page ceiling ({}) for {}",
                    self.settings.max_pages,
                    seed
                );
                return Ok(state.finish(pages_fetched, StopReason::PageLimit));
            }

            let Some(url) = state.pop() else { continue };
            if state.visited.contains(&url) {
                continue;
            }
            state.visited.insert(url.clone());

            tracing::debug!("[page {}] {}", state.page_count, url);

            let body = match self.fetcher.fetch(&url).await {
                FetchResult::Success {
                    body, final_url, ..
                } => {
                    if final_url != url {
                        tracing::debug!("{} redirected to {}", url, final_url);
                    }
                    body
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("HTTP {} for {}", status_code, url);
                    continue;
                }
                FetchResult::NetworkError { error, kind } => {
                    if state.page_count == 1 {
                        return Err(RippleError::SeedUnreachable {
                            url,
                            message: error,
                        });
                    }
                    tracing::warn!("Failed to fetch {} ({:?}): {}", url, kind, error);
                    continue;
                }
            };
            pages_fetched += 1;

            let page_emails = extract_emails(&body);
            if !page_emails.is_empty() {
                tracing::info!("Found {} email(s) on {}", page_emails.len(), url);
                state.collected.extend(page_emails);
                return Ok(state.finish(pages_fetched, StopReason::EmailFound));
            }

            let parsed = self.parser.extract_links(&body);
            if !parsed.ok {
                tracing::debug!("Could not parse links on {}", url);
                continue;
            }

            let origin = match base_origin(&url) {
                Ok(origin) => origin,
                Err(e) => {
                    tracing::debug!("No origin for {}: {}", url, e);
                    continue;
                }
            };
            let dir = page_path(&url);

            let queued = parsed
                .links
                .iter()
                .map(|link| normalize_link(link, &origin, &dir))
                .filter(|link| state.enqueue(link.clone()))
                .count();
            tracing::debug!("Queued {} new link(s) from {}", queued, url);
        }
    }
}
