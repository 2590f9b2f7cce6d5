//! Batch orchestrator - runs one site crawl per record
//!
//! Two execution modes produce the same result shape:
//! - concurrent: each record is a spawned task; a semaphore caps how many
//!   crawl at once
//! - cooperative: every crawl runs on the caller's task, interleaving at
//!   network waits, capped by the same worker count
//!
//! Crawls share nothing but the fetcher and parser, so the only
//! synchronization is the worker bound itself.

use crate::batch::types::{BatchOptions, BatchResult, SiteRecord, SiteResult};
use crate::config::Config;
use crate::crawler::SiteCrawler;
use crate::{Result, RippleError};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Runs batches of site crawls
#[derive(Clone)]
pub struct BatchRunner {
    crawler: SiteCrawler,
}

impl BatchRunner {
    pub fn new(crawler: SiteCrawler) -> Self {
        Self { crawler }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(SiteCrawler::from_config(config)?))
    }

    /// Processes every record and aggregates the results
    ///
    /// Always returns a full [`BatchResult`]: a failing record becomes an
    /// `Error` status and never aborts the rest of the batch. Concurrent
    /// mode reports results in submission order; cooperative mode reports
    /// them in completion order. The worker count is clamped to at least one
    /// and at most what a semaphore can hold.
    pub async fn run_batch(&self, records: Vec<SiteRecord>, options: &BatchOptions) -> BatchResult {
        let start = Instant::now();
        let total = records.len();
        let workers = options.max_workers.clamp(1, Semaphore::MAX_PERMITS);

        let crawler = match options.max_pages {
            Some(max_pages) => self.crawler.with_max_pages(max_pages),
            None => self.crawler.clone(),
        };

        tracing::info!(
            "Starting batch: {} website(s), concurrent={}, max_workers={}, max_pages={}",
            total,
            options.concurrent,
            workers,
            crawler.settings().max_pages
        );

        let results = if options.concurrent {
            run_concurrent(&crawler, records, workers).await
        } else {
            run_cooperative(&crawler, records, workers).await
        };

        let batch = BatchResult::from_results(results, total, start.elapsed());

        tracing::info!(
            "Batch completed: {} website(s), {} email(s), {} error(s) in {:.2}s",
            batch.total_websites,
            batch.found_emails,
            batch.errors,
            batch.processing_time_seconds
        );

        batch
    }
}

/// Produces the result for a single record
///
/// Records with a known email are passed through without any fetch.
pub async fn process_record(crawler: &SiteCrawler, record: SiteRecord) -> SiteResult {
    if let Some(email) = record.known_email() {
        tracing::debug!("{} already has email: {}", record.website, email);
        return SiteResult::already_exists(record);
    }

    match crawler.crawl(&record.website).await {
        Ok(outcome) => match outcome.first_email() {
            Some(email) => {
                let email = email.to_string();
                SiteResult::found(record, email)
            }
            None => SiteResult::not_found(record),
        },
        Err(e) => {
            tracing::warn!("Crawl failed for {}: {}", record.website, e);
            SiteResult::error(record, e.to_string())
        }
    }
}

async fn run_concurrent(
    crawler: &SiteCrawler,
    records: Vec<SiteRecord>,
    workers: usize,
) -> Vec<SiteResult> {
    let semaphore = Arc::new(Semaphore::new(workers));

    let handles: Vec<_> = records
        .into_iter()
        .map(|record| {
            let fallback = record.clone();
            let crawler = crawler.clone();
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return SiteResult::error(record, e.to_string()),
                };
                process_record(&crawler, record).await
            });

            (fallback, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (record, handle) in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!("Crawl task for {} failed: {}", record.website, e);
                let message = RippleError::Task(e.to_string()).to_string();
                results.push(SiteResult::error(record, message));
            }
        }
    }
    results
}

async fn run_cooperative(
    crawler: &SiteCrawler,
    records: Vec<SiteRecord>,
    workers: usize,
) -> Vec<SiteResult> {
    stream::iter(records)
        .map(|record| async move {
            let fallback = record.clone();
            match AssertUnwindSafe(process_record(crawler, record))
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!("Crawl for {} panicked: {}", fallback.website, message);
                    let message = RippleError::Task(format!("panicked: {}", message)).to_string();
                    SiteResult::error(fallback, message)
                }
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
