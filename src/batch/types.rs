//! Batch input and output types
//!
//! JSON field names match the scraping service's wire format
//! (`Name`, `Website`, `Email`, `Description`, `Status`).

use crate::config::CrawlerConfig;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// One website submitted for email discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    #[serde(rename = "Name", default = "unknown_name")]
    pub name: String,

    #[serde(rename = "Website", default)]
    pub website: String,

    /// An address already known for this site
    #[serde(rename = "Email", default)]
    pub email: Option<String>,

    #[serde(rename = "Description", default)]
    pub description: String,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

impl SiteRecord {
    pub fn new(name: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: website.into(),
            email: None,
            description: String::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The pre-populated email, if it is present and non-empty
    pub fn known_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}

/// Outcome of processing one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteStatus {
    /// The record came with an email; nothing was crawled
    AlreadyExists,
    /// The crawl found an email
    Found,
    /// The crawl finished without finding an email
    NotFound,
    /// The crawl could not run (bad URL, unreachable site, task failure)
    Error(String),
}

impl SiteStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "Already exists"),
            Self::Found => write!(f, "Found"),
            Self::NotFound => write!(f, "Not found"),
            Self::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

impl Serialize for SiteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Terminal result for one record
///
/// Only built through the constructors below, which keep `email` and
/// `status` consistent: `Found` and `AlreadyExists` carry an email,
/// `NotFound` and `Error` never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteResult {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Website")]
    pub website: String,

    #[serde(rename = "Email")]
    pub email: Option<String>,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Status")]
    pub status: SiteStatus,
}

impl SiteResult {
    fn from_record(record: SiteRecord, email: Option<String>, status: SiteStatus) -> Self {
        Self {
            name: record.name,
            website: record.website,
            email,
            description: record.description,
            status,
        }
    }

    /// Passes a pre-populated email through untouched
    ///
    /// Falls back to `NotFound` if the record has no usable email.
    pub fn already_exists(mut record: SiteRecord) -> Self {
        match record.email.take().filter(|email| !email.is_empty()) {
            Some(email) => Self::from_record(record, Some(email), SiteStatus::AlreadyExists),
            None => Self::not_found(record),
        }
    }

    pub fn found(record: SiteRecord, email: String) -> Self {
        Self::from_record(record, Some(email), SiteStatus::Found)
    }

    pub fn not_found(record: SiteRecord) -> Self {
        Self::from_record(record, None, SiteStatus::NotFound)
    }

    pub fn error(record: SiteRecord, message: impl Into<String>) -> Self {
        Self::from_record(record, None, SiteStatus::Error(message.into()))
    }

    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|email| !email.is_empty())
    }
}

/// How a batch should be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Parallel worker pool (true) or cooperative single-task scheduling (false)
    pub concurrent: bool,

    /// Maximum number of crawls in flight at once
    pub max_workers: usize,

    /// Page ceiling override for this batch
    pub max_pages: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrent: true,
            max_workers: 10,
            max_pages: None,
        }
    }
}

impl BatchOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            concurrent: config.concurrent,
            max_workers: config.max_workers,
            max_pages: None,
        }
    }
}

/// Aggregate response for a whole batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub results: Vec<SiteResult>,
    pub total_websites: usize,
    /// Wall-clock time for the batch, rounded to hundredths
    pub processing_time_seconds: f64,
    pub found_emails: usize,
    pub errors: usize,
}

impl BatchResult {
    pub fn from_results(results: Vec<SiteResult>, total_websites: usize, elapsed: Duration) -> Self {
        let found_emails = results.iter().filter(|r| r.has_email()).count();
        let errors = results.iter().filter(|r| r.status.is_error()).count();

        Self {
            results,
            total_websites,
            processing_time_seconds: (elapsed.as_secs_f64() * 100.0).round() / 100.0,
            found_emails,
            errors,
        }
    }
}
