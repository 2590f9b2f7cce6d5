//! Batch processing: many independent site crawls, one aggregate result

mod runner;
mod types;

pub use runner::{process_record, BatchRunner};
pub use types::{BatchOptions, BatchResult, SiteRecord, SiteResult, SiteStatus};
