//! Output module for crawl summaries and database reports
//!
//! This module handles:
//! - Building crawl summaries from a live crawl or from the database
//! - Rendering summaries as markdown
//! - Printing faculty and search index statistics

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, print_verification, DatabaseStatistics};
pub use summary::{run_status_for, CrawlSummary, FacultyEntry};

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No crawl runs found in database")]
    NoRuns,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
