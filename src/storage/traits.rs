//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::faculty::Faculty;
use crate::storage::{
    CrawlRunRecord, FacultyStatistics, FacultySummary, ImportSummary, IndexRow, IndexStatistics,
    IndexVerification, NewCrawlRun, StoredFaculty,
};
use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Faculty not found: {0}")]
    NotFound(i64),

    #[error("Invalid faculty record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    /// Returns true if the database was locked by another writer
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(error, _)) => matches!(
                error.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines every persistence operation the crawler, indexer and
/// search engine need. Writes take `&mut self`; one instance is one connection.
pub trait Storage {
    // ===== Faculty Management =====

    /// Inserts a faculty or updates the one with the same URL
    ///
    /// Programs, departments, route and contact are replaced, and the
    /// faculty's search index rows are rebuilt, in a single transaction.
    ///
    /// # Arguments
    ///
    /// * `faculty` - The faculty record; name and url must be non-empty
    ///
    /// # Returns
    ///
    /// The ID of the stored faculty
    fn upsert_faculty(&mut self, faculty: &Faculty) -> StorageResult<i64>;

    /// Upserts every record, collecting failures instead of stopping
    fn bulk_import(&mut self, faculties: &[Faculty]) -> StorageResult<ImportSummary>;

    /// Removes every faculty, child row, index row and crawl run
    fn delete_all(&mut self) -> StorageResult<()>;

    /// Gets a faculty with its children
    fn get_faculty(&self, faculty_id: i64) -> StorageResult<Option<StoredFaculty>>;

    /// Lists faculties ordered by name
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of rows, or all rows when `None`
    /// * `offset` - Number of rows to skip
    fn list_faculties(&self, limit: Option<u32>, offset: u32)
        -> StorageResult<Vec<FacultySummary>>;

    /// Gets all faculty IDs in insertion order
    fn faculty_ids(&self) -> StorageResult<Vec<i64>>;

    /// Gets the total number of faculties
    fn count_faculties(&self) -> StorageResult<u64>;

    /// Gets faculties of one type, ordered by name
    fn faculties_by_type(&self, faculty_type: &str, limit: u32)
        -> StorageResult<Vec<StoredFaculty>>;

    /// Case-insensitive substring search over names, descriptions, programs,
    /// departments and index keywords
    ///
    /// A blank query returns the plain listing.
    fn search_substring(&self, query: &str, limit: u32) -> StorageResult<Vec<FacultySummary>>;

    // ===== Crawl Runs =====

    /// Records a finished crawl and returns its ID
    fn record_crawl_run(&mut self, run: &NewCrawlRun<'_>) -> StorageResult<i64>;

    /// Gets the most recent crawl run
    fn latest_crawl_run(&self) -> StorageResult<Option<CrawlRunRecord>>;

    /// Gets the most recent crawl runs, newest first
    fn list_crawl_runs(&self, limit: u32) -> StorageResult<Vec<CrawlRunRecord>>;

    // ===== Statistics =====

    /// Gets database-wide totals
    fn statistics(&self) -> StorageResult<FacultyStatistics>;

    // ===== Search Index =====

    /// Replaces all index rows of one faculty
    ///
    /// Runs in an immediate transaction, so a locked database surfaces as a
    /// busy error (see [`StorageError::is_busy`]) before anything is deleted.
    ///
    /// # Returns
    ///
    /// The number of rows written
    fn replace_index_rows(&mut self, faculty_id: i64, rows: &[IndexRow]) -> StorageResult<usize>;

    /// Deletes every index row
    fn clear_index(&mut self) -> StorageResult<()>;

    /// Gets the number of index rows
    fn count_index_rows(&self) -> StorageResult<u64>;

    /// Checks index coverage and keyword health
    fn verify_index(&self) -> StorageResult<IndexVerification>;

    /// Gets per-type counts, top keywords and the most indexed faculties
    fn index_statistics(&self) -> StorageResult<IndexStatistics>;

    /// Creates the search index table if it is missing
    ///
    /// # Returns
    ///
    /// `true` if the table had to be created
    fn ensure_index_table(&mut self) -> StorageResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_detection() {
        let busy = StorageError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ));
        assert!(busy.is_busy());
        assert!(!StorageError::NotFound(3).is_busy());
        assert!(!StorageError::InvalidRecord("empty name".into()).is_busy());
    }
}
