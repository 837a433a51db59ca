//! Storage module for persisting faculty data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Faculty records with their programs, departments, contacts and routes
//! - Crawl run bookkeeping
//! - The multi-field search index consulted by the search engine

mod schema;
mod sqlite;
mod traits;

pub use schema::{like_pattern, list_tables, table_exists};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::faculty::Contact;
use crate::FinderError;
use std::collections::BTreeMap;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(FinderError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, FinderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteStorage::new(path)
}

/// A faculty as stored, with its child rows
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFaculty {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub faculty_type: String,
    pub programs: Vec<String>,
    pub departments: Vec<String>,
    pub contact: Contact,
    pub route: Vec<RouteStep>,
    pub created_at: String,
    pub updated_at: String,
}

/// One persisted breadcrumb step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    pub name: String,
    pub url: String,
}

/// A faculty row without its children, as returned by listings
#[derive(Debug, Clone, PartialEq)]
pub struct FacultySummary {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub faculty_type: String,
    pub program_count: u32,
    pub department_count: u32,
    /// Substring-match score; zero for plain listings
    pub score: u32,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub success: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

/// Represents a finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlRunRecord {
    pub id: i64,
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub config_hash: String,
    pub total_faculties: u32,
    pub pages_crawled: u32,
    pub duration_secs: f64,
    pub status: RunStatus,
}

/// A crawl about to be recorded
#[derive(Debug, Clone)]
pub struct NewCrawlRun<'a> {
    pub base_url: &'a str,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
    pub config_hash: &'a str,
    pub total_faculties: u32,
    pub pages_crawled: u32,
    pub duration_secs: f64,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every expected faculty was found
    Completed,
    /// The crawl ended with some expected faculties missing
    Partial,
    /// Nothing usable was discovered
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "partial" => Some(Self::Partial),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Kind of content an index row was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    Name,
    Description,
    Program,
    Department,
    Contact,
    Type,
}

impl ContentType {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Program => "program",
            Self::Department => "department",
            Self::Contact => "contact",
            Self::Type => "type",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "program" => Some(Self::Program),
            "department" => Some(Self::Department),
            "contact" => Some(Self::Contact),
            "type" => Some(Self::Type),
            _ => None,
        }
    }

    /// Fixed index weight for rows of this type
    pub fn index_weight(&self) -> f64 {
        match self {
            Self::Name => 5.0,
            Self::Program => 3.0,
            Self::Department => 2.5,
            Self::Description => 2.0,
            Self::Type => 2.0,
            Self::Contact => 1.0,
        }
    }
}

/// One search index row for a faculty
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub content_type: ContentType,
    pub content: String,
    pub keyword: String,
    pub weight: f64,
}

/// Database-wide totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyStatistics {
    pub total_faculties: u64,
    pub total_programs: u64,
    pub total_departments: u64,
    pub faculties_with_contact: u64,
    pub by_type: BTreeMap<String, u64>,
}

/// Health report of the search index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexVerification {
    pub total_rows: u64,
    /// Faculties without a single index row
    pub unindexed_faculties: u64,
    pub empty_keywords: u64,
    /// Row count per content type, largest first
    pub by_content_type: Vec<(String, u64)>,
}

impl IndexVerification {
    /// Returns true if every faculty is indexed and no row lacks keywords
    pub fn is_healthy(&self) -> bool {
        self.unindexed_faculties == 0 && self.empty_keywords == 0
    }
}

/// Row count and mean weight of one content type
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTypeStats {
    pub content_type: String,
    pub count: u64,
    pub avg_weight: f64,
}

/// How often a keyword occurs in the index
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub frequency: u64,
    pub avg_weight: f64,
}

/// Aggregate view of the search index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStatistics {
    pub total_rows: u64,
    pub by_content_type: Vec<ContentTypeStats>,
    pub top_keywords: Vec<KeywordFrequency>,
    /// Faculty names with the most index rows, with their row counts
    pub most_indexed: Vec<(String, u64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_roundtrip() {
        for status in &[RunStatus::Completed, RunStatus::Partial, RunStatus::Failed] {
            let db_str = status.to_db_string();
            assert_eq!(Some(*status), RunStatus::from_db_string(db_str));
        }
        assert_eq!(RunStatus::from_db_string("running"), None);
    }

    #[test]
    fn test_content_type_weights() {
        assert_eq!(ContentType::Name.index_weight(), 5.0);
        assert_eq!(ContentType::Contact.index_weight(), 1.0);
        assert_eq!(ContentType::from_db_string("program"), Some(ContentType::Program));
        assert_eq!(ContentType::from_db_string("url"), None);
    }

    #[test]
    fn test_open_storage_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("faculty.db");
        let storage = open_storage(&path);
        assert!(storage.is_ok());
        assert!(path.exists());
    }
}
