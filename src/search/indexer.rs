//! Search index maintenance
//!
//! Turns faculty records into weighted index rows and rebuilds the index,
//! retrying per-faculty writes that hit a locked database.

use crate::faculty::Faculty;
use crate::search::tokenizer::extract_keywords;
use crate::storage::{ContentType, IndexRow, Storage, StorageResult, StoredFaculty};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Characters of the description kept as row content
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// The fields of a faculty that contribute to the index
#[derive(Debug, Clone, Copy)]
pub struct IndexInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub programs: &'a [String],
    pub departments: &'a [String],
    pub address: Option<&'a str>,
    pub faculty_type: &'a str,
}

impl<'a> From<&'a Faculty> for IndexInput<'a> {
    fn from(faculty: &'a Faculty) -> Self {
        Self {
            name: &faculty.name,
            description: &faculty.description,
            programs: &faculty.programs,
            departments: &faculty.departments,
            address: faculty.contact.address.as_deref(),
            faculty_type: faculty.faculty_type.to_db_string(),
        }
    }
}

impl<'a> From<&'a StoredFaculty> for IndexInput<'a> {
    fn from(faculty: &'a StoredFaculty) -> Self {
        Self {
            name: &faculty.name,
            description: &faculty.description,
            programs: &faculty.programs,
            departments: &faculty.departments,
            address: faculty.contact.address.as_deref(),
            faculty_type: &faculty.faculty_type,
        }
    }
}

/// Builds every index row for one faculty
///
/// Each field yields one row per extracted keyword, carrying the field's
/// content and the fixed weight of its [`ContentType`].
pub fn build_index_rows(input: &IndexInput<'_>) -> Vec<IndexRow> {
    let mut rows = Vec::new();

    push_rows(&mut rows, ContentType::Name, input.name, input.name);

    if !input.description.trim().is_empty() {
        let preview = description_preview(input.description);
        push_rows(&mut rows, ContentType::Description, &preview, input.description);
    }

    for program in input.programs.iter().filter(|p| !p.trim().is_empty()) {
        push_rows(&mut rows, ContentType::Program, program, program);
    }

    for department in input.departments.iter().filter(|d| !d.trim().is_empty()) {
        push_rows(&mut rows, ContentType::Department, department, department);
    }

    if let Some(address) = input.address.filter(|a| !a.trim().is_empty()) {
        push_rows(&mut rows, ContentType::Contact, address, address);
    }

    // stored types are snake_case tags
    let type_words = input.faculty_type.replace('_', " ");
    push_rows(&mut rows, ContentType::Type, input.faculty_type, &type_words);

    rows
}

fn push_rows(rows: &mut Vec<IndexRow>, content_type: ContentType, content: &str, source: &str) {
    for keyword in extract_keywords(source) {
        rows.push(IndexRow {
            content_type,
            content: content.to_string(),
            keyword,
            weight: content_type.index_weight(),
        });
    }
}

fn description_preview(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let head: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// Backoff schedule for writes that hit a locked database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first included
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (zero-based), doubling each time
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Outcome of a full index rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub success: u32,
    pub failed: u32,
    pub total_entries: u64,
}

/// Writes index rows through a [`Storage`], retrying busy writes
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    policy: RetryPolicy,
}

impl Indexer {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Replaces the index rows of one faculty
    ///
    /// # Returns
    ///
    /// The number of rows written, or the last error once the attempts are
    /// used up or a non-busy error occurs
    pub fn index_faculty<S: Storage>(
        &self,
        storage: &mut S,
        faculty: &StoredFaculty,
    ) -> StorageResult<usize> {
        let rows = build_index_rows(&IndexInput::from(faculty));
        let mut attempt = 0;

        loop {
            match storage.replace_index_rows(faculty.id, &rows) {
                Ok(written) => {
                    debug!("Indexed faculty {}: {} entries", faculty.id, written);
                    return Ok(written);
                }
                Err(e) if e.is_busy() && attempt + 1 < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "Database locked while indexing faculty {}, retrying in {:?} (attempt {})",
                        faculty.id,
                        delay,
                        attempt + 1
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Clears the index and re-indexes every stored faculty
    ///
    /// A faculty that cannot be indexed is counted as failed and skipped.
    pub fn rebuild_all<S: Storage>(&self, storage: &mut S) -> StorageResult<RebuildSummary> {
        storage.ensure_index_table()?;
        storage.clear_index()?;

        let mut summary = RebuildSummary::default();
        for faculty_id in storage.faculty_ids()? {
            let Some(faculty) = storage.get_faculty(faculty_id)? else {
                continue;
            };
            match self.index_faculty(storage, &faculty) {
                Ok(_) => summary.success += 1,
                Err(e) => {
                    error!("Error creating search index for faculty {}: {}", faculty_id, e);
                    summary.failed += 1;
                }
            }
        }

        summary.total_entries = storage.count_index_rows()?;
        info!(
            "Index rebuild complete: {} indexed, {} failed, {} entries",
            summary.success, summary.failed, summary.total_entries
        );
        Ok(summary)
    }
}
