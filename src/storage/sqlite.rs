//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::faculty::{Contact, Faculty};
use crate::search::{build_index_rows, IndexInput};
use crate::storage::schema::{initialize_schema, like_pattern, table_exists, INDEX_TABLE_SQL};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    ContentTypeStats, CrawlRunRecord, FacultyStatistics, FacultySummary, ImportSummary, IndexRow,
    IndexStatistics, IndexVerification, KeywordFrequency, NewCrawlRun, RouteStep, RunStatus,
    StoredFaculty,
};
use crate::FinderError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// How long a connection waits on a locked database before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

const TOP_KEYWORDS_LIMIT: u32 = 20;
const MOST_INDEXED_LIMIT: u32 = 10;

/// Columns shared by every faculty listing query, in `summary_from_row` order
const SUMMARY_COLUMNS: &str = "f.id, f.name, f.url, f.description, f.faculty_type,
    (SELECT COUNT(*) FROM programs p WHERE p.faculty_id = f.id) AS program_count,
    (SELECT COUNT(*) FROM departments d WHERE d.faculty_id = f.id) AS department_count";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(FinderError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, FinderError> {
        Self::with_busy_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Opens a database with a custom busy timeout
    pub fn with_busy_timeout(path: &Path, busy_timeout: Duration) -> Result<Self, FinderError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, FinderError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// The underlying connection, for read-only queries the trait does not cover
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    fn load_faculty(&self, faculty_id: i64) -> StorageResult<Option<StoredFaculty>> {
        let faculty = self
            .conn
            .query_row(
                "SELECT id, name, url, description, faculty_type, created_at, updated_at
                 FROM faculties WHERE id = ?1",
                params![faculty_id],
                |row| {
                    Ok(StoredFaculty {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        url: row.get(2)?,
                        description: row.get(3)?,
                        faculty_type: row.get(4)?,
                        programs: Vec::new(),
                        departments: Vec::new(),
                        contact: Contact::default(),
                        route: Vec::new(),
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()?;

        let Some(mut faculty) = faculty else {
            return Ok(None);
        };

        faculty.programs = child_names(&self.conn, "programs", faculty_id)?;
        faculty.departments = child_names(&self.conn, "departments", faculty_id)?;
        faculty.contact = self
            .conn
            .query_row(
                "SELECT email, phone, address FROM contacts WHERE faculty_id = ?1",
                params![faculty_id],
                |row| {
                    Ok(Contact {
                        email: row.get(0)?,
                        phone: row.get(1)?,
                        address: row.get(2)?,
                    })
                },
            )
            .optional()?
            .unwrap_or_default();

        let mut stmt = self
            .conn
            .prepare("SELECT name, url FROM routes WHERE faculty_id = ?1 ORDER BY step_order")?;
        faculty.route = stmt
            .query_map(params![faculty_id], |row| {
                Ok(RouteStep {
                    name: row.get(0)?,
                    url: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(faculty))
    }
}

impl Storage for SqliteStorage {
    // ===== Faculty Management =====

    fn upsert_faculty(&mut self, faculty: &Faculty) -> StorageResult<i64> {
        let name = faculty.name.trim();
        let url = faculty.url.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidRecord(format!(
                "faculty at '{}' has an empty name",
                url
            )));
        }
        if url.is_empty() {
            return Err(StorageError::InvalidRecord(format!(
                "faculty '{}' has an empty url",
                name
            )));
        }

        let index_rows = build_index_rows(&IndexInput::from(faculty));
        let now = Utc::now().to_rfc3339();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO faculties (name, url, description, faculty_type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(url) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                faculty_type = excluded.faculty_type,
                updated_at = excluded.updated_at",
            params![
                name,
                url,
                faculty.description,
                faculty.faculty_type.to_db_string(),
                now
            ],
        )?;
        let faculty_id: i64 =
            tx.query_row("SELECT id FROM faculties WHERE url = ?1", params![url], |row| {
                row.get(0)
            })?;

        for table in ["programs", "departments", "contacts", "routes", "search_index"] {
            tx.execute(
                &format!("DELETE FROM {} WHERE faculty_id = ?1", table),
                params![faculty_id],
            )?;
        }

        {
            let mut stmt = tx.prepare("INSERT INTO programs (faculty_id, name) VALUES (?1, ?2)")?;
            for program in &faculty.programs {
                stmt.execute(params![faculty_id, program])?;
            }

            let mut stmt =
                tx.prepare("INSERT INTO departments (faculty_id, name) VALUES (?1, ?2)")?;
            for department in &faculty.departments {
                stmt.execute(params![faculty_id, department])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO routes (faculty_id, step_order, name, url) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (order, step) in faculty.navigation_path.iter().enumerate() {
                stmt.execute(params![faculty_id, order as i64, step.name, step.url])?;
            }
        }

        if !faculty.contact.is_empty() {
            tx.execute(
                "INSERT INTO contacts (faculty_id, email, phone, address) VALUES (?1, ?2, ?3, ?4)",
                params![
                    faculty_id,
                    faculty.contact.email,
                    faculty.contact.phone,
                    faculty.contact.address
                ],
            )?;
        }

        insert_index_rows(&tx, faculty_id, &index_rows)?;
        tx.commit()?;

        Ok(faculty_id)
    }

    fn bulk_import(&mut self, faculties: &[Faculty]) -> StorageResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        for faculty in faculties {
            match self.upsert_faculty(faculty) {
                Ok(_) => summary.success += 1,
                Err(e) => {
                    warn!("Failed to import faculty {}: {}", faculty.url, e);
                    summary.failed += 1;
                    summary.errors.push(format!("{}: {}", faculty.url, e));
                }
            }
        }

        Ok(summary)
    }

    fn delete_all(&mut self) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "
            DELETE FROM search_index;
            DELETE FROM routes;
            DELETE FROM contacts;
            DELETE FROM departments;
            DELETE FROM programs;
            DELETE FROM faculties;
            DELETE FROM crawl_runs;
        ",
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_faculty(&self, faculty_id: i64) -> StorageResult<Option<StoredFaculty>> {
        self.load_faculty(faculty_id)
    }

    fn list_faculties(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> StorageResult<Vec<FacultySummary>> {
        let query = format!(
            "SELECT {}, 0 AS score FROM faculties f ORDER BY f.name ASC LIMIT ?1 OFFSET ?2",
            SUMMARY_COLUMNS
        );
        // A negative LIMIT means no limit in SQLite
        let limit = limit.map(i64::from).unwrap_or(-1);

        let mut stmt = self.conn.prepare(&query)?;
        let faculties = stmt
            .query_map(params![limit, offset], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(faculties)
    }

    fn faculty_ids(&self) -> StorageResult<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT id FROM faculties ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn count_faculties(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM faculties", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn faculties_by_type(
        &self,
        faculty_type: &str,
        limit: u32,
    ) -> StorageResult<Vec<StoredFaculty>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM faculties WHERE faculty_type = ?1 ORDER BY name ASC LIMIT ?2",
        )?;
        let ids = stmt
            .query_map(params![faculty_type, limit], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        let mut faculties = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(faculty) = self.load_faculty(id)? {
                faculties.push(faculty);
            }
        }
        Ok(faculties)
    }

    fn search_substring(&self, query: &str, limit: u32) -> StorageResult<Vec<FacultySummary>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_faculties(Some(limit), 0);
        }

        let pattern = like_pattern(&query.to_lowercase());
        let sql = format!(
            "SELECT * FROM (
                SELECT {},
                    (CASE WHEN LOWER(f.name) LIKE ?1 ESCAPE '\\' THEN 10 ELSE 0 END
                     + CASE WHEN LOWER(f.description) LIKE ?1 ESCAPE '\\' THEN 5 ELSE 0 END
                     + CASE WHEN EXISTS(SELECT 1 FROM programs p
                            WHERE p.faculty_id = f.id AND LOWER(p.name) LIKE ?1 ESCAPE '\\') THEN 8 ELSE 0 END
                     + CASE WHEN EXISTS(SELECT 1 FROM departments d
                            WHERE d.faculty_id = f.id AND LOWER(d.name) LIKE ?1 ESCAPE '\\') THEN 6 ELSE 0 END
                     + CASE WHEN EXISTS(SELECT 1 FROM search_index si
                            WHERE si.faculty_id = f.id AND LOWER(si.keywords) LIKE ?1 ESCAPE '\\') THEN 3 ELSE 0 END
                    ) AS score
                FROM faculties f
            )
            WHERE score > 0
            ORDER BY score DESC, name ASC
            LIMIT ?2",
            SUMMARY_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let faculties = stmt
            .query_map(params![pattern, limit], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(faculties)
    }

    // ===== Crawl Runs =====

    fn record_crawl_run(&mut self, run: &NewCrawlRun<'_>) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO crawl_runs (base_url, started_at, finished_at, config_hash,
             total_faculties, pages_crawled, duration_secs, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                run.base_url,
                run.started_at.to_rfc3339(),
                run.finished_at.to_rfc3339(),
                run.config_hash,
                run.total_faculties,
                run.pages_crawled,
                run.duration_secs,
                run.status.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn latest_crawl_run(&self) -> StorageResult<Option<CrawlRunRecord>> {
        Ok(self.list_crawl_runs(1)?.into_iter().next())
    }

    fn list_crawl_runs(&self, limit: u32) -> StorageResult<Vec<CrawlRunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, base_url, started_at, finished_at, config_hash, total_faculties,
             pages_crawled, duration_secs, status
             FROM crawl_runs ORDER BY id DESC LIMIT ?1",
        )?;

        let runs = stmt
            .query_map(params![limit], |row| {
                Ok(CrawlRunRecord {
                    id: row.get(0)?,
                    base_url: row.get(1)?,
                    started_at: row.get(2)?,
                    finished_at: row.get(3)?,
                    config_hash: row.get(4)?,
                    total_faculties: row.get(5)?,
                    pages_crawled: row.get(6)?,
                    duration_secs: row.get(7)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(8)?)
                        .unwrap_or(RunStatus::Failed),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }

    // ===== Statistics =====

    fn statistics(&self) -> StorageResult<FacultyStatistics> {
        let count = |sql: &str| -> StorageResult<u64> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as u64)
        };

        let mut stats = FacultyStatistics {
            total_faculties: count("SELECT COUNT(*) FROM faculties")?,
            total_programs: count("SELECT COUNT(*) FROM programs")?,
            total_departments: count("SELECT COUNT(*) FROM departments")?,
            faculties_with_contact: count(
                "SELECT COUNT(*) FROM contacts
                 WHERE COALESCE(email, '') != '' OR COALESCE(phone, '') != ''
                    OR COALESCE(address, '') != ''",
            )?,
            ..FacultyStatistics::default()
        };

        let mut stmt = self
            .conn
            .prepare("SELECT faculty_type, COUNT(*) FROM faculties GROUP BY faculty_type")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (faculty_type, n) = row?;
            stats.by_type.insert(faculty_type, n as u64);
        }

        Ok(stats)
    }

    // ===== Search Index =====

    fn replace_index_rows(&mut self, faculty_id: i64, rows: &[IndexRow]) -> StorageResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM search_index WHERE faculty_id = ?1",
            params![faculty_id],
        )?;
        let written = insert_index_rows(&tx, faculty_id, rows)?;
        tx.commit()?;
        Ok(written)
    }

    fn clear_index(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM search_index", [])?;
        Ok(())
    }

    fn count_index_rows(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM search_index", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn verify_index(&self) -> StorageResult<IndexVerification> {
        let unindexed: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM faculties f
             WHERE NOT EXISTS (SELECT 1 FROM search_index si WHERE si.faculty_id = f.id)",
            [],
            |row| row.get(0),
        )?;
        let empty_keywords: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM search_index WHERE keywords IS NULL OR keywords = ''",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT content_type, COUNT(*) AS count FROM search_index
             GROUP BY content_type ORDER BY count DESC, content_type ASC",
        )?;
        let by_content_type = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IndexVerification {
            total_rows: self.count_index_rows()?,
            unindexed_faculties: unindexed as u64,
            empty_keywords: empty_keywords as u64,
            by_content_type,
        })
    }

    fn index_statistics(&self) -> StorageResult<IndexStatistics> {
        let mut stmt = self.conn.prepare(
            "SELECT content_type, COUNT(*) AS count, AVG(weight) FROM search_index
             GROUP BY content_type ORDER BY count DESC, content_type ASC",
        )?;
        let by_content_type = stmt
            .query_map([], |row| {
                Ok(ContentTypeStats {
                    content_type: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                    avg_weight: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT keywords, COUNT(*) AS frequency, AVG(weight) FROM search_index
             WHERE keywords IS NOT NULL AND keywords != ''
             GROUP BY keywords ORDER BY frequency DESC, keywords ASC LIMIT ?1",
        )?;
        let top_keywords = stmt
            .query_map(params![TOP_KEYWORDS_LIMIT], |row| {
                Ok(KeywordFrequency {
                    keyword: row.get(0)?,
                    frequency: row.get::<_, i64>(1)? as u64,
                    avg_weight: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT f.name, COUNT(*) AS entries FROM search_index si
             JOIN faculties f ON si.faculty_id = f.id
             GROUP BY si.faculty_id, f.name ORDER BY entries DESC, f.name ASC LIMIT ?1",
        )?;
        let most_indexed = stmt
            .query_map(params![MOST_INDEXED_LIMIT], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IndexStatistics {
            total_rows: self.count_index_rows()?,
            by_content_type,
            top_keywords,
            most_indexed,
        })
    }

    fn ensure_index_table(&mut self) -> StorageResult<bool> {
        if table_exists(&self.conn, "search_index")? {
            return Ok(false);
        }
        warn!("search_index table not found, creating it");
        self.conn.execute_batch(INDEX_TABLE_SQL)?;
        Ok(true)
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<FacultySummary> {
    Ok(FacultySummary {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        faculty_type: row.get(4)?,
        program_count: row.get(5)?,
        department_count: row.get(6)?,
        score: row.get(7)?,
    })
}

fn child_names(conn: &Connection, table: &str, faculty_id: i64) -> StorageResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT name FROM {} WHERE faculty_id = ?1 AND name != '' ORDER BY id",
        table
    ))?;
    let names = stmt
        .query_map(params![faculty_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

fn insert_index_rows(conn: &Connection, faculty_id: i64, rows: &[IndexRow]) -> StorageResult<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO search_index (faculty_id, content_type, content, keywords, weight)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for row in rows {
        stmt.execute(params![
            faculty_id,
            row.content_type.to_db_string(),
            row.content,
            row.keyword,
            row.weight
        ])?;
    }
    Ok(rows.len())
}
