//! Relevance ranking over the stored faculties
//!
//! The engine expands a query into terms, matches them against the search
//! index (or a single faculty field, depending on [`SearchType`]) and returns
//! results enriched with programs, departments, contact and route.
//! Every public query degrades to an empty result on failure; errors are
//! logged, never returned.

use crate::faculty::Contact;
use crate::search::tokenizer::preprocess;
use crate::storage::{
    like_pattern, list_tables, ContentType, RouteStep, SqliteStorage, Storage, StorageResult, StoredFaculty,
};
use crate::FinderError;
use rusqlite::params_from_iter;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{error, info, warn};

/// Per-row score contributed in comprehensive mode
const COMPREHENSIVE_WEIGHTS: &[(ContentType, i64)] = &[
    (ContentType::Name, 100),
    (ContentType::Program, 70),
    (ContentType::Description, 60),
    (ContentType::Department, 50),
];

/// Score of a matching row of any other content type
const OTHER_CONTENT_WEIGHT: i64 = 10;

/// Score given to every hit of the direct search used while the index is empty
const FALLBACK_SCORE: i64 = 50;

/// Minimum length of a partial query for suggestions
const MIN_SUGGESTION_CHARS: usize = 2;

const SAMPLE_FACULTIES: u32 = 5;

/// Which fields a search matches against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchType {
    /// Every index row, scored by content type
    #[default]
    Comprehensive,
    Name,
    Description,
    Program,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Name => "name",
            Self::Description => "description",
            Self::Program => "program",
        }
    }

    /// Flat score of single-field modes
    pub fn flat_score(&self) -> Option<i64> {
        match self {
            Self::Comprehensive => None,
            Self::Name => Some(100),
            Self::Description => Some(75),
            Self::Program => Some(85),
        }
    }
}

impl From<&str> for SearchType {
    /// Parses a search type; unknown values mean comprehensive
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "name" => Self::Name,
            "description" => Self::Description,
            "program" => Self::Program,
            _ => Self::Comprehensive,
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked faculty with its enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub faculty_type: String,
    pub score: i64,
    pub programs: Vec<String>,
    pub departments: Vec<String>,
    pub contact: Contact,
    pub route: Vec<RouteStep>,
}

impl SearchResult {
    fn from_stored(faculty: StoredFaculty, score: i64) -> Self {
        Self {
            id: faculty.id,
            name: faculty.name,
            url: faculty.url,
            description: faculty.description,
            faculty_type: faculty.faculty_type,
            score,
            programs: faculty.programs,
            departments: faculty.departments,
            contact: faculty.contact,
            route: faculty.route,
        }
    }
}

/// Diagnostics for a query that returns unexpected results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDebugInfo {
    pub query: String,
    pub processed_terms: Vec<String>,
    pub tables: Vec<String>,
    pub faculty_count: u64,
    pub index_row_count: u64,
    pub sample_faculties: Vec<(i64, String)>,
    pub error: Option<String>,
}

/// A matched faculty before enrichment
#[derive(Debug, Clone, Copy)]
struct Hit {
    id: i64,
    score: i64,
}

/// Weighted keyword search over a faculty database
pub struct SearchEngine {
    storage: SqliteStorage,
}

impl SearchEngine {
    /// Wraps a storage, creating the search index table if it is missing
    pub fn new(mut storage: SqliteStorage) -> StorageResult<Self> {
        if storage.ensure_index_table()? {
            info!("Created search_index table structure");
        }
        Ok(Self { storage })
    }

    /// Opens the database at `path` and builds an engine over it
    pub fn open(path: &Path) -> Result<Self, FinderError> {
        if !path.exists() {
            return Err(FinderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("database not found: {}", path.display()),
            )));
        }
        let storage = SqliteStorage::new(path)?;
        Ok(Self::new(storage)?)
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut SqliteStorage {
        &mut self.storage
    }

    /// Searches faculties for a query
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text query; expanded with [`preprocess`]
    /// * `limit` - Maximum number of results
    /// * `search_type` - Which fields to match
    ///
    /// # Returns
    ///
    /// Results ordered by score, then name (or by matched field length for
    /// single-field modes). Empty when the query has no usable terms or the
    /// database cannot be read.
    pub fn search(&self, query: &str, limit: u32, search_type: SearchType) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            warn!("Empty query provided");
            return Vec::new();
        }

        let terms = preprocess(query);
        if terms.is_empty() {
            warn!("No valid words found in query: {}", query);
            return Vec::new();
        }
        info!("Searching for: {} -> {:?}", query, terms);

        match self.ranked_hits(&terms, limit, search_type) {
            Ok(hits) => {
                info!("Found {} results", hits.len());
                self.enrich(hits)
            }
            Err(e) => {
                error!("Database error searching faculties: {}", e);
                Vec::new()
            }
        }
    }

    fn ranked_hits(
        &self,
        terms: &BTreeSet<String>,
        limit: u32,
        search_type: SearchType,
    ) -> StorageResult<Vec<Hit>> {
        if self.storage.count_index_rows()? == 0 {
            warn!("Search index is empty, falling back to direct search");
            return self.fallback_hits(terms, limit);
        }

        match search_type {
            SearchType::Comprehensive => self.comprehensive_hits(terms, limit).or_else(|e| {
                error!("Error in comprehensive search: {}", e);
                self.fallback_hits(terms, limit)
            }),
            SearchType::Name => self.single_field_hits(
                terms,
                limit,
                search_type,
                "FROM faculties f",
                "LOWER(f.name) LIKE ? ESCAPE '\\'",
                "",
                "LENGTH(f.name) ASC, f.name ASC",
            ),
            SearchType::Description => self.single_field_hits(
                terms,
                limit,
                search_type,
                "FROM faculties f",
                "LOWER(f.description) LIKE ? ESCAPE '\\'",
                "f.description IS NOT NULL AND f.description != '' AND",
                "LENGTH(f.description) ASC, f.name ASC",
            ),
            SearchType::Program => self.single_field_hits(
                terms,
                limit,
                search_type,
                "FROM faculties f JOIN programs p ON f.id = p.faculty_id",
                "LOWER(p.name) LIKE ? ESCAPE '\\'",
                "",
                "f.name ASC",
            ),
        }
    }

    fn comprehensive_hits(&self, terms: &BTreeSet<String>, limit: u32) -> StorageResult<Vec<Hit>> {
        let condition = or_conditions(
            terms.len(),
            "(si.keywords LIKE ? ESCAPE '\\' OR si.content LIKE ? ESCAPE '\\' \
             OR f.name LIKE ? ESCAPE '\\')",
        );
        let patterns: Vec<String> = terms
            .iter()
            .flat_map(|term| std::iter::repeat(like_pattern(term)).take(3))
            .collect();

        let weights: String = COMPREHENSIVE_WEIGHTS
            .iter()
            .map(|(content_type, weight)| {
                format!("WHEN '{}' THEN {}", content_type.to_db_string(), weight)
            })
            .collect::<Vec<_>>()
            .join(" ");

        let sql = format!(
            "SELECT f.id, SUM(CASE si.content_type {} ELSE {} END) AS final_score
             FROM faculties f
             LEFT JOIN search_index si ON f.id = si.faculty_id
             WHERE ({})
             GROUP BY f.id, f.name
             ORDER BY final_score DESC, f.name ASC
             LIMIT {}",
            weights, OTHER_CONTENT_WEIGHT, condition, limit
        );

        self.query_hits(&sql, &patterns)
    }

    #[allow(clippy::too_many_arguments)]
    fn single_field_hits(
        &self,
        terms: &BTreeSet<String>,
        limit: u32,
        search_type: SearchType,
        from: &str,
        term_condition: &str,
        filter: &str,
        order: &str,
    ) -> StorageResult<Vec<Hit>> {
        let score = search_type.flat_score().unwrap_or(FALLBACK_SCORE);
        let sql = format!(
            "SELECT DISTINCT f.id, {} AS final_score, f.name, LENGTH(f.name), LENGTH(f.description)
             {}
             WHERE {} ({})
             ORDER BY {}
             LIMIT {}",
            score,
            from,
            filter,
            or_conditions(terms.len(), term_condition),
            order,
            limit
        );
        let patterns: Vec<String> = terms.iter().map(|term| like_pattern(term)).collect();

        self.query_hits(&sql, &patterns)
    }

    fn fallback_hits(&self, terms: &BTreeSet<String>, limit: u32) -> StorageResult<Vec<Hit>> {
        let sql = format!(
            "SELECT f.id, {} AS final_score
             FROM faculties f
             WHERE ({})
             ORDER BY f.name ASC
             LIMIT {}",
            FALLBACK_SCORE,
            or_conditions(
                terms.len(),
                "(f.name LIKE ? ESCAPE '\\' OR f.description LIKE ? ESCAPE '\\')"
            ),
            limit
        );
        let patterns: Vec<String> = terms
            .iter()
            .flat_map(|term| std::iter::repeat(like_pattern(term)).take(2))
            .collect();

        self.query_hits(&sql, &patterns)
    }

    fn query_hits(&self, sql: &str, patterns: &[String]) -> StorageResult<Vec<Hit>> {
        let mut stmt = self.storage.conn().prepare(sql)?;
        let hits = stmt
            .query_map(params_from_iter(patterns.iter()), |row| {
                Ok(Hit {
                    id: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    fn enrich(&self, hits: Vec<Hit>) -> Vec<SearchResult> {
        hits.into_iter()
            .filter_map(|hit| match self.storage.get_faculty(hit.id) {
                Ok(Some(faculty)) => Some(SearchResult::from_stored(faculty, hit.score)),
                Ok(None) => None,
                Err(e) => {
                    error!("Error enriching result for faculty {}: {}", hit.id, e);
                    None
                }
            })
            .collect()
    }

    /// Suggests faculty and program names containing a partial query
    ///
    /// Returns at most `limit` distinct names, shortest first. Partials
    /// shorter than two characters yield nothing.
    pub fn suggestions(&self, partial: &str, limit: u32) -> Vec<String> {
        let partial = partial.trim();
        if partial.chars().count() < MIN_SUGGESTION_CHARS {
            return Vec::new();
        }

        match self.suggestion_candidates(partial, limit) {
            Ok(mut names) => {
                names.sort_by(|a, b| a.chars().count().cmp(&b.chars().count()).then(a.cmp(b)));
                names.truncate(limit as usize);
                names
            }
            Err(e) => {
                error!("Error getting search suggestions: {}", e);
                Vec::new()
            }
        }
    }

    fn suggestion_candidates(&self, partial: &str, limit: u32) -> StorageResult<Vec<String>> {
        let pattern = like_pattern(&partial.to_lowercase());
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for table in ["faculties", "programs"] {
            let mut stmt = self.storage.conn().prepare(&format!(
                "SELECT DISTINCT name FROM {} WHERE LOWER(name) LIKE ?1 ESCAPE '\\'
                 ORDER BY LENGTH(name) ASC, name ASC LIMIT ?2",
                table
            ))?;
            let rows = stmt.query_map(rusqlite::params![pattern, limit], |row| {
                row.get::<_, String>(0)
            })?;
            for name in rows {
                let name = name?;
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Lists faculties of one type, enriched, ordered by name
    pub fn faculties_by_type(&self, faculty_type: &str, limit: u32) -> Vec<SearchResult> {
        match self.storage.faculties_by_type(faculty_type, limit) {
            Ok(faculties) => faculties
                .into_iter()
                .map(|faculty| SearchResult::from_stored(faculty, 0))
                .collect(),
            Err(e) => {
                error!("Error getting faculties by type: {}", e);
                Vec::new()
            }
        }
    }

    /// Collects what the engine sees for a query
    pub fn debug_search(&self, query: &str) -> SearchDebugInfo {
        let mut info = SearchDebugInfo {
            query: query.to_string(),
            processed_terms: preprocess(query).into_iter().collect(),
            ..SearchDebugInfo::default()
        };

        if let Err(e) = self.fill_debug_info(&mut info) {
            info.error = Some(e.to_string());
        }
        info
    }

    fn fill_debug_info(&self, info: &mut SearchDebugInfo) -> StorageResult<()> {
        info.tables = list_tables(self.storage.conn())?;
        if info.tables.iter().any(|t| t == "faculties") {
            info.faculty_count = self.storage.count_faculties()?;
            info.sample_faculties = self
                .storage
                .list_faculties(Some(SAMPLE_FACULTIES), 0)?
                .into_iter()
                .map(|f| (f.id, f.name))
                .collect();
        }
        if info.tables.iter().any(|t| t == "search_index") {
            info.index_row_count = self.storage.count_index_rows()?;
        }
        Ok(())
    }
}

fn or_conditions(count: usize, condition: &str) -> String {
    vec![condition; count].join(" OR ")
}
