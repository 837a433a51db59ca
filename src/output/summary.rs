//! Crawl summaries
//!
//! A [`CrawlSummary`] is built either from a live [`CrawlReport`] (with the
//! stage histogram of the visit history) or from what the database holds about
//! the latest run.

use crate::crawler::{missing_faculties, CrawlReport, TerminationReason};
use crate::faculty::format_path;
use crate::output::{OutputError, OutputResult};
use crate::storage::{CrawlRunRecord, RunStatus, Storage};
use std::collections::{BTreeMap, BTreeSet};

/// One discovered faculty as shown in a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyEntry {
    pub name: String,
    pub url: String,
    pub faculty_type: String,
    /// Breadcrumb trail, `A -> B -> C`
    pub path: String,
    pub program_count: usize,
    pub department_count: usize,
}

/// Summary of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub run_id: i64,
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: f64,
    pub status: String,
    /// Only known for live reports
    pub termination: Option<String>,
    pub config_hash: String,

    // Crawl statistics
    pub pages_crawled: u32,
    pub visited_count: Option<usize>,
    pub expected_count: usize,
    /// Visits per stage; empty when rebuilt from the database
    pub stage_histogram: BTreeMap<String, usize>,

    // Results
    pub faculties: Vec<FacultyEntry>,
    pub missing_faculties: Vec<String>,
}

impl CrawlSummary {
    /// Builds a summary from a finished crawl and its recorded run
    pub fn from_report(
        report: &CrawlReport,
        run: &CrawlRunRecord,
        expected: &BTreeSet<String>,
    ) -> Self {
        let faculties = report
            .faculties
            .iter()
            .map(|faculty| FacultyEntry {
                name: faculty.name.clone(),
                url: faculty.url.clone(),
                faculty_type: faculty.faculty_type.to_db_string().to_string(),
                path: format_path(&faculty.navigation_path),
                program_count: faculty.programs.len(),
                department_count: faculty.departments.len(),
            })
            .collect();

        let stage_histogram = report
            .stage_histogram()
            .into_iter()
            .map(|(stage, count)| (stage.to_string(), count))
            .collect();

        Self {
            termination: Some(report.termination.to_string()),
            visited_count: Some(report.visited_count),
            stage_histogram,
            faculties,
            missing_faculties: report.missing_faculties(expected),
            ..Self::from_run(run, expected.len())
        }
    }

    /// Rebuilds the summary of the latest recorded run from the database
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Summary of the latest run
    /// * `Err(OutputError::NoRuns)` - No crawl has been recorded yet
    pub fn from_storage(storage: &dyn Storage, expected: &BTreeSet<String>) -> OutputResult<Self> {
        let run = storage.latest_crawl_run()?.ok_or(OutputError::NoRuns)?;

        let mut faculties = Vec::new();
        for listed in storage.list_faculties(None, 0)? {
            let Some(stored) = storage.get_faculty(listed.id)? else {
                continue;
            };
            let path = stored
                .route
                .iter()
                .map(|step| step.name.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            faculties.push(FacultyEntry {
                name: stored.name,
                url: stored.url,
                faculty_type: stored.faculty_type,
                path,
                program_count: stored.programs.len(),
                department_count: stored.departments.len(),
            });
        }

        let names: Vec<&str> = faculties.iter().map(|f| f.name.as_str()).collect();
        let missing = missing_faculties(&names, expected);

        Ok(Self {
            faculties,
            missing_faculties: missing,
            ..Self::from_run(&run, expected.len())
        })
    }

    fn from_run(run: &CrawlRunRecord, expected_count: usize) -> Self {
        Self {
            run_id: run.id,
            base_url: run.base_url.clone(),
            started_at: run.started_at.clone(),
            finished_at: run.finished_at.clone(),
            duration_seconds: run.duration_secs,
            status: run.status.to_db_string().to_string(),
            config_hash: run.config_hash.clone(),
            pages_crawled: run.pages_crawled,
            expected_count,
            ..Self::default()
        }
    }

    /// Share of expected faculties that were found, in percent
    pub fn coverage(&self) -> f64 {
        if self.expected_count == 0 {
            return 0.0;
        }
        let found = self.expected_count - self.missing_faculties.len().min(self.expected_count);
        (found as f64 / self.expected_count as f64) * 100.0
    }
}

/// Status recorded for a finished crawl
pub fn run_status_for(report: &CrawlReport) -> RunStatus {
    if report.termination == TerminationReason::AllFacultiesFound {
        RunStatus::Completed
    } else if report.faculties.is_empty() {
        RunStatus::Failed
    } else {
        RunStatus::Partial
    }
}
