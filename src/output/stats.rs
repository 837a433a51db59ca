//! Statistics from the faculty database
//!
//! This module gathers faculty, search index and crawl run figures from the
//! storage layer and prints them for the command line.

use crate::output::OutputResult;
use crate::storage::{
    CrawlRunRecord, FacultyStatistics, IndexStatistics, IndexVerification, Storage,
};

/// Everything the `stats` command reports
#[derive(Debug, Clone)]
pub struct DatabaseStatistics {
    pub faculties: FacultyStatistics,
    pub index: IndexStatistics,
    pub verification: IndexVerification,
    /// Most recent crawl, if any was recorded
    pub latest_run: Option<CrawlRunRecord>,
}

impl DatabaseStatistics {
    /// Average number of index rows per faculty
    pub fn rows_per_faculty(&self) -> f64 {
        if self.faculties.total_faculties == 0 {
            return 0.0;
        }
        self.index.total_rows as f64 / self.faculties.total_faculties as f64
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(DatabaseStatistics)` - Successfully loaded statistics
/// * `Err(OutputError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> OutputResult<DatabaseStatistics> {
    Ok(DatabaseStatistics {
        faculties: storage.statistics()?,
        index: storage.index_statistics()?,
        verification: storage.verify_index()?,
        latest_run: storage.latest_crawl_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DatabaseStatistics) {
    println!("=== Faculty Database Statistics ===\n");

    let faculties = &stats.faculties;
    println!("Overview:");
    println!("  Faculties: {}", faculties.total_faculties);
    println!("  Study programs: {}", faculties.total_programs);
    println!("  Departments: {}", faculties.total_departments);
    println!("  With contact details: {}", faculties.faculties_with_contact);
    println!();

    if !faculties.by_type.is_empty() {
        println!("Faculties by Type:");
        for (faculty_type, count) in &faculties.by_type {
            println!("  {}: {}", faculty_type, count);
        }
        println!();
    }

    println!("Search Index:");
    println!(
        "  Entries: {} ({:.1} per faculty)",
        stats.index.total_rows,
        stats.rows_per_faculty()
    );
    for content in &stats.index.by_content_type {
        println!(
            "  {}: {} (avg weight {:.2})",
            content.content_type, content.count, content.avg_weight
        );
    }
    println!();

    if !stats.index.top_keywords.is_empty() {
        println!("Top Keywords:");
        for keyword in &stats.index.top_keywords {
            println!("  {:<30} {:>5}", keyword.keyword, keyword.frequency);
        }
        println!();
    }

    if !stats.index.most_indexed.is_empty() {
        println!("Most Indexed Faculties:");
        for (name, rows) in &stats.index.most_indexed {
            println!("  {}: {}", name, rows);
        }
        println!();
    }

    print_verification(&stats.verification);

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Crawl:");
            println!("  Run #{} ({})", run.id, run.status.to_db_string());
            println!("  Base URL: {}", run.base_url);
            println!("  Finished: {}", run.finished_at);
            println!(
                "  {} faculties from {} pages in {:.1}s",
                run.total_faculties, run.pages_crawled, run.duration_secs
            );
        }
        None => println!("No crawl has been recorded yet."),
    }
}

/// Prints the result of an index health check
pub fn print_verification(verification: &IndexVerification) {
    println!("Index Verification:");
    println!("  Total entries: {}", verification.total_rows);
    println!("  Unindexed faculties: {}", verification.unindexed_faculties);
    println!("  Entries without keywords: {}", verification.empty_keywords);
    for (content_type, count) in &verification.by_content_type {
        println!("  {}: {}", content_type, count);
    }
    if verification.is_healthy() {
        println!("  Status: healthy");
    } else {
        println!("  Status: needs rebuild");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faculty::{Contact, Faculty};
    use crate::storage::SqliteStorage;
    use crate::url::NavigationStage;

    #[test]
    fn test_load_statistics() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_faculty(&Faculty {
                url: "https://ff.ui.ac.id/".to_string(),
                name: "Fakultas Farmasi".to_string(),
                description: "Pendidikan farmasi".to_string(),
                programs: vec!["Sarjana Farmasi".to_string(), "Profesi Apoteker".to_string()],
                departments: vec![],
                contact: Contact::default(),
                navigation_path: vec![],
                faculty_type: NavigationStage::SpecificFaculty,
                discovery_stage: NavigationStage::SpecificFaculty,
            })
            .unwrap();

        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.faculties.total_faculties, 1);
        assert_eq!(stats.faculties.total_programs, 2);
        assert!(stats.index.total_rows > 0);
        assert!(stats.verification.is_healthy());
        assert!(stats.latest_run.is_none());
        assert_eq!(stats.rows_per_faculty(), stats.index.total_rows as f64);
    }

    #[test]
    fn test_rows_per_faculty_empty() {
        let stats = DatabaseStatistics {
            faculties: FacultyStatistics::default(),
            index: IndexStatistics::default(),
            verification: IndexVerification::default(),
            latest_run: None,
        };
        assert_eq!(stats.rows_per_faculty(), 0.0);
    }
}
