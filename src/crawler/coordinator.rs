//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, which:
//! - Pops `(url, depth, stage)` entries from a FIFO queue seeded with the homepage
//! - Fetches each page once and judges whether it is a faculty page
//! - Records newly named faculties and stops as soon as the expected set is complete
//! - Enqueues the best-ranked links of each page, capped per stage
//! - Pauses between fetches to stay polite toward the site

use crate::catalog::expected_faculty_set;
use crate::config::CrawlerConfig;
use crate::crawler::extract::{
    extract_contact, extract_departments, extract_description, extract_faculty_name,
    extract_programs,
};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::PageDocument;
use crate::crawler::prioritizer::{rank_links, visit_key};
use crate::crawler::scorer::assess_page;
use crate::faculty::{format_path, Faculty};
use crate::state::{CrawlState, HistoryEntry, QueuedPage};
use crate::url::{detect_navigation_stage, NavigationStage};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// Parameters of one crawl
#[derive(Debug, Clone)]
pub struct CrawlerOptions {
    /// Entry page, queued as the homepage
    pub base_url: String,
    /// Entries deeper than this are skipped; pages at this depth are not expanded
    pub max_depth: u32,
    /// Budget of successfully fetched pages
    pub max_pages: u32,
    /// Pause after each fetch attempt
    pub delay: Duration,
    /// Names whose discovery ends the crawl early
    pub expected_faculties: BTreeSet<String>,
}

impl CrawlerOptions {
    /// Builds options from the crawler section of the configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            delay: config.delay(),
            expected_faculties: expected_faculty_set(),
        }
    }
}

impl Default for CrawlerOptions {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Nothing left to visit
    QueueExhausted,
    /// `max_pages` pages were fetched
    PageBudget,
    /// Every expected faculty was found
    AllFacultiesFound,
}

impl TerminationReason {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::QueueExhausted => "queue_exhausted",
            Self::PageBudget => "page_budget",
            Self::AllFacultiesFound => "all_faculties_found",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Result of a crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Discovered faculties in discovery order
    pub faculties: Vec<Faculty>,
    /// Pages fetched successfully
    pub pages_crawled: u32,
    /// Distinct URLs visited, failed fetches included
    pub visited_count: usize,
    pub termination: TerminationReason,
    pub history: Vec<HistoryEntry>,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of visited entries per stage
    pub fn stage_histogram(&self) -> BTreeMap<NavigationStage, usize> {
        let mut histogram = BTreeMap::new();
        for entry in &self.history {
            *histogram.entry(entry.stage).or_insert(0) += 1;
        }
        histogram
    }

    /// Expected names with no loosely matching discovered name
    pub fn missing_faculties(&self, expected: &BTreeSet<String>) -> Vec<String> {
        let found: Vec<&str> = self.faculties.iter().map(|f| f.name.as_str()).collect();
        missing_faculties(&found, expected)
    }
}

/// Lists the expected names that no found name matches
///
/// Matching is case-insensitive and accepts containment in either direction,
/// so "Fakultas Hukum UI" accounts for "Fakultas Hukum". The crawl's own
/// termination check stays exact.
pub fn missing_faculties(found: &[&str], expected: &BTreeSet<String>) -> Vec<String> {
    let found: Vec<String> = found.iter().map(|name| name.to_lowercase()).collect();
    expected
        .iter()
        .filter(|name| {
            let name = name.to_lowercase();
            !found
                .iter()
                .any(|f| f.contains(name.as_str()) || name.contains(f.as_str()))
        })
        .cloned()
        .collect()
}

/// Breadth-first, stage-aware faculty crawler
pub struct Crawler<F: PageFetcher> {
    fetcher: F,
    options: CrawlerOptions,
}

impl<F: PageFetcher> Crawler<F> {
    /// Creates a crawler over the given fetch primitive
    pub fn new(fetcher: F, options: CrawlerOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &CrawlerOptions {
        &self.options
    }

    /// Runs one crawl to completion
    ///
    /// Every crawl starts from fresh state, so a crawler can be run repeatedly.
    /// Fetch failures are logged and skipped; the crawl itself never fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use ui_faculty_finder::config::UserAgentConfig;
    /// use ui_faculty_finder::crawler::{Crawler, CrawlerOptions, HttpFetcher};
    ///
    /// # async fn example(user_agent: UserAgentConfig) -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = HttpFetcher::new(&user_agent, Duration::from_secs(15))?;
    /// let crawler = Crawler::new(fetcher, CrawlerOptions::default());
    /// let report = crawler.run().await;
    /// println!("{} faculties found", report.faculties.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self) -> CrawlReport {
        let options = &self.options;
        let start_time = Instant::now();
        let mut state = CrawlState::new(QueuedPage::seed(options.base_url.clone()));
        let mut pages_crawled: u32 = 0;

        tracing::info!(
            "Starting crawl from {} (max_depth={}, max_pages={}, delay={:?})",
            options.base_url,
            options.max_depth,
            options.max_pages,
            options.delay
        );
        tracing::info!(
            "Target: {} expected faculties",
            options.expected_faculties.len()
        );

        let termination = loop {
            if pages_crawled >= options.max_pages {
                break TerminationReason::PageBudget;
            }

            let Some(page) = state.pop() else {
                break TerminationReason::QueueExhausted;
            };

            if page.depth > options.max_depth || !state.mark_visited(visit_key(&page.url)) {
                continue;
            }
            state.record_visit(&page);

            let url = match Url::parse(&page.url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping unparseable URL {}: {}", page.url, e);
                    continue;
                }
            };

            tracing::info!("[{}] depth {}: {}", page.stage, page.depth, page.url);

            let body = match self.fetcher.fetch(&page.url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Fetch failed ({}) for {}: {}", e.kind(), page.url, e);
                    self.pause().await;
                    continue;
                }
            };
            pages_crawled += 1;

            if self.process_page(&page, &url, &body, &mut state) {
                tracing::info!(
                    "All {} expected faculties found, halting crawl",
                    options.expected_faculties.len()
                );
                break TerminationReason::AllFacultiesFound;
            }

            self.pause().await;
        };

        let visited_count = state.visited_count();
        let (faculties, history) = state.into_results();
        let elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl finished ({}): {} faculties, {} pages crawled, {} URLs visited in {:?}",
            termination,
            faculties.len(),
            pages_crawled,
            visited_count,
            elapsed
        );

        let report = CrawlReport {
            faculties,
            pages_crawled,
            visited_count,
            termination,
            history,
            elapsed,
        };

        let missing = report.missing_faculties(&options.expected_faculties);
        if !missing.is_empty() {
            tracing::warn!("Still missing {} faculties: {:?}", missing.len(), missing);
        } else if report.faculties.len() >= options.expected_faculties.len() {
            tracing::info!(
                "All {} expected faculties were found",
                options.expected_faculties.len()
            );
        }

        report
    }

    /// Judges a fetched page and queues its links
    ///
    /// Returns true when the expected faculty set has just been completed.
    fn process_page(
        &self,
        page: &QueuedPage,
        url: &Url,
        body: &str,
        state: &mut CrawlState,
    ) -> bool {
        let document = PageDocument::parse(body);
        let assessment = assess_page(url, &document);
        tracing::debug!(
            "Assessed {}: score={} excluded={:?}",
            page.url,
            assessment.score,
            assessment.excluded
        );

        if assessment.is_faculty {
            match build_faculty(page, url, &document) {
                Some(faculty) => {
                    let name = faculty.name.clone();
                    let trail = format_path(&faculty.navigation_path);
                    let programs = faculty.programs.len();
                    let has_contact = !faculty.contact.is_empty();

                    if state.add_faculty(faculty) {
                        tracing::info!("Found faculty: {}", name);
                        tracing::info!("  Discovery path: {}", trail);
                        tracing::info!("  Programs: {}, contact: {}", programs, has_contact);
                        tracing::info!(
                            "  Progress: {}/{}",
                            state.discovered().len(),
                            self.options.expected_faculties.len()
                        );
                        if state.has_discovered_all(&self.options.expected_faculties) {
                            return true;
                        }
                    } else {
                        tracing::info!("Duplicate faculty skipped: {} ({})", name, page.url);
                    }
                }
                None => tracing::warn!("Could not extract a faculty name from {}", page.url),
            }
        }

        if page.depth < self.options.max_depth {
            enqueue_links(page, url, &document, state);
        }

        false
    }

    async fn pause(&self) {
        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }
    }
}

/// Builds the faculty record of a page, or None when no name is derivable
fn build_faculty(page: &QueuedPage, url: &Url, document: &PageDocument) -> Option<Faculty> {
    let name = extract_faculty_name(url, document)?;
    let stage = detect_navigation_stage(&page.url);

    Some(Faculty {
        url: page.url.clone(),
        name,
        description: extract_description(document),
        programs: extract_programs(document),
        departments: extract_departments(document),
        contact: extract_contact(document),
        navigation_path: page.path.clone(),
        faculty_type: stage,
        discovery_stage: stage,
    })
}

/// Queues the best-ranked unvisited links of a page, up to the stage's cap
fn enqueue_links(page: &QueuedPage, url: &Url, document: &PageDocument, state: &mut CrawlState) {
    let ranked = rank_links(document, url, page.stage, state.visited());
    let cap = page.stage.link_cap();
    let mut in_batch = HashSet::new();
    let mut added = 0;

    for candidate in ranked {
        if added >= cap {
            break;
        }
        let key = visit_key(&candidate.url);
        if state.is_visited(&key) || !in_batch.insert(key) {
            continue;
        }

        let label = if candidate.text.is_empty() {
            candidate.url.clone()
        } else {
            candidate.text.clone()
        };
        state.push(page.child(candidate.url, &label, candidate.stage));
        added += 1;
    }

    tracing::debug!(
        "Queued {} links from {} (cap {}, queue size {})",
        added,
        page.url,
        cap,
        state.queue_len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages and records every request
    struct MapFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }

    fn options(max_depth: u32, max_pages: u32) -> CrawlerOptions {
        CrawlerOptions {
            base_url: "https://www.ui.ac.id/".to_string(),
            max_depth,
            max_pages,
            delay: Duration::ZERO,
            expected_faculties: expected_faculty_set(),
        }
    }

    #[test]
    fn test_options_from_config() {
        let options = CrawlerOptions::from_config(&CrawlerConfig::default());
        assert_eq!(options.max_depth, 6);
        assert_eq!(options.max_pages, 300);
        assert_eq!(options.delay, Duration::from_millis(1000));
        assert_eq!(options.expected_faculties.len(), 17);
    }

    #[tokio::test]
    async fn test_failed_fetches_do_not_count_toward_budget() {
        let fetcher = MapFetcher::new(&[(
            "https://www.ui.ac.id/",
            r#"<a href="/akademik/">Akademik</a><a href="/akademik/riset/">Riset Akademik</a>"#,
        )]);
        let crawler = Crawler::new(fetcher, options(3, 10));
        let report = crawler.run().await;

        assert_eq!(report.termination, TerminationReason::QueueExhausted);
        assert_eq!(report.pages_crawled, 1);
        assert_eq!(report.visited_count, 3);
        assert_eq!(report.history.len(), 3);
        assert!(report.faculties.is_empty());
    }

    #[tokio::test]
    async fn test_page_budget_stops_crawl() {
        let fetcher = MapFetcher::new(&[
            ("https://www.ui.ac.id/", r#"<a href="/akademik/">Akademik</a>"#),
            ("https://www.ui.ac.id/akademik/", r#"<a href="/akademik/fakultas/">Fakultas</a>"#),
        ]);
        let crawler = Crawler::new(fetcher, options(5, 1));
        let report = crawler.run().await;

        assert_eq!(report.termination, TerminationReason::PageBudget);
        assert_eq!(report.pages_crawled, 1);
        let requests = crawler.fetcher.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), ["https://www.ui.ac.id/"]);
    }

    #[tokio::test]
    async fn test_depth_limit_is_respected() {
        let fetcher = MapFetcher::new(&[
            ("https://www.ui.ac.id/", r#"<a href="/akademik/">Akademik</a>"#),
            ("https://www.ui.ac.id/akademik/", r#"<a href="/akademik/fakultas/">Fakultas</a>"#),
        ]);
        let crawler = Crawler::new(fetcher, options(1, 10));
        let report = crawler.run().await;

        assert_eq!(report.pages_crawled, 2);
        let requests = crawler.fetcher.requests.lock().unwrap();
        assert!(!requests.contains(&"https://www.ui.ac.id/akademik/fakultas/".to_string()));
    }

    #[tokio::test]
    async fn test_equivalent_urls_are_visited_once() {
        let fetcher = MapFetcher::new(&[(
            "https://www.ui.ac.id/",
            r#"
                <a href="/akademik/">Akademik</a>
                <a href="/akademik/#top">Akademik</a>
                <a href="http://www.ui.ac.id/akademik">Akademik</a>
            "#,
        )]);
        let crawler = Crawler::new(fetcher, options(3, 10));
        let report = crawler.run().await;

        assert_eq!(report.visited_count, 2);
        let requests = crawler.fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn test_faculty_gets_breadcrumb_path() {
        let fetcher = MapFetcher::new(&[
            ("https://www.ui.ac.id/", r#"<a href="/akademik/">Akademik</a>"#),
            (
                "https://www.ui.ac.id/akademik/",
                r#"<a href="https://cs.ui.ac.id/">Fakultas Ilmu Komputer</a>"#,
            ),
            ("https://cs.ui.ac.id/", "<title>Fasilkom UI</title><p>Program studi</p>"),
        ]);
        let crawler = Crawler::new(fetcher, options(4, 10));
        let report = crawler.run().await;

        assert_eq!(report.faculties.len(), 1);
        let faculty = &report.faculties[0];
        assert_eq!(faculty.name, "Fakultas Ilmu Komputer");
        assert_eq!(faculty.discovery_stage, NavigationStage::SpecificFaculty);
        let trail: Vec<&str> = faculty.navigation_path.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(trail, ["Beranda", "Akademik", "Fakultas Ilmu Komputer"]);
    }

    #[tokio::test]
    async fn test_stage_histogram_counts_visits() {
        let fetcher = MapFetcher::new(&[(
            "https://www.ui.ac.id/",
            r#"<a href="/akademik/">Akademik</a><a href="/akademik/fakultas/">Fakultas</a>"#,
        )]);
        let crawler = Crawler::new(fetcher, options(3, 10));
        let report = crawler.run().await;

        let histogram = report.stage_histogram();
        assert_eq!(histogram.get(&NavigationStage::Homepage), Some(&1));
        assert_eq!(histogram.get(&NavigationStage::Akademik), Some(&1));
        assert_eq!(histogram.get(&NavigationStage::FakultasList), Some(&1));
    }

    #[test]
    fn test_missing_faculties_match_loosely() {
        let expected: BTreeSet<String> = ["Fakultas Hukum", "Fakultas Teknik", "Fakultas Farmasi"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing = missing_faculties(&["fakultas hukum UI", "Teknik"], &expected);
        assert_eq!(missing, vec!["Fakultas Farmasi"]);
        assert_eq!(missing_faculties(&[], &expected).len(), 3);
    }
}
