//! Mutable state of one crawl
//!
//! The engine owns a single `CrawlState` for the duration of a crawl; nothing
//! in it outlives the crawl or is shared between crawls.

use crate::faculty::{Faculty, NavigationStep};
use crate::url::NavigationStage;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// A page waiting in the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPage {
    /// URL to fetch, exactly as resolved from the referring page
    pub url: String,
    pub depth: u32,
    pub stage: NavigationStage,
    /// Breadcrumb trail ending at this page
    pub path: Vec<NavigationStep>,
}

impl QueuedPage {
    /// Builds the seed entry for a crawl
    pub fn seed(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            path: vec![NavigationStep::new(
                SEED_STEP_NAME,
                url.clone(),
                NavigationStage::Homepage,
            )],
            url,
            depth: 0,
            stage: NavigationStage::Homepage,
        }
    }

    /// Builds the entry for a link followed from this page
    pub fn child(&self, url: String, link_text: &str, stage: NavigationStage) -> Self {
        let mut path = self.path.clone();
        path.push(NavigationStep::new(link_text, url.clone(), stage));
        Self {
            url,
            depth: self.depth + 1,
            stage,
            path,
        }
    }
}

/// Breadcrumb label of the entry page
pub const SEED_STEP_NAME: &str = "Beranda";

/// One visited queue entry, logged for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub depth: u32,
    pub stage: NavigationStage,
    /// Queue length right after the entry was popped
    pub queue_size: usize,
    /// Visited-set size including this entry
    pub visited_count: usize,
}

/// Visited set, FIFO queue, discovered faculties and visit history
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: HashSet<String>,
    queue: VecDeque<QueuedPage>,
    discovered: Vec<Faculty>,
    discovered_names: HashSet<String>,
    history: Vec<HistoryEntry>,
}

impl CrawlState {
    /// Creates a state whose queue holds only the seed
    pub fn new(seed: QueuedPage) -> Self {
        let mut state = Self::default();
        state.queue.push_back(seed);
        state
    }

    /// Pops the next queued page
    pub fn pop(&mut self) -> Option<QueuedPage> {
        self.queue.pop_front()
    }

    /// Appends a page to the back of the queue
    pub fn push(&mut self, page: QueuedPage) {
        self.queue.push_back(page);
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Marks a key visited; returns false if it already was
    pub fn mark_visited(&mut self, key: String) -> bool {
        self.visited.insert(key)
    }

    /// The visited keys
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Logs a visit of the given page
    pub fn record_visit(&mut self, page: &QueuedPage) {
        self.history.push(HistoryEntry {
            url: page.url.clone(),
            depth: page.depth,
            stage: page.stage,
            queue_size: self.queue.len(),
            visited_count: self.visited.len(),
        });
    }

    /// Records a faculty unless one with the same name is already known
    ///
    /// Returns false for duplicates; the earlier record is kept unchanged.
    pub fn add_faculty(&mut self, faculty: Faculty) -> bool {
        if !self.discovered_names.insert(faculty.name.clone()) {
            return false;
        }
        self.discovered.push(faculty);
        true
    }

    pub fn discovered(&self) -> &[Faculty] {
        &self.discovered
    }

    /// Returns true if every expected name has been discovered (exact match)
    pub fn has_discovered_all(&self, expected: &BTreeSet<String>) -> bool {
        expected.iter().all(|name| self.discovered_names.contains(name))
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Consumes the state, returning the discovered faculties and the history
    pub fn into_results(self) -> (Vec<Faculty>, Vec<HistoryEntry>) {
        (self.discovered, self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faculty::Contact;

    fn faculty(name: &str, url: &str) -> Faculty {
        Faculty {
            url: url.to_string(),
            name: name.to_string(),
            description: String::new(),
            programs: vec![],
            departments: vec![],
            contact: Contact::default(),
            navigation_path: vec![],
            faculty_type: NavigationStage::SpecificFaculty,
            discovery_stage: NavigationStage::SpecificFaculty,
        }
    }

    #[test]
    fn test_queue_is_fifo() {
        let seed = QueuedPage::seed("https://www.ui.ac.id/");
        let mut state = CrawlState::new(seed.clone());
        let a = seed.child("https://www.ui.ac.id/a/".into(), "A", NavigationStage::Other);
        let b = seed.child("https://www.ui.ac.id/b/".into(), "B", NavigationStage::Other);
        state.push(a.clone());
        state.push(b.clone());

        assert_eq!(state.pop(), Some(seed));
        assert_eq!(state.pop(), Some(a));
        assert_eq!(state.pop(), Some(b));
        assert_eq!(state.pop(), None);
    }

    #[test]
    fn test_child_extends_path() {
        let seed = QueuedPage::seed("https://www.ui.ac.id/");
        let child = seed.child(
            "https://www.ui.ac.id/akademik/".into(),
            "Akademik",
            NavigationStage::Akademik,
        );
        assert_eq!(child.depth, 1);
        assert_eq!(child.path.len(), 2);
        assert_eq!(child.path[0].name, SEED_STEP_NAME);
        assert_eq!(child.path[1].name, "Akademik");
        assert_eq!(seed.path.len(), 1);
    }

    #[test]
    fn test_mark_visited_once() {
        let mut state = CrawlState::default();
        assert!(state.mark_visited("https://ui.ac.id/".into()));
        assert!(!state.mark_visited("https://ui.ac.id/".into()));
        assert!(state.is_visited("https://ui.ac.id/"));
        assert_eq!(state.visited_count(), 1);
    }

    #[test]
    fn test_duplicate_names_are_dropped() {
        let mut state = CrawlState::default();
        assert!(state.add_faculty(faculty("Fakultas Teknik", "https://eng.ui.ac.id/")));
        assert!(!state.add_faculty(faculty("Fakultas Teknik", "https://ft.ui.ac.id/")));
        assert_eq!(state.discovered().len(), 1);
        assert_eq!(state.discovered()[0].url, "https://eng.ui.ac.id/");
    }

    #[test]
    fn test_has_discovered_all_is_exact() {
        let mut state = CrawlState::default();
        let expected: BTreeSet<String> = ["Fakultas Teknik", "Fakultas Hukum"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        state.add_faculty(faculty("Fakultas Teknik", "https://eng.ui.ac.id/"));
        state.add_faculty(faculty("Fakultas Hukum UI", "https://law.ui.ac.id/"));
        assert!(!state.has_discovered_all(&expected));

        state.add_faculty(faculty("Fakultas Hukum", "https://www.ui.ac.id/hukum/"));
        assert!(state.has_discovered_all(&expected));
    }

    #[test]
    fn test_record_visit_snapshots_sizes() {
        let seed = QueuedPage::seed("https://www.ui.ac.id/");
        let mut state = CrawlState::new(seed);
        let page = state.pop().unwrap();
        state.mark_visited(page.url.clone());
        state.record_visit(&page);

        let entry = &state.history()[0];
        assert_eq!(entry.queue_size, 0);
        assert_eq!(entry.visited_count, 1);
        assert_eq!(entry.stage, NavigationStage::Homepage);
    }
}
