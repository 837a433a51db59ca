//! Integration tests for search
//!
//! Faculties are imported into a database file, then queried through a
//! `SearchEngine` opened on the same file.

use std::path::Path;
use tempfile::TempDir;
use ui_faculty_finder::search::{preprocess, Indexer, SearchEngine, SearchType};
use ui_faculty_finder::storage::{open_storage, Storage};
use ui_faculty_finder::{Contact, Faculty, NavigationStage, NavigationStep};

fn faculty(url: &str, name: &str, programs: &[&str], address: Option<&str>) -> Faculty {
    Faculty {
        url: url.to_string(),
        name: name.to_string(),
        description: format!("{} Universitas Indonesia", name),
        programs: programs.iter().map(|p| p.to_string()).collect(),
        departments: vec![],
        contact: Contact {
            address: address.map(str::to_string),
            ..Contact::default()
        },
        navigation_path: vec![
            NavigationStep::new("Beranda", "https://www.ui.ac.id/", NavigationStage::Homepage),
            NavigationStep::new(name, url, NavigationStage::SpecificFaculty),
        ],
        faculty_type: NavigationStage::SpecificFaculty,
        discovery_stage: NavigationStage::SpecificFaculty,
    }
}

/// Creates a database file holding the given faculties
fn seed_database(faculties: &[Faculty]) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("faculties.db");

    let mut storage = open_storage(&path).unwrap();
    let summary = storage.bulk_import(faculties).unwrap();
    assert_eq!(summary.failed, 0);

    (dir, path)
}

fn open_engine(path: &Path) -> SearchEngine {
    SearchEngine::open(path).unwrap()
}

#[test]
fn test_program_search_finds_computer_science() {
    let (_dir, path) = seed_database(&[
        faculty(
            "https://cs.ui.ac.id/",
            "Fakultas Ilmu Komputer",
            &["Ilmu Komputer", "Sistem Informasi"],
            None,
        ),
        faculty("https://law.ui.ac.id/", "Fakultas Hukum", &["Sarjana Hukum"], None),
    ]);
    let engine = open_engine(&path);

    let results = engine.search("komputer", 10, SearchType::Program);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Fakultas Ilmu Komputer");
    assert_eq!(results[0].score, 85);
    assert_eq!(results[0].programs, vec!["Ilmu Komputer", "Sistem Informasi"]);
    assert_eq!(results[0].route.len(), 2);
}

#[test]
fn test_comprehensive_search_prefers_program_matches() {
    let (_dir, path) = seed_database(&[
        faculty(
            "https://fk.ui.ac.id/",
            "Fakultas Kedokteran",
            &["Pendidikan Dokter"],
            Some("Jl. Salemba Raya"),
        ),
        faculty(
            "https://dent.ui.ac.id/",
            "Fakultas Kedokteran Gigi",
            &["Kelas Salemba"],
            None,
        ),
    ]);
    let engine = open_engine(&path);

    let results = engine.search("salemba", 10, SearchType::Comprehensive);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Fakultas Kedokteran Gigi");
    assert!(results[0].score > results[1].score);
}

#[test]
fn test_search_falls_back_while_index_is_empty() {
    let (_dir, path) = seed_database(&[faculty(
        "https://law.ui.ac.id/",
        "Fakultas Hukum",
        &["Sarjana Hukum"],
        None,
    )]);
    let mut engine = open_engine(&path);
    engine.storage_mut().clear_index().unwrap();

    let results = engine.search("hukum", 10, SearchType::Name);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 50);

    // Rebuilding brings back indexed scoring
    let summary = Indexer::default().rebuild_all(engine.storage_mut()).unwrap();
    assert_eq!(summary.success, 1);
    let results = engine.search("hukum", 10, SearchType::Name);
    assert_eq!(results[0].score, 100);
}

#[test]
fn test_suggestions_merge_faculties_and_programs() {
    let (_dir, path) = seed_database(&[faculty(
        "https://cs.ui.ac.id/",
        "Fakultas Ilmu Komputer",
        &["Ilmu Komputer"],
        None,
    )]);
    let engine = open_engine(&path);

    assert_eq!(
        engine.suggestions("kom", 5),
        vec!["Ilmu Komputer", "Fakultas Ilmu Komputer"]
    );
    assert!(engine.suggestions("k", 5).is_empty());
}

#[test]
fn test_open_missing_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SearchEngine::open(&dir.path().join("absent.db")).is_err());
}

#[test]
fn test_query_expansion_reaches_english_terms() {
    let terms = preprocess("Fakultas dan Teknik");
    assert!(terms.contains("fakultas"));
    assert!(terms.contains("teknik"));
    assert!(terms.contains("engineering"));
    assert!(!terms.contains("dan"));
}
