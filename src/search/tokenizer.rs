//! Query preprocessing and index keyword extraction
//!
//! Two related normalisations live here:
//! - [`preprocess`] turns a user query into the term set the ranker matches,
//!   expanding synonyms additively
//! - [`extract_keywords`] turns stored text into index keywords, expanding
//!   faculty abbreviations and appending bigrams

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Words dropped from user queries
pub const QUERY_STOPWORDS: &[&str] = &[
    "dan", "atau", "yang", "dari", "di", "ke", "pada", "untuk", "dengan", "adalah", "ini", "itu",
    "akan", "ada", "dapat", "hanya", "juga", "tidak", "sudah", "telah", "bisa", "saya", "kami",
    "kita", "mereka", "the", "and", "for", "with", "are", "was", "were", "have", "has", "had",
    "does", "did", "will", "would", "you", "your", "this", "that", "from", "not", "but",
];

/// Words never stored as index keywords
pub const INDEX_STOPWORDS: &[&str] = &[
    "dan", "atau", "yang", "dari", "di", "ke", "pada", "untuk", "dengan", "adalah", "ini", "itu",
    "akan", "dapat", "telah", "sudah", "oleh", "dalam", "sebagai", "menjadi", "karena", "jika",
    "saat", "ketika", "dimana", "bagian", "bagaimana", "mengapa", "siapa", "kapan", "sebuah",
    "suatu", "satu", "dua", "tiga", "empat", "lima", "the", "a", "an", "and", "or", "but", "in",
    "on", "at", "to", "for", "of", "with", "by", "is", "are", "was", "were", "be", "have", "has",
    "had", "do", "does", "did", "will", "would", "ada", "tidak", "bisa", "hanya", "juga", "lebih",
    "sama", "lain",
];

/// Query terms and the extra terms each one expands to
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("kedokteran", &["medical", "medicine", "dokter", "medis"]),
    ("teknik", &["engineering", "engineer", "teknologi", "tech"]),
    ("ekonomi", &["economy", "business", "bisnis", "manajemen"]),
    ("hukum", &["law", "legal"]),
    ("ilmu", &["science", "sains"]),
    ("komputer", &["computer", "informatika", "it"]),
    ("sosial", &["social"]),
    ("budaya", &["culture", "cultural"]),
    ("politik", &["political", "politics"]),
    ("matematika", &["math", "mathematics"]),
    ("psikologi", &["psychology", "psych"]),
    ("kesehatan", &["health"]),
    ("gigi", &["dental", "dentistry"]),
    ("keperawatan", &["nursing"]),
    ("vokasi", &["vocational"]),
];

/// Faculty abbreviations expanded before keyword extraction
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("ft", "fakultas teknik"),
    ("fk", "fakultas kedokteran"),
    ("feb", "fakultas ekonomi bisnis"),
    ("fh", "fakultas hukum"),
    ("fisip", "fakultas ilmu sosial politik"),
    ("fib", "fakultas ilmu budaya"),
    ("fpsi", "fakultas psikologi"),
    ("fkg", "fakultas kedokteran gigi"),
    ("fkm", "fakultas kesehatan masyarakat"),
    ("fik", "fakultas ilmu keperawatan"),
    ("mipa", "matematika ilmu pengetahuan alam"),
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word pattern"));

static ABBREVIATION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(short, long)| {
            let pattern = format!(r"\b{}\b", regex::escape(short));
            (
                Regex::new(&pattern).expect("valid abbreviation pattern"),
                *long,
            )
        })
        .collect()
});

/// Normalises a search query into a de-duplicated term set
///
/// Lowercases, strips punctuation, drops stopwords and tokens of two
/// characters or fewer, then adds the synonyms of every remaining term.
///
/// # Example
///
/// ```
/// use ui_faculty_finder::search::preprocess;
///
/// let terms = preprocess("Fakultas Teknik");
/// assert!(terms.contains("teknik"));
/// assert!(terms.contains("engineering"));
/// ```
pub fn preprocess(query: &str) -> BTreeSet<String> {
    let lowered = query.trim().to_lowercase();
    if lowered.is_empty() {
        return BTreeSet::new();
    }

    let cleaned = NON_WORD.replace_all(&lowered, " ");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| !QUERY_STOPWORDS.contains(word) && word.chars().count() > 2)
        .collect();

    let mut terms: BTreeSet<String> = words.iter().map(|word| word.to_string()).collect();
    for word in &words {
        if let Some((_, expansions)) = SYNONYMS.iter().find(|(key, _)| key == word) {
            terms.extend(expansions.iter().map(|term| term.to_string()));
        }
    }
    terms
}

/// Extracts index keywords from stored text
///
/// Unigrams come first in text order, followed by adjacent bigrams;
/// duplicates keep their first position.
pub fn extract_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut expanded = text.to_lowercase();
    for (pattern, replacement) in ABBREVIATION_PATTERNS.iter() {
        expanded = pattern.replace_all(&expanded, *replacement).into_owned();
    }
    let cleaned = NON_WORD.replace_all(&expanded, " ");

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| is_keyword(word))
        .collect();

    let bigrams = words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1]));

    let mut seen = HashSet::new();
    words
        .iter()
        .map(|word| word.to_string())
        .chain(bigrams)
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

fn is_keyword(word: &str) -> bool {
    word.len() >= 2
        && !INDEX_STOPWORDS.contains(&word)
        && word.chars().all(|c| c.is_ascii_alphanumeric())
        && !word.chars().all(|c| c.is_ascii_digit())
}
