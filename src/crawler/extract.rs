//! Faculty attribute extraction
//!
//! Name extraction is an ordered chain of strategies. The host table is
//! authoritative and short-circuits everything else; the remaining
//! strategies yield a raw candidate that is cleaned and re-checked before it
//! is accepted.

use crate::catalog::{canonical_name_for_host, DEPARTMENT_KEYWORDS, IGNORED_EMAIL_FRAGMENTS, PROGRAM_KEYWORDS};
use crate::crawler::parser::PageDocument;
use crate::crawler::scorer::is_generic_term;
use crate::faculty::{Contact, MAX_DEPARTMENTS, MAX_DESCRIPTION_CHARS, MAX_PROGRAMS};
use crate::url::extract_name_from_url;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static TITLE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?i)fakultas\s+([^-|]+)",
        r"(?i)([^-|]*fakultas[^-|]*)",
        r"(?i)(fk|ft|fh|feb|fpsi|fmipa|fkg|fisip|fib|fik|fasilkom|fkm|fvok)\s*[-:]?\s*([^-|]+)",
    ]
    .map(|p| Regex::new(p).expect("static regex is valid"))
});

static LEADING_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(fakultas|faculty|universitas indonesia|ui)\b\s*[-|:]?\s*")
        .expect("static regex is valid")
});

static TRAILING_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[-|:]\s*(universitas indonesia|ui|fakultas|faculty).*$")
        .expect("static regex is valid")
});

static DASH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*.*$").expect("static regex is valid"));

static DETAIL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^detail\s+").expect("static regex is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("static regex is valid")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+62|62|0)[0-9\-\s\(\)]{8,15}").expect("static regex is valid")
});

/// A strategy proposing a raw name candidate
type NameStrategy = fn(&Url, &PageDocument) -> Option<String>;

/// Candidate strategies after the host lookup, in priority order
const NAME_STRATEGIES: &[(&str, NameStrategy)] = &[
    ("title", name_from_title),
    ("heading", name_from_headings),
    ("meta", name_from_meta),
    ("url", name_from_url),
];

/// Extracts the faculty name of a page
///
/// Returns None when no strategy yields a name that survives cleaning and the
/// generic-term check; such a page must not be recorded.
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::crawler::{extract_faculty_name, PageDocument};
/// use url::Url;
///
/// let page = PageDocument::parse("<title>Beranda</title>");
/// let url = Url::parse("https://eng.ui.ac.id/").unwrap();
/// assert_eq!(extract_faculty_name(&url, &page).as_deref(), Some("Fakultas Teknik"));
/// ```
pub fn extract_faculty_name(url: &Url, page: &PageDocument) -> Option<String> {
    if let Some(name) = url.host_str().and_then(canonical_name_for_host) {
        tracing::debug!("Host mapping: {} -> {}", url.host_str().unwrap_or_default(), name);
        return Some(name.to_string());
    }

    let (source, raw) = NAME_STRATEGIES
        .iter()
        .find_map(|(source, strategy)| strategy(url, page).map(|raw| (*source, raw)))?;

    let name = clean_faculty_name(&raw);
    if is_generic_term(&name) {
        tracing::debug!("Rejected generic name '{}' from {}", name, source);
        return None;
    }

    tracing::debug!("Name from {}: {}", source, name);
    Some(name)
}

fn name_from_title(_url: &Url, page: &PageDocument) -> Option<String> {
    let title = page.title.as_deref()?.trim();

    TITLE_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(title)?;
        let candidate = match (caps.get(1), caps.get(2)) {
            (Some(abbrev), Some(rest)) => format!("{} {}", abbrev.as_str(), rest.as_str()),
            (Some(only), None) => only.as_str().to_string(),
            _ => return None,
        };
        let candidate = candidate.trim().to_string();
        (!is_generic_term(&candidate)).then_some(candidate)
    })
}

fn name_from_headings(_url: &Url, page: &PageDocument) -> Option<String> {
    page.headings
        .iter()
        .map(|h| h.text.as_str())
        .find(|text| {
            let lower = text.to_lowercase();
            let len = text.chars().count();
            (lower.contains("fakultas") || lower.contains("faculty"))
                && len > 5
                && len < 150
                && !is_generic_term(text)
        })
        .map(str::to_string)
}

fn name_from_meta(_url: &Url, page: &PageDocument) -> Option<String> {
    page.metas
        .iter()
        .map(|m| m.content.as_str())
        .find(|content| {
            !content.is_empty()
                && content.to_lowercase().contains("fakultas")
                && content.chars().count() < 100
                && !is_generic_term(content)
        })
        .map(str::to_string)
}

fn name_from_url(url: &Url, _page: &PageDocument) -> Option<String> {
    extract_name_from_url(url.as_str()).map(str::to_string)
}

/// Normalizes a raw name candidate
///
/// Strips leading and trailing boilerplate ("Fakultas", "Universitas
/// Indonesia", "UI", "Detail"), drops anything after a dash, collapses
/// whitespace, and prefixes "Fakultas " unless the name already starts with
/// fakultas, sekolah or program.
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::crawler::clean_faculty_name;
///
/// assert_eq!(clean_faculty_name("Fakultas Hukum - Universitas Indonesia"), "Fakultas Hukum");
/// assert_eq!(clean_faculty_name("Detail  Psikologi"), "Fakultas Psikologi");
/// assert_eq!(clean_faculty_name("Sekolah Ilmu Lingkungan"), "Sekolah Ilmu Lingkungan");
/// ```
pub fn clean_faculty_name(name: &str) -> String {
    let name = LEADING_BOILERPLATE.replace(name, "");
    let name = TRAILING_BOILERPLATE.replace(&name, "");
    let name = DASH_SUFFIX.replace(&name, "");
    let name = DETAIL_PREFIX.replace(&name, "");
    let name = WHITESPACE.replace_all(&name, " ");
    let name = name.trim();

    if name.is_empty() || is_generic_term(name) {
        return name.to_string();
    }

    let lower = name.to_lowercase();
    if ["fakultas", "sekolah", "program"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        name.to_string()
    } else {
        format!("Fakultas {}", name)
    }
}

/// Extracts a short description
///
/// Prefers the meta description, else the first paragraph longer than 50
/// characters that is not a copyright line. Longer text is cut so the result,
/// ellipsis included, stays within [`MAX_DESCRIPTION_CHARS`].
pub fn extract_description(page: &PageDocument) -> String {
    let description = page
        .meta_by_name("description")
        .filter(|d| !d.is_empty())
        .or_else(|| {
            page.paragraphs
                .iter()
                .map(String::as_str)
                .find(|p| p.chars().count() > 50 && !p.starts_with("Copyright"))
        })
        .unwrap_or_default();

    truncate_description(description)
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }
    let kept: String = text.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
    format!("{}...", kept)
}

/// Harvests study program names from list items and text lines
pub fn extract_programs(page: &PageDocument) -> Vec<String> {
    let mut programs = Harvest::new(MAX_PROGRAMS);

    let items = page.lists.iter().flat_map(|list| list.items.iter());
    for item in items {
        let len = item.chars().count();
        if len > 10 && len < 150 && mentions_any(item, PROGRAM_KEYWORDS) {
            programs.add(item);
        }
    }

    for line in page.text.lines().map(str::trim) {
        let len = line.chars().count();
        if len > 10 && len < 100 && mentions_any(line, PROGRAM_KEYWORDS) {
            programs.add(line);
        }
    }

    programs.into_vec()
}

/// Harvests department names from text lines
pub fn extract_departments(page: &PageDocument) -> Vec<String> {
    let mut departments = Harvest::new(MAX_DEPARTMENTS);

    for line in page.text.lines().map(str::trim) {
        let len = line.chars().count();
        if len > 10 && len < 80 && mentions_any(line, DEPARTMENT_KEYWORDS) {
            departments.add(line);
        }
    }

    departments.into_vec()
}

/// Extracts the first usable email address and phone number
pub fn extract_contact(page: &PageDocument) -> Contact {
    let email = EMAIL
        .find_iter(&page.text)
        .map(|m| m.as_str())
        .find(|email| {
            let lower = email.to_lowercase();
            !IGNORED_EMAIL_FRAGMENTS.iter().any(|f| lower.contains(f))
        })
        .map(str::to_string);

    let phone = PHONE
        .find(&page.text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty());

    Contact {
        email,
        phone,
        address: None,
    }
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Insertion-ordered, de-duplicated, capped collection
struct Harvest {
    seen: HashSet<String>,
    items: Vec<String>,
    cap: usize,
}

impl Harvest {
    fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
            cap,
        }
    }

    fn add(&mut self, item: &str) {
        if self.items.len() < self.cap && self.seen.insert(item.to_string()) {
            self.items.push(item.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}
