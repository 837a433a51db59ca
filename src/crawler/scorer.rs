//! Faculty page recognition
//!
//! A page is judged in two phases. The exclusion phase rejects listing,
//! leadership and staff pages outright. The scoring phase sums independent
//! signals and compares the total against a threshold that depends on where
//! the page lives (root of a faculty site, elsewhere on a faculty site, or the
//! main site).

use crate::catalog::{
    DETAIL_PAGE_FACULTY_KEYWORDS, EXPECTED_FACULTIES, FACULTY_CONTENT_INDICATORS, GENERIC_TERMS,
    HIERARCHY_INDICATORS, LEADERSHIP_KEYWORDS, LOW_VALUE_TITLES, PROGRAM_LEVEL_KEYWORDS,
    PROGRAM_LIST_KEYWORDS, SITE_NAME_KEYWORDS,
};
use crate::crawler::parser::PageDocument;
use crate::url::{is_known_faculty_root, on_known_faculty_host};
use regex::{Regex, RegexSet};
use std::sync::LazyLock;
use url::Url;

/// Score needed at the bare root of a known faculty site
pub const ROOT_THRESHOLD: i32 = 60;

/// Score needed elsewhere on a known faculty site
pub const SUBDOMAIN_THRESHOLD: i32 = 55;

/// Score needed on any other host
pub const GENERAL_THRESHOLD: i32 = 35;

/// Pages scoring at least this much are never flipped by the low-value title check
const LOW_VALUE_OVERRIDE_CEILING: i32 = 70;

static LISTING_URLS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([r"/akademik/fakultas/?$", r"/fakultas/?$"]).expect("static regex is valid")
});

static GENERIC_TITLES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^fakultas\s*-\s*universitas\s*indonesia\s*$",
        r"^fakultas\s*ui\s*$",
        r"^daftar\s*fakultas",
        r"^fakultas\s*$",
        r"^academic\s*-\s*universitas\s*indonesia\s*$",
        r"^academic\s*-\s*ui\s*$",
        r"^akademik\s*-\s*universitas\s*indonesia\s*$",
        r"^akademik\s*ui\s*$",
        r"^detail\s*fakultas\s*$",
    ])
    .expect("static regex is valid")
});

static LEADERSHIP_URLS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"/(dekan|profil-dekan|sambutan-dekan)($|/|_)",
        r"/(pimpinan|struktur-pimpinan|profil-pimpinan|manajemen)($|/|_)",
        r"/staff($|/|[-_])(dosen|akademik|pengajar|list|direktori)?",
        r"/dosen($|/|[-_])(profil|list|daftar)?",
        r"/profil[-_](dosen|staf|pegawai)($|/)",
        r"/direktori[-_](dosen|staf|pegawai)($|/)",
        r"/guru-besar($|/)",
    ])
    .expect("static regex is valid")
});

static SPECIFIC_FACULTY_URLS: LazyLock<RegexSet> = LazyLock::new(|| {
    let hosts = [
        "fk.ui.ac.id", "ft.ui.ac.id", "eng.ui.ac.id", "fh.ui.ac.id", "feb.ui.ac.id",
        "psy.ui.ac.id", "sci.ui.ac.id", "fmipa.ui.ac.id", "dent.ui.ac.id", "fkg.ui.ac.id",
        "fisip.ui.ac.id", "fib.ui.ac.id", "nursing.ui.ac.id", "fik.ui.ac.id", "cs.ui.ac.id",
        "fasilkom.ui.ac.id", "pubhealth.ui.ac.id", "fkm.ui.ac.id", "adm.ui.ac.id",
        "fia.ui.ac.id", "pharmacy.ui.ac.id", "sil.ui.ac.id", "sksg.ui.ac.id",
        "vokasi.ui.ac.id", "fvok.ui.ac.id",
    ];
    let paths = [
        r"/fakultas[/-](kedokteran|teknik|hukum|ekonomi|psikologi|matematika|farmasi|administrasi|budaya|keperawatan|komputer|kesehatan|sosial|gigi)",
        r"/(fk|kedokteran)/",
        r"/(ft|teknik|engineering)/",
        r"/(fh|hukum|law)/",
        r"/(feb|ekonomi)/",
        r"/(fpsi|psikologi)/",
        r"/(fmipa|sci|matematika)/",
        r"/(ff|farmasi|pharmacy)/",
        r"/(fia|adm|administrasi)/",
        r"/(fib|budaya)/",
        r"/(fik|nursing|keperawatan)/",
        r"/(fasilkom|cs|komputer)/",
        r"/(fkm|pubhealth|kesehatan)/",
        r"/(fisip|sosial|politik)/",
        r"/(fkg|dent|gigi)/",
        r"/(vokasi|fvok|vocational|diploma)/",
        r"/(sil|lingkungan|environment)/",
        r"/(sksg|kajian|stratejik|strategic|global)/",
        r"/program.*vokasi",
        r"/pendidikan.*vokasi",
        r"/sekolah.*lingkungan",
        r"/sekolah.*kajian",
        r"/kajian.*stratejik",
        r"/stratejik.*global",
    ];
    let patterns = hosts
        .iter()
        .map(|host| regex::escape(host))
        .chain(paths.iter().map(|p| p.to_string()));
    RegexSet::new(patterns).expect("static regex is valid")
});

static FACULTY_SECTION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(faculty|fakultas|academic|dean|sekolah|program|departemen|department)")
        .expect("static regex is valid")
});

/// Why a page was rejected before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    ListingUrl,
    GenericTitle,
    LeadershipUrl,
    LeadershipHeading,
    BareDetailPage,
}

/// Outcome of judging one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAssessment {
    pub score: i32,
    pub excluded: Option<Exclusion>,
    pub is_faculty: bool,
}

/// Where the page lives, which selects the acceptance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    FacultyRoot,
    FacultySite,
    General,
}

impl Placement {
    fn of(url: &Url) -> Self {
        if is_known_faculty_root(url) {
            Self::FacultyRoot
        } else if on_known_faculty_host(url) {
            Self::FacultySite
        } else {
            Self::General
        }
    }
}

/// Returns true if the text is boilerplate that never names a faculty
///
/// Empty text, text outside 3..=200 characters, and text that equals a
/// generic phrase (or starts with `"<phrase> -"` / ends with `"- <phrase>"`)
/// are all generic.
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::crawler::is_generic_term;
///
/// assert!(is_generic_term("Fakultas"));
/// assert!(is_generic_term("Daftar Fakultas"));
/// assert!(is_generic_term(""));
/// assert!(!is_generic_term("Fakultas Ilmu Komputer"));
/// ```
pub fn is_generic_term(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return true;
    }

    let boilerplate = GENERIC_TERMS.iter().any(|generic| {
        text == *generic
            || text.starts_with(&format!("{} -", generic))
            || text.ends_with(&format!("- {}", generic))
    });
    if boilerplate {
        return true;
    }

    let len = text.chars().count();
    !(3..=200).contains(&len)
}

/// Decides whether a fetched page is a faculty's own page
pub fn is_faculty_page(url: &Url, page: &PageDocument) -> bool {
    assess_page(url, page).is_faculty
}

/// Runs both phases and reports the score alongside the verdict
pub fn assess_page(url: &Url, page: &PageDocument) -> PageAssessment {
    let url_lower = url.as_str().to_lowercase();
    let text_lower = page.text.to_lowercase();
    let title_lower = page.title_lower();
    let placement = Placement::of(url);

    if let Some(reason) = exclusion(&url_lower, &title_lower, &text_lower, page, placement) {
        return PageAssessment {
            score: 0,
            excluded: Some(reason),
            is_faculty: false,
        };
    }

    let score = score_signals(&url_lower, &text_lower, page, placement);

    let mut is_faculty = match placement {
        Placement::FacultyRoot => score >= ROOT_THRESHOLD,
        Placement::FacultySite => score >= SUBDOMAIN_THRESHOLD,
        Placement::General => false,
    };
    if !is_faculty && score >= GENERAL_THRESHOLD {
        is_faculty = true;
    }

    if is_faculty
        && score < LOW_VALUE_OVERRIDE_CEILING
        && LOW_VALUE_TITLES.iter().any(|t| title_lower.contains(t))
        && page.article_count > 3
        && !title_lower.contains("fakultas")
        && !title_lower.contains("sekolah")
    {
        is_faculty = false;
    }

    PageAssessment {
        score,
        excluded: None,
        is_faculty,
    }
}

fn exclusion(
    url_lower: &str,
    title_lower: &str,
    text_lower: &str,
    page: &PageDocument,
    placement: Placement,
) -> Option<Exclusion> {
    if placement != Placement::FacultyRoot {
        if LISTING_URLS.is_match(url_lower) {
            return Some(Exclusion::ListingUrl);
        }
        if GENERIC_TITLES.is_match(title_lower) {
            return Some(Exclusion::GenericTitle);
        }
        if LEADERSHIP_URLS.is_match(url_lower) {
            return Some(Exclusion::LeadershipUrl);
        }

        let mut heading = String::new();
        if let Some(h1) = page.first_heading(1) {
            heading.push_str(&h1.to_lowercase());
            heading.push(' ');
        }
        if let Some(h2) = page.first_heading(2) {
            heading.push_str(&h2.to_lowercase());
        }
        if LEADERSHIP_KEYWORDS
            .iter()
            .any(|k| title_lower.contains(k) || heading.contains(k))
        {
            return Some(Exclusion::LeadershipHeading);
        }
    }

    let bare_detail = title_lower.contains("detail fakultas")
        || (text_lower.contains("detail fakultas") && text_lower.chars().count() < 1000);
    if bare_detail
        && !DETAIL_PAGE_FACULTY_KEYWORDS
            .iter()
            .any(|k| text_lower.contains(k) || title_lower.contains(k))
    {
        return Some(Exclusion::BareDetailPage);
    }

    None
}

fn score_signals(url_lower: &str, text_lower: &str, page: &PageDocument, placement: Placement) -> i32 {
    let mut score = 0;

    match placement {
        Placement::FacultyRoot => score += 60,
        Placement::FacultySite => score += 50,
        Placement::General => {}
    }

    if SPECIFIC_FACULTY_URLS.is_match(url_lower) {
        score += 30;
    }

    if let Some(site_name) = page.meta_by_property("og:site_name") {
        let site_name = site_name.to_lowercase();
        if SITE_NAME_KEYWORDS.iter().any(|k| site_name.contains(k)) {
            score += 15;
        }
    }

    if page
        .meta_by_property("og:type")
        .is_some_and(|t| t.eq_ignore_ascii_case("school"))
    {
        score += 10;
    }

    let indicator_hits = FACULTY_CONTENT_INDICATORS
        .iter()
        .filter(|i| text_lower.contains(*i))
        .count();
    if indicator_hits >= 3 {
        score += 25;
    } else if indicator_hits >= 1 {
        score += 15;
    }

    if EXPECTED_FACULTIES
        .iter()
        .any(|name| text_lower.contains(&name.to_lowercase()))
    {
        score += 20;
    }

    if HIERARCHY_INDICATORS.iter().any(|i| text_lower.contains(i)) {
        score += 10;
    }

    let faculty_section = page
        .blocks
        .iter()
        .filter(|block| FACULTY_SECTION_CLASS.is_match(&block.class))
        .take(5)
        .any(|block| block.text_len > 100);
    if faculty_section {
        score += 10;
    }

    let program_list = page.lists.iter().take(10).any(|list| {
        let text = list.text.to_lowercase();
        PROGRAM_LIST_KEYWORDS.iter().any(|k| text.contains(k)) && list.items.len() > 1
    });
    if program_list {
        score += 10;
    }

    let level_hits = PROGRAM_LEVEL_KEYWORDS
        .iter()
        .filter(|k| text_lower.contains(*k))
        .count();
    if level_hits >= 2 {
        score += 15;
    } else if level_hits == 1 {
        score += 5;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn faculty_body() -> &'static str {
        r#"<html><head><title>Fakultas Teknik Universitas Indonesia</title></head>
        <body>
            <h1>Selamat Datang di Fakultas Teknik</h1>
            <p>Sejarah fakultas dan profil fakultas. Dekan dan wakil dekan memimpin
            program studi di setiap departemen.</p>
            <ul><li>Sarjana (S1) Teknik Sipil</li><li>Magister (S2) Teknik Mesin</li></ul>
        </body></html>"#
    }

    #[test]
    fn test_generic_terms() {
        assert!(is_generic_term("Fakultas"));
        assert!(is_generic_term("  DAFTAR FAKULTAS "));
        assert!(is_generic_term(""));
        assert!(is_generic_term("ui"));
        assert!(is_generic_term("Akademik - Portal"));
        assert!(is_generic_term("Portal - Beranda"));
        assert!(is_generic_term("ab"));
        assert!(is_generic_term(&"x".repeat(201)));
        assert!(!is_generic_term("Fakultas Ilmu Komputer"));
        assert!(!is_generic_term("Sekolah Ilmu Lingkungan"));
    }

    #[test]
    fn test_faculty_root_with_content_is_accepted() {
        let page = PageDocument::parse(faculty_body());
        let assessment = assess_page(&url("https://eng.ui.ac.id/"), &page);
        assert_eq!(assessment.excluded, None);
        assert!(assessment.score >= ROOT_THRESHOLD);
        assert!(assessment.is_faculty);
    }

    #[test]
    fn test_bare_faculty_root_needs_content() {
        // 60 (root) + 30 (host pattern) already clears the root threshold
        let page = PageDocument::parse("<html><body>Hi</body></html>");
        let assessment = assess_page(&url("https://cs.ui.ac.id/"), &page);
        assert_eq!(assessment.score, 90);
        assert!(assessment.is_faculty);
    }

    #[test]
    fn test_listing_page_is_excluded() {
        let page = PageDocument::parse(faculty_body());
        let assessment = assess_page(&url("https://www.ui.ac.id/akademik/fakultas/"), &page);
        assert_eq!(assessment.excluded, Some(Exclusion::ListingUrl));
        assert!(!assessment.is_faculty);
    }

    #[test]
    fn test_generic_title_is_excluded() {
        let page = PageDocument::parse("<title>Daftar Fakultas UI</title>");
        let assessment = assess_page(&url("https://www.ui.ac.id/teknik/"), &page);
        assert_eq!(assessment.excluded, Some(Exclusion::GenericTitle));
    }

    #[test]
    fn test_leadership_pages_are_excluded() {
        let page = PageDocument::parse(faculty_body());
        let assessment = assess_page(&url("https://eng.ui.ac.id/sambutan-dekan/"), &page);
        assert_eq!(assessment.excluded, Some(Exclusion::LeadershipUrl));

        let page = PageDocument::parse("<title>Profil Dekan</title><h1>Fakultas Hukum</h1>");
        let assessment = assess_page(&url("https://law.ui.ac.id/tentang/"), &page);
        assert_eq!(assessment.excluded, Some(Exclusion::LeadershipHeading));
    }

    #[test]
    fn test_root_is_exempt_from_leadership_exclusion() {
        let page = PageDocument::parse(
            "<title>Sambutan Dekan</title><body>Fakultas Hukum, program studi</body>",
        );
        let assessment = assess_page(&url("https://law.ui.ac.id/"), &page);
        assert_eq!(assessment.excluded, None);
        assert!(assessment.is_faculty);
    }

    #[test]
    fn test_bare_detail_page_is_excluded() {
        let page = PageDocument::parse("<title>Detail Fakultas | Portal</title><p>Memuat...</p>");
        let assessment = assess_page(&url("https://www.ui.ac.id/detail/"), &page);
        assert_eq!(assessment.excluded, Some(Exclusion::BareDetailPage));

        let page =
            PageDocument::parse("<title>Detail Fakultas | Portal</title><p>Fakultas Hukum</p>");
        let assessment = assess_page(&url("https://www.ui.ac.id/detail/"), &page);
        assert_ne!(assessment.excluded, Some(Exclusion::BareDetailPage));
    }

    #[test]
    fn test_general_page_threshold() {
        // Content indicators (+25), expected name (+20) and program levels (+15)
        let page = PageDocument::parse(faculty_body());
        let assessment = assess_page(&url("https://www.ui.ac.id/profil/"), &page);
        assert!(assessment.score >= GENERAL_THRESHOLD);
        assert!(assessment.is_faculty);

        let page = PageDocument::parse("<title>Berita</title><p>Kegiatan kampus</p>");
        assert!(!is_faculty_page(&url("https://www.ui.ac.id/berita/"), &page));
    }

    #[test]
    fn test_meta_signals() {
        let html = r#"<head>
            <meta property="og:site_name" content="Sekolah Ilmu Lingkungan">
            <meta property="og:type" content="School">
        </head>"#;
        let page = PageDocument::parse(html);
        let assessment = assess_page(&url("https://www.ui.ac.id/tentang/"), &page);
        assert_eq!(assessment.score, 25);
        assert!(!assessment.is_faculty);
    }

    #[test]
    fn test_low_value_title_override() {
        let html = r#"<title>Berita Kampus</title><body>
            <article>a</article><article>b</article><article>c</article><article>d</article>
            <p>Fakultas Psikologi, program studi, dekan, departemen</p></body>"#;
        let page = PageDocument::parse(html);
        let assessment = assess_page(&url("https://www.ui.ac.id/kabar/"), &page);
        assert!(assessment.score >= GENERAL_THRESHOLD);
        assert!(assessment.score < 70);
        assert!(!assessment.is_faculty);
    }
}
