//! Static lookup tables for the Universitas Indonesia site
//!
//! Every curated list the classifiers and scorers consult lives here so the
//! decision logic elsewhere stays declarative. Ordering is significant in the
//! tables documented as "ordered": the first matching entry wins.

use std::collections::BTreeSet;

/// Canonical names of every faculty and school the crawl is expected to find
pub const EXPECTED_FACULTIES: &[&str] = &[
    "Fakultas Farmasi",
    "Fakultas Hukum",
    "Fakultas Ilmu Administrasi",
    "Fakultas Ilmu Pengetahuan Budaya",
    "Fakultas Ekonomi dan Bisnis",
    "Fakultas Ilmu Keperawatan",
    "Fakultas Ilmu Komputer",
    "Fakultas Ilmu Sosial dan Ilmu Politik",
    "Fakultas Kedokteran",
    "Fakultas Kedokteran Gigi",
    "Fakultas Kesehatan Masyarakat",
    "Fakultas Matematika dan Ilmu Pengetahuan Alam",
    "Fakultas Psikologi",
    "Fakultas Teknik",
    "Program Pendidikan Vokasi",
    "Sekolah Ilmu Lingkungan",
    "Sekolah Kajian Stratejik dan Global",
];

/// Hosts of the faculty sites treated as authoritative faculty homes
pub const KNOWN_FACULTY_HOSTS: &[&str] = &[
    "fk.ui.ac.id",
    "eng.ui.ac.id",
    "law.ui.ac.id",
    "feb.ui.ac.id",
    "psy.ui.ac.id",
    "sci.ui.ac.id",
    "dent.ui.ac.id",
    "fisip.ui.ac.id",
    "fib.ui.ac.id",
    "nursing.ui.ac.id",
    "cs.ui.ac.id",
    "pharmacy.ui.ac.id",
    "pubhealth.ui.ac.id",
    "adm.ui.ac.id",
    "vokasi.ui.ac.id",
    "sil.ui.ac.id",
    "sksg.ui.ac.id",
];

/// Faculty hosts used for stage detection (known hosts plus legacy aliases)
pub const FACULTY_STAGE_HOSTS: &[&str] = &[
    "fk.ui.ac.id",
    "eng.ui.ac.id",
    "law.ui.ac.id",
    "feb.ui.ac.id",
    "psy.ui.ac.id",
    "sci.ui.ac.id",
    "dent.ui.ac.id",
    "fisip.ui.ac.id",
    "fib.ui.ac.id",
    "nursing.ui.ac.id",
    "cs.ui.ac.id",
    "pharmacy.ui.ac.id",
    "pubhealth.ui.ac.id",
    "adm.ui.ac.id",
    "vokasi.ui.ac.id",
    "sil.ui.ac.id",
    "sksg.ui.ac.id",
    "ft.ui.ac.id",
    "fvok.ui.ac.id",
];

/// Main-site hosts accepted alongside the faculty hosts
pub const MAIN_SITE_HOSTS: &[&str] = &["www.ui.ac.id", "ui.ac.id"];

/// Homepage URLs recognised as the `homepage` stage
pub const HOMEPAGE_URLS: &[&str] = &[
    "https://www.ui.ac.id/",
    "https://ui.ac.id/",
    "https://www.ui.ac.id",
    "https://ui.ac.id",
];

/// Authoritative host to canonical name mapping
pub const HOST_NAMES: &[(&str, &str)] = &[
    ("fk.ui.ac.id", "Fakultas Kedokteran"),
    ("eng.ui.ac.id", "Fakultas Teknik"),
    ("ft.ui.ac.id", "Fakultas Teknik"),
    ("law.ui.ac.id", "Fakultas Hukum"),
    ("feb.ui.ac.id", "Fakultas Ekonomi dan Bisnis"),
    ("psy.ui.ac.id", "Fakultas Psikologi"),
    ("sci.ui.ac.id", "Fakultas Matematika dan Ilmu Pengetahuan Alam"),
    ("dent.ui.ac.id", "Fakultas Kedokteran Gigi"),
    ("fisip.ui.ac.id", "Fakultas Ilmu Sosial dan Ilmu Politik"),
    ("fib.ui.ac.id", "Fakultas Ilmu Pengetahuan Budaya"),
    ("nursing.ui.ac.id", "Fakultas Ilmu Keperawatan"),
    ("cs.ui.ac.id", "Fakultas Ilmu Komputer"),
    ("pharmacy.ui.ac.id", "Fakultas Farmasi"),
    ("pubhealth.ui.ac.id", "Fakultas Kesehatan Masyarakat"),
    ("adm.ui.ac.id", "Fakultas Ilmu Administrasi"),
    ("vokasi.ui.ac.id", "Program Pendidikan Vokasi"),
    ("fvok.ui.ac.id", "Program Pendidikan Vokasi"),
    ("sil.ui.ac.id", "Sekolah Ilmu Lingkungan"),
    ("sksg.ui.ac.id", "Sekolah Kajian Stratejik dan Global"),
];

/// URL substring to canonical name table (ordered, most specific first)
///
/// Multi-word and compound fragments precede the bare words they contain,
/// e.g. "kedokteran gigi" before "kedokteran" and "ilmu lingkungan" before
/// "lingkungan".
pub const URL_NAME_PATTERNS: &[(&str, &str)] = &[
    ("program pendidikan vokasi", "Program Pendidikan Vokasi"),
    ("pendidikan vokasi", "Program Pendidikan Vokasi"),
    ("sekolah ilmu lingkungan", "Sekolah Ilmu Lingkungan"),
    ("ilmu lingkungan", "Sekolah Ilmu Lingkungan"),
    ("kajian stratejik", "Sekolah Kajian Stratejik dan Global"),
    ("sekolah kajian", "Sekolah Kajian Stratejik dan Global"),
    ("fakultas teknik", "Fakultas Teknik"),
    ("kedokteran gigi", "Fakultas Kedokteran Gigi"),
    ("kedokteran-gigi", "Fakultas Kedokteran Gigi"),
    ("kesehatan-masyarakat", "Fakultas Kesehatan Masyarakat"),
    ("ilmu-komputer", "Fakultas Ilmu Komputer"),
    ("gigi", "Fakultas Kedokteran Gigi"),
    ("kedokteran", "Fakultas Kedokteran"),
    ("teknik", "Fakultas Teknik"),
    ("hukum", "Fakultas Hukum"),
    ("ekonomi", "Fakultas Ekonomi dan Bisnis"),
    ("psikologi", "Fakultas Psikologi"),
    ("matematika", "Fakultas Matematika dan Ilmu Pengetahuan Alam"),
    ("mipa", "Fakultas Matematika dan Ilmu Pengetahuan Alam"),
    ("sosial", "Fakultas Ilmu Sosial dan Ilmu Politik"),
    ("politik", "Fakultas Ilmu Sosial dan Ilmu Politik"),
    ("fisip", "Fakultas Ilmu Sosial dan Ilmu Politik"),
    ("budaya", "Fakultas Ilmu Pengetahuan Budaya"),
    ("fib", "Fakultas Ilmu Pengetahuan Budaya"),
    ("keperawatan", "Fakultas Ilmu Keperawatan"),
    ("fik", "Fakultas Ilmu Keperawatan"),
    ("kesehatan", "Fakultas Kesehatan Masyarakat"),
    ("fkm", "Fakultas Kesehatan Masyarakat"),
    ("komputer", "Fakultas Ilmu Komputer"),
    ("fasilkom", "Fakultas Ilmu Komputer"),
    ("farmasi", "Fakultas Farmasi"),
    ("administrasi", "Fakultas Ilmu Administrasi"),
    ("vokasi", "Program Pendidikan Vokasi"),
    ("vocational", "Program Pendidikan Vokasi"),
    ("diploma", "Program Pendidikan Vokasi"),
    ("vokui", "Program Pendidikan Vokasi"),
    ("fvok", "Program Pendidikan Vokasi"),
    ("environmental", "Sekolah Ilmu Lingkungan"),
    ("environment", "Sekolah Ilmu Lingkungan"),
    ("lingkungan", "Sekolah Ilmu Lingkungan"),
    ("sil.ui", "Sekolah Ilmu Lingkungan"),
    ("sksg.ui", "Sekolah Kajian Stratejik dan Global"),
    ("sksg", "Sekolah Kajian Stratejik dan Global"),
    ("kajian", "Sekolah Kajian Stratejik dan Global"),
    ("stratejik", "Sekolah Kajian Stratejik dan Global"),
    ("strategic", "Sekolah Kajian Stratejik dan Global"),
    ("global", "Sekolah Kajian Stratejik dan Global"),
    ("engineering", "Fakultas Teknik"),
    ("ft.ui", "Fakultas Teknik"),
    ("sil", "Sekolah Ilmu Lingkungan"),
];

/// Fragments marking a URL as pointing at one specific faculty
pub const SPECIFIC_FACULTY_URL_KEYWORDS: &[&str] = &[
    "kedokteran",
    "teknik",
    "hukum",
    "ekonomi",
    "psikologi",
    "matematika",
    "sekolah",
    "program",
    "pengetahuan",
    "kesehatan",
    "ilmu",
    "administrasi",
    "keperawatan",
    "komputer",
    "sosial",
    "gigi",
    "vokasi",
    "lingkungan",
    "kajian",
    "budaya",
    "farmasi",
    "mipa",
    "alam",
    "bisnis",
    "fk.ui",
    "ft.ui",
    "fh.ui",
    "feb.ui",
    "fpsi.ui",
    "fmipa.ui",
    "fkg.ui",
    "fisip.ui",
    "fib.ui",
    "fik.ui",
    "fasilkom.ui",
    "fkm.ui",
    "fvok.ui",
    "sil.ui",
    "sksg.ui",
    "engineering",
    "vocational",
    "environment",
    "strategic",
    "global",
    "diploma",
    "environmental",
    "stratejik",
    "/teknik/",
    "/vokasi/",
    "/lingkungan/",
    "/kajian/",
    "/stratejik/",
    "/engineering/",
    "/vocational/",
    "/environment/",
    "/strategic/",
];

/// Phrases that never name a faculty on their own
pub const GENERIC_TERMS: &[&str] = &[
    "detail fakultas",
    "fakultas",
    "faculty",
    "daftar fakultas",
    "list of faculties",
    "fakultas - universitas indonesia",
    "fakultas ui",
    "akademik",
    "academic",
    "universitas indonesia",
    "ui",
    "beranda",
    "home",
    "homepage",
    "main page",
    "halaman utama",
];

/// Faculty-name fragments that rescue a "detail fakultas" page
pub const DETAIL_PAGE_FACULTY_KEYWORDS: &[&str] = &[
    "kedokteran",
    "teknik",
    "hukum",
    "ekonomi",
    "psikologi",
    "matematika",
    "mipa",
    "farmasi",
    "administrasi",
    "budaya",
    "fib",
    "keperawatan",
    "fik",
    "komputer",
    "fasilkom",
    "kesehatan",
    "fkm",
    "sosial",
    "politik",
    "fisip",
    "gigi",
    "fkg",
    "vokasi",
    "lingkungan",
    "sil",
    "kajian",
    "stratejik",
    "global",
    "sksg",
];

/// Title or heading phrases that mark leadership and staff pages
pub const LEADERSHIP_KEYWORDS: &[&str] = &[
    "dekan fakultas",
    "profil dekan",
    "sambutan dekan",
    "kata dekan",
    "wakil dekan",
    "pimpinan fakultas",
    "struktur pimpinan",
    "manajemen fakultas",
    "profil pimpinan",
    "daftar dosen",
    "staff direktori",
    "direktori dosen",
    "profil dosen",
    "guru besar kami",
    "tenaga pengajar",
    "staf pengajar",
    "staf akademik",
    "struktur organisasi universitas indonesia",
];

/// Body phrases typical of a faculty's own pages
pub const FACULTY_CONTENT_INDICATORS: &[&str] = &[
    "dekan",
    "dean",
    "wakil dekan",
    "vice dean",
    "pimpinan fakultas",
    "struktur organisasi fakultas",
    "organisasi fakultas",
    "senat akademik fakultas",
    "sejarah fakultas",
    "visi misi fakultas",
    "profil fakultas",
    "tentang fakultas",
    "sejarah sekolah",
    "visi misi sekolah",
    "profil sekolah",
    "tentang sekolah",
    "sejarah program",
    "visi misi program",
    "profil program",
    "tentang program",
    "program studi",
    "prodi",
    "departemen",
    "department",
    "jurusan",
    "guru besar",
    "dosen tetap fakultas",
    "direktur program",
    "ketua program studi",
    "kepala sekolah",
    "direktur sekolah",
    "program vokasi",
    "pendidikan vokasi",
    "program diploma",
    "ilmu lingkungan",
    "kajian stratejik",
    "kajian global",
    "fakultas farmasi ui",
    "sekolah ilmu lingkungan ui",
];

/// Academic hierarchy titles
pub const HIERARCHY_INDICATORS: &[&str] = &["kaprodi", "ketua departemen", "sekretaris fakultas"];

/// Keywords accepted in an `og:site_name` meta tag
pub const SITE_NAME_KEYWORDS: &[&str] = &[
    "fakultas",
    "sekolah",
    "program",
    "faculty",
    "school",
    "vocational",
    "vokasi",
    "pharmacy",
    "teknik",
    "lingkungan",
];

/// Keywords that make a `ul`/`ol` look like a study-program list
pub const PROGRAM_LIST_KEYWORDS: &[&str] = &[
    "program studi",
    "sarjana",
    "magister",
    "doktor",
    "diploma",
    "spesialis",
    "profesi",
];

/// Degree-level phrases counted in the body
pub const PROGRAM_LEVEL_KEYWORDS: &[&str] = &[
    "sarjana (s1)",
    "s1-",
    "magister (s2)",
    "s2-",
    "doktor (s3)",
    "s3-",
    "program profesi",
    "program spesialis",
    "program diploma",
];

/// Titles of news/contact style pages that rarely describe a faculty
pub const LOW_VALUE_TITLES: &[&str] = &[
    "kontak",
    "berita",
    "artikel",
    "pengumuman",
    "agenda",
    "login",
    "pendaftaran",
];

/// Vocabulary for harvesting study programs
pub const PROGRAM_KEYWORDS: &[&str] = &[
    "program studi",
    "prodi",
    "jurusan",
    "sarjana",
    "magister",
    "doktor",
    "s1",
    "s2",
    "s3",
];

/// Vocabulary for harvesting departments
pub const DEPARTMENT_KEYWORDS: &[&str] = &["departemen", "department", "bagian"];

/// Email addresses containing these fragments are never used as contacts
pub const IGNORED_EMAIL_FRAGMENTS: &[&str] = &["noreply", "admin", "webmaster"];

/// Faculty vocabulary used to rank links on the faculty listing page
pub const LISTING_LINK_KEYWORDS: &[&str] = &[
    "kedokteran",
    "teknik",
    "hukum",
    "ekonomi",
    "psikologi",
    "matematika",
    "farmasi",
    "administrasi",
    "budaya",
    "keperawatan",
    "komputer",
    "kesehatan",
    "vokasi",
    "lingkungan",
    "kajian",
    "stratejik",
    "ilmu komputer",
    "ilmu keperawatan",
    "ilmu administrasi",
    "ilmu budaya",
    "kedokteran gigi",
    "kesehatan masyarakat",
    "sosial dan politik",
    "ekonomi dan bisnis",
    "matematika dan ilmu pengetahuan alam",
    "pendidikan vokasi",
    "ilmu lingkungan",
    "kajian stratejik dan global",
    "gigi",
    "sosial",
    "politik",
    "mipa",
    "ipa",
    "alam",
    "pengetahuan",
    "sekolah",
    "program",
    "global",
    "diploma",
    "vocational",
    "environmental",
    "strategic",
    "studies",
    "fk",
    "ft",
    "fh",
    "feb",
    "fpsi",
    "fmipa",
    "fkg",
    "fisip",
    "fib",
    "fik",
    "fasilkom",
    "fkm",
    "fia",
    "sil",
    "sksg",
    "vokui",
    "pv",
    "ui-voc",
    "fvok",
    "engineering",
    "medicine",
    "law",
    "economics",
    "psychology",
    "pharmacy",
    "administration",
    "nursing",
    "computer",
    "health",
    "mathematics",
    "science",
    "social",
    "political",
    "cultural",
    "environment",
    "vocational education",
];

/// Faculties that tend to hide behind unusual links; boosted harder
pub const UNDER_DISCOVERED_PATTERNS: &[&str] = &[
    "teknik",
    "engineering",
    "ft.ui",
    "fakultas teknik",
    "vokasi",
    "vocational",
    "diploma",
    "pendidikan vokasi",
    "program pendidikan vokasi",
    "lingkungan",
    "environment",
    "sil.ui",
    "sekolah ilmu lingkungan",
    "kajian",
    "stratejik",
    "global",
    "strategic",
    "sksg.ui",
    "sekolah kajian",
];

/// Link texts pointing at low-value sections
pub const LOW_VALUE_LINK_KEYWORDS: &[&str] = &[
    "berita",
    "news",
    "pengumuman",
    "agenda",
    "gallery",
    "download",
    "kontak",
    "contact",
    "login",
    "alumni",
];

/// Path extensions of documents and media that are never crawled
pub const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "jpg", "jpeg", "png", "gif", "svg", "webp",
    "zip", "rar", "7z", "tar", "gz", "mp3", "mp4", "avi", "mov", "wmv",
];

/// Returns the expected faculty set as owned strings
pub fn expected_faculty_set() -> BTreeSet<String> {
    EXPECTED_FACULTIES.iter().map(|s| s.to_string()).collect()
}

/// Looks up the canonical faculty name for an exact host
pub fn canonical_name_for_host(host: &str) -> Option<&'static str> {
    HOST_NAMES
        .iter()
        .find(|(h, _)| h.eq_ignore_ascii_case(host))
        .map(|(_, name)| *name)
}

/// Returns true if the host is one of the known faculty sites
pub fn is_known_faculty_host(host: &str) -> bool {
    KNOWN_FACULTY_HOSTS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_host_has_a_name() {
        for host in KNOWN_FACULTY_HOSTS {
            assert!(canonical_name_for_host(host).is_some(), "{} unmapped", host);
        }
    }

    #[test]
    fn test_known_hosts_cover_expected_set() {
        let named: BTreeSet<String> = KNOWN_FACULTY_HOSTS
            .iter()
            .filter_map(|h| canonical_name_for_host(h))
            .map(str::to_string)
            .collect();
        assert_eq!(named, expected_faculty_set());
    }

    #[test]
    fn test_specific_patterns_precede_generic_ones() {
        let position = |key: &str| {
            URL_NAME_PATTERNS
                .iter()
                .position(|(k, _)| *k == key)
                .unwrap()
        };
        assert!(position("gigi") < position("kedokteran"));
        assert!(position("ilmu lingkungan") < position("lingkungan"));
        assert!(position("pendidikan vokasi") < position("vokasi"));
    }

    #[test]
    fn test_host_lookup_is_case_insensitive() {
        assert_eq!(canonical_name_for_host("ENG.ui.ac.id"), Some("Fakultas Teknik"));
        assert!(is_known_faculty_host("CS.UI.AC.ID"));
        assert!(!is_known_faculty_host("www.ui.ac.id"));
    }
}
