//! URL handling for the faculty crawler
//!
//! This module provides URL normalization, allow-list validation, navigation
//! stage classification, and faculty-name lookup from URL text.

mod domain;
mod normalize;
mod stage;

use crate::catalog::{BINARY_EXTENSIONS, URL_NAME_PATTERNS};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_allowed_host, is_known_faculty_root, on_known_faculty_host};
pub use normalize::normalize_url;
pub use stage::{detect_navigation_stage, NavigationStage};

/// Checks whether a URL may be crawled
///
/// A URL is valid when it uses HTTP(S), its host is on the allow-list of
/// university and faculty hosts, and its path does not end in a document or
/// media extension.
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::url::is_valid_url;
///
/// assert!(is_valid_url("https://cs.ui.ac.id/tentang/"));
/// assert!(!is_valid_url("https://cs.ui.ac.id/brosur.pdf"));
/// assert!(!is_valid_url("https://example.com/"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    if !parsed.host_str().is_some_and(is_allowed_host) {
        return false;
    }

    !has_binary_extension(parsed.path())
}

fn has_binary_extension(path: &str) -> bool {
    let path = path.trim_end_matches('/').to_lowercase();
    let Some((_, extension)) = path.rsplit_once('.') else {
        return false;
    };
    if extension.contains('/') {
        return false;
    }
    BINARY_EXTENSIONS.contains(&extension)
}

/// Looks up a canonical faculty name from fragments of the URL text
///
/// The lookup table is ordered most-specific first and the first fragment
/// found anywhere in the lowercased URL wins.
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::url::extract_name_from_url;
///
/// assert_eq!(
///     extract_name_from_url("https://www.ui.ac.id/fakultas/kedokteran-gigi/"),
///     Some("Fakultas Kedokteran Gigi")
/// );
/// assert_eq!(extract_name_from_url("https://www.ui.ac.id/berita/"), None);
/// ```
pub fn extract_name_from_url(url: &str) -> Option<&'static str> {
    let url_lower = url.to_lowercase();
    URL_NAME_PATTERNS
        .iter()
        .find(|(fragment, _)| url_lower.contains(fragment))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_main_site_and_faculty_urls() {
        assert!(is_valid_url("https://www.ui.ac.id/"));
        assert!(is_valid_url("http://ui.ac.id/akademik/"));
        assert!(is_valid_url("https://ft.ui.ac.id/departemen"));
        assert!(is_valid_url("https://sksg.ui.ac.id/?lang=en"));
    }

    #[test]
    fn test_rejects_foreign_hosts_and_schemes() {
        assert!(!is_valid_url("https://scele.ui.ac.id/"));
        assert!(!is_valid_url("https://ui.ac.id.evil.com/"));
        assert!(!is_valid_url("ftp://www.ui.ac.id/"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_rejects_binary_extensions_on_allowed_hosts() {
        for ext in ["pdf", "PDF", "docx", "jpg", "png", "zip", "mp4", "mp3", "xlsx"] {
            let url = format!("https://eng.ui.ac.id/files/panduan.{}", ext);
            assert!(!is_valid_url(&url), "{}", url);
        }
    }

    #[test]
    fn test_dotted_directories_are_not_extensions() {
        assert!(is_valid_url("https://www.ui.ac.id/v2.0/akademik/"));
        assert!(is_valid_url("https://www.ui.ac.id/page.html"));
    }

    #[test]
    fn test_name_from_url_specific_before_generic() {
        assert_eq!(
            extract_name_from_url("https://www.ui.ac.id/sekolah-ilmu-lingkungan"),
            Some("Sekolah Ilmu Lingkungan")
        );
        assert_eq!(
            extract_name_from_url("https://www.ui.ac.id/fakultas/ilmu-pengetahuan-budaya"),
            Some("Fakultas Ilmu Pengetahuan Budaya")
        );
        assert_eq!(
            extract_name_from_url("https://www.ui.ac.id/kedokteran/"),
            Some("Fakultas Kedokteran")
        );
        assert_eq!(
            extract_name_from_url("https://www.ui.ac.id/program/vokasi"),
            Some("Program Pendidikan Vokasi")
        );
    }
}
