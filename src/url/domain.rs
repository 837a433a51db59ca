use crate::catalog::{is_known_faculty_host, FACULTY_STAGE_HOSTS, KNOWN_FACULTY_HOSTS, MAIN_SITE_HOSTS};
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ui_faculty_finder::url::extract_domain;
///
/// let url = Url::parse("https://CS.UI.AC.ID/akademik").unwrap();
/// assert_eq!(extract_domain(&url), Some("cs.ui.ac.id".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the host belongs to the crawl allow-list
///
/// The allow-list is the main site, every known faculty site, and the legacy
/// faculty aliases (`ft`, `fvok`).
pub fn is_allowed_host(host: &str) -> bool {
    let host = host.to_lowercase();
    MAIN_SITE_HOSTS
        .iter()
        .chain(KNOWN_FACULTY_HOSTS)
        .chain(FACULTY_STAGE_HOSTS)
        .any(|h| *h == host)
}

/// Returns true if the URL is hosted on a known faculty site
pub fn on_known_faculty_host(url: &Url) -> bool {
    url.host_str().is_some_and(is_known_faculty_host)
}

/// Returns true if the URL is the bare root of a known faculty site
///
/// The root is any path that is empty once slashes are trimmed, so both
/// `https://cs.ui.ac.id` and `https://cs.ui.ac.id//` qualify.
pub fn is_known_faculty_root(url: &Url) -> bool {
    on_known_faculty_host(url) && url.path().trim_matches('/').is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_faculty_domain() {
        let url = parse("https://fisip.ui.ac.id/berita");
        assert_eq!(extract_domain(&url), Some("fisip.ui.ac.id".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = parse("https://www.ui.ac.id:8443/");
        assert_eq!(extract_domain(&url), Some("www.ui.ac.id".to_string()));
    }

    #[test]
    fn test_allowed_hosts() {
        assert!(is_allowed_host("www.ui.ac.id"));
        assert!(is_allowed_host("ui.ac.id"));
        assert!(is_allowed_host("eng.ui.ac.id"));
        assert!(is_allowed_host("FT.UI.AC.ID"));
        assert!(is_allowed_host("fvok.ui.ac.id"));
        assert!(!is_allowed_host("scele.ui.ac.id"));
        assert!(!is_allowed_host("example.com"));
    }

    #[test]
    fn test_known_faculty_root() {
        assert!(is_known_faculty_root(&parse("https://eng.ui.ac.id/")));
        assert!(is_known_faculty_root(&parse("https://eng.ui.ac.id")));
        assert!(!is_known_faculty_root(&parse("https://eng.ui.ac.id/berita/")));
        assert!(!is_known_faculty_root(&parse("https://www.ui.ac.id/")));
        // Legacy aliases are allowed hosts but not authoritative faculty homes
        assert!(!is_known_faculty_root(&parse("https://ft.ui.ac.id/")));
    }
}
