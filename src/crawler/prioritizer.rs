//! Stage-aware link ranking
//!
//! Each anchor on a page is resolved, filtered against the allow-list and the
//! visited set, and scored. The bonuses a link can earn depend on the stage of
//! the page it was found on: the homepage favours the academic section, the
//! academic section favours the faculty listing, and the listing favours
//! individual faculties.

use crate::catalog::{
    is_known_faculty_host, LISTING_LINK_KEYWORDS, LOW_VALUE_LINK_KEYWORDS, UNDER_DISCOVERED_PATTERNS,
};
use crate::crawler::parser::{resolve_link, Anchor, PageDocument};
use crate::url::{detect_navigation_stage, is_valid_url, normalize_url, NavigationStage};
use std::collections::HashSet;
use url::Url;

/// A link worth following
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityCandidate {
    /// Absolute URL as resolved from the anchor
    pub url: String,
    /// Always positive
    pub priority: i32,
    /// Trimmed anchor text
    pub text: String,
    /// Stage the target URL belongs to
    pub stage: NavigationStage,
}

/// Returns the visited-set key for a URL
///
/// Falls back to the raw string when the URL cannot be normalized.
pub fn visit_key(url: &str) -> String {
    normalize_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

/// Ranks the outbound links of a page, highest priority first
///
/// Links that do not resolve, fall outside the allow-list, or were already
/// visited are skipped, as are links that end up with a priority of zero or
/// less. Equal priorities keep document order.
///
/// # Arguments
///
/// * `page` - The parsed page
/// * `current_url` - URL the page was fetched from (base for relative links)
/// * `stage` - Navigation stage of the page
/// * `visited` - Visited-set keys (see [`visit_key`])
pub fn rank_links(
    page: &PageDocument,
    current_url: &Url,
    stage: NavigationStage,
    visited: &HashSet<String>,
) -> Vec<PriorityCandidate> {
    let mut candidates: Vec<PriorityCandidate> = page
        .anchors
        .iter()
        .filter_map(|anchor| {
            let target = resolve_link(&anchor.href, current_url)?;
            let target_str = target.to_string();
            if !is_valid_url(&target_str) || visited.contains(&visit_key(&target_str)) {
                return None;
            }

            let priority = link_priority(anchor, &target, stage);
            (priority > 0).then(|| PriorityCandidate {
                stage: detect_navigation_stage(&target_str),
                url: target_str,
                priority,
                text: anchor.text.clone(),
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    candidates
}

/// Scores a single link
pub fn link_priority(anchor: &Anchor, target: &Url, stage: NavigationStage) -> i32 {
    let text = anchor.text.to_lowercase();
    let url = target.as_str().to_lowercase();
    let text_has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));
    let url_has = |keywords: &[&str]| keywords.iter().any(|k| url.contains(k));

    let mut priority = 0;

    match stage {
        NavigationStage::Homepage => {
            if text_has(&["akademik", "academic"]) {
                priority += 50;
            } else if url_has(&["akademik", "academic"]) {
                priority += 45;
            }
        }
        NavigationStage::Akademik => {
            if text_has(&["fakultas", "faculty"]) {
                priority += 50;
            } else if url_has(&["fakultas", "faculty"]) {
                priority += 45;
            }
        }
        NavigationStage::FakultasList => {
            if text_has(UNDER_DISCOVERED_PATTERNS) || url_has(UNDER_DISCOVERED_PATTERNS) {
                priority += 60;
            } else if text_has(LISTING_LINK_KEYWORDS) {
                priority += 50;
            } else if url_has(LISTING_LINK_KEYWORDS) {
                priority += 45;
            } else if url_has(&["fakultas", "faculty"]) {
                priority += 40;
            }
        }
        NavigationStage::SpecificFaculty | NavigationStage::Other => {}
    }

    if text_has(&["fakultas", "faculty", "sekolah", "program"]) {
        priority += 20;
    }

    if url_has(&["akademik", "fakultas", "faculty", "sekolah"]) {
        priority += 15;
    }

    if target.host_str().is_some_and(is_known_faculty_host) {
        priority += 35;
    }

    let in_menu = anchor.region_class.as_deref().is_some_and(|class| {
        let class = class.to_lowercase();
        ["menu", "nav", "navigation"].iter().any(|k| class.contains(k))
    });
    if in_menu {
        priority += 10;
    }

    if text_has(LOW_VALUE_LINK_KEYWORDS) {
        priority -= 5;
    }

    priority
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn rank(html: &str, current: &str, stage: NavigationStage) -> Vec<PriorityCandidate> {
        rank_links(&PageDocument::parse(html), &url(current), stage, &HashSet::new())
    }

    #[test]
    fn test_homepage_ranks_academic_link_first() {
        let html = r#"
            <a href="/berita/">Berita</a>
            <a href="/riset/">Riset</a>
            <a href="/akademik/">Akademik</a>
        "#;
        let ranked = rank(html, "https://www.ui.ac.id/", NavigationStage::Homepage);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].url, "https://www.ui.ac.id/akademik/");
        assert_eq!(ranked[0].priority, 65);
        assert_eq!(ranked[0].text, "Akademik");
        assert_eq!(ranked[0].stage, NavigationStage::Akademik);
    }

    #[test]
    fn test_akademik_stage_prefers_faculty_links() {
        let html = r#"
            <a href="/akademik/kalender/">Kalender Akademik</a>
            <a href="/akademik/fakultas/">Fakultas</a>
        "#;
        let ranked = rank(html, "https://www.ui.ac.id/akademik/", NavigationStage::Akademik);
        assert_eq!(ranked[0].url, "https://www.ui.ac.id/akademik/fakultas/");
        // 50 text + 20 text + 15 url
        assert_eq!(ranked[0].priority, 85);
        assert_eq!(ranked[0].stage, NavigationStage::FakultasList);
        assert_eq!(ranked[1].priority, 15);
    }

    #[test]
    fn test_listing_stage_boosts_under_discovered_faculties() {
        let html = r#"
            <a href="https://law.ui.ac.id/">Fakultas Hukum</a>
            <a href="https://eng.ui.ac.id/">Fakultas Teknik</a>
        "#;
        let ranked = rank(
            html,
            "https://www.ui.ac.id/akademik/fakultas/",
            NavigationStage::FakultasList,
        );
        assert_eq!(ranked.len(), 2);
        // 60 + 20 + 35
        assert_eq!(ranked[0].url, "https://eng.ui.ac.id/");
        assert_eq!(ranked[0].priority, 115);
        // 50 + 20 + 35
        assert_eq!(ranked[1].priority, 105);
        assert_eq!(ranked[1].stage, NavigationStage::SpecificFaculty);
    }

    #[test]
    fn test_menu_bonus_and_low_value_penalty() {
        let html = r#"
            <nav class="main-navigation"><a href="/akademik/">Akademik</a></nav>
            <a href="/akademik/berita/">Berita Akademik</a>
        "#;
        let ranked = rank(html, "https://www.ui.ac.id/", NavigationStage::Homepage);
        assert_eq!(ranked[0].priority, 75);
        assert_eq!(ranked[1].priority, 60);
    }

    #[test]
    fn test_skips_invalid_visited_and_unscored_links() {
        let html = r#"
            <a href="https://example.com/akademik/">Akademik</a>
            <a href="/akademik/panduan.pdf">Panduan Akademik</a>
            <a href="/akademik/">Akademik</a>
            <a href="/kontak/">Kontak</a>
        "#;
        let mut visited = HashSet::new();
        visited.insert(visit_key("https://www.ui.ac.id/akademik/"));
        let ranked = rank_links(
            &PageDocument::parse(html),
            &url("https://www.ui.ac.id/"),
            NavigationStage::Homepage,
            &visited,
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_equal_priorities_keep_document_order() {
        let html = r#"
            <a href="/akademik/a/">Akademik A</a>
            <a href="/akademik/b/">Akademik B</a>
        "#;
        let ranked = rank(html, "https://www.ui.ac.id/", NavigationStage::Homepage);
        assert_eq!(ranked[0].text, "Akademik A");
        assert_eq!(ranked[1].text, "Akademik B");
    }

    #[test]
    fn test_visit_key_normalizes() {
        assert_eq!(
            visit_key("http://WWW.ui.ac.id/akademik/#top"),
            visit_key("https://ui.ac.id/akademik/")
        );
    }
}
