//! Navigation stage classification
//!
//! A stage describes where a page sits on the path a visitor takes from the
//! university homepage down to an individual faculty site.

use crate::catalog::{FACULTY_STAGE_HOSTS, HOMEPAGE_URLS, SPECIFIC_FACULTY_URL_KEYWORDS};
use std::fmt;
use url::Url;

/// The navigation phase a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NavigationStage {
    /// The university homepage
    Homepage,
    /// The academic section
    Akademik,
    /// The listing of all faculties
    FakultasList,
    /// A page belonging to one faculty
    SpecificFaculty,
    /// Anything else
    Other,
}

impl NavigationStage {
    /// Maximum number of ranked links enqueued from a page at this stage
    pub fn link_cap(&self) -> usize {
        match self {
            Self::Homepage => 10,
            Self::Akademik => 15,
            Self::FakultasList => 30,
            Self::SpecificFaculty => 10,
            Self::Other => 8,
        }
    }

    /// Converts the stage to its database/log representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Akademik => "akademik",
            Self::FakultasList => "fakultas_list",
            Self::SpecificFaculty => "specific_faculty",
            Self::Other => "other",
        }
    }

    /// Parses a stage from its database representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "homepage" => Some(Self::Homepage),
            "akademik" => Some(Self::Akademik),
            "fakultas_list" => Some(Self::FakultasList),
            "specific_faculty" => Some(Self::SpecificFaculty),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Returns all stages in navigation order
    pub fn all_stages() -> [Self; 5] {
        [
            Self::Homepage,
            Self::Akademik,
            Self::FakultasList,
            Self::SpecificFaculty,
            Self::Other,
        ]
    }
}

impl fmt::Display for NavigationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Classifies a URL into a navigation stage
///
/// Rules are evaluated in order and the first one that applies wins:
///
/// 1. Host is a faculty site → `SpecificFaculty`
/// 2. URL is the homepage (with or without `www`) → `Homepage`
/// 3. Contains `akademik` but not `fakultas` → `Akademik`
/// 4. Contains `akademik/fakultas` without a specific faculty keyword → `FakultasList`
/// 5. Contains a specific faculty keyword, `fakultas` or `faculty` → `SpecificFaculty`
/// 6. Otherwise → `Other`
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::url::{detect_navigation_stage, NavigationStage};
///
/// assert_eq!(detect_navigation_stage("https://www.ui.ac.id/"), NavigationStage::Homepage);
/// assert_eq!(
///     detect_navigation_stage("https://www.ui.ac.id/akademik/fakultas/"),
///     NavigationStage::FakultasList
/// );
/// ```
pub fn detect_navigation_stage(url: &str) -> NavigationStage {
    let url_lower = url.trim().to_lowercase();

    let on_faculty_host = Url::parse(&url_lower)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .is_some_and(|host| FACULTY_STAGE_HOSTS.contains(&host.as_str()));
    if on_faculty_host {
        return NavigationStage::SpecificFaculty;
    }

    if HOMEPAGE_URLS.contains(&url_lower.as_str()) {
        return NavigationStage::Homepage;
    }

    let names_faculty = has_specific_faculty_keyword(&url_lower);

    if url_lower.contains("akademik") && !url_lower.contains("fakultas") {
        NavigationStage::Akademik
    } else if url_lower.contains("akademik/fakultas") && !names_faculty {
        NavigationStage::FakultasList
    } else if names_faculty || url_lower.contains("fakultas") || url_lower.contains("faculty") {
        NavigationStage::SpecificFaculty
    } else {
        NavigationStage::Other
    }
}

fn has_specific_faculty_keyword(url_lower: &str) -> bool {
    SPECIFIC_FACULTY_URL_KEYWORDS
        .iter()
        .any(|keyword| url_lower.contains(keyword))
}
