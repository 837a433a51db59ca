//! Faculty records produced by the crawler and consumed by storage

use crate::url::NavigationStage;

/// A discovered faculty
#[derive(Debug, Clone, PartialEq)]
pub struct Faculty {
    /// Page the faculty was discovered on (unique key)
    pub url: String,
    /// Canonical, non-generic faculty name
    pub name: String,
    /// Short description, at most [`MAX_DESCRIPTION_CHARS`] characters
    pub description: String,
    /// Study programs harvested from the page
    pub programs: Vec<String>,
    /// Departments harvested from the page
    pub departments: Vec<String>,
    pub contact: Contact,
    /// Breadcrumb trail from the homepage to the faculty page
    pub navigation_path: Vec<NavigationStep>,
    /// Classification tag stored with the faculty
    pub faculty_type: NavigationStage,
    /// Stage of the page the faculty was discovered on
    pub discovery_stage: NavigationStage,
}

/// Maximum description length, ellipsis included
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Maximum number of study programs kept per faculty
pub const MAX_PROGRAMS: usize = 15;

/// Maximum number of departments kept per faculty
pub const MAX_DEPARTMENTS: usize = 8;

/// Contact details found on a faculty page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Contact {
    /// Returns true if no contact detail is present
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

/// One breadcrumb step on the way to a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStep {
    /// Link text (or a fixed label for the entry page)
    pub name: String,
    pub url: String,
    pub stage: NavigationStage,
}

impl NavigationStep {
    pub fn new(name: impl Into<String>, url: impl Into<String>, stage: NavigationStage) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            stage,
        }
    }
}

/// Joins breadcrumb names into a `A -> B -> C` trail
pub fn format_path(path: &[NavigationStep]) -> String {
    path.iter()
        .map(|step| step.name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
