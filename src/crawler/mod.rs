//! Crawler module for faculty discovery
//!
//! This module contains the core crawling logic, including:
//! - The fetch primitive (`PageFetcher`, `HttpFetcher`)
//! - HTML parsing into a `PageDocument`
//! - Faculty page recognition and attribute extraction
//! - Stage-aware link ranking
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod parser;
mod prioritizer;
mod scorer;

pub use coordinator::{missing_faculties, CrawlReport, Crawler, CrawlerOptions, TerminationReason};
pub use extract::{
    clean_faculty_name, extract_contact, extract_departments, extract_description,
    extract_faculty_name, extract_programs,
};
pub use fetcher::{FetchError, HttpFetcher, PageFetcher, DEFAULT_TIMEOUT};
pub use parser::{resolve_link, Anchor, ClassedBlock, Heading, ListBlock, MetaTag, PageDocument};
pub use prioritizer::{link_priority, rank_links, visit_key, PriorityCandidate};
pub use scorer::{
    assess_page, is_faculty_page, is_generic_term, Exclusion, PageAssessment, GENERAL_THRESHOLD,
    ROOT_THRESHOLD, SUBDOMAIN_THRESHOLD,
};
