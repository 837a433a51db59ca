use serde::Deserialize;
use std::time::Duration;

/// Finder configuration; only `[user-agent]` has no defaults
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Entry page of the crawl
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Maximum link depth from the entry page
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of successfully fetched pages
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause after each fetched page (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            delay_ms: default_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CrawlerConfig {
    /// Pause between fetched pages
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// How the crawler identifies itself to the university servers
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Where faculties and crawl summaries are written
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// SQLite database shared by the crawler and the search commands
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Path to the markdown crawl summary
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            summary_path: default_summary_path(),
        }
    }
}

/// Defaults for the search commands
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Default maximum number of search results
    #[serde(rename = "results-limit", default = "default_results_limit")]
    pub results_limit: u32,

    /// Default maximum number of suggestions
    #[serde(rename = "suggestion-limit", default = "default_suggestion_limit")]
    pub suggestion_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_limit: default_results_limit(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.ui.ac.id/".to_string()
}

fn default_max_depth() -> u32 {
    6
}

fn default_max_pages() -> u32 {
    300
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_database_path() -> String {
    "data/ui_faculty.db".to_string()
}

fn default_summary_path() -> String {
    "data/crawl_summary.md".to_string()
}

fn default_results_limit() -> u32 {
    20
}

fn default_suggestion_limit() -> u32 {
    5
}
