//! HTTP fetcher implementation
//!
//! This module provides the fetch primitive the crawl engine depends on:
//! - The [`PageFetcher`] trait, so the engine can be driven by any source
//! - [`HttpFetcher`], a reqwest client with the configured user agent
//! - Error classification for logging (status, timeout, connect, body)

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a page could not be fetched
///
/// The crawl engine treats every variant the same way (log and skip); the
/// distinction only matters for diagnostics.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Short label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Timeout => "timeout",
            Self::Connect(_) => "connect",
            Self::Body(_) => "body",
            Self::Request(_) => "request",
        }
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status(status.as_u16())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Source of page content for the crawl engine
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches the body of a page
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the configured user agent and request timeout
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use ui_faculty_finder::config::UserAgentConfig;
    /// use ui_faculty_finder::crawler::HttpFetcher;
    ///
    /// let config = UserAgentConfig {
    ///     crawler_name: "UIFacultyFinder".to_string(),
    ///     crawler_version: "1.0".to_string(),
    ///     contact_url: "https://example.com/about".to_string(),
    ///     contact_email: "admin@example.com".to_string(),
    /// };
    ///
    /// let fetcher = HttpFetcher::new(&config, Duration::from_secs(15)).unwrap();
    /// ```
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.header_value())
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_fetcher() {
        let fetcher = HttpFetcher::new(&create_test_config(), DEFAULT_TIMEOUT);
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FetchError::Status(404).kind(), "status");
        assert_eq!(FetchError::Timeout.kind(), "timeout");
        assert_eq!(FetchError::Connect("refused".into()).kind(), "connect");
        assert_eq!(FetchError::Status(503).to_string(), "HTTP status 503");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_fetch_error() {
        let fetcher = HttpFetcher::new(&create_test_config(), Duration::from_secs(2)).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(
            result,
            Err(FetchError::Connect(_)) | Err(FetchError::Request(_)) | Err(FetchError::Timeout)
        ));
    }
}
