//! Integration tests for the crawler
//!
//! Crawl scenarios run against a scripted fetcher serving canned pages of the
//! university site; the HTTP fetcher is exercised against a wiremock server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ui_faculty_finder::catalog::{expected_faculty_set, HOST_NAMES, KNOWN_FACULTY_HOSTS};
use ui_faculty_finder::config::UserAgentConfig;
use ui_faculty_finder::crawler::{
    CrawlerOptions, Crawler, FetchError, HttpFetcher, PageFetcher, TerminationReason,
};
use ui_faculty_finder::NavigationStage;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves canned pages by URL and logs every request
struct ScriptedFetcher {
    pages: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<(String, String)>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let fetcher = Self {
            pages: pages.into_iter().collect(),
            requests: Arc::clone(&requests),
        };
        (fetcher, requests)
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Status(404))
    }
}

fn page(url: &str, body: &str) -> (String, String) {
    (url.to_string(), body.to_string())
}

fn options(max_depth: u32, max_pages: u32) -> CrawlerOptions {
    CrawlerOptions {
        base_url: "https://www.ui.ac.id/".to_string(),
        max_depth,
        max_pages,
        delay: Duration::ZERO,
        expected_faculties: expected_faculty_set(),
    }
}

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

const ENGINEERING_HOME: &str = r#"<html><head><title>Fakultas Teknik Universitas Indonesia</title></head>
<body>
    <h1>Fakultas Teknik</h1>
    <p>Fakultas Teknik menyelenggarakan pendidikan sarjana dan magister.</p>
    <ul>
        <li>Program Studi Teknik Sipil</li>
        <li>Program Studi Teknik Mesin</li>
    </ul>
</body></html>"#;

#[tokio::test]
async fn test_crawl_follows_akademik_route_to_faculty() {
    let (fetcher, requests) = ScriptedFetcher::new(vec![
        page(
            "https://www.ui.ac.id/",
            r#"<html><body><a href="/akademik/">Akademik</a></body></html>"#,
        ),
        page(
            "https://www.ui.ac.id/akademik/",
            r#"<html><body><a href="/akademik/fakultas/">Fakultas</a></body></html>"#,
        ),
        page(
            "https://www.ui.ac.id/akademik/fakultas/",
            r#"<html><body><a href="https://eng.ui.ac.id/">Fakultas Teknik</a></body></html>"#,
        ),
        page("https://eng.ui.ac.id/", ENGINEERING_HOME),
    ]);

    let report = Crawler::new(fetcher, options(4, 10)).run().await;

    assert_eq!(report.termination, TerminationReason::QueueExhausted);
    assert_eq!(report.pages_crawled, 4);
    assert_eq!(report.faculties.len(), 1);

    let faculty = &report.faculties[0];
    assert_eq!(faculty.name, "Fakultas Teknik");
    assert_eq!(faculty.url, "https://eng.ui.ac.id/");
    assert_eq!(faculty.discovery_stage, NavigationStage::SpecificFaculty);
    assert_eq!(faculty.navigation_path.len(), 4);
    assert_eq!(faculty.navigation_path[0].name, "Beranda");
    assert_eq!(faculty.navigation_path[3].url, "https://eng.ui.ac.id/");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.first().map(String::as_str), Some("https://www.ui.ac.id/"));
    assert_eq!(requests.last().map(String::as_str), Some("https://eng.ui.ac.id/"));
}

#[tokio::test]
async fn test_crawl_stops_once_every_faculty_is_found() {
    let mut listing = String::from("<html><body>");
    for host in KNOWN_FACULTY_HOSTS {
        listing.push_str(&format!(r#"<a href="https://{}/">{}</a>"#, host, host));
    }
    listing.push_str("</body></html>");

    let mut pages = vec![
        page(
            "https://www.ui.ac.id/",
            r#"<html><body><a href="/akademik/">Akademik</a></body></html>"#,
        ),
        page(
            "https://www.ui.ac.id/akademik/",
            r#"<html><body><a href="/akademik/fakultas/">Fakultas</a></body></html>"#,
        ),
        page("https://www.ui.ac.id/akademik/fakultas/", &listing),
    ];
    for host in KNOWN_FACULTY_HOSTS {
        pages.push(page(
            &format!("https://{}/", host),
            r#"<html><body><p>Program studi sarjana</p><a href="/riset/">Riset</a></body></html>"#,
        ));
    }
    let (fetcher, requests) = ScriptedFetcher::new(pages);

    let report = Crawler::new(fetcher, options(5, 100)).run().await;

    assert_eq!(report.termination, TerminationReason::AllFacultiesFound);
    assert_eq!(report.pages_crawled, 3 + KNOWN_FACULTY_HOSTS.len() as u32);
    assert!(report.missing_faculties(&expected_faculty_set()).is_empty());

    let found: Vec<&str> = report.faculties.iter().map(|f| f.name.as_str()).collect();
    for (host, name) in HOST_NAMES {
        if KNOWN_FACULTY_HOSTS.contains(host) {
            assert!(found.contains(name), "missing {}", name);
        }
    }

    // Sub-pages queued behind the roots are never reached
    let requests = requests.lock().unwrap();
    assert!(!requests.iter().any(|url| url.ends_with("/riset/")));
}

#[tokio::test]
async fn test_duplicate_faculty_names_are_kept_once() {
    let (fetcher, _requests) = ScriptedFetcher::new(vec![
        page(
            "https://www.ui.ac.id/",
            r#"<html><body><a href="https://eng.ui.ac.id/">FT UI</a></body></html>"#,
        ),
        page(
            "https://eng.ui.ac.id/",
            r#"<html><body><p>Program studi</p><a href="/tentang/">Tentang</a></body></html>"#,
        ),
        page("https://eng.ui.ac.id/tentang/", ENGINEERING_HOME),
    ]);

    let report = Crawler::new(fetcher, options(4, 20)).run().await;

    assert_eq!(report.pages_crawled, 3);
    assert_eq!(report.faculties.len(), 1);
    assert_eq!(report.faculties[0].url, "https://eng.ui.ac.id/");
}

#[tokio::test]
async fn test_missing_pages_are_skipped() {
    let (fetcher, requests) = ScriptedFetcher::new(vec![page(
        "https://www.ui.ac.id/",
        r#"<html><body>
            <a href="https://law.ui.ac.id/">FH UI</a>
            <a href="/akademik/">Akademik</a>
        </body></html>"#,
    )]);

    let report = Crawler::new(fetcher, options(3, 20)).run().await;

    assert_eq!(report.termination, TerminationReason::QueueExhausted);
    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.visited_count, 3);
    assert!(report.faculties.is_empty());
    assert_eq!(requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_http_fetcher_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/akademik/"))
        .and(header("user-agent", user_agent().header_value().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Akademik</body></html>"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&user_agent(), Duration::from_secs(5)).unwrap();
    let body = fetcher
        .fetch(&format!("{}/akademik/", mock_server.uri()))
        .await
        .unwrap();

    assert!(body.contains("Akademik"));
}

#[tokio::test]
async fn test_http_fetcher_reports_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hilang/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&user_agent(), Duration::from_secs(5)).unwrap();
    let result = fetcher
        .fetch(&format!("{}/hilang/", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status(404))));
}
