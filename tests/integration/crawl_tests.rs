//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use trawl::config::{load_config, FetcherSettings};
use trawl::crawler::{CancelFlag, Coordinator, FetchResult, HttpFetcher, LinkFilter, PageSource};
use trawl::output::{load_report_file, save_report_file};
use trawl::{crawl, crawl_blocking, CrawlReport, MaxDepth, SearchAction, SearchKind};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn rust_search() -> SearchAction {
    SearchAction::new(SearchKind::Word, "rust", false, Vec::new()).expect("valid search")
}

fn result_addresses(report: &CrawlReport) -> HashSet<String> {
    report.results().iter().map(|r| r.address.clone()).collect()
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><p>Rust at the root.</p>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><p>More rust here.</p><a href="/page3">Page 3</a></body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/page2", "<html><body>rust again</body></html>").await;

    // Depth 2 must never be requested
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("rust too deep"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", base_url);
    let report = crawl(&start, MaxDepth::Limited(1), None, rust_search())
        .await
        .expect("crawl should run");

    let expected: HashSet<String> = [
        start.clone(),
        format!("{}/page1", base_url),
        format!("{}/page2", base_url),
    ]
    .into_iter()
    .collect();
    assert_eq!(result_addresses(&report), expected);
    assert!(!result_addresses(&report).contains(&format!("{}/page3", base_url)));
    assert_eq!(report.max_depth(), MaxDepth::Limited(1));

    let root = report
        .results()
        .iter()
        .find(|r| r.address == start)
        .expect("root result");
    assert_eq!(root.matches, vec!["Rust"]);

    mock_server.verify().await;
}

#[test]
fn test_crawl_blocking_from_sync_code() {
    // The mock server needs a runtime of its own; the crawl builds another one
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let mock_server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/",
            r#"<html><body><p>Rust here.</p><a href="/next">Next</a></body></html>"#,
        )
        .await;
        mount_page(&server, "/next", "<html><body>rust there</body></html>").await;
        server
    });

    let start = format!("{}/", mock_server.uri());
    let report =
        crawl_blocking(&start, MaxDepth::Limited(1), None, rust_search()).expect("crawl should run");

    let expected: HashSet<String> = [start.clone(), format!("{}/next", mock_server.uri())]
        .into_iter()
        .collect();
    assert_eq!(result_addresses(&report), expected);
    assert_eq!(report.start_address(), start);
    assert_eq!(report.max_depth(), MaxDepth::Limited(1));
    assert!(report.end_time() >= report.start_time());
}

#[tokio::test]
async fn test_empty_action_still_reports() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/a">A</a></body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "<html><body>leaf</body></html>").await;

    let start = format!("{}/", mock_server.uri());
    let report = crawl(&start, MaxDepth::Limited(3), None, |_: &str| Vec::<String>::new())
        .await
        .expect("crawl should run");

    assert!(report.results().is_empty());
    assert_eq!(report.start_address(), start);
    assert_eq!(report.max_depth(), MaxDepth::Limited(3));
    assert!(report.start_time() > 0.0);
    assert!(report.end_time() >= report.start_time());
    assert_eq!(report.crawl_time(), report.end_time() - report.start_time());
}

#[tokio::test]
async fn test_failed_pages_are_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>rust
            <a href="/broken">Broken</a>
            <a href="/image.png">Image</a>
            <a href="/ok">Ok</a>
        </body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", "<html><body>rust</body></html>").await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"rust".to_vec(), "image/png"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", base_url);
    let report = crawl(&start, MaxDepth::Unlimited, None, rust_search())
        .await
        .expect("crawl should run");

    let expected: HashSet<String> = [start, format!("{}/ok", base_url)].into_iter().collect();
    assert_eq!(result_addresses(&report), expected);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_link_filter_limits_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a class="article" href="/story">Story</a>
            <a class="ad" href="/ad">Ad</a>
        </body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/story", "<html><body>rust story</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/ad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("rust ad"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let filter = LinkFilter::new().allow("class", ["article"]);
    let report = crawl(
        &format!("{}/", base_url),
        MaxDepth::Limited(1),
        Some(filter),
        rust_search(),
    )
    .await
    .expect("crawl should run");

    let expected: HashSet<String> = [format!("{}/story", base_url)].into_iter().collect();
    assert_eq!(result_addresses(&report), expected);

    mock_server.verify().await;
}

/// Answers every address instantly with a page that links nowhere
struct InstantSource;

#[async_trait]
impl PageSource for InstantSource {
    async fn fetch(&self, address: &str) -> FetchResult {
        FetchResult::Success {
            final_url: address.to_string(),
            status_code: 200,
            content_type: "text/html".to_string(),
            body: format!("<html><body>{}</body></html>", address),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_twenty_seeds_visited_exactly_once() {
    let seeds: Vec<String> = (0..20)
        .map(|i| format!("https://site{}.example/", i))
        .collect();

    let mut coordinator = Coordinator::new(
        Arc::new(InstantSource),
        Arc::new(|content: &str| vec![content.to_string()]),
        MaxDepth::Unlimited,
    );
    for seed in &seeds {
        coordinator = coordinator.seed(seed.clone());
    }
    let state = coordinator.state();
    let report = coordinator.run().await;

    let visited = state.seen.visited();
    assert_eq!(visited.len(), 20);
    assert_eq!(visited, seeds.iter().cloned().collect::<HashSet<_>>());
    assert_eq!(report.results().len(), 20);
    assert_eq!(result_addresses(&report).len(), 20);
    assert!(state.frontier.is_empty());
    assert!(state.downloaded.is_empty());
}

/// Links every page to two children and cancels the crawl on the first fetch
struct EndlessSite {
    cancel: CancelFlag,
}

#[async_trait]
impl PageSource for EndlessSite {
    async fn fetch(&self, address: &str) -> FetchResult {
        self.cancel.cancel();
        FetchResult::Success {
            final_url: address.to_string(),
            status_code: 200,
            content_type: "text/html".to_string(),
            body: format!(
                r#"<html><body><a href="{0}l/">L</a><a href="{0}r/">R</a></body></html>"#,
                address
            ),
        }
    }
}

#[tokio::test]
async fn test_cancel_stops_after_current_round() {
    let cancel = CancelFlag::new();
    let site = EndlessSite {
        cancel: cancel.clone(),
    };

    let coordinator = Coordinator::new(
        Arc::new(site),
        Arc::new(|_: &str| vec!["page".to_string()]),
        MaxDepth::Unlimited,
    )
    .with_cancel_flag(cancel)
    .seed("https://a.example/");
    let state = coordinator.state();
    let report = coordinator.run().await;

    assert_eq!(report.results().len(), 1);
    assert_eq!(state.seen.visited_count(), 1);
    assert_eq!(state.frontier.len(), 2);
}

#[tokio::test]
async fn test_config_driven_crawl_and_saved_reports() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h1>Rust News</h1><p>Nothing else.</p></body></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("trawl.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawler]
start-address = "{}"
max-depth = 0

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"

[action]
kind = "word"
term = "rust"
tags = ["h1"]
"#,
            base_url
        ),
    )
    .expect("write config");

    let config = load_config(&config_path).expect("config should load");
    assert_eq!(config.start_address(), format!("{}/", base_url));

    let fetcher = HttpFetcher::new(&config.fetcher_settings()).expect("client");
    let report = Coordinator::new(
        Arc::new(fetcher),
        Arc::new(config.build_action().expect("action")),
        config.max_depth().expect("depth"),
    )
    .with_filter(config.link_filter())
    .with_max_workers(config.crawler.max_workers)
    .seed(config.start_address())
    .run()
    .await;

    assert_eq!(report.results().len(), 1);
    assert_eq!(report.results()[0].matches, vec!["Rust"]);

    let json_path = save_report_file(&report, &dir.path().join("report.json")).expect("save json");
    let store_path =
        save_report_file(&report, &dir.path().join("report.store")).expect("save store");

    assert_eq!(load_report_file(&json_path).expect("load json"), report);
    assert_eq!(load_report_file(&store_path).expect("load store"), report);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_default_fetcher_settings_reach_server() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<html><body>rust</body></html>").await;

    let fetcher = HttpFetcher::new(&FetcherSettings::default()).expect("client");
    let result = fetcher.fetch(&format!("{}/", mock_server.uri())).await;
    assert!(matches!(result, FetchResult::Success { status_code: 200, .. }));
}
