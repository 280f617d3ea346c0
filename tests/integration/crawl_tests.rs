//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! full column crawls end-to-end against a temporary output directory.

use column_scribe::config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use column_scribe::crawler::{convert_article, crawl_column, CrawlContext, CrawlMode};
use column_scribe::index::{discover_columns, read_index, write_index};
use column_scribe::{CrawlState, PersistenceError, ScribeError};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOTICE: &str = "因收到Google相关通知，网站将会择期关闭";

/// Creates a test configuration pointing at the mock server and `root`
fn create_test_config(base_url: &str, root: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            listing_url: format!("{}/listing", base_url),
        },
        crawler: CrawlerConfig {
            request_timeout_secs: 5,
            pagination_delay_ms: 10, // Very short for testing
            menu_delay_ms: 10,
        },
        output: OutputConfig {
            root_dir: root.to_string_lossy().into_owned(),
            article_dir: root.join("articles").to_string_lossy().into_owned(),
            index_path: root.join("course_list.txt").to_string_lossy().into_owned(),
        },
        ..Config::default()
    }
}

/// Renders an article page in the site's template
fn article_page(title: Option<&str>, body: &str, next: Option<&str>) -> String {
    let title = title
        .map(|t| format!(r#"<h1 id="title">{}</h1>"#, t))
        .unwrap_or_default();
    let next = next
        .map(|href| format!(r#"<div id="nextPage"><a href="{}">Next</a></div>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><body>{}<div class="book-post">{}</div>{}</body></html>"#,
        title, body, next
    )
}

/// Renders a navigation menu whose last sub-list holds `items` (href, id)
fn menu_page(items: &[(&str, &str)]) -> String {
    let links: String = items
        .iter()
        .map(|(href, id)| {
            format!(
                r#"<li><a class="menu-item" id="{}" href="{}">{}</a></li>"#,
                id, href, id
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="book-menu uncollapsible">
            <ul class="uncollapsible"><li><a class="menu-item" id="home" href="/">Home</a></li></ul>
            <ul class="uncollapsible">{}</ul>
        </div></body></html>"#,
        links
    )
}

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read output file")
}

#[tokio::test]
async fn test_pagination_chain_saves_every_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        article_page(Some("Page A"), "<p>First</p>", Some("/col/b.md")),
    )
    .await;
    mount_html(
        &mock_server,
        "/col/b.md",
        article_page(Some("Page B"), "<p>Second</p>", Some("/col/c.md")),
    )
    .await;
    mount_html(
        &mock_server,
        "/col/c.md",
        article_page(Some("Page C"), "<p>Third</p>", None),
    )
    .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Chain", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.saved.len(), 3);
    assert_eq!(report.delays, 2);
    assert!(report.failed.is_empty());

    let column_dir = temp_dir.path().join("Chain");
    assert!(column_dir.join("assets").is_dir());
    assert!(read(&column_dir.join("Page A.md")).contains("First"));
    assert!(read(&column_dir.join("Page B.md")).contains("Second"));
    assert!(read(&column_dir.join("Page C.md")).contains("Third"));
}

#[tokio::test]
async fn test_pagination_cycle_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        article_page(Some("Page A"), "<p>A</p>", Some("/col/b.md")),
    )
    .await;
    mount_html(
        &mock_server,
        "/col/b.md",
        article_page(Some("Page B"), "<p>B</p>", Some("/col/a.md")),
    )
    .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Cycle", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.delays, 1);
}

#[tokio::test]
async fn test_pagination_failure_aborts_chain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        article_page(Some("Page A"), "<p>A</p>", Some("/col/b.md")),
    )
    .await;
    mount_status(&mock_server, "/col/b.md", 500).await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Broken", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Aborted);
    assert_eq!(report.saved.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].url.ends_with("/col/b.md"));
}

#[tokio::test]
async fn test_menu_skips_failed_article_and_donation_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col",
        menu_page(&[
            ("/col/1.md", "one"),
            ("/col/2.md", "two"),
            ("/col/3.md", "three"),
            ("/捐赠.md", "donate"),
        ]),
    )
    .await;
    mount_html(
        &mock_server,
        "/col/1.md",
        article_page(Some("One"), "<p>1</p>", None),
    )
    .await;
    mount_status(&mock_server, "/col/2.md", 404).await;
    mount_html(
        &mock_server,
        "/col/3.md",
        article_page(Some("Three"), "<p>3</p>", None),
    )
    .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Menu", "/col", CrawlMode::Menu)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.delays, 2);

    let column_dir = temp_dir.path().join("Menu");
    assert!(column_dir.join("One.md").exists());
    assert!(column_dir.join("Three.md").exists());
}

#[tokio::test]
async fn test_menu_listing_failure_aborts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_status(&mock_server, "/col", 503).await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Gone", "/col", CrawlMode::Menu)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Aborted);
    assert!(report.saved.is_empty());
    assert_eq!(report.delays, 0);
}

#[tokio::test]
async fn test_images_are_localized() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        article_page(
            Some("Pictures"),
            r#"<p><img src="/img/x.png" alt="x"></p><p><img src="/img/missing.png" alt="m"></p>"#,
            None,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&mock_server)
        .await;
    mount_status(&mock_server, "/img/missing.png", 404).await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Images", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");
    assert_eq!(report.saved.len(), 1);

    let column_dir = temp_dir.path().join("Images");
    let markdown = read(&column_dir.join("Pictures.md"));
    assert!(markdown.contains("./assets/x.png"));
    assert!(markdown.contains("/img/missing.png"));
    assert_eq!(
        std::fs::read(column_dir.join("assets").join("x.png")).expect("Asset should exist"),
        vec![0x89, b'P', b'N', b'G']
    );

    // A second run produces the same file
    let rerun = crawl_column(&config, "Images", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");
    assert_eq!(rerun.state, CrawlState::Done);
    assert_eq!(read(&column_dir.join("Pictures.md")), markdown);
    assert_eq!(
        std::fs::read_dir(column_dir.join("assets"))
            .expect("Assets dir should exist")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_non_ascii_image_name_is_decoded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        article_page(Some("Diagram"), r#"<p><img src="assets/架构图.png"></p>"#, None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/col/assets/%E6%9E%B6%E6%9E%84%E5%9B%BE.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8, 7, 7]))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Unicode", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");
    assert_eq!(report.saved.len(), 1);

    let column_dir = temp_dir.path().join("Unicode");
    let markdown = read(&column_dir.join("Diagram.md"));
    assert!(markdown.contains("./assets/架构图.png"), "{}", markdown);
    assert!(!markdown.contains("%E6"), "{}", markdown);
    assert_eq!(
        std::fs::read(column_dir.join("assets").join("架构图.png")).expect("Asset should exist"),
        vec![7u8, 7, 7]
    );
}

#[tokio::test]
async fn test_column_name_cannot_leave_root_dir() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().join("root");
    let outside = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        article_page(Some("T"), "<p>x</p>", None),
    )
    .await;

    let config = create_test_config(&base_url, &root);
    let absolute = outside.path().join("escaped");

    for name in ["../up", absolute.to_str().expect("Temp path should be UTF-8")] {
        let result = crawl_column(&config, name, "/col/a.md", CrawlMode::Pagination).await;
        assert!(
            matches!(
                result,
                Err(ScribeError::Persistence(PersistenceError::InvalidColumnName { .. }))
            ),
            "{:?} should be rejected",
            name
        );
    }

    assert!(!temp_dir.path().join("up").exists());
    assert!(!absolute.exists());
    assert_eq!(
        mock_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0),
        0
    );
}

#[tokio::test]
async fn test_menu_page_without_menu_finishes_empty() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col",
        article_page(Some("Not a menu"), "<p>No navigation here</p>", None),
    )
    .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "NoMenu", "/col", CrawlMode::Menu)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Done);
    assert!(report.saved.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(report.delays, 0);
}

#[tokio::test]
async fn test_notice_banner_removed_and_title_fallback() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let body = format!(
        r#"<div align="center"><p>{}</p></div><p>Real content</p>"#,
        NOTICE
    );
    mount_html(&mock_server, "/col/a.md", article_page(None, &body, None)).await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Untitled", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");
    assert_eq!(report.saved.len(), 1);

    let saved = &report.saved[0];
    let file_name = saved
        .file_name()
        .and_then(|n| n.to_str())
        .expect("Saved file should have a name");
    assert!(file_name.starts_with("article_"));
    assert!(file_name.ends_with(".md"));

    let markdown = read(saved);
    assert!(markdown.contains("Real content"));
    assert!(!markdown.contains(NOTICE));
}

#[tokio::test]
async fn test_missing_content_container_fails_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/col/a.md",
        "<html><body><h1 id=\"title\">Empty</h1></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let report = crawl_column(&config, "Empty", "/col/a.md", CrawlMode::Pagination)
        .await
        .expect("Crawl should start");

    assert_eq!(report.state, CrawlState::Aborted);
    assert!(report.saved.is_empty());
    assert!(!temp_dir.path().join("Empty").join("Empty.md").exists());
}

#[tokio::test]
async fn test_convert_single_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/notes/intro.md",
        article_page(None, r#"<p>See <a href="https://example.com/">here</a></p>"#, None),
    )
    .await;

    let config = create_test_config(&base_url, temp_dir.path());
    let outcome = convert_article(&config, &format!("{}/notes/intro.md", base_url))
        .await
        .expect("Article should convert");

    assert_eq!(outcome.title, "intro");
    assert_eq!(outcome.path, temp_dir.path().join("articles").join("intro.md"));
    assert!(read(&outcome.path).contains("[here](https://example.com/)"));
}

#[tokio::test]
async fn test_discover_columns_builds_index() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &mock_server,
        "/listing",
        menu_page(&[("/col1", "Column One"), ("/col2", "Column Two")]),
    )
    .await;
    mount_html(
        &mock_server,
        "/col1",
        article_page(
            None,
            r#"<div><ul><li><a href="/col1/first.md">First</a></li><li><a href="/col1/second.md">Second</a></li></ul></div>"#,
            None,
        ),
    )
    .await;
    mount_status(&mock_server, "/col2", 404).await;

    let config = create_test_config(&base_url, temp_dir.path());
    let context = CrawlContext::from_config(&config).expect("Context should build");
    let listing = url::Url::parse(&config.site.listing_url).expect("Listing URL should parse");

    let entries = discover_columns(&context, &listing).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].column, "Column One");
    assert_eq!(
        entries[0].first_article_url,
        format!("{}/col1/first.md", base_url)
    );

    let index_path = Path::new(&config.output.index_path);
    assert_eq!(write_index(index_path, &entries).expect("Index should write"), 1);
    assert_eq!(read_index(index_path).expect("Index should read"), entries);
}
