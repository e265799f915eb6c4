//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small forum and run the full
//! harvest cycle end-to-end against it, writing a real report file.

use forum_harvest::config::{
    load_config, AggregationMode, Config, CrawlerConfig, KeywordConfig, OutputConfig, PageSpec,
    ReportFormat, SelectorConfig, SiteConfig,
};
use forum_harvest::crawler::harvest;
use std::io::Write;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock forum
fn create_test_config(base_url: &str, pages: PageSpec, report: &str) -> Config {
    Config {
        site: SiteConfig {
            list_base_uri: format!("{}/thread.php?fid=3", base_url),
            detail_base_uri: base_url.to_string(),
        },
        pages,
        keywords: KeywordConfig {
            link: vec!["Weekly".to_string()],
            detail: vec!["CLUB".to_string()],
        },
        crawler: CrawlerConfig {
            concurrency_cap: 4,
            bucket_delay_unit_seconds: 0,
            request_timeout_seconds: 5,
            ..CrawlerConfig::default()
        },
        selectors: SelectorConfig::default(),
        output: OutputConfig {
            file: report.to_string(),
            format: ReportFormat::Html,
        },
    }
}

fn listing_page(rows: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><head><title>Board</title></head><body><table>");
    for (href, text, date) in rows {
        html.push_str(&format!(
            r#"<tr><td><h3><a href="{}">{}</a></h3></td><td><a class="f10">{}</a></td></tr>"#,
            href, text, date
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn thread_page(title: &str, published: &str, content: &str) -> String {
    format!(
        r#"<html><body>
        <h1 id="subject_tpc">{}</h1>
        <div class="fl gray">Time{}</div>
        <div class="tpc_content">{}</div>
        </body></html>"#,
        title, published, content
    )
}

async fn mount_listing(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/thread.php"))
        .and(query_param("page", page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_thread(server: &MockServer, tid: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/read.php"))
        .and(query_param("tid", tid))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_harvest_single_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&[
            ("read.php?tid=1", "Weekly roundup", "2023-11-05"),
            ("read.php?tid=2", "Off topic", "2023-11-06"),
        ]),
    )
    .await;

    mount_thread(
        &mock_server,
        "1",
        html_response(thread_page(
            "Weekly roundup",
            "2023-11-05 10:00",
            "Today: CLUB-123 and nothing else",
        )),
    )
    .await;

    // The non-matching thread must never be requested
    Mock::given(method("GET"))
        .and(path("/read.php"))
        .and(query_param("tid", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.html");
    let config = create_test_config(
        &base_url,
        PageSpec { start: 1, end: 1 },
        report.to_str().unwrap(),
    );

    let summary = harvest(config).await.expect("Harvest failed");

    assert_eq!(summary.listing_pages_fetched, 1);
    assert_eq!(summary.entries_found, 1);
    assert_eq!(summary.detail_pages_fetched, 1);
    assert_eq!(summary.records_emitted, 1);
    assert!(!summary.cancelled);

    let content = std::fs::read_to_string(&report).expect("Report missing");
    assert_eq!(content.matches("<p>").count(), 1);
    assert!(content.contains("<span>CLUB-123</span>"));
    assert!(content.contains("2023-11-05 10:00"));
    assert!(content.contains(&format!("{}/read.php?tid=1", base_url)));
}

#[tokio::test]
async fn test_failed_thread_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&[
            ("read.php?tid=1", "Weekly one", "2023-11-05"),
            ("read.php?tid=2", "Weekly two", "2023-11-07"),
        ]),
    )
    .await;

    mount_thread(
        &mock_server,
        "1",
        html_response(thread_page("Weekly one", "2023-11-05 10:00", "CLUB-111")),
    )
    .await;
    mount_thread(&mock_server, "2", ResponseTemplate::new(500)).await;

    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.html");
    let config = create_test_config(
        &base_url,
        PageSpec { start: 1, end: 1 },
        report.to_str().unwrap(),
    );

    let summary = harvest(config).await.expect("Harvest failed");

    assert_eq!(summary.detail_pages_fetched, 1);
    assert_eq!(summary.detail_pages_failed, 1);
    assert_eq!(summary.records_emitted, 1);

    let content = std::fs::read_to_string(&report).unwrap();
    assert!(content.contains("CLUB-111"));
    assert!(!content.contains("tid=2"));
}

#[tokio::test]
async fn test_report_is_truncated_and_sorted_across_buckets() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&[("read.php?tid=1", "Weekly november", "2023-11-05")]),
    )
    .await;
    mount_listing(
        &mock_server,
        "2",
        listing_page(&[("read.php?tid=2", "Weekly december", "2023-12-02")]),
    )
    .await;

    mount_thread(
        &mock_server,
        "1",
        html_response(thread_page("November", "2023-11-05 10:00", "CLUB-101")),
    )
    .await;
    mount_thread(
        &mock_server,
        "2",
        html_response(thread_page("December", "2023-12-02 08:30", "CLUB-202")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.md");
    std::fs::write(&report, "stale content from an earlier run\n").unwrap();

    let mut config = create_test_config(
        &base_url,
        PageSpec { start: 1, end: 2 },
        report.to_str().unwrap(),
    );
    config.output.format = ReportFormat::Markdown;

    let summary = harvest(config).await.expect("Harvest failed");
    assert_eq!(summary.buckets, 2);
    assert_eq!(summary.records_emitted, 2);

    let content = std::fs::read_to_string(&report).unwrap();
    assert!(!content.contains("stale content"));

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("CLUB-202"), "newest record first");
    assert!(lines[1].contains("CLUB-101"));
}

#[tokio::test]
async fn test_per_page_harvest_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&[("read.php?tid=7", "Weekly seven", "2024-01-03")]),
    )
    .await;
    mount_thread(
        &mock_server,
        "7",
        html_response(thread_page("Seven", "2024-01-03 18:00", "CLUB-777 CLUB-778")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.html");
    let config_path = dir.path().join("harvest.toml");

    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        r#"
[site]
list-base-uri = "{base}/thread.php?fid=3"
detail-base-uri = "{base}"

[pages]
start = 1
end = 1

[keywords]
link = ["Weekly"]
detail = ["CLUB"]

[crawler]
concurrency-cap = 2
aggregation = "per-page"

[output]
file = "{report}"
"#,
        base = base_url,
        report = report.display()
    )
    .unwrap();
    drop(file);

    let config = load_config(&config_path).expect("Config should load");
    assert_eq!(config.crawler.aggregation, AggregationMode::PerPage);

    let summary = harvest(config).await.expect("Harvest failed");
    assert_eq!(summary.records_emitted, 1);

    let content = std::fs::read_to_string(&report).unwrap();
    assert!(content.contains("CLUB-777,CLUB-778"));
}
