//! Integration tests for the harvester
//!
//! These tests use wiremock to serve search result pages and run the full harvest cycle
//! end-to-end through the HTTP renderer.

use autotrader_harvest::config::{load_config, Config, RendererKind};
use autotrader_harvest::crawler::run_harvest;
use autotrader_harvest::output::HEADER;
use autotrader_harvest::state::AbandonReason;
use autotrader_harvest::HarvestError;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(name: &str, price: &str, specs: &[&str]) -> String {
    let items: String = specs.iter().map(|s| format!("<li>{}</li>", s)).collect();
    format!(
        r#"<div data-testid="trader-seller-listing">
            <a data-testid="search-listing-title" href="/bike/{name}"><h3>{name}</h3></a>
            <span class="at__sc-1mc7cl3-7 icLPGk">{price}</span>
            <ul data-testid="search-listing-specs">{items}</ul>
            <p data-testid="search-listing-seller">Private seller</p>
        </div>"#,
        name = name,
        price = price,
        items = items
    )
}

/// A results page; the container is present even when there are no listings
fn results_page(listings: &[String]) -> String {
    format!(
        r#"<html><body><div data-testid="advertCard">{}</div></body></html>"#,
        listings.concat()
    )
}

/// A page on which the results container never appears
fn blank_page() -> String {
    "<html><body><p>Loading...</p></body></html>".to_string()
}

async fn serve(server: &MockServer, category: &str, min: &str, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/bike-search"))
        .and(query_param("body-type", category))
        .and(query_param("minimum-mileage", min))
        .and(query_param("page", page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}

/// Writes a configuration file pointing at the mock server and loads it
fn write_config(dir: &Path, server_uri: &str) -> Config {
    let config_path = dir.join("harvest.toml");
    let content = format!(
        r#"
[search]
base-url = "{uri}/bike-search"
postcode = "SO19 9QZ"

[axes]
categories = ["Naked", "Scooter"]
mileage-brackets = [[0, 1000], [1000, 5000]]

[crawler]
max-pages = 5
min-delay-ms = 0
max-delay-ms = 0

[browser]
engine = "http"
render-timeout-secs = 5

[output]
directory = "{out}"
error-log = "{log}"
"#,
        uri = server_uri,
        out = dir.join("raw").display(),
        log = dir.join("error_log.txt").display(),
    );
    std::fs::write(&config_path, content).unwrap();

    load_config(&config_path).expect("Failed to load test config")
}

#[tokio::test]
async fn test_full_harvest_over_http() {
    let server = MockServer::start().await;

    // Naked, 0-1000: two listings, then an empty page
    serve(
        &server,
        "Naked",
        "0",
        "1",
        html(results_page(&[
            listing("Yamaha MT-07", "£5,995", &["2019 (69 reg)", "689cc", "4,100 miles", "2 owners"]),
            listing("Honda CB650R", "£6,450", &["2020 (20 reg)", "649cc"]),
        ])),
    )
    .await;
    serve(&server, "Naked", "0", "2", html(results_page(&[]))).await;

    // Naked, 1000-5000: a server error, one listing, then nothing renders
    serve(&server, "Naked", "1000", "1", ResponseTemplate::new(503)).await;
    serve(
        &server,
        "Naked",
        "1000",
        "2",
        html(results_page(&[listing("Kawasaki Z650", "£4,250", &["3,900 miles"])])),
    )
    .await;
    serve(&server, "Naked", "1000", "3", html(blank_page())).await;

    // Scooter: results never render, so only the first page of each bracket is requested
    serve(&server, "Scooter", "0", "1", html(blank_page())).await;
    serve(&server, "Scooter", "1000", "1", html(blank_page())).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri());
    assert_eq!(config.browser.engine, RendererKind::Http);

    let report = run_harvest(config).await.expect("Harvest failed");

    // Records
    assert_eq!(report.summary.records_written, 3);
    let names: Vec<_> = report
        .records
        .iter()
        .map(|r| r.name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["Yamaha MT-07", "Honda CB650R", "Kawasaki Z650"]);

    let first = &report.records[0];
    assert_eq!(first.year.as_deref(), Some("2019 (69 reg)"));
    assert_eq!(first.engine.as_deref(), Some("689cc"));
    assert_eq!(first.mileage.as_deref(), Some("4,100 miles"));
    assert_eq!(first.owners.as_deref(), Some("2 owners"));
    assert_eq!(first.seller.as_deref(), Some("Private seller"));
    assert_eq!(first.dealership, None);

    // Traversal
    let stats = &report.summary.stats;
    assert_eq!(stats.pages_requested, 7);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.brackets_abandoned[&AbandonReason::Timeout], 3);
    assert_eq!(stats.brackets_abandoned[&AbandonReason::NoListings], 1);

    // Error log
    assert_eq!(report.errors.len(), 1);
    let log = std::fs::read_to_string(dir.path().join("error_log.txt")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" - Error on page 1 for Naked, 1000-5000: HTTP 503"));

    // Output file
    let output = &report.summary.output_path;
    assert!(output.starts_with(dir.path().join("raw")));
    let content = std::fs::read_to_string(output).unwrap();
    let rows: Vec<Vec<&str>> = content.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], HEADER.to_vec());
    assert_eq!(rows[1][0], "Yamaha MT-07");
    assert_eq!(rows[1][8], "Naked");
    assert_eq!(rows[3][9], "1000");
    assert_eq!(rows[3][10], "5000");

    let dates: Vec<&str> = rows[1..].iter().map(|row| row[11]).collect();
    assert!(dates.iter().all(|d| *d == dates[0]));
}

#[tokio::test]
async fn test_unreachable_webdriver_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.browser.engine = RendererKind::Webdriver;
    config.browser.webdriver_url = "http://127.0.0.1:9".to_string();
    config.output.directory = dir.path().join("raw").to_string_lossy().into_owned();
    config.output.error_log = dir.path().join("error_log.txt").to_string_lossy().into_owned();

    let result = run_harvest(config).await;

    assert!(matches!(result, Err(HarvestError::Session(_))));
    assert!(!dir.path().join("raw").exists());
}
