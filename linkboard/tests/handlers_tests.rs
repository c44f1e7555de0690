use linkboard::command_argument_builder;
use linkboard::handlers::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const LINKS_BODY: &str = r#"[
    {"parent": "https://example.com/blog", "url": "https://example.com/blog/gone", "response_code": "404", "response_reason": "Not Found"},
    {"parent": "https://example.com/", "url": "https://example.com/old", "response_code": "410"},
    {"parent": "https://example.com/blog", "url": "https://example.com/blog/moved", "response_code": "500"},
    {"url": "https://example.com/orphan", "response_code": "404"}
]"#;

async fn links_server() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/links/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LINKS_BODY))
        .mount(&mock_server)
        .await;

    mock_server
}

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["linkboard"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

#[test]
fn test_parse_endpoint_with_scheme() {
    assert_eq!(
        parse_endpoint("https://example.com/api/links/"),
        Ok("https://example.com/api/links/".to_string())
    );
}

#[test]
fn test_parse_endpoint_without_scheme() {
    assert_eq!(
        parse_endpoint("localhost:8080/api/links/"),
        Ok("http://localhost:8080/api/links/".to_string())
    );
    assert_eq!(parse_endpoint("example.com"), Ok("http://example.com/".to_string()));
}

#[test]
fn test_parse_endpoint_invalid() {
    assert!(parse_endpoint("not a valid url!!!").is_err());
    assert!(parse_endpoint("").is_err());
}

#[test]
fn test_load_options_from_args() {
    let args = sub_matches(&[
        "grouped",
        "-e",
        "links.example.com/api/",
        "--timeout",
        "3",
        "--user-agent",
        "probe/1.0",
        "-q",
    ]);

    let options = load_options_from_args(&args);

    assert_eq!(options.endpoint, "http://links.example.com/api/");
    assert_eq!(options.timeout_secs, 3);
    assert_eq!(options.user_agent, "probe/1.0");
    assert!(!options.show_progress);
}

#[test]
fn test_load_options_defaults() {
    let options = load_options_from_args(&sub_matches(&["flat"]));

    assert_eq!(options.endpoint, "http://localhost:8080/api/links/");
    assert_eq!(options.timeout_secs, 10);
    assert_eq!(options.user_agent, "LinkCheckerBot/0.0.1");
    assert!(options.show_progress);
}

#[test]
fn test_resolve_output_path() {
    assert_eq!(
        resolve_output_path(Path::new("/tmp/report.txt")),
        PathBuf::from("/tmp/report.txt")
    );

    let expanded = resolve_output_path(Path::new("~/report.txt"));
    assert!(!expanded.starts_with("~"));
    assert!(expanded.ends_with("report.txt"));
}

#[tokio::test]
async fn test_handle_grouped_writes_report() -> Result<(), Box<dyn std::error::Error>> {
    let server = links_server().await;
    let dir = TempDir::new()?;
    let output = dir.path().join("grouped.json");
    let endpoint = format!("{}/api/links/", server.uri());

    let args = sub_matches(&[
        "grouped",
        "-q",
        "-e",
        &endpoint,
        "-f",
        "json",
        "-o",
        output.to_str().unwrap(),
    ]);
    handle_grouped(&args).await?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(value["report"]["mount"], "broken-links-list");
    assert_eq!(
        value["report"]["view"]["parents"],
        serde_json::json!(["https://example.com/blog", "https://example.com/"])
    );
    assert_eq!(value["report"]["view"]["links"].as_array().unwrap().len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_handle_flat_writes_csv() -> Result<(), Box<dyn std::error::Error>> {
    let server = links_server().await;
    let dir = TempDir::new()?;
    let output = dir.path().join("flat.csv");
    let endpoint = format!("{}/api/links/", server.uri());

    let args = sub_matches(&[
        "flat",
        "-q",
        "-e",
        &endpoint,
        "-f",
        "csv",
        "-o",
        output.to_str().unwrap(),
    ]);
    handle_flat(&args).await?;

    let report = fs::read_to_string(&output)?;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[4], ",https://example.com/orphan,404,,,,,,");
    Ok(())
}

#[tokio::test]
async fn test_handle_grouped_sends_user_agent() -> Result<(), Box<dyn std::error::Error>> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "probe/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new()?;
    let output = dir.path().join("empty.txt");
    let args = sub_matches(&[
        "grouped",
        "-q",
        "-e",
        &mock_server.uri(),
        "--user-agent",
        "probe/2.0",
        "-o",
        output.to_str().unwrap(),
    ]);
    handle_grouped(&args).await?;

    assert!(fs::read_to_string(&output)?.contains("No links with a parent page."));
    Ok(())
}

#[tokio::test]
async fn test_handle_grouped_reports_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let args = sub_matches(&["grouped", "-q", "-e", &mock_server.uri()]);
    let err = handle_grouped(&args).await.unwrap_err();

    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_handle_flat_unwritable_output() {
    let server = links_server().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("missing").join("flat.txt");
    let endpoint = format!("{}/api/links/", server.uri());

    let args = sub_matches(&["flat", "-q", "-e", &endpoint, "-o", output.to_str().unwrap()]);
    let err = handle_flat(&args).await.unwrap_err();

    assert!(err.to_string().contains("Failed to write report"));
}
