//! Integration tests for the full archival run: directory resolution through
//! final summary counts.

use org_site_archiver::config::Config;
use org_site_archiver::submitter::run_archival;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test configuration wired to the given directory and save mocks.
fn create_test_config(directory_server: &MockServer, save_server: &MockServer) -> Config {
    Config {
        directory_api_host: directory_server.uri(),
        save_endpoint: format!("{}/save", save_server.uri()),
        ..Config::for_testing()
    }
}

async fn mount_save_success(save_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(save_server)
        .await;
}

#[tokio::test]
async fn test_run_filters_directory_and_appends_extra_hosts() {
    let directory_server = MockServer::start().await;
    let save_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "one", "description": "has a site", "website": "https://one.example.com"},
            {"id": "two", "description": "no site"},
            {"id": "three", "website": "https://three.example.com"}
        ])))
        .mount(&directory_server)
        .await;
    mount_save_success(&save_server).await;

    let config = Config {
        additional_hosts: vec!["https://extra.example.com".to_string()],
        ..create_test_config(&directory_server, &save_server)
    };

    let summary = run_archival(&config).await.expect("run should succeed");

    assert_eq!(summary.total(), 3, "two org websites plus one extra host");
    assert_eq!(summary.error_count(), 0);

    // Submissions happen in resolved order: directory entries, then extras.
    let requests = save_server.received_requests().await.expect("requests recorded");
    let bodies: Vec<String> = requests
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect();
    assert_eq!(requests.len(), 3);
    assert!(bodies[0].contains("one.example.com"));
    assert!(bodies[1].contains("three.example.com"));
    assert!(bodies[2].contains("extra.example.com"));
}

#[tokio::test]
async fn test_directory_failure_aborts_run() {
    let directory_server = MockServer::start().await;
    let save_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&directory_server)
        .await;
    mount_save_success(&save_server).await;

    let config = create_test_config(&directory_server, &save_server);
    let result = run_archival(&config).await;

    assert!(result.is_err(), "a failed directory fetch is fatal");
    let requests = save_server.received_requests().await.expect("requests recorded");
    assert!(requests.is_empty(), "nothing is submitted without a directory");
}

#[tokio::test]
async fn test_unparsable_directory_aborts_run() {
    let directory_server = MockServer::start().await;
    let save_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&directory_server)
        .await;
    mount_save_success(&save_server).await;

    let config = create_test_config(&directory_server, &save_server);
    assert!(run_archival(&config).await.is_err());
}

#[tokio::test]
async fn test_error_count_reflects_failed_urls() {
    let directory_server = MockServer::start().await;
    let save_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "one", "website": "https://gone.example.com"},
            {"id": "two", "website": "https://fine.example.com"}
        ])))
        .mount(&directory_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/save"))
        .and(body_string_contains("gone.example.com"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&save_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .and(body_string_contains("fine.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&save_server)
        .await;

    let config = create_test_config(&directory_server, &save_server);
    let summary = run_archival(&config).await.expect("run should succeed");

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.error_count(), 1);
    assert_eq!(summary.success_count(), 1);
    assert_eq!(summary.rate_limited_failures(), 0);
}

#[tokio::test]
async fn test_empty_directory_is_a_successful_run() {
    let directory_server = MockServer::start().await;
    let save_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&directory_server)
        .await;
    mount_save_success(&save_server).await;

    let config = create_test_config(&directory_server, &save_server);
    let summary = run_archival(&config).await.expect("run should succeed");

    assert_eq!(summary.total(), 0);
    assert_eq!(summary.error_count(), 0);
}
