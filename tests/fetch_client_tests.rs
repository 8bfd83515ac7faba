//! Integration tests for the page fetch client
//!
//! These tests use wiremock to stand in for the remote site.

use sdf_pipeline::config::HttpConfig;
use sdf_pipeline::crawler::{build_header_map, PageFetchClient};
use sdf_pipeline::storage::PageCache;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(dir: &TempDir) -> (PageFetchClient, PageCache) {
    let cache = PageCache::new(dir.path().join("cache"));
    let client = PageFetchClient::new(&HttpConfig::default(), cache.clone()).unwrap();
    (client, cache)
}

#[tokio::test]
async fn test_200_returns_body_and_caches_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (client, cache) = client(&dir);
    let url = format!("{}/page", server.uri());

    let result = client.fetch(&url, None).await;

    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.page_doc, "<html>hello</html>");
    assert_eq!(result.url, url);
    assert!(result.is_success());

    let cached = std::fs::read_to_string(cache.path_for(&url)).unwrap();
    assert_eq!(cached, "<html>hello</html>");
}

#[tokio::test]
async fn test_404_returns_status_without_body_or_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (client, cache) = client(&dir);
    let url = format!("{}/missing", server.uri());

    let result = client.fetch(&url, None).await;

    assert_eq!(result.status_code, Some(404));
    assert_eq!(result.page_doc, "");
    assert!(!cache.path_for(&url).exists());
}

#[tokio::test]
async fn test_refetch_overwrites_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("second"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (client, cache) = client(&dir);
    let url = format!("{}/page", server.uri());

    client.fetch(&url, None).await;
    let result = client.fetch(&url, None).await;

    assert_eq!(result.page_doc, "second");
    assert_eq!(std::fs::read_to_string(cache.path_for(&url)).unwrap(), "second");
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (client, _) = client(&dir);
    let url = format!("{}/private", server.uri());

    let headers = build_header_map([("X-Api-Key", "secret")]);
    let with_headers = client.fetch(&url, Some(&headers)).await;
    let without = client.fetch(&url, None).await;

    assert_eq!(with_headers.status_code, Some(200));
    assert_eq!(without.status_code, Some(403));
}

#[tokio::test]
async fn test_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = HttpConfig {
        user_agent: Some("TestBot/2.0".to_string()),
        ..HttpConfig::default()
    };
    let client = PageFetchClient::new(&config, PageCache::new(dir.path())).unwrap();

    let result = client.fetch(&format!("{}/", server.uri()), None).await;
    assert_eq!(result.status_code, Some(200));
}

#[tokio::test]
async fn test_connection_refused_is_empty_result() {
    let dir = TempDir::new().unwrap();
    let (client, cache) = client(&dir);
    let url = "http://127.0.0.1:1/unreachable";

    let result = client.fetch(url, None).await;

    assert_eq!(result.status_code, None);
    assert!(result.page_doc.is_empty());
    assert_eq!(result.url, url);
    assert!(!cache.path_for(url).exists());
}
