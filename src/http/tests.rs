//! Tests for the HTTP client module

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(5),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(!config.accept_invalid_certs);
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://cluster1.example.com/api")
        .timeout(Duration::from_secs(10))
        .max_retries(5)
        .accept_invalid_certs(true)
        .build();

    assert_eq!(
        config.base_url,
        Some("https://cluster1.example.com/api".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.max_retries, 5);
    assert!(config.accept_invalid_certs);
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .header("X-Vserver", "openstack")
        .json(serde_json::json!({"max-records": 50}));

    assert_eq!(
        config.headers.get("X-Vserver"),
        Some(&"openstack".to_string())
    );
    assert_eq!(config.body, Some(serde_json::json!({"max-records": 50})));
}

#[test]
fn test_build_url() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://cluster1/api/")
            .build(),
    )
    .unwrap();

    assert_eq!(client.build_url("/lun-get-iter"), "https://cluster1/api/lun-get-iter");
    assert_eq!(client.build_url("http://other/x"), "http://other/x");
}

#[test]
fn test_calculate_backoff() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(100),
                Duration::from_secs(1),
            )
            .build(),
    )
    .unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(10), Duration::from_secs(1));
    assert_eq!(client.calculate_backoff(40), Duration::from_secs(1));
}

#[tokio::test]
async fn test_post_text_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/volume-get-iter"))
        .and(body_json(serde_json::json!({"max-records": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"num-records\": \"0\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let body = client
        .post_text(
            "/volume-get-iter",
            RequestConfig::new().json(serde_json::json!({"max-records": 10})),
        )
        .await
        .unwrap();

    assert_eq!(body, "{\"num-records\": \"0\"}");
}

#[tokio::test]
async fn test_request_applies_auth_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lun-get-iter"))
        .and(basic_auth("admin", "secret"))
        .and(header("X-Vserver", "openstack"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    let client = HttpClient::with_auth(config, AuthConfig::basic("admin", "secret")).unwrap();

    let body = client
        .post_text(
            "/lun-get-iter",
            RequestConfig::new().header("X-Vserver", "openstack"),
        )
        .await
        .unwrap();

    assert_eq!(body, "{}");
}

#[tokio::test]
async fn test_retries_server_errors_then_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lun-get-iter"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .post_text("/lun-get-iter", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lun-get-iter"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .post_text("/lun-get-iter", RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .post_text("/lun-get-iter", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 0
        }
    ));
}

#[tokio::test]
async fn test_retry_recovers_after_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/volume-get-iter"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/volume-get-iter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"num-records\": \"0\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let body = client
        .post_text("/volume-get-iter", RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(body, "{\"num-records\": \"0\"}");
}

#[tokio::test]
async fn test_connection_refused_is_retried_then_reported() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let uri = format!("http://127.0.0.1:{port}");

    let config = HttpClientConfig::builder()
        .base_url(uri)
        .max_retries(1)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(1),
        )
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client
        .post_text("/volume-get-iter", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_retryable());
}
