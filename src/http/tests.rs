//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.read_timeout, Duration::from_secs(10));
    assert!(config.api_token.is_none());
    assert!(config.rate_limit.is_none());
    assert_eq!(
        config.default_headers.get("Content-Type"),
        Some(&"application/json".to_string())
    );
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://motels.example.com")
        .api_token("secret")
        .timeouts(Duration::from_secs(1), Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::per_second(20))
        .header("X-Run", "seed")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://motels.example.com");
    assert_eq!(config.api_token, Some("secret".to_string()));
    assert_eq!(config.connect_timeout, Duration::from_secs(1));
    assert_eq!(config.read_timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_second(20)));
    assert_eq!(config.default_headers.get("X-Run"), Some(&"seed".to_string()));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_url_building() {
    let config = HttpClientConfig::builder()
        .base_url("http://localhost:8085/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(
        client.url("/motelApi/v1/ping"),
        "http://localhost:8085/motelApi/v1/ping"
    );
    assert_eq!(
        client.url("motelApi/v1/ping"),
        "http://localhost:8085/motelApi/v1/ping"
    );
    assert_eq!(client.url("https://other/x"), "https://other/x");
}

#[tokio::test]
async fn test_get_json_with_query_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motels"))
        .and(query_param("page", "0"))
        .and(query_param("size", "50"))
        .and(header("Authorization", "Bearer token-123"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"http_code": "200", "data": {"content": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_token("token-123")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let query = vec![
        ("page".to_string(), "0".to_string()),
        ("size".to_string(), "50".to_string()),
    ];
    let body = client.get_json("/motelApi/v1/motels", &query).await.unwrap();
    assert_eq!(body["response"]["http_code"], "200");
}

#[tokio::test]
async fn test_non_2xx_is_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_json("/missing", &[])
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "nope");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/motelApi/v1/motels"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .post_json("/motelApi/v1/motels", &json!({"motelName": "x"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_post_json_sends_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/motelApi/v1/motels"))
        .and(body_json(json!({"motelName": "The Lee's Inns - Motel1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "response": {"http_code": "201", "data": {"motelId": "m-1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .post_json(
            "/motelApi/v1/motels",
            &json!({"motelName": "The Lee's Inns - Motel1"}),
        )
        .await
        .unwrap();

    assert_eq!(reply["response"]["data"]["motelId"], "m-1");
}

#[tokio::test]
async fn test_post_json_non_json_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .post_json("/create", &json!({}))
        .await
        .unwrap();

    assert_eq!(reply, json!({"status_code": 201}));
}

#[tokio::test]
async fn test_get_json_invalid_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_json("/list", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_get_probe_tolerates_non_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/motelApi/v1/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let probe = client_for(&server)
        .get_probe("/motelApi/v1/ping")
        .await
        .unwrap();

    assert_eq!(probe.status, 200);
    assert!(probe.body.is_none());
}

#[tokio::test]
async fn test_timeout_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .timeouts(Duration::from_secs(1), Duration::from_millis(50))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get_json("/slow", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Nothing listens on port 9 on the loopback interface
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .timeouts(Duration::from_millis(200), Duration::from_millis(200))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get_json("/anything", &[]).await.unwrap_err();
    assert!(err.is_transient(), "{err:?}");
}

/// Reads one request, headers and body, off the socket
async fn read_request(socket: &mut tokio::net::TcpStream) {
    use tokio::io::AsyncReadExt;

    let mut seen = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        seen.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&seen).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let line = line.to_ascii_lowercase();
                    line.strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if seen.len() >= end + 4 + length {
                return;
            }
        }
    }
}

#[tokio::test]
async fn test_post_json_truncated_reply_is_not_retried() {
    use crate::retry::{retry_transient, RetryPolicy};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    // Answers 201 but hangs up before the promised body is complete
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            read_request(&mut socket).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 201 Created\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"response\"",
                )
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let config = HttpClientConfig::builder()
        .base_url(format!("http://{addr}"))
        .timeouts(Duration::from_secs(1), Duration::from_secs(2))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let body = json!({"name": "Roadside"});
    let result = retry_transient(&RetryPolicy::default(), "create_chain", || {
        client.post_json("/chains", &body)
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err:?}");
    assert!(!err.is_transient());
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_http_client_with_rate_limiter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    for _ in 0..3 {
        client.get_json("/paced", &[]).await.unwrap();
    }
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("HttpClient"));
    assert!(debug.contains("has_token"));
}
