//! End-to-end tests for the public HTTP surface.
//!
//! Requests go through the fully layered app (tracing + metrics middleware),
//! both in-process and over a real TCP listener.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use tower::ServiceExt;

use metrics_exporter_prometheus::PrometheusBuilder;

use minikube_probe::api::create_app;

const GREETING_BODY: &str = r#"{"message":"Hello from FastAPI on Minikube 🚀"}"#;
const STATUS_BODY: &str = r#"{"status":"ok"}"#;

async fn send(method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = create_app()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn defined_routes_return_literal_payloads() {
    let cases = [
        ("/", GREETING_BODY),
        ("/ready", STATUS_BODY),
        ("/health", STATUS_BODY),
    ];

    for (uri, expected) in cases {
        let (status, content_type, body) = send(Method::GET, uri).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
        assert_eq!(content_type.as_deref(), Some("application/json"), "GET {uri}");
        assert_eq!(body, expected, "GET {uri}");
    }
}

#[tokio::test]
async fn payloads_are_stable_across_calls() {
    for uri in ["/", "/ready", "/health"] {
        let (_, _, first) = send(Method::GET, uri).await;
        for _ in 0..5 {
            let (status, _, again) = send(Method::GET, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(again, first);
        }
    }
}

#[tokio::test]
async fn undefined_paths_return_404() {
    for uri in ["/nonexistent", "/healthz", "/ready/", "/docs"] {
        let (status, _, _) = send(Method::GET, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
    }
}

#[tokio::test]
async fn unsupported_methods_return_405() {
    for method in [Method::POST, Method::PUT, Method::DELETE] {
        for uri in ["/", "/ready", "/health"] {
            let (status, _, _) = send(method.clone(), uri).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        }
    }
}

#[tokio::test]
async fn head_requests_are_served_like_get() {
    for uri in ["/", "/ready", "/health"] {
        let (status, content_type, body) = send(Method::HEAD, uri).await;
        assert_eq!(status, StatusCode::OK, "HEAD {uri}");
        assert_eq!(content_type.as_deref(), Some("application/json"), "HEAD {uri}");
        assert_eq!(body, "", "HEAD {uri}");
    }
}

// Only test in this binary that installs the global recorder. Other tests
// may record concurrently, so assert on series, not counts.
#[tokio::test]
async fn requests_are_recorded_by_route_template() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    assert!(metrics::set_global_recorder(recorder).is_ok());

    send(Method::GET, "/ready").await;
    send(Method::GET, "/x/y").await;
    send(Method::POST, "/").await;

    let rendered = handle.render();
    for series in [
        r#"http_requests_total{method="GET",path="/ready",status="200"}"#,
        r#"http_requests_total{method="GET",path="unmatched",status="404"}"#,
        r#"http_requests_total{method="POST",path="/",status="405"}"#,
        r#"http_request_latency_ms_count{method="GET",path="/ready"}"#,
        r#"http_request_latency_ms_count{method="GET",path="unmatched"}"#,
    ] {
        assert!(rendered.contains(series), "missing {series} in:\n{rendered}");
    }
    assert!(!rendered.contains(r#"path="/x/y""#));
}

#[tokio::test]
async fn serves_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, create_app()).await.unwrap();
    });

    let client = reqwest::Client::new();

    let response = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Hello from FastAPI on Minikube 🚀");

    let response = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(response.text().await.unwrap(), STATUS_BODY);

    let response = client.post(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    server.abort();
}
