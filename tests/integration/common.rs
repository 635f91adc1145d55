use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use clickup_proxy::{AppConfig, ProxyServer};
use serde_json::Value;

/// An address nothing listens on, for "upstream unreachable" cases.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";

pub const TEST_TOKEN: &str = "pk_test_123";

/// Router for a proxy whose upstream is `base` (usually `mockito::Server::url()`).
pub fn proxy_for(base: &str) -> Router {
    proxy_with(AppConfig::default().with_upstream_base(base))
}

pub fn proxy_with(config: AppConfig) -> Router {
    ProxyServer::new(config)
        .expect("failed to build proxy server")
        .router()
}

pub fn authorized(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", TEST_TOKEN)
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    authorized(method, uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    authorized(method, uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body is not JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}
