use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    context::InboundRequest,
    error::ProxyError,
    proxy::{forward, UpstreamReply},
    server::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "ClickUp proxy is running",
    })
}

pub async fn proxy_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<UpstreamReply, ProxyError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProxyError::PayloadTooLarge
        } else {
            ProxyError::BodyRead(rejection.body_text())
        }
    });

    let inbound = InboundRequest::parse(method, &uri, &headers, body)?;
    forward(&state.client, &state.config.upstream_base, inbound).await
}

pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Cannot {} {}", method, uri.path()) })),
    )
}
