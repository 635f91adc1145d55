use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{context::InboundRequest, error::ProxyError};

mod client;
mod request;

pub use client::build_client;
pub use request::{carries_body, upstream_body, upstream_url, UpstreamRequest};

/// Upper bound on raw upstream text echoed back to the caller.
pub const RESPONSE_SNIPPET_CHARS: usize = 500;
/// Upper bound on raw upstream text written to the log.
pub const LOG_SNIPPET_CHARS: usize = 200;

/// A JSON reply from ClickUp, relayed with its original status.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Sends one inbound request upstream and reads the whole reply.
pub async fn forward(
    client: &reqwest::Client,
    base: &str,
    inbound: InboundRequest,
) -> Result<UpstreamReply, ProxyError> {
    let upstream = UpstreamRequest::from_inbound(base, &inbound)?;

    info!(
        timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method = %upstream.method,
        url = %upstream.url,
        "Forwarding request"
    );

    let mut builder = client
        .request(upstream.method, upstream.url.as_str())
        .headers(upstream.headers);
    if let Some(body) = upstream.body {
        debug!(bytes = body.len(), "Attaching JSON body");
        builder = builder.body(body);
    }

    let response = builder.send().await.map_err(|e| {
        error!(url = %upstream.url, error = %e, "Proxy error");
        ProxyError::from(e)
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        error!(url = %upstream.url, status = status.as_u16(), error = %e, "Proxy error while reading upstream body");
        ProxyError::from(e)
    })?;

    interpret_response(status, &text)
}

/// Turns a raw upstream reply into what the caller gets back.
///
/// Failure statuses with a JSON body are relayed untouched, only logged.
pub fn interpret_response(status: StatusCode, text: &str) -> Result<UpstreamReply, ProxyError> {
    let body: Value = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(_) => {
            error!(
                status = status.as_u16(),
                body = %truncate_chars(text, LOG_SNIPPET_CHARS),
                "Non-JSON response"
            );
            return Err(ProxyError::InvalidUpstreamResponse {
                status,
                message: truncate_chars(text, RESPONSE_SNIPPET_CHARS).to_string(),
            });
        }
    };

    if !status.is_success() {
        error!(status = status.as_u16(), body = %body, "ClickUp API error");
    }

    Ok(UpstreamReply { status, body })
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
