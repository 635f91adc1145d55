use axum::http::{header, HeaderMap, HeaderValue, Method, Uri};
use bytes::Bytes;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ProxyError;

/// Path prefix under which everything is forwarded upstream.
pub const PROXY_PREFIX: &str = "/api/clickup/";

/// What the proxy keeps from an inbound request after validation.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Everything after [`PROXY_PREFIX`], still percent-encoded.
    pub wildcard_path: String,
    /// Decoded query pairs in their original order, duplicates kept.
    pub query: Vec<(String, String)>,
    pub authorization: HeaderValue,
    pub body: Option<Value>,
}

impl InboundRequest {
    /// Validates the credential first, then the body.
    ///
    /// The body is only parsed when the caller declared a JSON content type,
    /// an empty JSON body counts as no body.
    pub fn parse(
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Result<Bytes, ProxyError>,
    ) -> Result<Self, ProxyError> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or(ProxyError::MissingAuthorization)?;

        let wildcard_path = uri
            .path()
            .strip_prefix(PROXY_PREFIX)
            .unwrap_or_default()
            .to_string();

        let query = uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let bytes = body?;
        let body = if is_json_content_type(headers) && !bytes.is_empty() {
            Some(parse_json_document(&bytes)?)
        } else {
            None
        };

        Ok(Self {
            method,
            wildcard_path,
            query,
            authorization,
            body,
        })
    }
}

/// Only objects and arrays are accepted as a top-level body.
fn parse_json_document(bytes: &[u8]) -> Result<Value, ProxyError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if value.is_object() || value.is_array() {
        Ok(value)
    } else {
        Err(ProxyError::InvalidBody(serde::de::Error::custom(
            "JSON body must be an object or an array",
        )))
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
