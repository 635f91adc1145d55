use http::{header, HeaderMap, HeaderValue, Method};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::{context::InboundRequest, error::ProxyError};

/// Fully resolved upstream call. Built from an [`InboundRequest`] and nothing else.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl UpstreamRequest {
    pub fn from_inbound(base: &str, inbound: &InboundRequest) -> Result<Self, ProxyError> {
        let url = upstream_url(base, &inbound.wildcard_path, &inbound.query);

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(header::AUTHORIZATION, inbound.authorization.clone());
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let body = upstream_body(&inbound.method, inbound.body.as_ref())?;

        Ok(Self {
            method: inbound.method.clone(),
            url,
            headers,
            body,
        })
    }
}

/// `<base>/<path>` plus the re-encoded query string when there is one.
pub fn upstream_url(base: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{}/{}", base, path);
    if !query.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        url.push('?');
        url.push_str(&encoded);
    }
    url
}

pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Mutating methods always send a JSON document (`{}` when the caller sent none).
/// Every other method sends nothing.
pub fn upstream_body(method: &Method, body: Option<&Value>) -> Result<Option<Vec<u8>>, ProxyError> {
    if !carries_body(method) {
        return Ok(None);
    }

    let bytes = match body {
        Some(value) => serde_json::to_vec(value)?,
        None => serde_json::to_vec(&Value::Object(Map::new()))?,
    };
    Ok(Some(bytes))
}
