//! Cross-origin policy for the Missive integration.
//!
//! Only allow-listed origins get `Access-Control-Allow-Origin` and
//! `Access-Control-Allow-Credentials`. Everyone else is still served, the
//! browser just won't let the page read the response.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowOrigin, CorsLayer};

/// Exact origins plus parent-domain suffixes that may call the proxy from a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginAllowList {
    exact: Vec<String>,
    suffixes: Vec<String>,
}

impl OriginAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missive's web app, its integration iframe host, any other
    /// `*.missiveapp.com` origin and local development.
    pub fn missive() -> Self {
        Self::new()
            .with_origin("https://mail.missiveapp.com")
            .with_origin("https://integrations.missiveapp.com")
            .with_suffix(".missiveapp.com")
            .with_origin("http://localhost:3000")
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.exact.push(origin.into());
        self
    }

    /// Matches any origin whose serialization ends with `suffix`, scheme included
    /// in the comparison target (so `.example.com` matches `http://a.example.com`).
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.exact.iter().any(|allowed| allowed == origin)
            || self.suffixes.iter().any(|suffix| origin.ends_with(suffix.as_str()))
    }

    pub fn allows_header(&self, origin: &HeaderValue) -> bool {
        origin.to_str().map(|o| self.allows(o)).unwrap_or(false)
    }
}

/// Builds the CORS layer. Credentials are only advertised to allowed origins.
pub fn cors_layer(origins: OriginAllowList) -> CorsLayer {
    let origins = Arc::new(origins);
    let for_origin = Arc::clone(&origins);
    let for_credentials = origins;

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| for_origin.allows_header(origin),
        ))
        .allow_credentials(AllowCredentials::predicate(
            move |origin: &HeaderValue, _parts: &Parts| for_credentials.allows_header(origin),
        ))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Removes every `access-control-*` header unless the request came from an
/// allowed origin. Must sit outside [`cors_layer`], which advertises methods
/// and headers on every preflight.
pub async fn strip_foreign_cors(
    State(origins): State<Arc<OriginAllowList>>,
    request: Request,
    next: Next,
) -> Response {
    let allowed = request
        .headers()
        .get(header::ORIGIN)
        .map(|origin| origins.allows_header(origin))
        .unwrap_or(false);

    let mut response = next.run(request).await;
    if !allowed {
        let cors_headers: Vec<HeaderName> = response
            .headers()
            .keys()
            .filter(|name| name.as_str().starts_with("access-control-"))
            .cloned()
            .collect();
        for name in cors_headers {
            response.headers_mut().remove(name);
        }
    }
    response
}
