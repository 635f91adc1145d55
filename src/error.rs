use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::io;

/// Everything that can stop a request from being relayed as-is.
///
/// Each variant maps to one JSON body shape; the conversion happens in
/// [`IntoResponse`] so handlers only ever deal in `Result`.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Missing authorization header")]
    MissingAuthorization,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// Upstream answered, but not with JSON. `message` is already truncated.
    #[error("Invalid response from ClickUp API")]
    InvalidUpstreamResponse { status: StatusCode, message: String },

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Missing authorization header" }),
            ),
            ProxyError::InvalidBody(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid JSON body", "type": "BodyParseError" }),
            ),
            ProxyError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": "Request body too large", "type": "PayloadTooLarge" }),
            ),
            ProxyError::InvalidUpstreamResponse { status, message } => (
                *status,
                json!({
                    "error": "Invalid response from ClickUp API",
                    "status": status.as_u16(),
                    "message": message,
                }),
            ),
            ProxyError::BodyRead(_) | ProxyError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string(), "type": "ProxyError" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Failures that keep the process from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to build upstream HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),
}
