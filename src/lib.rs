//! CORS-enabled reverse proxy in front of the ClickUp v2 API.
//!
//! Browser integrations call `/api/clickup/<path>` with their own
//! `Authorization` token; the request is replayed against ClickUp and the JSON
//! reply (or a normalized error) comes back with CORS headers for allowed
//! origins.

pub mod config;
pub mod context;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod proxy;
pub mod server;

pub use crate::{
    config::AppConfig,
    cors::OriginAllowList,
    error::{ProxyError, StartupError},
    server::ProxyServer,
};
