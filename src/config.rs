use std::{env, time::Duration};

use crate::{cors::OriginAllowList, error::StartupError};

/// Base URL of the ClickUp v2 REST API.
pub const CLICKUP_API_BASE: &str = "https://api.clickup.com/api/v2";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Inbound JSON bodies above this size are rejected with 413.
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub host: String,
    /// Upstream base without a trailing slash; the wildcard path is appended after `/`.
    pub upstream_base: String,
    pub upstream_timeout: Duration,
    pub body_limit: usize,
    pub allowed_origins: OriginAllowList,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            upstream_base: CLICKUP_API_BASE.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            body_limit: DEFAULT_BODY_LIMIT,
            allowed_origins: OriginAllowList::missive(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment. `.env` is loaded by the binary before this runs.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| StartupError::InvalidValue { key: "PORT", value: port })?;
        }

        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            config.host = host;
        }

        if let Some(timeout) = lookup("UPSTREAM_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(StartupError::InvalidValue {
                    key: "UPSTREAM_TIMEOUT_SECS",
                    value: timeout.clone(),
                })?;
            config.upstream_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Points the proxy at a different upstream, trimming any trailing slash.
    pub fn with_upstream_base(mut self, base: impl Into<String>) -> Self {
        self.upstream_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_allowed_origins(mut self, origins: OriginAllowList) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}
