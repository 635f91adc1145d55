use std::{future::Future, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    cors::{cors_layer, strip_foreign_cors},
    error::StartupError,
    handlers,
    proxy::build_client,
};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: reqwest::Client,
}

/// One proxy instance: configuration plus the upstream client built from it.
pub struct ProxyServer {
    state: AppState,
}

impl ProxyServer {
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        let client = build_client(config.upstream_timeout).map_err(StartupError::Client)?;
        Ok(Self {
            state: AppState {
                config: Arc::new(config),
                client,
            },
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    pub fn router(&self) -> Router {
        let config = &self.state.config;
        debug!(
            upstream = %config.upstream_base,
            body_limit = config.body_limit,
            "Creating application router"
        );

        Router::new()
            .route(
                "/health",
                get(handlers::health_check).fallback(handlers::not_found),
            )
            .route("/api/clickup/", any(handlers::proxy_request))
            .route("/api/clickup/*path", any(handlers::proxy_request))
            .fallback(handlers::not_found)
            .layer(DefaultBodyLimit::max(config.body_limit))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(config.allowed_origins.clone()))
            .layer(from_fn_with_state(
                Arc::new(config.allowed_origins.clone()),
                strip_foreign_cors,
            ))
    }

    /// Binds `host:port` and serves until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.config().host, self.config().port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;

        info!("ClickUp API proxy running on port {}", self.config().port);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(StartupError::Serve)
    }
}
