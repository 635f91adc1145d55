use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clickup_proxy::{AppConfig, ProxyServer};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }
}

#[tokio::main]
async fn main() {
    // .env has to be loaded before RUST_LOG is read
    dotenv::dotenv().ok();
    init_tracing();

    info!("Loading application configuration");
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    debug!(
        "Configuration loaded: port={}, host={}, upstream={}, timeout={:?}",
        config.port, config.host, config.upstream_base, config.upstream_timeout
    );

    let server = match ProxyServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Startup error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.serve(shutdown_signal()).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            debug!("CTRL+C signal received");
        },
        _ = terminate => {
            debug!("Terminate signal received");
        },
    }
    info!("Shutdown signal received, starting graceful shutdown");
}
