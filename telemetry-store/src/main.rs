use anyhow::Context;
use telemetry_store::config::{Config, StorageBackend};
use telemetry_store::rest::{self, AppState};
use telemetry_store::{db, metrics, open_store};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("invalid configuration")?;

    info!("Starting GPS telemetry store");
    info!("HTTP server: {}", config.bind_addr());
    info!("Storage backend: {}", config.storage);
    if config.storage == StorageBackend::Postgres {
        info!("Database: {}", db::redact_url(&config.database_url));
    }
    info!("Validation mode: {}", config.validation);

    metrics::init_metrics().context("failed to register metrics")?;

    let store = open_store(&config)
        .await
        .context("failed to open storage backend")?;
    info!("Storage ready: {}", store.backend_name());

    let app = rest::create_router(AppState::new(store.clone(), config.validation));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr()))?;

    info!("Server is running on {}", config.bind_addr());

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }

    info!("Shutting down");
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
