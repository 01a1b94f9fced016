//! Weather HTTP server
//!
//! Main entry point for the HTTP API server.

use std::sync::Arc;

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, default_provider_from_config};
use weather_server::{AppState, cors_layer, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_server=info,weather_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("weather-server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load_with_env().context("Failed to load configuration")?;

    // No built-in fallback key: refuse to start without one.
    let provider = default_provider_from_config(&config).context(
        "No usable weather provider. Set OPENWEATHER_API_KEY or WEATHERAPI_API_KEY, \
         or run `weather configure <provider>`",
    )?;

    info!(
        provider = %provider.id(),
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let state = AppState::new(Arc::from(provider));
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{addr}");
    info!("Weather API available at http://{addr}/api/weather");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
