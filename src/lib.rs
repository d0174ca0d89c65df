pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use crate::config::Config;
use crate::infra::factory::bootstrap_state;
use api::router::create_router;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("./logs", "event-booking.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("info,event_booking_backend=debug"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized. Writing JSON logs to ./logs/");
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received, draining connections");
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = init_logging();

    let config = Config::from_env()?;
    let (state, store) = bootstrap_state(&config).await?;

    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("🚀 Server running on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}
