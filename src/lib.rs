pub mod core;
pub mod providers;
pub mod server;

use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Binds the configured address and serves the API until the process is stopped.
pub async fn run(config: AppConfig) -> Result<()> {
    info!("midrate starting...");
    debug!(
        listen_addr = %config.listen_addr,
        rates_url = %config.providers.wise.rates_url,
        validate_membership = config.validate_membership,
        "Loaded config"
    );

    let addr = config.socket_addr()?;
    let state = server::build_state(&config)?;
    let router = server::app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("Server terminated unexpectedly")
}
