//! Account linker service entry point.

use std::time::Duration;

use anyhow::Context;
use linker_domain::constants::REVALIDATION_DRAIN_TIMEOUT_SECS;
use linker_infra::config::loader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "loaded .env");
    }

    let config = loader::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = linker_api::AppContext::new(config).context("failed to build application context")?;
    let revalidation = ctx.revalidation.clone();

    let router = linker_api::router(ctx);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "linker listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Let in-flight detached revalidations finish before exiting.
    revalidation.shutdown(Duration::from_secs(REVALIDATION_DRAIN_TIMEOUT_SECS)).await;

    info!("linker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown signal handler");
        return;
    }
    info!("shutdown signal received");
}
