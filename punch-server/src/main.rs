use anyhow::Context;
use punch_server::{AppState, Config, api, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    logger::init_logger_with_file(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        token_ttl_secs = config.token_ttl_secs,
        stamp_cooldown_ms = config.stamp_cooldown_ms,
        "Starting punch-server"
    );
    if config.is_development() {
        tracing::warn!("Development mode: unset secrets fall back to insecure defaults");
    }

    let state = AppState::new(&config)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to open database")?;
    let app = api::build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("punch-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("punch-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
