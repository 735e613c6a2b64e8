//! Liveness page for external uptime monitors.
//!
//! `GET /` answers 200 with a static body. The bot keeps running when the
//! port cannot be bound.

use std::future::Future;

use anyhow::{Context, Result};
use axum::{extract::State, routing::get, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::KeepAliveConfig;

#[derive(Clone)]
struct AliveState {
    body: String,
}

async fn alive(State(state): State<AliveState>) -> String {
    state.body
}

fn router(body: String) -> Router {
    Router::new()
        .route("/", get(alive))
        .with_state(AliveState { body })
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve(
    config: KeepAliveConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind keep-alive server on {}", config.bind))?;
    serve_on(listener, config.body, shutdown).await
}

async fn serve_on(
    listener: TcpListener,
    body: String,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr().context("Keep-alive listener has no address")?;
    info!("Keep-alive service started on http://{}", addr);

    axum::serve(listener, router(body))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Keep-alive server error")?;

    info!("Keep-alive service stopped");
    Ok(())
}

/// Spawn the liveness server in the background. Failures are logged and
/// never take the bot down.
pub fn spawn(config: KeepAliveConfig, shutdown: impl Future<Output = ()> + Send + 'static) {
    tokio::spawn(async move {
        if let Err(e) = serve(config, shutdown).await {
            warn!("Keep-alive service disabled ({:#})", e);
        }
    });
}
