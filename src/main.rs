mod classifier;
mod config;
mod detect;
mod keep_alive;
mod keywords;
mod language;
mod platform;
mod relay;
mod reply;
#[cfg(test)]
mod testing;
mod translate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::detect::WhatlangDetector;
use crate::keywords::KeywordTables;
use crate::relay::Relay;
use crate::reply::ReplyTexts;
use crate::translate::GoogleTranslator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,linguabot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let keywords = KeywordTables::load(config.classifier.keywords_path.as_deref())?;

    info!("Configuration loaded successfully");
    info!("  Translation endpoint: {}", config.translation.base_url);
    info!(
        "  Keywords: {} pt, {} en, aliases {:?}",
        keywords.portuguese.len(),
        keywords.english.len(),
        keywords.portuguese_aliases
    );
    info!("  Unsupported language reply: {}", config.replies.unsupported);
    if !config.telegram.allowed_user_ids.is_empty() {
        info!("  Allowed users: {:?}", config.telegram.allowed_user_ids);
    }

    let classifier = Classifier::new(
        Arc::new(WhatlangDetector::new()),
        keywords,
        config.classifier.detection_timeout(),
    );
    let translator = Arc::new(GoogleTranslator::new(&config.translation)?);
    let relay = Arc::new(Relay::new(
        classifier,
        translator,
        ReplyTexts::from_config(&config.replies),
        config.translation.timeout(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(true);
    });

    if config.keep_alive.enabled {
        keep_alive::spawn(config.keep_alive.clone(), stopped(shutdown_rx.clone()));
    } else {
        info!("Keep-alive service disabled by configuration");
    }

    info!("The bot will translate messages between Portuguese and English.");
    platform::telegram::run(relay, &config.telegram, stopped(shutdown_rx)).await?;

    info!("Bot shutdown complete");
    Ok(())
}

/// Resolves once the shutdown flag flips (or its sender is gone).
async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
                return;
            }
            Err(e) => tracing::warn!("Cannot listen for SIGTERM: {}", e),
        }
    }

    let _ = tokio::signal::ctrl_c().await;
    info!("Received SIGINT, shutting down...");
}
