use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::TranslationConfig;
use crate::language::Language;

/// A machine translation backend.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` between two language codes.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Outcome of one translation attempt, as seen by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Translated(String),
    Failed,
}

/// Run `translator` under `timeout`. Errors, timeouts and blank results all
/// collapse to [`Translation::Failed`]; the detail is only logged.
pub async fn translate_or_fail(
    translator: &dyn Translator,
    text: &str,
    source: Language,
    target: Language,
    timeout: Duration,
) -> Translation {
    let call = translator.translate(text, source.code(), target.code());
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(translated)) if !translated.trim().is_empty() => {
            info!("Translation successful: {} -> {}", source, target);
            Translation::Translated(translated)
        }
        Ok(Ok(_)) => {
            warn!("Translation {} -> {} came back empty", source, target);
            Translation::Failed
        }
        Ok(Err(e)) => {
            warn!("Translation {} -> {} failed: {:#}", source, target, e);
            Translation::Failed
        }
        Err(_) => {
            warn!(
                "Translation {} -> {} timed out after {:?}",
                source, target, timeout
            );
            Translation::Failed
        }
    }
}

/// Client for the keyless Google Translate web endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.base_url);

        debug!("Sending translation request to {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .context("Failed to send request to Google Translate")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Translate error ({}): {}", status, error_body);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Google Translate response")?;

        parse_google_response(&body)
    }
}

/// The endpoint answers with nested arrays:
/// `[[["translated", "original", ...], ...], ...]`.
/// Every sentence segment's first element is concatenated.
fn parse_google_response(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .context("Unexpected Google Translate response shape")?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
        .collect();

    if translated.trim().is_empty() {
        anyhow::bail!("Google Translate returned no text");
    }

    Ok(translated)
}
