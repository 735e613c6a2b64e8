use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub replies: RepliesConfig,
    #[serde(default)]
    pub keep_alive: KeepAliveConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Empty means every user may use the bot
    #[serde(default)]
    pub allowed_user_ids: Vec<u64>,
    /// Bot API server, e.g. a self-hosted one; api.telegram.org when unset
    #[serde(default)]
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default = "default_translation_base_url")]
    pub base_url: String,
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translation_base_url(),
            timeout_secs: default_translation_timeout_secs(),
        }
    }
}

impl TranslationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Keyword table file; the built-in table is used when unset
    #[serde(default)]
    pub keywords_path: Option<PathBuf>,
    #[serde(default = "default_detection_timeout_secs")]
    pub detection_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords_path: None,
            detection_timeout_secs: default_detection_timeout_secs(),
        }
    }
}

impl ClassifierConfig {
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_secs(self.detection_timeout_secs)
    }
}

/// How to answer a message in a language the bot does not translate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedReply {
    /// A bare "?"
    #[default]
    Placeholder,
    /// The `unsupported_language` message
    Explain,
}

impl std::fmt::Display for UnsupportedReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedReply::Placeholder => write!(f, "placeholder"),
            UnsupportedReply::Explain => write!(f, "explain"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RepliesConfig {
    #[serde(default)]
    pub unsupported: UnsupportedReply,
    #[serde(default = "default_sender_name")]
    pub default_sender_name: String,
    #[serde(default = "default_detection_failed")]
    pub detection_failed: String,
    #[serde(default = "default_translation_failed")]
    pub translation_failed: String,
    #[serde(default = "default_unsupported_language")]
    pub unsupported_language: String,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            unsupported: UnsupportedReply::default(),
            default_sender_name: default_sender_name(),
            detection_failed: default_detection_failed(),
            translation_failed: default_translation_failed(),
            unsupported_language: default_unsupported_language(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeepAliveConfig {
    #[serde(default = "default_keep_alive_enabled")]
    pub enabled: bool,
    #[serde(default = "default_keep_alive_bind")]
    pub bind: SocketAddr,
    #[serde(default = "default_keep_alive_body")]
    pub body: String,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: default_keep_alive_enabled(),
            bind: default_keep_alive_bind(),
            body: default_keep_alive_body(),
        }
    }
}

fn default_translation_base_url() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    10
}

fn default_detection_timeout_secs() -> u64 {
    5
}

fn default_sender_name() -> String {
    "Usuário".to_string()
}

fn default_detection_failed() -> String {
    "❌ Não foi possível detectar o idioma da mensagem.".to_string()
}

fn default_translation_failed() -> String {
    "❌ Desculpe, não foi possível traduzir esta mensagem.".to_string()
}

fn default_unsupported_language() -> String {
    "❌ Este bot só traduz entre português e inglês.".to_string()
}

fn default_keep_alive_enabled() -> bool {
    true
}

fn default_keep_alive_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_keep_alive_body() -> String {
    "Bot está online!".to_string()
}

impl Config {
    /// Load the config file, apply the `BOT_TOKEN` environment override and
    /// validate. A missing file is fine as long as the token comes from the
    /// environment.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            warn!(
                "Config file {} not found, using defaults",
                path.display()
            );
            Config::default()
        };

        let config = config.with_env_token(std::env::var("BOT_TOKEN").ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// A non-blank token from the environment wins over the file.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            info!("Using bot token from BOT_TOKEN environment variable");
            self.telegram.bot_token = token.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let token = self.telegram.bot_token.trim();
        if token.is_empty() || token == PLACEHOLDER_TOKEN {
            anyhow::bail!(
                "Bot token not configured. Set [telegram] bot_token or the BOT_TOKEN environment variable."
            );
        }
        if self.translation.timeout_secs == 0 || self.classifier.detection_timeout_secs == 0 {
            anyhow::bail!("Timeouts must be at least one second");
        }
        Ok(())
    }
}
