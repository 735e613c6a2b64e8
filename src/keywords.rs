use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

// Built-in table, used when no keywords_path is configured.
const DEFAULT_KEYWORDS: &str = include_str!("../keywords.toml");

/// Word lists that override the statistical detector.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordTables {
    #[serde(default)]
    pub portuguese: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
    /// Detector codes folded into Portuguese when no keyword decides
    #[serde(default)]
    pub portuguese_aliases: Vec<String>,
}

impl KeywordTables {
    pub fn builtin() -> Result<Self> {
        Self::parse(DEFAULT_KEYWORDS).context("Built-in keyword table is invalid")
    }

    /// Load from `path`, or fall back to the built-in table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword file: {}", path.display()))?;
        let tables = Self::parse(&content)
            .with_context(|| format!("Failed to parse keyword file: {}", path.display()))?;

        info!(
            "Loaded keywords from {} ({} pt, {} en, {} aliases)",
            path.display(),
            tables.portuguese.len(),
            tables.english.len(),
            tables.portuguese_aliases.len()
        );
        Ok(tables)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: KeywordTables = toml::from_str(content)?;
        Ok(Self {
            portuguese: clean(raw.portuguese),
            english: clean(raw.english),
            portuguese_aliases: clean(raw.portuguese_aliases),
        })
    }

    /// `lowered` must already be lower-cased.
    pub fn matches_portuguese(&self, lowered: &str) -> bool {
        matches_any(lowered, &self.portuguese)
    }

    /// `lowered` must already be lower-cased.
    pub fn matches_english(&self, lowered: &str) -> bool {
        matches_any(lowered, &self.english)
    }
}

fn clean(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Substring containment alone decides. Any whole-word hit is also a
/// substring hit; phrases match too, and short keywords match inside longer
/// words.
fn matches_any(lowered: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}
