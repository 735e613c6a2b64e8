use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::detect::Detector;
use crate::keywords::KeywordTables;
use crate::language::{Language, LanguageCode};

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Language(Language),
    /// Detector code outside the supported pair, after normalization
    Unsupported(String),
    /// The detector failed or timed out
    DetectionFailed,
}

/// Blends the statistical detector with keyword overrides.
pub struct Classifier {
    detector: Arc<dyn Detector>,
    keywords: KeywordTables,
    timeout: Duration,
}

impl Classifier {
    pub fn new(detector: Arc<dyn Detector>, keywords: KeywordTables, timeout: Duration) -> Self {
        Self {
            detector,
            keywords,
            timeout,
        }
    }

    /// Decide which supported language `text` is written in.
    ///
    /// A keyword list that matches on its own wins over the detector. When
    /// both lists or neither match, the normalized detector code decides.
    /// The detector is always consulted first, so a detector failure is
    /// reported even when keywords would have decided.
    pub async fn classify(&self, text: &str) -> Classification {
        let raw = match tokio::time::timeout(self.timeout, self.detector.detect(text)).await {
            Ok(Ok(code)) => code,
            Ok(Err(e)) => {
                warn!("Language detection failed: {:#}", e);
                return Classification::DetectionFailed;
            }
            Err(_) => {
                warn!("Language detection timed out after {:?}", self.timeout);
                return Classification::DetectionFailed;
            }
        };
        info!("Initial language detection: {}", raw);

        let lowered = text.trim().to_lowercase();
        let has_portuguese = self.keywords.matches_portuguese(&lowered);
        let has_english = self.keywords.matches_english(&lowered);

        match (has_portuguese, has_english) {
            (true, false) => {
                info!("Override: Portuguese keywords detected");
                Classification::Language(Language::Portuguese)
            }
            (false, true) => {
                info!("Override: English keywords detected");
                Classification::Language(Language::English)
            }
            _ => match LanguageCode::normalize(&raw, &self.keywords.portuguese_aliases) {
                LanguageCode::Supported(lang) => {
                    info!("Using detector result {} as {}", raw, lang);
                    Classification::Language(lang)
                }
                LanguageCode::Other(code) => Classification::Unsupported(code),
            },
        }
    }
}
