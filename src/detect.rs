use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;
use whatlang::Lang;

/// Statistical language detection.
///
/// Returns a raw language code (usually ISO 639-1). An error means the
/// input could not be classified at all.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<String>;
}

/// Local trigram detector backed by `whatlang`.
pub struct WhatlangDetector {
    detector: whatlang::Detector,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self {
            detector: whatlang::Detector::new(),
        }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for WhatlangDetector {
    async fn detect(&self, text: &str) -> Result<String> {
        let info = self
            .detector
            .detect(text)
            .ok_or_else(|| anyhow::anyhow!("No language detected in {} chars", text.len()))?;

        let code = lang_to_code(info.lang());
        debug!(
            "whatlang: {} (confidence {:.2}, reliable: {})",
            code,
            info.confidence(),
            info.is_reliable()
        );
        Ok(code.to_string())
    }
}

/// Map a `whatlang::Lang` to its ISO 639-1 code, falling back to
/// whatlang's own 639-3 code for languages without a two-letter one here.
fn lang_to_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Afr => "af",
        Lang::Ara => "ar",
        Lang::Bul => "bg",
        Lang::Cat => "ca",
        Lang::Ces => "cs",
        Lang::Cmn => "zh",
        Lang::Dan => "da",
        Lang::Deu => "de",
        Lang::Ell => "el",
        Lang::Eng => "en",
        Lang::Epo => "eo",
        Lang::Spa => "es",
        Lang::Est => "et",
        Lang::Fin => "fi",
        Lang::Fra => "fr",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Hrv => "hr",
        Lang::Hun => "hu",
        Lang::Ind => "id",
        Lang::Ita => "it",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Lat => "la",
        Lang::Lit => "lt",
        Lang::Lav => "lv",
        Lang::Nld => "nl",
        Lang::Nob => "nb",
        Lang::Pol => "pl",
        Lang::Por => "pt",
        Lang::Ron => "ro",
        Lang::Rus => "ru",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Swe => "sv",
        Lang::Tha => "th",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Vie => "vi",
        other => other.code(),
    }
}
