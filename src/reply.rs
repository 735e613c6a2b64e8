use crate::config::{RepliesConfig, UnsupportedReply};
use crate::language::{Language, LanguageCode};

/// Fixed user-facing texts, resolved once from config.
#[derive(Debug, Clone)]
pub struct ReplyTexts {
    pub detection_failed: String,
    pub translation_failed: String,
    /// What gets sent for a language outside the supported pair
    pub unsupported: String,
    pub default_sender_name: String,
}

impl ReplyTexts {
    pub fn from_config(config: &RepliesConfig) -> Self {
        let unsupported = match config.unsupported {
            UnsupportedReply::Placeholder => "?".to_string(),
            UnsupportedReply::Explain => config.unsupported_language.clone(),
        };

        Self {
            detection_failed: config.detection_failed.clone(),
            translation_failed: config.translation_failed.clone(),
            unsupported,
            default_sender_name: config.default_sender_name.clone(),
        }
    }

    /// Attribute `translated` to its sender, in the target language.
    ///
    /// A blank or missing sender name is replaced by the default one. Any
    /// target outside the supported pair gets the bare translation.
    pub fn format_translation(
        &self,
        translated: &str,
        target: &LanguageCode,
        sender_name: Option<&str>,
    ) -> String {
        let name = sender_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_sender_name.as_str());

        match target {
            LanguageCode::Supported(Language::English) => format!("{name} said:\n{translated}"),
            LanguageCode::Supported(Language::Portuguese) => {
                format!("{name} disse:\n{translated}")
            }
            LanguageCode::Other(_) => translated.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(unsupported: UnsupportedReply) -> ReplyTexts {
        ReplyTexts::from_config(&RepliesConfig {
            unsupported,
            ..RepliesConfig::default()
        })
    }

    #[test]
    fn test_english_template() {
        let t = texts(UnsupportedReply::Placeholder);
        assert_eq!(
            t.format_translation(
                "Good morning",
                &LanguageCode::Supported(Language::English),
                Some("Ana")
            ),
            "Ana said:\nGood morning"
        );
    }

    #[test]
    fn test_portuguese_template() {
        let t = texts(UnsupportedReply::Placeholder);
        assert_eq!(
            t.format_translation(
                "Bom dia",
                &LanguageCode::Supported(Language::Portuguese),
                Some("Ana")
            ),
            "Ana disse:\nBom dia"
        );
    }

    #[test]
    fn test_missing_sender_uses_default_name() {
        let t = texts(UnsupportedReply::Placeholder);
        let target = LanguageCode::Supported(Language::Portuguese);
        assert_eq!(t.format_translation("Oi", &target, None), "Usuário disse:\nOi");
        assert_eq!(t.format_translation("Oi", &target, Some("  ")), "Usuário disse:\nOi");
    }

    #[test]
    fn test_other_target_is_unprefixed() {
        let t = texts(UnsupportedReply::Placeholder);
        assert_eq!(
            t.format_translation("Hallo", &LanguageCode::Other("de".to_string()), Some("Ana")),
            "Hallo"
        );
    }

    #[test]
    fn test_unsupported_reply_policy() {
        assert_eq!(texts(UnsupportedReply::Placeholder).unsupported, "?");
        assert_eq!(
            texts(UnsupportedReply::Explain).unsupported,
            "❌ Este bot só traduz entre português e inglês."
        );
    }
}
