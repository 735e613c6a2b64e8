use std::fmt;

/// One of the two languages the bot translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Portuguese,
    English,
}

impl Language {
    /// ISO 639-1 code as understood by the translation service.
    pub fn code(self) -> &'static str {
        match self {
            Language::Portuguese => "pt",
            Language::English => "en",
        }
    }

    /// The language a message in `self` gets translated into.
    pub fn target(self) -> Language {
        match self {
            Language::Portuguese => Language::English,
            Language::English => Language::Portuguese,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A detector code after normalization: either one of the supported
/// languages, or whatever the detector reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageCode {
    Supported(Language),
    Other(String),
}

impl LanguageCode {
    /// Collapse a raw detector code into the canonical pair.
    ///
    /// Region tags (`pt-BR`, `en_GB`) reduce to their base subtag. Codes in
    /// `portuguese_aliases` count as Portuguese. Anything else is returned
    /// verbatim as [`LanguageCode::Other`].
    pub fn normalize(raw: &str, portuguese_aliases: &[String]) -> Self {
        let lowered = raw.trim().to_lowercase();
        let base = lowered.split(['-', '_']).next().unwrap_or_default();

        match base {
            "pt" => LanguageCode::Supported(Language::Portuguese),
            "en" => LanguageCode::Supported(Language::English),
            _ if portuguese_aliases.iter().any(|a| a == base) => {
                LanguageCode::Supported(Language::Portuguese)
            }
            _ => LanguageCode::Other(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> Vec<String> {
        ["es", "it", "ca", "gl", "fr"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_target_swaps_languages() {
        assert_eq!(Language::Portuguese.target(), Language::English);
        assert_eq!(Language::English.target(), Language::Portuguese);
    }

    #[test]
    fn test_target_is_its_own_inverse() {
        for lang in [Language::Portuguese, Language::English] {
            assert_eq!(lang.target().target(), lang);
        }
    }

    #[test]
    fn test_normalize_regional_variants() {
        let a = aliases();
        for raw in ["pt", "pt-br", "pt-PT", "PT_br"] {
            assert_eq!(
                LanguageCode::normalize(raw, &a),
                LanguageCode::Supported(Language::Portuguese),
                "{raw}"
            );
        }
        for raw in ["en", "en-us", "en-GB", "en-ca", "en-au"] {
            assert_eq!(
                LanguageCode::normalize(raw, &a),
                LanguageCode::Supported(Language::English),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_normalize_aliases_to_portuguese() {
        let a = aliases();
        for raw in ["es", "it", "ca", "gl", "fr"] {
            assert_eq!(
                LanguageCode::normalize(raw, &a),
                LanguageCode::Supported(Language::Portuguese)
            );
        }
    }

    #[test]
    fn test_normalize_unknown_is_kept_verbatim() {
        assert_eq!(
            LanguageCode::normalize("de", &aliases()),
            LanguageCode::Other("de".to_string())
        );
    }

    #[test]
    fn test_normalize_without_aliases_rejects_spanish() {
        assert_eq!(
            LanguageCode::normalize("es", &[]),
            LanguageCode::Other("es".to_string())
        );
    }
}
