//! Target language catalog.
//!
//! The set of languages the dubbing pipeline can target. The catalog is
//! bounded by what the offline translation model and the TTS provider's
//! multilingual voice model both support.

/// Metadata for a supported dubbing target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 code (e.g., "hi")
    pub code: &'static str,
    /// English display name (e.g., "Hindi")
    pub name: &'static str,
}

/// Catalog of supported target languages.
pub const LANGUAGES: &[Language] = &[
    Language {
        code: "hi",
        name: "Hindi",
    },
    Language {
        code: "ta",
        name: "Tamil",
    },
    Language {
        code: "te",
        name: "Telugu",
    },
    Language {
        code: "kn",
        name: "Kannada",
    },
    Language {
        code: "ml",
        name: "Malayalam",
    },
    Language {
        code: "mr",
        name: "Marathi",
    },
    Language {
        code: "bn",
        name: "Bengali",
    },
    Language {
        code: "gu",
        name: "Gujarati",
    },
    Language {
        code: "pa",
        name: "Punjabi",
    },
];

/// Look up a language by ISO code.
pub fn get(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Check whether a language code is a supported dubbing target.
pub fn is_supported(code: &str) -> bool {
    get(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_language() {
        let lang = get("hi").unwrap();
        assert_eq!(lang.name, "Hindi");
    }

    #[test]
    fn get_unknown_language_returns_none() {
        assert!(get("xx").is_none());
        assert!(get("").is_none());
    }

    #[test]
    fn is_supported_matches_catalog() {
        for lang in LANGUAGES {
            assert!(is_supported(lang.code));
        }
        assert!(!is_supported("en"));
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in LANGUAGES.iter().enumerate() {
            for b in &LANGUAGES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn codes_are_iso_639_1() {
        for lang in LANGUAGES {
            assert_eq!(lang.code.len(), 2, "not a two-letter code: {}", lang.code);
            assert!(lang.code.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
