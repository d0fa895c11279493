// src/generation/language.rs
//! Language detection and prompt templating for instruction-tuned models

/// Languages with a dedicated system directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Tr,
    En,
    De,
    Es,
    Fr,
}

impl Language {
    /// Fallback when detection fails or yields an unsupported language
    pub const DEFAULT: Language = Language::En;

    pub fn code(self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
            Language::De => "de",
            Language::Es => "es",
            Language::Fr => "fr",
        }
    }

    /// System directive prepended to every prompt in this language
    pub fn system_prompt(self) -> &'static str {
        match self {
            Language::Tr => {
                "Türkçe olarak yanıt ver. Açık, anlaşılır ve profesyonel bir dil kullan."
            }
            Language::En => {
                "Respond in English. Use clear, concise, and professional language."
            }
            Language::De => {
                "Antworten Sie auf Deutsch. Verwenden Sie eine klare, prägnante und professionelle Sprache."
            }
            Language::Es => {
                "Responde en español. Utiliza un lenguaje claro, conciso y profesional."
            }
            Language::Fr => {
                "Répondez en français. Utilisez un langage clair, concis et professionnel."
            }
        }
    }

    fn from_detected(lang: whatlang::Lang) -> Option<Self> {
        match lang {
            whatlang::Lang::Tur => Some(Language::Tr),
            whatlang::Lang::Eng => Some(Language::En),
            whatlang::Lang::Deu => Some(Language::De),
            whatlang::Lang::Spa => Some(Language::Es),
            whatlang::Lang::Fra => Some(Language::Fr),
            _ => None,
        }
    }
}

/// Detect the language of the input text.
///
/// Total over all inputs: empty text, detector failure, and unsupported
/// languages all map to [`Language::DEFAULT`].
pub fn detect_language(text: &str) -> Language {
    if text.trim().is_empty() {
        return Language::DEFAULT;
    }
    whatlang::detect_lang(text)
        .and_then(Language::from_detected)
        .unwrap_or(Language::DEFAULT)
}

/// Format the prompt with the appropriate system directive.
pub fn format_prompt(user_input: &str, language: Language) -> String {
    format!(
        "<s>[INST] {}\n\nUser: {} [/INST]",
        language.system_prompt(),
        user_input
    )
}
