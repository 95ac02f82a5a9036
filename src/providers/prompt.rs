/*!
 * Prompt construction shared by the LLM-backed providers.
 */

use crate::language_utils;

/// Languages every provider is expected to handle
pub const COMMON_LANGUAGES: [(&str, &str); 21] = [
    ("ar", "Arabic"),
    ("da", "Danish"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("hi", "Hindi"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// System and user parts of a translation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPrompt {
    pub system: String,
    pub user: String,
}

impl TranslationPrompt {
    /// Build the prompt for one translation request
    pub fn build(text: &str, source_lang: &str, target_lang: &str, instructions: Option<&str>) -> Self {
        let source_name = language_utils::display_name(source_lang);
        let target_name = language_utils::display_name(target_lang);

        let mut system = format!(
            "You are a professional translator. Translate the following text from {} to {}.

Instructions:
- Provide only the translated text, no explanations or additional content
- Maintain the original meaning and tone
- Preserve any formatting, placeholders, markup tags or special characters
- Ensure the translation is natural and fluent in the target language",
            source_name, target_name
        );

        if let Some(extra) = instructions.filter(|s| !s.trim().is_empty()) {
            system.push_str("\n\nAdditional Instructions:\n");
            system.push_str(extra);
        }

        Self {
            system,
            user: format!("Text to translate:\n{}\n\nTranslation:", text),
        }
    }
}
