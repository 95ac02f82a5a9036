/*!
 * Glossary instructions for the translator.
 *
 * Turns the matched terms into a plain-language rule list that travels
 * with the fenced text. The translator is not bound by it, which is why
 * every translation is verified afterwards.
 */

use log::debug;
use std::collections::HashSet;

use crate::glossary::model::TermOccurrence;
use crate::translation::protector::DEFAULT_FENCE_TAG;

/// Builds the rule list handed to a translation provider
#[derive(Debug, Clone)]
pub struct InstructionBuilder {
    fence_tag: String,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FENCE_TAG)
    }
}

impl InstructionBuilder {
    pub fn new(fence_tag: impl Into<String>) -> Self {
        Self {
            fence_tag: fence_tag.into(),
        }
    }

    /// Render instructions for `occurrences`; empty when there is nothing to say
    ///
    /// Each term is listed once even if it occurs several times. A term
    /// flagged both forbidden and translatable is treated as forbidden.
    pub fn build(&self, occurrences: &[TermOccurrence], target_lang: &str) -> String {
        let mut seen = HashSet::new();
        let unique: Vec<&TermOccurrence> = occurrences
            .iter()
            .filter(|o| seen.insert(o.term.as_str()))
            .collect();

        let forbidden: Vec<&TermOccurrence> = unique.iter().copied().filter(|o| o.forbidden).collect();
        let translatable: Vec<&TermOccurrence> = unique
            .iter()
            .copied()
            .filter(|o| !o.forbidden && o.translatable)
            .collect();

        if forbidden.is_empty() && translatable.is_empty() {
            return String::new();
        }

        let tag = &self.fence_tag;
        let mut lines = vec![
            "GLOSSARY TRANSLATION INSTRUCTIONS:".to_string(),
            String::new(),
            format!("The text contains glossary terms marked with <{}> tags.", tag),
            "Follow these rules strictly:".to_string(),
            String::new(),
        ];

        if !forbidden.is_empty() {
            lines.push("FORBIDDEN TERMS (DO NOT TRANSLATE):".to_string());
            lines.push("These terms must remain exactly as they appear in the source text:".to_string());
            for occurrence in &forbidden {
                lines.push(format!("- {}", occurrence.term));
            }
            lines.push(String::new());
        }

        if !translatable.is_empty() {
            lines.push("TRANSLATABLE TERMS:".to_string());
            lines.push(format!(
                "Translate these terms to {} using exactly the given translation:",
                target_lang
            ));
            for occurrence in &translatable {
                match occurrence.expected_translation(target_lang) {
                    Some(translation) => lines.push(format!("- {} → {}", occurrence.term, translation)),
                    None => {
                        debug!("No {} translation for '{}', using fallback rule", target_lang, occurrence.term);
                        lines.push(format!("- {} (translate appropriately)", occurrence.term));
                    }
                }
            }
            lines.push(String::new());
        }

        lines.extend([
            "IMPORTANT:".to_string(),
            format!(
                "1. Keep the <{0}> tags, including their id attribute, around the terms in your translation",
                tag
            ),
            "2. Only the term itself may appear inside the tags, following the rules above".to_string(),
            "3. Translate all the other text normally".to_string(),
            "4. Maintain the original structure and formatting".to_string(),
        ]);

        lines.join("\n")
    }
}
