/*!
 * Post-translation verification of fenced glossary terms.
 *
 * Fences are parsed back out of the translator's output and correlated
 * with the original occurrences by marker id. Missing fences and altered
 * forbidden terms fail the verification; translatable terms rendered
 * differently from the glossary only produce warnings. Malformed output
 * never raises: a fence that cannot be parsed simply counts as missing.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::glossary::model::{MarkerId, OffsetMap, TermOccurrence};
use crate::translation::protector::FenceFormat;

/// A fence recovered from translated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedSpan {
    pub id: MarkerId,
    /// Text inside the fence after translation
    pub content: String,
    /// Character offsets of the whole fence in the translated text
    pub start: usize,
    pub end: usize,
}

/// How a single fenced occurrence was handled by the translator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TermStatus {
    /// Handled as the glossary requires
    Correct,
    /// No fence with this occurrence's id in the output
    Missing,
    /// A forbidden term came back changed
    ForbiddenModified { found: String },
    /// A translatable term differs from the glossary translation
    TranslationMismatch { expected: String, found: String },
    /// Translatable term without a known translation for the target language
    Unverified { found: String },
}

impl TermStatus {
    /// Whether this status fails the overall verification
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Missing | Self::ForbiddenModified { .. })
    }
}

/// Per-occurrence verification outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCheck {
    pub marker_id: MarkerId,
    pub term: String,
    #[serde(flatten)]
    pub status: TermStatus,
}

/// Compliance report for one translation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub missing_terms: Vec<TermOccurrence>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub found_wrapped_terms: BTreeMap<MarkerId, String>,
    /// Translated text with every fence removed
    pub cleaned_text: String,
    #[serde(default)]
    pub term_checks: Vec<TermCheck>,
}

impl VerificationResult {
    /// Trivially successful result for text that was never fenced
    pub fn passthrough(text: impl Into<String>) -> Self {
        Self {
            success: true,
            cleaned_text: text.into(),
            ..Default::default()
        }
    }

    /// Checks whose status fails the verification
    pub fn errors(&self) -> impl Iterator<Item = &TermCheck> {
        self.term_checks.iter().filter(|c| c.status.is_error())
    }
}

/// Parses fences from translated text and checks them against policy
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    fence: FenceFormat,
}

impl Verifier {
    pub fn new(fence: FenceFormat) -> Self {
        Self { fence }
    }

    /// Every complete fence in `text`, in order of appearance
    pub fn parse_spans(&self, text: &str) -> Vec<WrappedSpan> {
        let offsets = OffsetMap::new(text);
        self.fence
            .fences(text)
            .into_iter()
            .map(|fence| WrappedSpan {
                id: MarkerId::from_raw(fence.id),
                content: fence.content.to_string(),
                start: offsets.char_offset(fence.start),
                end: offsets.char_offset(fence.end),
            })
            .collect()
    }

    /// Verify a translation against the occurrences that were fenced
    pub fn verify(&self, translated_text: &str, occurrences: &[TermOccurrence], target_lang: &str) -> VerificationResult {
        let spans = self.parse_spans(translated_text);
        debug!("Parsed {} fence(s) from translated text", spans.len());

        // First fence wins when a translator duplicates an id
        let mut found_wrapped_terms: BTreeMap<MarkerId, String> = BTreeMap::new();
        for span in &spans {
            found_wrapped_terms
                .entry(span.id.clone())
                .or_insert_with(|| span.content.clone());
        }

        let mut result = VerificationResult {
            success: true,
            cleaned_text: self.fence.strip(translated_text),
            ..Default::default()
        };

        for occurrence in occurrences {
            let marker_id = occurrence.marker_id();
            let status = match found_wrapped_terms.get(&marker_id) {
                None => Self::report_missing(occurrence, &mut result),
                Some(content) => Self::check_content(occurrence, content, target_lang, &mut result),
            };

            result.term_checks.push(TermCheck {
                marker_id,
                term: occurrence.term.clone(),
                status,
            });
        }

        for id in found_wrapped_terms.keys() {
            if !result.term_checks.iter().any(|c| &c.marker_id == id) {
                debug!("Translation contains unknown marker id '{}'", id);
            }
        }

        result.found_wrapped_terms = found_wrapped_terms;
        let success = result.errors().next().is_none();
        result.success = success;

        info!(
            "Verification completed: {} suggestion(s), {} warning(s), {} missing term(s), success: {}",
            result.suggestions.len(),
            result.warnings.len(),
            result.missing_terms.len(),
            result.success
        );

        result
    }

    fn report_missing(occurrence: &TermOccurrence, result: &mut VerificationResult) -> TermStatus {
        warn!(
            "Term '{}' ({}-{}) was not found in translation",
            occurrence.term, occurrence.start, occurrence.end
        );
        result.missing_terms.push(occurrence.clone());
        result.warnings.push(format!("Missing term: {}", occurrence.term));
        result
            .suggestions
            .push(format!("Term '{}' was not found in translation", occurrence.term));
        TermStatus::Missing
    }

    fn check_content(
        occurrence: &TermOccurrence,
        content: &str,
        target_lang: &str,
        result: &mut VerificationResult,
    ) -> TermStatus {
        if occurrence.forbidden {
            if content == occurrence.matched_text {
                return TermStatus::Correct;
            }
            warn!(
                "Forbidden term '{}' came back as '{}'",
                occurrence.term, content
            );
            result
                .warnings
                .push(format!("Forbidden term '{}' was incorrectly modified", occurrence.term));
            result
                .suggestions
                .push(format!("Forbidden term '{}' should not be translated", occurrence.term));
            return TermStatus::ForbiddenModified {
                found: content.to_string(),
            };
        }

        if !occurrence.translatable {
            return TermStatus::Correct;
        }

        match occurrence.expected_translation(target_lang) {
            Some(expected) if content == expected => TermStatus::Correct,
            Some(expected) => {
                result
                    .warnings
                    .push(format!("Term '{}' may not be correctly translated", occurrence.term));
                result.suggestions.push(format!(
                    "Term '{}' should be translated as '{}'",
                    occurrence.term, expected
                ));
                TermStatus::TranslationMismatch {
                    expected: expected.to_string(),
                    found: content.to_string(),
                }
            }
            None => {
                result.warnings.push(format!(
                    "Term '{}' has no glossary translation for '{}'; rendering could not be verified",
                    occurrence.term, target_lang
                ));
                TermStatus::Unverified {
                    found: content.to_string(),
                }
            }
        }
    }
}
