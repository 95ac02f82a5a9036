/*!
 * Term protection with fence markers.
 *
 * Eligible occurrences are wrapped as `<TAG id="term_start_end">text</TAG>`
 * before the text goes to a translator. Edits are applied strictly from
 * right to left so the offsets of occurrences still waiting to be wrapped
 * stay valid.
 */

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::glossary::model::{MarkerId, OffsetMap, TermOccurrence};

/// Tag name used when none is configured
pub const DEFAULT_FENCE_TAG: &str = "MARKER";

static DEFAULT_FENCE: Lazy<FenceFormat> = Lazy::new(|| {
    FenceFormat::new(DEFAULT_FENCE_TAG).expect("Invalid default fence pattern")
});

/// A complete fence located in a text, with byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMatch<'t> {
    pub id: &'t str,
    pub content: &'t str,
    pub start: usize,
    pub end: usize,
}

/// Rendering and parsing rules for fence markers
#[derive(Debug, Clone)]
pub struct FenceFormat {
    tag: String,
    /// Opening token with id (group 1) or a closing token
    token_pattern: Regex,
    /// Any single opening or closing fence token
    stray_pattern: Regex,
}

impl FenceFormat {
    /// Build a fence format for a tag name
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(tag);
        Ok(Self {
            tag: tag.to_string(),
            token_pattern: Regex::new(&format!(r#"<{0} id="([^"]+)">|</{0}>"#, escaped))?,
            stray_pattern: Regex::new(&format!(r#"</?{}(?:\s+id="[^"]*")?\s*>"#, escaped))?,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Every complete fence in `text`, in order of appearance
    ///
    /// A fence is an opening token immediately followed by a closing token.
    /// Content may hold any text except another token of the same tag, so
    /// an unclosed opening token never swallows the fence after it.
    pub fn fences<'t>(&self, text: &'t str) -> Vec<FenceMatch<'t>> {
        let mut fences = Vec::new();
        let mut open: Option<(usize, usize, &'t str)> = None;

        for caps in self.token_pattern.captures_iter(text) {
            let Some(token) = caps.get(0) else { continue };
            match caps.get(1) {
                Some(id) => open = Some((token.start(), token.end(), id.as_str())),
                None => {
                    if let Some((start, content_start, id)) = open.take() {
                        fences.push(FenceMatch {
                            id,
                            content: &text[content_start..token.start()],
                            start,
                            end: token.end(),
                        });
                    }
                }
            }
        }

        fences
    }

    /// Fence with a correlation id
    pub fn wrap(&self, id: &MarkerId, content: &str) -> String {
        format!(r#"<{0} id="{1}">{2}</{0}>"#, self.tag, id, content)
    }

    /// Fence without an id
    pub fn wrap_plain(&self, content: &str) -> String {
        format!("<{0}>{1}</{0}>", self.tag, content)
    }

    /// Remove every fence, keeping the fenced content
    ///
    /// Complete fences are reduced to their content first; opening or
    /// closing tokens left unbalanced by a translator are then dropped.
    pub fn strip(&self, text: &str) -> String {
        let mut unwrapped = String::with_capacity(text.len());
        let mut last = 0;
        for fence in self.fences(text) {
            unwrapped.push_str(&text[last..fence.start]);
            unwrapped.push_str(fence.content);
            last = fence.end;
        }
        unwrapped.push_str(&text[last..]);

        self.stray_pattern.replace_all(&unwrapped, "").into_owned()
    }
}

impl Default for FenceFormat {
    fn default() -> Self {
        DEFAULT_FENCE.clone()
    }
}

/// Wraps glossary occurrences in fences and performs direct replacements
#[derive(Debug, Clone, Default)]
pub struct TermProtector {
    fence: FenceFormat,
}

impl TermProtector {
    pub fn new(fence: FenceFormat) -> Self {
        Self { fence }
    }

    pub fn fence(&self) -> &FenceFormat {
        &self.fence
    }

    /// Whether an occurrence should be fenced under the given policy
    pub fn is_eligible(occurrence: &TermOccurrence, preserve_forbidden: bool, translate_allowed: bool) -> bool {
        (occurrence.forbidden && preserve_forbidden) || (occurrence.translatable && translate_allowed)
    }

    /// The occurrences that `wrap` would fence, in their original order
    pub fn eligible(
        occurrences: &[TermOccurrence],
        preserve_forbidden: bool,
        translate_allowed: bool,
    ) -> Vec<TermOccurrence> {
        occurrences
            .iter()
            .filter(|o| Self::is_eligible(o, preserve_forbidden, translate_allowed))
            .cloned()
            .collect()
    }

    /// Fence every eligible occurrence in `text`
    pub fn wrap(
        &self,
        text: &str,
        occurrences: &[TermOccurrence],
        preserve_forbidden: bool,
        translate_allowed: bool,
    ) -> String {
        let targets = Self::eligible(occurrences, preserve_forbidden, translate_allowed);
        let skipped = occurrences.len() - targets.len();

        let wrapped = self.rewrite_right_to_left(text, targets, |occurrence| {
            Some(self.fence.wrap(&occurrence.marker_id(), &occurrence.matched_text))
        });

        info!(
            "Wrapped glossary terms: {} eligible, {} left as plain text",
            occurrences.len() - skipped,
            skipped
        );
        wrapped
    }

    /// Fence forbidden terms and translatable terms with known translations, without ids
    pub fn wrap_simple(&self, text: &str, occurrences: &[TermOccurrence]) -> String {
        let targets: Vec<TermOccurrence> = occurrences
            .iter()
            .filter(|o| o.forbidden || (o.translatable && !o.translations.is_empty()))
            .cloned()
            .collect();

        self.rewrite_right_to_left(text, targets, |occurrence| {
            Some(self.fence.wrap_plain(&occurrence.matched_text))
        })
    }

    /// Substitute translatable occurrences with their target-language translation
    pub fn replace_terms(&self, text: &str, occurrences: &[TermOccurrence], target_lang: &str) -> String {
        let targets: Vec<TermOccurrence> = occurrences.iter().filter(|o| o.translatable).cloned().collect();

        self.rewrite_right_to_left(text, targets, |occurrence| {
            let translation = occurrence.expected_translation(target_lang)?;
            if translation == occurrence.matched_text {
                return None;
            }
            debug!("Replaced '{}' with '{}'", occurrence.matched_text, translation);
            Some(translation.to_string())
        })
    }

    /// Remove all fences from `text`, keeping their content
    pub fn strip_fences(&self, text: &str) -> String {
        self.fence.strip(text)
    }

    /// Replace each target span, last span first
    ///
    /// Spans outside the text or overlapping an already-rewritten span are
    /// left untouched. `render` returning `None` also leaves the span alone.
    fn rewrite_right_to_left<F>(&self, text: &str, mut targets: Vec<TermOccurrence>, render: F) -> String
    where
        F: Fn(&TermOccurrence) -> Option<String>,
    {
        if targets.is_empty() {
            return text.to_string();
        }

        let offsets = OffsetMap::new(text);
        targets.sort_by(|a, b| b.start.cmp(&a.start));

        let mut result = text.to_string();
        let mut boundary = offsets.char_len();

        for occurrence in &targets {
            if occurrence.end > boundary {
                warn!(
                    "Skipping '{}' at {}-{}: overlaps a span already rewritten",
                    occurrence.term, occurrence.start, occurrence.end
                );
                continue;
            }

            let Some(range) = offsets.byte_range(occurrence.start, occurrence.end) else {
                warn!(
                    "Skipping '{}' at {}-{}: outside the text",
                    occurrence.term, occurrence.start, occurrence.end
                );
                continue;
            };

            if let Some(replacement) = render(occurrence) {
                result.replace_range(range, &replacement);
                debug!("Rewrote '{}' at {}-{}", occurrence.matched_text, occurrence.start, occurrence.end);
            }
            boundary = occurrence.start;
        }

        result
    }
}
