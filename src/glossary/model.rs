/*!
 * Glossary data model.
 *
 * - `GlossaryTerm`: a canonical glossary record as supplied by a store
 * - `TermOccurrence`: one match of a term inside a specific text
 * - `MarkerId`: correlation key between an occurrence and its fence
 *
 * Offsets on `TermOccurrence` are half-open *character* offsets into the
 * text that was searched, not byte offsets. `OffsetMap` converts between
 * the two.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// A single glossary entry with its policy flags and known translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// The term as written in the source language
    pub term: String,

    /// Free-form description of the term
    #[serde(default)]
    pub description: String,

    /// Whether matching must respect letter case
    #[serde(default)]
    pub case_sensitive: bool,

    /// Whether the term must be kept verbatim in translations
    #[serde(default)]
    pub forbidden: bool,

    /// Whether the term may be rendered with a per-language translation
    #[serde(default = "default_true")]
    pub translatable: bool,

    /// Known translations keyed by language code
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl GlossaryTerm {
    /// Create a case-insensitive, translatable term without translations
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            description: String::new(),
            case_sensitive: false,
            forbidden: false,
            translatable: true,
            translations: BTreeMap::new(),
        }
    }

    /// Mark the term as case-sensitive
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Mark the term as forbidden (kept verbatim, never translated)
    pub fn forbidden(mut self) -> Self {
        self.forbidden = true;
        self.translatable = false;
        self
    }

    /// Set the translatable flag explicitly
    pub fn translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a translation for a language
    pub fn with_translation(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(language.into(), text.into());
        self
    }

    /// Known translation for a language, if any
    pub fn translation_for(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }
}

/// Correlation key for a fenced occurrence: `<term>_<start>_<end>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    /// Derive the id for a term occupying `[start, end)`
    pub fn new(term: &str, start: usize, end: usize) -> Self {
        Self(format!("{}_{}_{}", term, start, end))
    }

    /// Wrap an id parsed back out of translated text
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One match of a glossary term in a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermOccurrence {
    /// Name of the glossary term that matched
    pub term: String,

    /// The substring exactly as it appears in the text
    pub matched_text: String,

    /// Start character offset (inclusive)
    pub start: usize,

    /// End character offset (exclusive)
    pub end: usize,

    pub case_sensitive: bool,
    pub forbidden: bool,
    pub translatable: bool,

    /// Translations snapshot taken from the glossary term at match time
    pub translations: BTreeMap<String, String>,
}

impl TermOccurrence {
    /// Build an occurrence of `term` covering `[start, end)`
    pub fn from_term(term: &GlossaryTerm, matched_text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            term: term.term.clone(),
            matched_text: matched_text.into(),
            start,
            end,
            case_sensitive: term.case_sensitive,
            forbidden: term.forbidden,
            translatable: term.translatable,
            translations: term.translations.clone(),
        }
    }

    /// Correlation id used in the fence around this occurrence
    pub fn marker_id(&self) -> MarkerId {
        MarkerId::new(&self.term, self.start, self.end)
    }

    /// Whether `[start, end)` intersects this occurrence
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }

    /// Expected rendering in the target language, if the glossary has one
    pub fn expected_translation(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }
}

/// Character/byte offset conversion for one text
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte index of every character, in order
    char_starts: Vec<usize>,
    /// Total byte length of the text
    byte_len: usize,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        Self {
            char_starts: text.char_indices().map(|(i, _)| i).collect(),
            byte_len: text.len(),
        }
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.char_starts.len()
    }

    /// Character offset of a byte index lying on a char boundary
    pub fn char_offset(&self, byte: usize) -> usize {
        if byte >= self.byte_len {
            return self.char_starts.len();
        }
        match self.char_starts.binary_search(&byte) {
            Ok(index) => index,
            Err(index) => index,
        }
    }

    /// Byte index of a character offset; `None` past the end
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        if char_offset == self.char_starts.len() {
            return Some(self.byte_len);
        }
        self.char_starts.get(char_offset).copied()
    }

    /// Byte range for a half-open character range
    pub fn byte_range(&self, start: usize, end: usize) -> Option<Range<usize>> {
        if start > end {
            return None;
        }
        Some(self.byte_offset(start)?..self.byte_offset(end)?)
    }
}
