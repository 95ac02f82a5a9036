/*!
 * Glossary term matching.
 *
 * Finds every occurrence of a glossary term in a text using word-boundary
 * patterns. Case-sensitive terms are matched first and always win over
 * case-insensitive terms at overlapping positions. The result never
 * contains two overlapping occurrences and is ordered by start offset.
 *
 * Compiled patterns live in a `PatternCache` owned by the caller, so a
 * cache never outlives the request that built it.
 */

use log::{debug, info, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::glossary::model::{GlossaryTerm, OffsetMap, TermOccurrence};

/// Request-scoped cache of compiled word-boundary patterns
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: HashMap<(String, bool), Regex>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or compile the boundary pattern for a term
    ///
    /// Returns `None` only if the escaped pattern cannot be compiled
    /// (for example when it exceeds the regex size limit).
    pub fn pattern(&mut self, term: &str, case_sensitive: bool) -> Option<&Regex> {
        let key = (term.to_string(), case_sensitive);
        if !self.patterns.contains_key(&key) {
            let source = format!(r"\b{}\b", regex::escape(term));
            match RegexBuilder::new(&source)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(pattern) => {
                    self.patterns.insert(key.clone(), pattern);
                }
                Err(e) => {
                    warn!("Could not compile pattern for term '{}': {}", term, e);
                    return None;
                }
            }
        }
        self.patterns.get(&key)
    }

    /// Number of compiled patterns held
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Scans text against a glossary snapshot
pub struct TermMatcher;

impl TermMatcher {
    /// Find all non-overlapping term occurrences, ordered by start offset
    ///
    /// Convenience wrapper that uses a fresh pattern cache.
    pub fn find(text: &str, glossary: &[GlossaryTerm]) -> Vec<TermOccurrence> {
        let mut cache = PatternCache::new();
        Self::find_with_cache(text, glossary, &mut cache)
    }

    /// Find all non-overlapping term occurrences using a caller-owned cache
    pub fn find_with_cache(
        text: &str,
        glossary: &[GlossaryTerm],
        cache: &mut PatternCache,
    ) -> Vec<TermOccurrence> {
        if text.is_empty() || glossary.is_empty() {
            debug!("Nothing to match: text_len={}, terms={}", text.len(), glossary.len());
            return Vec::new();
        }

        let offsets = OffsetMap::new(text);
        let mut found: Vec<TermOccurrence> = Vec::new();

        // Case-sensitive pass first so its matches take precedence
        for pass_case_sensitive in [true, false] {
            for term in glossary.iter().filter(|t| t.case_sensitive == pass_case_sensitive) {
                if term.term.is_empty() {
                    warn!("Skipping glossary term with empty name");
                    continue;
                }
                Self::scan_term(text, term, &offsets, cache, &mut found);
            }
        }

        found.sort_by_key(|occurrence| occurrence.start);

        info!("Found {} glossary term occurrence(s)", found.len());
        for occurrence in &found {
            debug!(
                "  '{}' ({}) at {}-{} [forbidden: {}, translatable: {}]",
                occurrence.matched_text,
                occurrence.term,
                occurrence.start,
                occurrence.end,
                occurrence.forbidden,
                occurrence.translatable
            );
        }

        found
    }

    /// Record every match of one term that does not collide with `found`
    fn scan_term(
        text: &str,
        term: &GlossaryTerm,
        offsets: &OffsetMap,
        cache: &mut PatternCache,
        found: &mut Vec<TermOccurrence>,
    ) {
        let Some(pattern) = cache.pattern(&term.term, term.case_sensitive) else {
            return;
        };

        for m in pattern.find_iter(text) {
            let start = offsets.char_offset(m.start());
            let end = offsets.char_offset(m.end());

            if found.iter().any(|existing| existing.overlaps(start, end)) {
                debug!(
                    "Skipped overlapping match '{}' for term '{}' at {}-{}",
                    m.as_str(),
                    term.term,
                    start,
                    end
                );
                continue;
            }

            found.push(TermOccurrence::from_term(term, m.as_str(), start, end));
        }
    }
}
