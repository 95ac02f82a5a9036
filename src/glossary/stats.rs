/*!
 * Read-only reporting over a glossary snapshot.
 *
 * Nothing here touches the translation path: it counts terms by flag,
 * lists the languages translations exist for, and looks up single terms.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::errors::GlossaryError;
use crate::glossary::model::GlossaryTerm;
use crate::glossary::store::GlossaryStore;

/// Aggregate counts for one glossary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryStats {
    pub total_terms: usize,
    pub case_sensitive_terms: usize,
    pub case_insensitive_terms: usize,
    pub forbidden_terms: usize,
    pub translatable_terms: usize,
    /// Sorted, de-duplicated language codes
    pub available_languages: Vec<String>,
    pub language_count: usize,
}

impl GlossaryStats {
    /// Compute statistics for a set of terms
    pub fn from_terms(terms: &[GlossaryTerm]) -> Self {
        let case_sensitive_terms = terms.iter().filter(|t| t.case_sensitive).count();
        let available_languages = available_languages(terms);

        Self {
            total_terms: terms.len(),
            case_sensitive_terms,
            case_insensitive_terms: terms.len() - case_sensitive_terms,
            forbidden_terms: terms.iter().filter(|t| t.forbidden).count(),
            translatable_terms: terms.iter().filter(|t| t.translatable).count(),
            language_count: available_languages.len(),
            available_languages,
        }
    }
}

/// Details about a single glossary term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    pub term: String,
    pub description: String,
    pub case_sensitive: bool,
    pub forbidden: bool,
    pub translatable: bool,
    pub translations: BTreeMap<String, String>,
}

impl From<&GlossaryTerm> for TermInfo {
    fn from(term: &GlossaryTerm) -> Self {
        Self {
            term: term.term.clone(),
            description: term.description.clone(),
            case_sensitive: term.case_sensitive,
            forbidden: term.forbidden,
            translatable: term.translatable,
            translations: term.translations.clone(),
        }
    }
}

/// Sorted set of language codes present in any term's translations
pub fn available_languages(terms: &[GlossaryTerm]) -> Vec<String> {
    terms
        .iter()
        .flat_map(|t| t.translations.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Look a term up by name
///
/// An exact name match always wins. Otherwise a term matches ignoring case
/// only if the stored term is itself case-insensitive.
pub fn find_term<'a>(terms: &'a [GlossaryTerm], name: &str) -> Option<&'a GlossaryTerm> {
    if let Some(exact) = terms.iter().find(|t| t.term == name) {
        return Some(exact);
    }

    let lowered = name.to_lowercase();
    terms
        .iter()
        .find(|t| !t.case_sensitive && t.term.to_lowercase() == lowered)
}

/// Reporting service backed by a glossary store
#[derive(Debug, Clone)]
pub struct StatsService {
    store: Arc<dyn GlossaryStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn GlossaryStore>) -> Self {
        Self { store }
    }

    /// Statistics for a project's glossary
    pub async fn get_stats(&self, project_id: &str) -> Result<GlossaryStats, GlossaryError> {
        let terms = self.store.get_terms(project_id).await?;
        Ok(GlossaryStats::from_terms(&terms))
    }

    /// Languages with at least one translation in a project's glossary
    pub async fn get_available_languages(&self, project_id: &str) -> Result<Vec<String>, GlossaryError> {
        let terms = self.store.get_terms(project_id).await?;
        Ok(available_languages(&terms))
    }

    /// Look up a term in a project's glossary
    pub async fn lookup_term(&self, term_name: &str, project_id: &str) -> Result<Option<TermInfo>, GlossaryError> {
        let terms = self.store.get_terms(project_id).await?;
        Ok(find_term(&terms, term_name).map(TermInfo::from))
    }
}
