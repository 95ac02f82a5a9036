/*!
 * Glossary-aware translation pipeline.
 *
 * One request runs through these steps:
 * 1. **Snapshot**: fetch the project's glossary once
 * 2. **Match**: locate non-overlapping term occurrences
 * 3. **Protect**: fence eligible occurrences and build translator instructions
 * 4. **Translate**: hand the fenced text to the provider
 * 5. **Verify**: recover fences, check every occurrence and clean the output
 *
 * Nothing is shared between requests apart from the injected store and
 * provider, so concurrent calls need no coordination.
 */

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ProviderError, TranslationError};
use crate::glossary::matcher::{PatternCache, TermMatcher};
use crate::glossary::model::{GlossaryTerm, TermOccurrence};
use crate::glossary::store::GlossaryStore;
use crate::providers::TranslationProvider;
use crate::translation::instructions::InstructionBuilder;
use crate::translation::protector::{FenceFormat, TermProtector};
use crate::translation::verifier::{VerificationResult, Verifier};

/// Which occurrences get fenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateOptions {
    /// Fence forbidden terms so they can be checked afterwards
    pub preserve_forbidden_terms: bool,
    /// Fence translatable terms so their rendering can be checked
    pub translate_allowed_terms: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            preserve_forbidden_terms: true,
            translate_allowed_terms: true,
        }
    }
}

/// Outcome of one glossary-aware translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTranslation {
    /// Final translated text with all fences removed
    pub translated_text: String,
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Every occurrence found in the source, fenced or not
    pub glossary_terms_found: Vec<TermOccurrence>,
    /// Source text as sent to the provider
    pub wrapped_text: String,
    pub verification_results: VerificationResult,
}

impl GlossaryTranslation {
    fn passthrough(source_text: &str, translated_text: String, source_lang: &str, target_lang: &str) -> Self {
        Self {
            verification_results: VerificationResult::passthrough(translated_text.clone()),
            translated_text,
            source_text: source_text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            glossary_terms_found: Vec::new(),
            wrapped_text: source_text.to_string(),
        }
    }
}

/// Orchestrates matching, fencing, translation and verification
#[derive(Debug, Clone)]
pub struct GlossaryPipeline {
    store: Arc<dyn GlossaryStore>,
    provider: Arc<dyn TranslationProvider>,
    protector: TermProtector,
    instructions: InstructionBuilder,
    verifier: Verifier,
}

impl GlossaryPipeline {
    /// Create a pipeline using the default `MARKER` fences
    pub fn new(store: Arc<dyn GlossaryStore>, provider: Arc<dyn TranslationProvider>) -> Self {
        Self::with_fence(store, provider, FenceFormat::default())
    }

    /// Create a pipeline whose fences use a custom tag name
    pub fn with_fence_tag(
        store: Arc<dyn GlossaryStore>,
        provider: Arc<dyn TranslationProvider>,
        fence_tag: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self::with_fence(store, provider, FenceFormat::new(fence_tag)?))
    }

    fn with_fence(store: Arc<dyn GlossaryStore>, provider: Arc<dyn TranslationProvider>, fence: FenceFormat) -> Self {
        Self {
            store,
            provider,
            instructions: InstructionBuilder::new(fence.tag()),
            protector: TermProtector::new(fence.clone()),
            verifier: Verifier::new(fence),
        }
    }

    pub fn provider(&self) -> &Arc<dyn TranslationProvider> {
        &self.provider
    }

    pub fn protector(&self) -> &TermProtector {
        &self.protector
    }

    /// Fetch the glossary snapshot for a project
    pub async fn glossary(&self, project_id: &str) -> Result<Vec<GlossaryTerm>, TranslationError> {
        self.store.get_terms(project_id).await.map_err(|e| {
            error!("Failed to load glossary for project '{}': {}", project_id, e);
            TranslationError::from(e)
        })
    }

    /// Translate `source_text`, protecting and verifying the project's glossary terms
    ///
    /// Without a project this is a plain provider call with a trivially
    /// successful verification. Store and provider failures are returned
    /// as errors; term-level problems end up in `verification_results`.
    pub async fn translate_with_glossary(
        &self,
        source_text: &str,
        source_lang: &str,
        target_lang: &str,
        project_id: Option<&str>,
        options: TranslateOptions,
    ) -> Result<GlossaryTranslation, TranslationError> {
        let Some(project_id) = project_id else {
            debug!("No project given, translating without glossary");
            let translated = self.translate_plain(source_text, source_lang, target_lang, None).await?;
            return Ok(GlossaryTranslation::passthrough(source_text, translated, source_lang, target_lang));
        };

        let glossary = self.glossary(project_id).await?;
        self.run(source_text, source_lang, target_lang, &glossary, options)
            .await
            .inspect_err(|e| error!("Translation failed for project '{}': {}", project_id, e))
    }

    /// Translate several texts against one glossary snapshot
    ///
    /// Texts are processed in order; the first store or provider failure
    /// aborts the batch.
    pub async fn translate_batch_with_glossary(
        &self,
        source_texts: &[String],
        source_lang: &str,
        target_lang: &str,
        project_id: Option<&str>,
        options: TranslateOptions,
    ) -> Result<Vec<GlossaryTranslation>, TranslationError> {
        let glossary = match project_id {
            Some(project_id) => Some(self.glossary(project_id).await?),
            None => None,
        };

        let mut results = Vec::with_capacity(source_texts.len());
        for (index, text) in source_texts.iter().enumerate() {
            debug!("Translating batch item {}/{}", index + 1, source_texts.len());
            let result = match &glossary {
                Some(glossary) => self.run(text, source_lang, target_lang, glossary, options).await?,
                None => {
                    let translated = self.translate_plain(text, source_lang, target_lang, None).await?;
                    GlossaryTranslation::passthrough(text, translated, source_lang, target_lang)
                }
            };
            results.push(result);
        }

        info!(
            "Batch translated {} text(s), {} fully compliant",
            results.len(),
            results.iter().filter(|r| r.verification_results.success).count()
        );
        Ok(results)
    }

    /// Run one text through the pipeline against a fetched snapshot
    async fn run(
        &self,
        source_text: &str,
        source_lang: &str,
        target_lang: &str,
        glossary: &[GlossaryTerm],
        options: TranslateOptions,
    ) -> Result<GlossaryTranslation, TranslationError> {
        let start_time = Instant::now();

        let mut cache = PatternCache::new();
        let occurrences = TermMatcher::find_with_cache(source_text, glossary, &mut cache);
        let eligible = TermProtector::eligible(
            &occurrences,
            options.preserve_forbidden_terms,
            options.translate_allowed_terms,
        );

        let wrapped_text = self.protector.wrap(
            source_text,
            &occurrences,
            options.preserve_forbidden_terms,
            options.translate_allowed_terms,
        );
        let instructions = self.instructions.build(&eligible, target_lang);
        let instructions = (!instructions.is_empty()).then_some(instructions);

        let translated = self
            .translate_plain(&wrapped_text, source_lang, target_lang, instructions.as_deref())
            .await?;

        // Unfenced occurrences are checked too and surface as missing
        let verification_results = self.verifier.verify(&translated, &occurrences, target_lang);

        info!(
            "Glossary translation {} -> {}: {} term(s) found, {} fenced, success: {} ({:.2?})",
            source_lang,
            target_lang,
            occurrences.len(),
            eligible.len(),
            verification_results.success,
            start_time.elapsed()
        );

        Ok(GlossaryTranslation {
            translated_text: verification_results.cleaned_text.clone(),
            source_text: source_text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            glossary_terms_found: occurrences,
            wrapped_text,
            verification_results,
        })
    }

    /// Call the provider, skipping blank input entirely
    async fn translate_plain(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        instructions: Option<&str>,
    ) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        debug!(
            "Sending {} char(s) to provider '{}'",
            text.chars().count(),
            self.provider.name()
        );
        self.provider
            .translate(text, source_lang, target_lang, instructions)
            .await
            .inspect_err(|e| error!("Provider '{}' failed: {}", self.provider.name(), e))
    }
}
