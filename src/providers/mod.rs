/*!
 * Translation provider implementations.
 *
 * The pipeline treats translation as an opaque text-in/text-out call.
 * This module contains the trait it depends on and the clients behind it:
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: Deterministic provider for tests and dry runs
 */

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{ProviderKind, TranslationConfig};
use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// Implementations receive the (possibly fenced) text plus optional
/// glossary instructions and return the translated text. Nothing
/// guarantees that fences survive; callers must verify the output.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate `text` from `source_lang` to `target_lang`
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_lang` - Source language code
    /// * `target_lang` - Target language code
    /// * `instructions` - Extra guidance appended to the translation prompt
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        instructions: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Language codes this provider is known to handle, with display names
    fn supported_languages(&self) -> BTreeMap<&'static str, &'static str> {
        prompt::COMMON_LANGUAGES.iter().copied().collect()
    }
}

/// Build the provider selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn TranslationProvider>> {
    let provider_config = config.active_provider_config();
    let temperature = config.common.temperature;

    let provider: Arc<dyn TranslationProvider> = match config.provider {
        ProviderKind::Ollama => Arc::new(ollama::OllamaProvider::new(
            &provider_config.endpoint,
            &provider_config.model,
            provider_config.timeout_secs,
            temperature,
        )?),
        ProviderKind::Anthropic => Arc::new(anthropic::AnthropicProvider::new(
            &provider_config.api_key,
            &provider_config.endpoint,
            &provider_config.model,
            provider_config.timeout_secs,
            temperature,
        )?),
        ProviderKind::Mock => Arc::new(mock::MockProvider::echo()),
    };

    Ok(provider)
}

/// Classify a transport-level failure from reqwest
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_connect() {
        ProviderError::ConnectionError(format!("{}: {}", provider, err))
    } else if err.is_timeout() {
        ProviderError::RequestFailed(format!("{} request timed out: {}", provider, err))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", provider, err))
    }
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod prompt;
