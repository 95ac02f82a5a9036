/*!
 * # termguard - Glossary-safe machine translation
 *
 * A Rust library that keeps machine translation consistent with a
 * project glossary.
 *
 * ## Features
 *
 * - Locate glossary terms with word-boundary and case-sensitivity rules
 * - Fence protected terms with addressable markers before translation
 * - Translate through pluggable AI providers:
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Verify forbidden and translatable terms after translation
 * - Glossary statistics, term lookup and tabular import
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `glossary`: Glossary terms, storage, matching and statistics
 * - `translation`: Protection, instructions, verification and the pipeline
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for the translation providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod glossary;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, GlossaryError, ProviderError, TranslationError};
pub use glossary::{GlossaryStore, GlossaryTerm, InMemoryGlossaryStore, JsonGlossaryStore, TermMatcher, TermOccurrence};
pub use language_utils::{get_language_name, language_codes_match};
pub use providers::TranslationProvider;
pub use translation::{GlossaryPipeline, GlossaryTranslation, TranslateOptions, VerificationResult};
