/*!
 * Glossary-aware translation.
 *
 * This module wraps an opaque translation provider with glossary
 * protection and verification. It is split into several submodules:
 *
 * - `protector`: Fence rendering, wrapping and direct term replacement
 * - `instructions`: Plain-language glossary rules for the translator
 * - `verifier`: Fence recovery and compliance checks on translated text
 * - `pipeline`: The end-to-end request flow
 */

pub use self::instructions::InstructionBuilder;
pub use self::pipeline::{GlossaryPipeline, GlossaryTranslation, TranslateOptions};
pub use self::protector::{DEFAULT_FENCE_TAG, FenceFormat, FenceMatch, TermProtector};
pub use self::verifier::{TermCheck, TermStatus, VerificationResult, Verifier, WrappedSpan};

pub mod instructions;
pub mod pipeline;
pub mod protector;
pub mod verifier;
