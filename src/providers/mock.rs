/*!
 * Mock provider implementations for testing.
 *
 * This module provides a deterministic provider that simulates different translator behaviors:
 * - `MockProvider::echo()` - Returns the text unchanged
 * - `MockProvider::translating(..)` - Applies word replacements outside markup tags
 * - `MockProvider::strip_fences()` - Drops every markup tag, as a careless translator would
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// A request received by the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub instructions: Option<String>,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Returns the input unchanged
    Echo,
    /// Applies the configured replacements to text outside tags
    Translating,
    /// Applies the replacements and removes every tag
    StripFences,
    /// Always returns the same text
    Fixed(String),
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Word replacements as (from, to) pairs
    replacements: Vec<(String, String)>,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Requests seen so far, shared between clones
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            replacements: Vec::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a provider that replaces words outside tags
    pub fn translating(replacements: &[(&str, &str)]) -> Self {
        Self::new(MockBehavior::Translating).with_replacements(replacements)
    }

    /// Create a provider that loses every tag
    pub fn strip_fences() -> Self {
        Self::new(MockBehavior::StripFences)
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(text.into()))
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Add word replacements, applied in order
    pub fn with_replacements(mut self, replacements: &[(&str, &str)]) -> Self {
        self.replacements
            .extend(replacements.iter().map(|(from, to)| (from.to_string(), to.to_string())));
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Apply the replacements to every segment that is not a tag
    fn replace_outside_tags(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for tag in TAG_PATTERN.find_iter(text) {
            output.push_str(&self.replace_segment(&text[last..tag.start()]));
            output.push_str(tag.as_str());
            last = tag.end();
        }
        output.push_str(&self.replace_segment(&text[last..]));
        output
    }

    fn replace_segment(&self, segment: &str) -> String {
        self.replacements
            .iter()
            .fold(segment.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        instructions: Option<&str>,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(MockRequest {
            text: text.to_string(),
            source_language: source_lang.to_string(),
            target_language: target_lang.to_string(),
            instructions: instructions.map(str::to_string),
        });

        match &self.behavior {
            MockBehavior::Echo => Ok(text.to_string()),
            MockBehavior::Translating => Ok(self.replace_outside_tags(text)),
            MockBehavior::StripFences => Ok(TAG_PATTERN.replace_all(&self.replace_outside_tags(text), "").into_owned()),
            MockBehavior::Fixed(fixed) => Ok(fixed.clone()),
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.replace_outside_tags(text))
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
            MockBehavior::Empty => Ok(String::new()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
