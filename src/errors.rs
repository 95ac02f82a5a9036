/*!
 * Error types for the termguard crate.
 *
 * This module contains custom error types for the different layers,
 * using the thiserror crate for ergonomic error definitions. Only
 * unreachable collaborators (glossary store, translation provider) surface
 * as errors from the pipeline; term-level problems are reported in-band
 * by the verifier.
 */

use thiserror::Error;

/// Errors that can occur when working with translation providers
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered but produced no text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Map an HTTP status and body to the closest provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors that can occur when reading glossary data
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// The backing store could not be reached or failed
    #[error("Glossary store unavailable for project '{project_id}': {message}")]
    StoreUnavailable {
        /// Project whose glossary was requested
        project_id: String,
        /// Underlying failure
        message: String,
    },

    /// Glossary data could not be interpreted
    #[error("Invalid glossary data: {0}")]
    InvalidData(String),

    /// File system failure while reading or writing glossary files
    #[error("Glossary file error: {0}")]
    Io(String),
}

impl From<std::io::Error> for GlossaryError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for GlossaryError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidData(error.to_string())
    }
}

/// Errors that can occur during glossary-aware translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the glossary store
    #[error("Glossary error: {0}")]
    Glossary(#[from] GlossaryError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the glossary layer
    #[error("Glossary error: {0}")]
    Glossary(#[from] GlossaryError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
