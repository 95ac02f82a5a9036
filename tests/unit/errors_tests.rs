/*!
 * Tests for error types and conversions
 */

use termguard::errors::{AppError, GlossaryError, ProviderError, TranslationError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Overloaded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Overloaded"));
}

#[test]
fn test_providerError_fromStatus_shouldClassifyCommonCodes() {
    assert!(matches!(
        ProviderError::from_status(401, "bad key"),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(403, "forbidden"),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(429, "slow down"),
        ProviderError::RateLimitExceeded(_)
    ));
    assert!(matches!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_glossaryError_storeUnavailable_shouldNameProject() {
    let error = GlossaryError::StoreUnavailable {
        project_id: "docs".to_string(),
        message: "disk on fire".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("'docs'"));
    assert!(display.contains("disk on fire"));
}

#[test]
fn test_glossaryError_fromIoAndJson_shouldConvert() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(GlossaryError::from(io_error), GlossaryError::Io(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(GlossaryError::from(json_error), GlossaryError::InvalidData(_)));
}

#[test]
fn test_translationError_fromLayers_shouldWrapSource() {
    let error: TranslationError = ProviderError::EmptyResponse.into();
    assert!(error.to_string().contains("empty response"));

    let error: TranslationError = GlossaryError::StoreUnavailable {
        project_id: "docs".to_string(),
        message: "connection reset".to_string(),
    }
    .into();
    assert!(matches!(error, TranslationError::Glossary(GlossaryError::StoreUnavailable { .. })));
    assert!(error.to_string().contains("docs"));
}

#[test]
fn test_appError_conversions_shouldKeepMessages() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref m) if m == "something odd"));

    let error: AppError = TranslationError::from(ProviderError::ConnectionError("refused".to_string())).into();
    assert!(error.to_string().contains("refused"));
}
