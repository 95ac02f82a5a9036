/*!
 * Tests for application configuration functionality
 */

use termguard::app_config::{Config, GlossaryConfig, LogLevel, ProviderConfig, ProviderKind};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.translation.provider, ProviderKind::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);

    let ollama_config = config
        .translation
        .get_provider_config(&ProviderKind::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama_config.timeout_secs, 30);
    assert_eq!(ollama_config.endpoint, "http://localhost:11434");

    assert_eq!(config.glossary, GlossaryConfig::default());
    assert_eq!(config.glossary.fence_tag, "MARKER");
    assert!(config.glossary.preserve_forbidden_terms);
    assert!(config.glossary.translate_allowed_terms);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "qqq".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    // Regional target language is accepted by its base language
    config.target_language = "es_419".to_string();
    assert!(config.validate().is_ok());
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "fr".to_string();

    // Fence tag must be a plain identifier
    config.glossary.fence_tag = "".to_string();
    assert!(config.validate().is_err());
    config.glossary.fence_tag = "MY TAG".to_string();
    assert!(config.validate().is_err());
    config.glossary.fence_tag = "TERM_1".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_anthropicWithoutKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = ProviderKind::Anthropic;
    assert!(config.validate().is_err());

    if let Some(provider) = config
        .translation
        .available_providers
        .iter_mut()
        .find(|p| p.provider_type == "anthropic")
    {
        provider.api_key = "sk-ant-test".to_string();
    }
    assert!(config.validate().is_ok());

    config.translation.provider = ProviderKind::Mock;
    assert!(config.validate().is_ok());
}

#[test]
fn test_activeProviderConfig_withBlankFields_shouldFallBackToDefaults() {
    let mut config = Config::default();
    config.translation.available_providers = vec![ProviderConfig {
        provider_type: "ollama".to_string(),
        model: String::new(),
        api_key: String::new(),
        endpoint: String::new(),
        timeout_secs: 0,
    }];

    let active = config.translation.active_provider_config();
    assert_eq!(active.endpoint, "http://localhost:11434");
    assert_eq!(active.timeout_secs, 30);
    assert!(!active.model.is_empty());
    assert_eq!(config.translation.get_model(), active.model);
}

#[test]
fn test_providerKind_fromStr_shouldParseKnownProviders() {
    assert_eq!("Anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
    assert_eq!("mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
    assert!("openai".parse::<ProviderKind>().is_err());
    assert_eq!(ProviderKind::Ollama.to_string(), "ollama");
}

#[test]
fn test_config_partialJson_shouldUseDefaults() {
    let json = r#"{
        "source_language": "en",
        "target_language": "de",
        "glossary": { "default_project": "docs" }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_language, "de");
    assert_eq!(config.glossary.default_project.as_deref(), Some("docs"));
    assert_eq!(config.glossary.fence_tag, "MARKER");
    assert_eq!(config.glossary.store_path, "glossary.json");
    assert_eq!(config.translation.provider, ProviderKind::Ollama);
    assert!((config.translation.common.temperature - 0.3).abs() < f32::EPSILON);
}

#[test]
fn test_config_saveAndLoad_shouldPreserveValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "ja".to_string();
    config.glossary.default_project = Some("docs".to_string());
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language, "ja");
    assert_eq!(loaded.glossary, config.glossary);
}

#[test]
fn test_config_fromFile_invalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    let error = Config::from_file(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
}
