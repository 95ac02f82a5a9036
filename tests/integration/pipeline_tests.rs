/*!
 * Integration tests for the glossary translation pipeline.
 *
 * Each test drives the full flow (match, fence, translate, verify) with a
 * deterministic mock translator standing in for an LLM.
 */

use std::sync::Arc;

use termguard::errors::{GlossaryError, TranslationError};
use termguard::glossary::{InMemoryGlossaryStore, JsonGlossaryStore, TermMatcher};
use termguard::providers::mock::MockProvider;
use termguard::translation::{GlossaryPipeline, TermStatus, TranslateOptions};

use crate::common::{self, PROJECT};

const SOURCE: &str = "Acme cloud dashboard with a widget";

#[tokio::test]
async fn test_pipeline_compliantTranslator_shouldProduceCleanText() {
    common::init_test_logging();
    let provider = MockProvider::translating(&[
        ("cloud", "nuage"),
        ("dashboard", "tableau de bord"),
        ("widget", "gadget"),
        ("with a", "avec un"),
    ]);
    let pipeline = common::sample_pipeline(provider.clone());

    let result = pipeline
        .translate_with_glossary(SOURCE, "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Acme nuage tableau de bord avec un gadget");
    assert_eq!(result.source_text, SOURCE);
    assert_eq!(result.glossary_terms_found.len(), 4);
    assert!(result.wrapped_text.contains(r#"<MARKER id="Acme_0_4">Acme</MARKER>"#));
    assert!(result.wrapped_text.contains(r#"<MARKER id="widget_28_34">widget</MARKER>"#));

    let verification = &result.verification_results;
    assert!(verification.success);
    assert!(verification.missing_terms.is_empty());
    // widget has no French translation, so it can only be flagged as unverified
    assert_eq!(verification.warnings.len(), 1);
    assert!(verification.warnings[0].contains("widget"));
    assert_eq!(verification.found_wrapped_terms.len(), 4);

    let instructions = provider.requests()[0].instructions.clone().unwrap();
    assert!(instructions.contains("FORBIDDEN TERMS (DO NOT TRANSLATE):\nThese terms must remain exactly as they appear in the source text:\n- Acme"));
    assert!(instructions.contains("- dashboard → tableau de bord"));
    assert!(instructions.contains("- widget (translate appropriately)"));
}

#[tokio::test]
async fn test_pipeline_translatorRenamesForbiddenTerm_shouldFail() {
    let provider = MockProvider::translating(&[("Acme", "Acmé"), ("cloud", "nuage")]);
    let pipeline = common::sample_pipeline(provider);

    let result = pipeline
        .translate_with_glossary("Acme cloud", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    let verification = &result.verification_results;
    assert!(!verification.success);
    assert!(verification.warnings.iter().any(|w| w == "Forbidden term 'Acme' was incorrectly modified"));
    assert!(verification.suggestions.iter().any(|s| s == "Forbidden term 'Acme' should not be translated"));
    assert_eq!(result.translated_text, "Acmé nuage");

    let errors: Vec<_> = verification.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].status,
        TermStatus::ForbiddenModified {
            found: "Acmé".to_string()
        }
    );
}

#[tokio::test]
async fn test_pipeline_wrongTranslation_shouldWarnButSucceed() {
    let provider = MockProvider::translating(&[("cloud", "nuée")]);
    let pipeline = common::sample_pipeline(provider);

    let result = pipeline
        .translate_with_glossary("the cloud", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    let verification = &result.verification_results;
    assert!(verification.success);
    assert_eq!(verification.warnings, vec!["Term 'cloud' may not be correctly translated"]);
    assert_eq!(verification.suggestions, vec!["Term 'cloud' should be translated as 'nuage'"]);
}

#[tokio::test]
async fn test_pipeline_translatorDropsFences_shouldReportMissingTerms() {
    common::init_test_logging();
    let pipeline = common::sample_pipeline(MockProvider::strip_fences().with_replacements(&[("cloud", "nuage")]));

    let result = pipeline
        .translate_with_glossary("Acme cloud", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    let verification = &result.verification_results;
    assert!(!verification.success);
    let missing: Vec<&str> = verification.missing_terms.iter().map(|o| o.term.as_str()).collect();
    assert_eq!(missing, vec!["Acme", "cloud"]);
    assert_eq!(result.translated_text, "Acme nuage");
}

#[tokio::test]
async fn test_pipeline_noProject_shouldBehaveLikePlainTranslation() {
    let provider = MockProvider::fixed("Bonjour le monde");
    let pipeline = common::sample_pipeline(provider.clone());

    let result = pipeline
        .translate_with_glossary("Hello Acme world", "en", "fr", None, TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Bonjour le monde");
    assert_eq!(result.wrapped_text, "Hello Acme world");
    assert!(result.glossary_terms_found.is_empty());
    assert!(result.verification_results.success);
    assert!(result.verification_results.warnings.is_empty());
    assert_eq!(provider.requests()[0].text, "Hello Acme world");
}

#[tokio::test]
async fn test_pipeline_onlyForbiddenPolicy_shouldReportBareTranslatableTermAsMissing() {
    let options = TranslateOptions {
        preserve_forbidden_terms: true,
        translate_allowed_terms: false,
    };
    let provider = MockProvider::echo();
    let pipeline = common::sample_pipeline(provider.clone());

    let result = pipeline
        .translate_with_glossary("Acme cloud", "en", "fr", Some(PROJECT), options)
        .await
        .unwrap();

    assert_eq!(result.wrapped_text, r#"<MARKER id="Acme_0_4">Acme</MARKER> cloud"#);
    assert_eq!(result.glossary_terms_found.len(), 2);
    // The bare occurrence is still checked and cannot be located
    let verification = &result.verification_results;
    assert_eq!(verification.term_checks.len(), 2);
    assert!(!verification.success);
    assert_eq!(verification.missing_terms.len(), 1);
    assert_eq!(verification.missing_terms[0].term, "cloud");

    let instructions = provider.requests()[0].instructions.clone().unwrap();
    assert!(!instructions.contains("TRANSLATABLE TERMS"));
}

#[tokio::test]
async fn test_pipeline_unknownProject_shouldTranslateWithoutTerms() {
    let provider = MockProvider::echo();
    let pipeline = common::sample_pipeline(provider.clone());

    let result = pipeline
        .translate_with_glossary("Acme cloud", "en", "fr", Some("unknown"), TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Acme cloud");
    assert!(result.glossary_terms_found.is_empty());
    assert!(result.verification_results.success);
    assert_eq!(provider.request_count(), 1);
    assert_eq!(provider.requests()[0].instructions, None);
}

#[tokio::test]
async fn test_pipeline_failingStore_shouldPropagateError() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "glossary.json", "{ broken").unwrap();
    let provider = MockProvider::echo();
    let pipeline = GlossaryPipeline::new(Arc::new(JsonGlossaryStore::new(path)), Arc::new(provider.clone()));

    let result = pipeline
        .translate_with_glossary("Acme", "en", "fr", Some("unknown"), TranslateOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(TranslationError::Glossary(GlossaryError::StoreUnavailable { ref project_id, .. })) if project_id == "unknown"
    ));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_pipeline_freshJsonStore_shouldTranslateWithoutTerms() {
    let dir = common::create_temp_dir().unwrap();
    let store = JsonGlossaryStore::new(dir.path().join("glossary.json"));
    let pipeline = GlossaryPipeline::new(Arc::new(store), Arc::new(MockProvider::fixed("Bonjour")));

    let result = pipeline
        .translate_with_glossary("Hello", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Bonjour");
    assert!(result.glossary_terms_found.is_empty());
    assert!(result.verification_results.success);
}

#[tokio::test]
async fn test_pipeline_emptyGlossary_shouldNotSendInstructions() {
    let provider = MockProvider::echo();
    let pipeline = GlossaryPipeline::new(
        Arc::new(InMemoryGlossaryStore::with_project("empty", Vec::new())),
        Arc::new(provider.clone()),
    );

    let result = pipeline
        .translate_with_glossary("Acme cloud", "en", "fr", Some("empty"), TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Acme cloud");
    assert!(result.glossary_terms_found.is_empty());
    assert_eq!(provider.requests()[0].instructions, None);
}

#[tokio::test]
async fn test_pipeline_batch_shouldShareOneSnapshot() {
    let provider = MockProvider::translating(&[("cloud", "nuage")]);
    let pipeline = common::sample_pipeline(provider.clone());
    let texts = vec!["Acme cloud".to_string(), "".to_string(), "legacy cloud".to_string()];

    let results = pipeline
        .translate_batch_with_glossary(&texts, "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].translated_text, "Acme nuage");
    assert_eq!(results[1].translated_text, "");
    assert_eq!(results[2].translated_text, "legacy nuage");
    assert!(results[0].verification_results.success);
    assert!(results[1].verification_results.success);
    // legacy is neither forbidden nor translatable, so it is never fenced
    let missing: Vec<&str> = results[2]
        .verification_results
        .missing_terms
        .iter()
        .map(|o| o.term.as_str())
        .collect();
    assert_eq!(missing, vec!["legacy"]);
    // Blank input never reaches the provider
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_pipeline_result_shouldSerializeToJson() {
    let pipeline = common::sample_pipeline(MockProvider::echo());
    let result = pipeline
        .translate_with_glossary("Acme", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["translated_text"], "Acme");
    assert_eq!(json["verification_results"]["success"], true);
    assert_eq!(json["verification_results"]["found_wrapped_terms"]["Acme_0_4"], "Acme");
    assert_eq!(json["verification_results"]["term_checks"][0]["status"], "correct");
}

#[test]
fn test_matcher_onSampleGlossary_shouldFollowWordBoundaries() {
    let glossary = common::sample_glossary();
    let occurrences = TermMatcher::find("ACME clouds, Acme Cloud", &glossary);

    let found: Vec<(&str, usize, usize)> = occurrences
        .iter()
        .map(|o| (o.matched_text.as_str(), o.start, o.end))
        .collect();
    assert_eq!(found, vec![("Acme", 13, 17), ("Cloud", 18, 23)]);
}
