/*!
 * Integration tests for the JSON glossary store and row import.
 */

use std::sync::Arc;

use termguard::errors::{GlossaryError, TranslationError};
use termguard::glossary::{GlossaryImporter, GlossaryStore, JsonGlossaryStore, StatsService};
use termguard::providers::mock::MockProvider;
use termguard::translation::{GlossaryPipeline, TranslateOptions};

use crate::common::{self, PROJECT};

#[tokio::test]
async fn test_importRows_thenTranslate_shouldUseStoredGlossary() {
    let dir = common::create_temp_dir().unwrap();
    let store = JsonGlossaryStore::new(dir.path().join("glossary.json"));

    let report = GlossaryImporter::parse_rows(&common::sample_rows(), &[]).unwrap();
    assert_eq!(report.languages, vec!["es_419", "fr"]);
    assert_eq!(store.add_terms(PROJECT, report.terms).await.unwrap(), 2);

    let pipeline = GlossaryPipeline::new(
        Arc::new(store),
        Arc::new(MockProvider::translating(&[("cloud", "nuage")])),
    );
    let result = pipeline
        .translate_with_glossary("Acme cloud", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Acme nuage");
    assert!(result.verification_results.success);
    assert!(result.verification_results.warnings.is_empty());
}

#[tokio::test]
async fn test_importRows_twice_shouldSkipExistingTerms() {
    let dir = common::create_temp_dir().unwrap();
    let store = JsonGlossaryStore::new(dir.path().join("glossary.json"));

    let first = GlossaryImporter::parse_rows(&common::sample_rows(), &[]).unwrap();
    store.add_terms(PROJECT, first.terms).await.unwrap();

    let existing = store.get_terms(PROJECT).await.unwrap();
    let second = GlossaryImporter::parse_rows(&common::sample_rows(), &existing).unwrap();

    assert!(second.terms.is_empty());
    assert_eq!(second.skipped, vec!["Acme", "cloud"]);
}

#[tokio::test]
async fn test_loadRows_fromFile_shouldParseJsonArray() {
    let dir = common::create_temp_dir().unwrap();
    let rows = serde_json::to_string(&common::sample_rows()).unwrap();
    let path = common::create_test_file(dir.path(), "rows.json", &rows).unwrap();

    let loaded = GlossaryImporter::load_rows(&path).await.unwrap();
    assert_eq!(loaded, common::sample_rows());
}

#[tokio::test]
async fn test_jsonStore_corruptFile_shouldReportStoreUnavailable() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "glossary.json", "[not a map]").unwrap();
    let store = Arc::new(JsonGlossaryStore::new(path));

    let error = store.get_terms(PROJECT).await.unwrap_err();
    assert!(matches!(error, GlossaryError::StoreUnavailable { ref project_id, .. } if project_id == PROJECT));

    let pipeline = GlossaryPipeline::new(store, Arc::new(MockProvider::echo()));
    let result = pipeline
        .translate_with_glossary("Acme", "en", "fr", Some(PROJECT), TranslateOptions::default())
        .await;
    assert!(matches!(
        result,
        Err(TranslationError::Glossary(GlossaryError::StoreUnavailable { .. }))
    ));
}

#[tokio::test]
async fn test_statsService_overJsonStore_shouldReportImportedLanguages() {
    let dir = common::create_temp_dir().unwrap();
    let store = JsonGlossaryStore::new(dir.path().join("nested").join("glossary.json"));
    store.add_terms(PROJECT, common::sample_glossary()).await.unwrap();

    let service = StatsService::new(Arc::new(store));
    let stats = service.get_stats(PROJECT).await.unwrap();

    assert_eq!(stats.total_terms, 5);
    assert_eq!(stats.available_languages, vec!["de", "fr"]);
}
