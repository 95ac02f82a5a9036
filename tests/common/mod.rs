/*!
 * Common test utilities for the termguard test suite
 */

use anyhow::Result;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use termguard::glossary::{GlossaryRow, GlossaryTerm, InMemoryGlossaryStore};
use termguard::providers::mock::MockProvider;
use termguard::translation::GlossaryPipeline;

/// Project id used by the sample glossary
pub const PROJECT: &str = "demo";

/// Route library logs to the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small glossary covering every flag combination
pub fn sample_glossary() -> Vec<GlossaryTerm> {
    vec![
        GlossaryTerm::new("Acme")
            .case_sensitive()
            .forbidden()
            .with_description("Company name"),
        GlossaryTerm::new("cloud")
            .with_translation("fr", "nuage")
            .with_translation("de", "Wolke"),
        GlossaryTerm::new("dashboard").with_translation("fr", "tableau de bord"),
        GlossaryTerm::new("widget"),
        GlossaryTerm::new("legacy").translatable(false),
    ]
}

/// Store holding the sample glossary under `PROJECT`
pub fn sample_store() -> Arc<InMemoryGlossaryStore> {
    Arc::new(InMemoryGlossaryStore::with_project(PROJECT, sample_glossary()))
}

/// Pipeline over the sample glossary with the given mock
pub fn sample_pipeline(provider: MockProvider) -> GlossaryPipeline {
    GlossaryPipeline::new(sample_store(), Arc::new(provider))
}

/// Spreadsheet-style rows as produced by a glossary export
pub fn sample_rows() -> Vec<GlossaryRow> {
    let rows = json!([
        {
            "term": "Acme",
            "description": "Company name",
            "casesensitive": "yes",
            "forbidden": "yes",
            "translatable": "no",
            "fr": null
        },
        {
            "term": "cloud",
            "casesensitive": "no",
            "forbidden": "no",
            "translatable": "yes",
            "fr": "nuage",
            "fr_description": "Computing sense",
            "es_419": "nube"
        }
    ]);
    serde_json::from_value(rows).expect("Invalid sample rows")
}
