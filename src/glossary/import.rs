/*!
 * Glossary import from tabular rows.
 *
 * A row maps column names to cells, as exported from a spreadsheet.
 * Metadata columns describe the term; every other column (except
 * `<lang>_description` columns) holds the translation for that language.
 */

use log::{debug, info};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use crate::errors::GlossaryError;
use crate::glossary::model::GlossaryTerm;

/// One spreadsheet-style row
pub type GlossaryRow = BTreeMap<String, Value>;

/// Columns that must be present in the header
pub const REQUIRED_COLUMNS: [&str; 4] = ["term", "casesensitive", "forbidden", "translatable"];

const METADATA_COLUMNS: [&str; 7] = [
    "term",
    "description",
    "part_of_speech",
    "casesensitive",
    "translatable",
    "forbidden",
    "tags",
];

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Terms ready to be stored
    pub terms: Vec<GlossaryTerm>,
    /// Term names skipped because they already exist
    pub skipped: Vec<String>,
    /// Language columns detected in the input, sorted
    pub languages: Vec<String>,
}

/// Converts rows into glossary terms
pub struct GlossaryImporter;

impl GlossaryImporter {
    /// Read rows from a JSON array file
    pub async fn load_rows(path: &Path) -> Result<Vec<GlossaryRow>, GlossaryError> {
        let content = tokio::fs::read_to_string(path).await?;
        let rows: Vec<GlossaryRow> = serde_json::from_str(&content)?;
        debug!("Loaded {} row(s) from {:?}", rows.len(), path);
        Ok(rows)
    }

    /// Convert rows into terms, skipping names already in `existing`
    pub fn parse_rows(rows: &[GlossaryRow], existing: &[GlossaryTerm]) -> Result<ImportReport, GlossaryError> {
        if rows.is_empty() {
            return Ok(ImportReport::default());
        }

        let columns: BTreeSet<&str> = rows.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !columns.contains(c))
            .collect();
        if !missing.is_empty() {
            return Err(GlossaryError::InvalidData(format!(
                "Missing required columns: {:?}",
                missing
            )));
        }

        let languages: Vec<String> = columns
            .iter()
            .filter(|c| !METADATA_COLUMNS.contains(c) && !c.ends_with("_description"))
            .map(|c| c.to_string())
            .collect();
        info!("Found languages: {:?}", languages);

        let mut seen: HashSet<String> = existing.iter().map(|t| t.term.to_lowercase()).collect();
        let mut report = ImportReport {
            languages,
            ..Default::default()
        };

        for row in rows {
            let Some(name) = cell_text(row, "term") else {
                continue;
            };

            if !seen.insert(name.to_lowercase()) {
                report.skipped.push(name);
                continue;
            }

            let description = cell_text(row, "description")
                .unwrap_or_else(|| format!("Glossary term: {}", name));

            let mut term = GlossaryTerm::new(name.clone())
                .with_description(description)
                .translatable(flag(row, "translatable", true));
            term.case_sensitive = flag(row, "casesensitive", false);
            term.forbidden = flag(row, "forbidden", false);

            for language in &report.languages {
                if let Some(translation) = cell_text(row, language) {
                    term.translations.insert(language.clone(), translation);
                }
            }

            debug!(
                "Parsed term '{}' with {} translation(s)",
                term.term,
                term.translations.len()
            );
            report.terms.push(term);
        }

        info!(
            "Prepared {} term(s), skipped {} existing",
            report.terms.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Interpret a spreadsheet flag; `yes`, `true`, `1`, `y` and `on` are true
pub fn parse_boolean_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yes" | "true" | "1" | "y" | "on"
    )
}

/// Flag cell with a default for a missing column; blank cells are false
fn flag(row: &GlossaryRow, column: &str, default: bool) -> bool {
    match row.get(column) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(value) => cell_to_string(value).is_some_and(|s| parse_boolean_flag(&s)),
    }
}

/// Trimmed, non-empty text of a cell
fn cell_text(row: &GlossaryRow, column: &str) -> Option<String> {
    row.get(column).and_then(cell_to_string)
}

fn cell_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}
