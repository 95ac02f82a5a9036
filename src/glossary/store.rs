/*!
 * Glossary storage backends.
 *
 * The pipeline only needs a read-only lookup keyed by project id. Each
 * call to `get_terms` returns an owned snapshot that stays valid for the
 * whole request, whatever happens to the store afterwards.
 *
 * - `InMemoryGlossaryStore`: process-local map, mainly for tests and embedding
 * - `JsonGlossaryStore`: a JSON file mapping project ids to term lists
 */

use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::GlossaryError;
use crate::glossary::model::GlossaryTerm;

/// Read access to per-project glossaries
#[async_trait]
pub trait GlossaryStore: Send + Sync + Debug {
    /// Fetch a snapshot of every term in a project's glossary
    ///
    /// A project without a glossary yields an empty snapshot.
    async fn get_terms(&self, project_id: &str) -> Result<Vec<GlossaryTerm>, GlossaryError>;
}

/// Glossaries held in memory
#[derive(Debug, Default)]
pub struct InMemoryGlossaryStore {
    projects: RwLock<BTreeMap<String, Vec<GlossaryTerm>>>,
}

impl InMemoryGlossaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one project
    pub fn with_project(project_id: impl Into<String>, terms: Vec<GlossaryTerm>) -> Self {
        let store = Self::new();
        store.set_terms(project_id, terms);
        store
    }

    /// Replace a project's glossary
    pub fn set_terms(&self, project_id: impl Into<String>, terms: Vec<GlossaryTerm>) {
        self.projects.write().insert(project_id.into(), terms);
    }

    /// Append terms to a project's glossary, creating it if needed
    pub fn add_terms(&self, project_id: &str, terms: Vec<GlossaryTerm>) {
        self.projects
            .write()
            .entry(project_id.to_string())
            .or_default()
            .extend(terms);
    }
}

#[async_trait]
impl GlossaryStore for InMemoryGlossaryStore {
    async fn get_terms(&self, project_id: &str) -> Result<Vec<GlossaryTerm>, GlossaryError> {
        Ok(self
            .projects
            .read()
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Glossaries persisted in a JSON file of the form `{"project": [terms...]}`
#[derive(Debug, Clone)]
pub struct JsonGlossaryStore {
    path: PathBuf,
}

impl JsonGlossaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every project from the file; a missing file is an empty store
    pub async fn load_all(&self) -> Result<BTreeMap<String, Vec<GlossaryTerm>>, GlossaryError> {
        if !tokio::fs::try_exists(&self.path).await? {
            debug!("Glossary file {:?} does not exist yet", self.path);
            return Ok(BTreeMap::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// Append terms to a project and write the file back
    pub async fn add_terms(&self, project_id: &str, terms: Vec<GlossaryTerm>) -> Result<usize, GlossaryError> {
        let mut projects = self.load_all().await?;
        let added = terms.len();
        projects.entry(project_id.to_string()).or_default().extend(terms);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(&projects)?;
        tokio::fs::write(&self.path, json).await?;

        info!("Stored {} term(s) for project {} in {:?}", added, project_id, self.path);
        Ok(added)
    }
}

#[async_trait]
impl GlossaryStore for JsonGlossaryStore {
    async fn get_terms(&self, project_id: &str) -> Result<Vec<GlossaryTerm>, GlossaryError> {
        let mut projects = self.load_all().await.map_err(|e| GlossaryError::StoreUnavailable {
            project_id: project_id.to_string(),
            message: e.to_string(),
        })?;

        let terms = projects.remove(project_id).unwrap_or_default();
        if terms.is_empty() {
            debug!("No glossary terms stored for project {}", project_id);
        }
        Ok(terms)
    }
}
