use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use windsite_core::error::{Result, WindsiteError};
use windsite_core::models::{Project, ProjectPatch, ProjectStatus};

use crate::ports::DocumentStore;

/// Key prefix separating project documents from other records in the store
pub const PROJECT_KEY_PREFIX: &str = "projects/";

/// CRUD and lifecycle flags over a document store keyed by project name
///
/// Fronted by a read-through/write-through in-memory cache. The cache is a
/// process-local accelerator, not a consistency mechanism; backing-store
/// errors always propagate as `Store` errors.
pub struct ProjectStore<D: DocumentStore> {
    backend: D,
    cache: RwLock<HashMap<String, Project>>,
}

impl<D: DocumentStore> ProjectStore<D> {
    /// Create a project store over a document backend
    pub fn new(backend: D) -> Self {
        Self { backend, cache: RwLock::new(HashMap::new()) }
    }

    fn storage_key(name: &str) -> String {
        format!("{}{}", PROJECT_KEY_PREFIX, name)
    }

    /// Merge a partial payload into any existing record and persist
    ///
    /// Missing records start from an empty project shell, so `save` doubles
    /// as create. Stamps `updated_at` and writes through the cache.
    pub async fn save(&self, name: &str, patch: &ProjectPatch) -> Result<Project> {
        let mut project = match self.load(name).await? {
            Some(existing) => existing,
            None => Project::new(name),
        };

        project.apply_patch(patch);
        project.updated_at = Utc::now();

        let document = serde_json::to_value(&project)
            .map_err(|e| WindsiteError::Serialization(e.to_string()))?;
        self.backend.put(&Self::storage_key(name), &document).await?;

        self.cache.write().unwrap().insert(name.to_string(), project.clone());

        Ok(project)
    }

    /// Load a project by name; `None` (not an error) when absent
    pub async fn load(&self, name: &str) -> Result<Option<Project>> {
        if let Some(cached) = self.cache.read().unwrap().get(name) {
            return Ok(Some(cached.clone()));
        }

        let Some(document) = self.backend.get(&Self::storage_key(name)).await? else {
            return Ok(None);
        };

        let project: Project = serde_json::from_value(document)
            .map_err(|e| WindsiteError::Serialization(e.to_string()))?;
        self.cache.write().unwrap().insert(name.to_string(), project.clone());

        Ok(Some(project))
    }

    /// Remove a project from store and cache; absent names are a no-op
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.backend.delete(&Self::storage_key(name)).await?;
        self.cache.write().unwrap().remove(name);
        Ok(())
    }

    /// All projects, sorted by name
    pub async fn list(&self) -> Result<Vec<Project>> {
        let documents = self.backend.list(Some(PROJECT_KEY_PREFIX)).await?;

        let mut projects = Vec::with_capacity(documents.len());
        for document in documents {
            let project: Project = serde_json::from_value(document)
                .map_err(|e| WindsiteError::Serialization(e.to_string()))?;
            projects.push(project);
        }

        projects.sort_by(|a, b| a.project_name.cmp(&b.project_name));
        Ok(projects)
    }

    /// Archived projects only
    pub async fn list_archived(&self) -> Result<Vec<Project>> {
        Ok(self.list().await?.into_iter().filter(|p| p.metadata.archived).collect())
    }

    /// Projects not archived; records without metadata count as active
    pub async fn list_active(&self) -> Result<Vec<Project>> {
        Ok(self.list().await?.into_iter().filter(|p| !p.metadata.archived).collect())
    }

    /// Set the analysis status; fails with `ProjectNotFound` when absent
    pub async fn update_status(&self, name: &str, status: ProjectStatus) -> Result<Project> {
        self.require(name).await?;
        self.save(name, &ProjectPatch::new().with_status(status)).await
    }

    /// Flag a project as archived and stamp the archival time
    pub async fn archive(&self, name: &str) -> Result<Project> {
        self.require(name).await?;
        let patch = ProjectPatch::new()
            .with_metadata_entry("archived", Value::Bool(true))
            .with_metadata_entry("archived_at", timestamp_value()?);
        self.save(name, &patch).await
    }

    /// Clear the archived flag and the archival time
    pub async fn unarchive(&self, name: &str) -> Result<Project> {
        self.require(name).await?;
        let patch = ProjectPatch::new()
            .with_metadata_entry("archived", Value::Bool(false))
            .with_metadata_entry("archived_at", Value::Null);
        self.save(name, &patch).await
    }

    /// Stamp the import time
    pub async fn mark_as_imported(&self, name: &str) -> Result<Project> {
        self.require(name).await?;
        let patch = ProjectPatch::new().with_metadata_entry("imported_at", timestamp_value()?);
        self.save(name, &patch).await
    }

    /// Whether a project is archived; false when the project is absent
    pub async fn is_archived(&self, name: &str) -> Result<bool> {
        Ok(self.load(name).await?.map(|p| p.metadata.archived).unwrap_or(false))
    }

    /// Whether a project is mid-analysis; false when the project is absent
    pub async fn is_in_progress(&self, name: &str) -> Result<bool> {
        Ok(self
            .load(name)
            .await?
            .map(|p| p.status == ProjectStatus::InProgress)
            .unwrap_or(false))
    }

    /// Drop every cached record
    pub fn clear_cache(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Number of cached records
    pub fn cache_size(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    async fn require(&self, name: &str) -> Result<Project> {
        self.load(name)
            .await?
            .ok_or_else(|| WindsiteError::ProjectNotFound { name: name.to_string() })
    }
}

fn timestamp_value() -> Result<Value> {
    serde_json::to_value(Utc::now()).map_err(|e| WindsiteError::Serialization(e.to_string()))
}
