//! Resolves user-supplied project references to stored projects.
//!
//! References arrive in whatever form the user typed ("Texas Wind Farm",
//! "texas-wind-farm"); resolution normalizes them to the canonical slug and
//! looks the project up, caching hits per reference. Any operation that
//! renames, deletes, or archives a project must clear the cache so later
//! resolutions see fresh state.

use std::collections::HashMap;
use std::sync::RwLock;

use windsite_core::models::Project;
use windsite_core::{Result, WindsiteError};
use windsite_store::ports::DocumentStore;
use windsite_store::project::ProjectStore;

use crate::names;

#[derive(Debug, Default)]
pub struct ProjectResolver {
    cache: RwLock<HashMap<String, Project>>,
}

impl ProjectResolver {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve `reference` to its stored project, or `ProjectNotFound`.
    pub async fn resolve<D: DocumentStore>(
        &self,
        store: &ProjectStore<D>,
        reference: &str,
    ) -> Result<Project> {
        let name = names::normalize(reference);

        if let Some(hit) = self.cache.read().unwrap().get(&name) {
            return Ok(hit.clone());
        }

        let project = store
            .load(&name)
            .await?
            .ok_or_else(|| WindsiteError::ProjectNotFound { name: name.clone() })?;

        self.cache.write().unwrap().insert(name, project.clone());
        Ok(project)
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.cache.write().unwrap().clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windsite_core::models::ProjectPatch;
    use windsite_store::memory::MemoryDocumentStore;

    async fn seeded_store() -> ProjectStore<MemoryDocumentStore> {
        let store = ProjectStore::new(MemoryDocumentStore::new());
        store.save("texas-wind-farm", &ProjectPatch::new()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_resolve_normalizes_the_reference() {
        let store = seeded_store().await;
        let resolver = ProjectResolver::new();

        let project = resolver.resolve(&store, "Texas Wind Farm").await.unwrap();
        assert_eq!(project.project_name, "texas-wind-farm");
    }

    #[tokio::test]
    async fn test_resolve_unknown_reference_fails() {
        let store = seeded_store().await;
        let resolver = ProjectResolver::new();

        let result = resolver.resolve(&store, "missing").await;
        assert!(matches!(
            result,
            Err(WindsiteError::ProjectNotFound { name }) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn test_resolve_serves_cached_hits() {
        let store = seeded_store().await;
        let resolver = ProjectResolver::new();

        resolver.resolve(&store, "texas-wind-farm").await.unwrap();
        assert_eq!(resolver.cache_size(), 1);

        // Remove the record behind the resolver's back; the cached
        // resolution still answers until the cache is cleared.
        store.delete("texas-wind-farm").await.unwrap();
        let project = resolver.resolve(&store, "texas-wind-farm").await.unwrap();
        assert_eq!(project.project_name, "texas-wind-farm");

        resolver.clear_cache();
        assert_eq!(resolver.cache_size(), 0);
        let result = resolver.resolve(&store, "texas-wind-farm").await;
        assert!(matches!(result, Err(WindsiteError::ProjectNotFound { .. })));
    }
}
