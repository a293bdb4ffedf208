//! In-memory storage implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use a durable backend.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use windsite_core::error::Result;
use windsite_core::models::{SessionContext, SessionPatch};

use crate::ports::{DocumentStore, SessionStore};

/// In-memory implementation of DocumentStore
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryDocumentStore {
    /// Create a new in-memory document store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let documents = self.documents.read().unwrap();
        Ok(documents.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &Value) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        documents.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        documents.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<Value>> {
        let documents = self.documents.read().unwrap();

        // Lexicographic key order keeps scans deterministic
        let mut keys: Vec<&String> = documents
            .keys()
            .filter(|key| prefix.is_none_or(|p| key.starts_with(p)))
            .collect();
        keys.sort();

        Ok(keys.into_iter().map(|key| documents[key].clone()).collect())
    }
}

/// In-memory implementation of SessionStore
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionContext>>>,
}

impl MemorySessionStore {
    /// Create a new in-memory session store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(session_id).cloned())
    }

    async fn put(&self, context: &SessionContext) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(context.session_id.clone(), context.clone());
        Ok(())
    }

    async fn update(&self, session_id: &str, patch: &SessionPatch) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();

        let context = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionContext::new(session_id, None, 0));
        context.apply_patch(patch);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_document_put_and_get() {
        let store = MemoryDocumentStore::new();

        store.put("projects/alpha", &json!({"name": "alpha"})).await.unwrap();

        let loaded = store.get("projects/alpha").await.unwrap();
        assert_eq!(loaded, Some(json!({"name": "alpha"})));

        let missing = store.get("projects/beta").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_document_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();

        store.put("projects/alpha", &json!({})).await.unwrap();
        store.delete("projects/alpha").await.unwrap();
        assert!(store.get("projects/alpha").await.unwrap().is_none());

        // Deleting again is not an error
        store.delete("projects/alpha").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix_in_key_order() {
        let store = MemoryDocumentStore::new();

        store.put("projects/beta", &json!({"name": "beta"})).await.unwrap();
        store.put("projects/alpha", &json!({"name": "alpha"})).await.unwrap();
        store.put("sessions/s-1", &json!({"id": "s-1"})).await.unwrap();

        let projects = store.list(Some("projects/")).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0]["name"], "alpha");
        assert_eq!(projects[1]["name"], "beta");

        let everything = store.list(None).await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_session_update_creates_when_absent() {
        let store = MemorySessionStore::new();

        let patch = SessionPatch::touch(60).with_active_project("texas-wind-farm-1");
        store.update("session-1", &patch).await.unwrap();

        let context = store.get("session-1").await.unwrap().unwrap();
        assert_eq!(context.session_id, "session-1");
        assert_eq!(context.active_project.as_deref(), Some("texas-wind-farm-1"));
    }

    #[tokio::test]
    async fn test_session_update_merges_into_existing() {
        let store = MemorySessionStore::new();

        let mut context = SessionContext::new("session-1", Some("user-7"), 60);
        context.push_history("old-project", 10);
        store.put(&context).await.unwrap();

        let patch = SessionPatch::touch(60).with_active_project("new-project");
        store.update("session-1", &patch).await.unwrap();

        let updated = store.get("session-1").await.unwrap().unwrap();
        assert_eq!(updated.user_id, "user-7");
        assert_eq!(updated.active_project.as_deref(), Some("new-project"));
        // History untouched by a patch that does not carry one
        assert_eq!(updated.project_history, vec!["old-project"]);
    }
}
