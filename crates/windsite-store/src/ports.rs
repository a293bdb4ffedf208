use async_trait::async_trait;
use serde_json::Value;
use windsite_core::error::Result;
use windsite_core::models::{SessionContext, SessionPatch};

/// Port for durable keyed-document storage
///
/// The logical contract of any keyed-blob store: atomic per-key reads and
/// writes, no cross-key transactions. Multi-key protocols built on top must
/// order their writes accordingly.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by key
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a document under a key, replacing any existing document
    async fn put(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove a document; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// List documents whose keys start with `prefix`, or all documents
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<Value>>;
}

/// Port for session key-value storage with TTL expiry
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session record by id
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>>;

    /// Write a full session record
    async fn put(&self, context: &SessionContext) -> Result<()>;

    /// Apply a partial update, creating the record when absent
    async fn update(&self, session_id: &str, patch: &SessionPatch) -> Result<()>;
}

/// Port for session-context tracking as seen by lifecycle orchestration
///
/// Implemented by [`crate::session::SessionContextManager`]; the trait seam
/// lets orchestration code be tested against failing trackers.
#[async_trait]
pub trait SessionTracker: Send + Sync {
    /// Current context for a session, created lazily when missing
    async fn context(&self, session_id: &str) -> Result<SessionContext>;

    /// The session's active project name, if one is set
    async fn active_project(&self, session_id: &str) -> Result<Option<String>>;

    /// Point the session at a project; an empty name clears the pointer
    async fn set_active_project(&self, session_id: &str, name: &str) -> Result<()>;

    /// Push a project name to the front of the session history
    async fn add_to_history(&self, session_id: &str, name: &str) -> Result<()>;
}
