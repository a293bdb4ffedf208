use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel user id for sessions with no authenticated principal attached.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Per-session active-project pointer and recent-project history.
///
/// Created lazily on first access and never explicitly destroyed; the
/// backing store reclaims expired records through the `ttl` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,

    pub user_id: String,

    /// Project this session is currently focused on.
    pub active_project: Option<String>,

    /// Project names, most-recent-first, deduplicated, bounded.
    pub project_history: Vec<String>,

    pub last_updated: DateTime<Utc>,

    /// Epoch-seconds expiry consumed by the backing store's TTL sweeper.
    /// Refreshed on every write.
    pub ttl: i64,
}

impl SessionContext {
    /// Fresh context for a session, expiring `ttl_secs` from now.
    pub fn new(session_id: impl Into<String>, user_id: Option<&str>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            user_id: user_id.unwrap_or(ANONYMOUS_USER).to_string(),
            active_project: None,
            project_history: Vec::new(),
            last_updated: now,
            ttl: now.timestamp() + ttl_secs,
        }
    }

    /// Refresh `last_updated` and push the expiry window forward.
    pub fn touch(&mut self, ttl_secs: i64) {
        let now = Utc::now();
        self.last_updated = now;
        self.ttl = now.timestamp() + ttl_secs;
    }

    /// Set the active project; an empty name clears the pointer.
    pub fn set_active_project(&mut self, name: &str) {
        self.active_project = if name.is_empty() { None } else { Some(name.to_string()) };
    }

    /// Move `name` to the front of the history. Re-adding an existing
    /// entry moves it rather than duplicating it; the list is truncated
    /// to `limit`.
    pub fn push_history(&mut self, name: &str, limit: usize) {
        self.project_history.retain(|entry| entry != name);
        self.project_history.insert(0, name.to_string());
        self.project_history.truncate(limit);
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: &SessionPatch) {
        if let Some(name) = &patch.active_project {
            self.set_active_project(name);
        }
        if let Some(history) = &patch.project_history {
            self.project_history = history.clone();
        }
        self.last_updated = patch.last_updated;
        self.ttl = patch.ttl;
    }
}

/// Partial session update for the backing store.
///
/// Only the `Some` fields change; `last_updated` and `ttl` are always
/// rewritten so every write refreshes the expiry window. An empty
/// `active_project` string clears the pointer, matching the caller-facing
/// convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPatch {
    pub active_project: Option<String>,
    pub project_history: Option<Vec<String>>,
    pub last_updated: DateTime<Utc>,
    pub ttl: i64,
}

impl SessionPatch {
    /// Patch that only refreshes the expiry window, `ttl_secs` from now.
    pub fn touch(ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            active_project: None,
            project_history: None,
            last_updated: now,
            ttl: now.timestamp() + ttl_secs,
        }
    }

    /// Also update the active project ("" clears it)
    pub fn with_active_project(mut self, name: impl Into<String>) -> Self {
        self.active_project = Some(name.into());
        self
    }

    /// Also replace the project history
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.project_history = Some(history);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_defaults() {
        let context = SessionContext::new("session-1", None, 604_800);
        assert_eq!(context.user_id, ANONYMOUS_USER);
        assert!(context.active_project.is_none());
        assert!(context.project_history.is_empty());
        assert!(context.ttl > Utc::now().timestamp());
    }

    #[test]
    fn test_history_dedup_and_bound() {
        let mut context = SessionContext::new("session-1", Some("user-7"), 60);
        for name in ["a", "b", "c", "a"] {
            context.push_history(name, 3);
        }
        // Re-adding "a" moved it to the front instead of duplicating it.
        assert_eq!(context.project_history, vec!["a", "c", "b"]);

        context.push_history("d", 3);
        assert_eq!(context.project_history, vec!["d", "a", "c"]);
    }

    #[test]
    fn test_empty_name_clears_active_project() {
        let mut context = SessionContext::new("session-1", None, 60);
        context.set_active_project("texas-wind-farm-1");
        assert_eq!(context.active_project.as_deref(), Some("texas-wind-farm-1"));

        context.set_active_project("");
        assert!(context.active_project.is_none());
    }

    #[test]
    fn test_touch_refreshes_expiry() {
        let mut context = SessionContext::new("session-1", None, 10);
        let before = context.ttl;
        context.touch(604_800);
        assert!(context.ttl > before);
    }

    #[test]
    fn test_apply_patch_updates_only_present_fields() {
        let mut context = SessionContext::new("session-1", None, 60);
        context.set_active_project("old-project");
        context.push_history("old-project", 10);

        let patch = SessionPatch::touch(604_800).with_active_project("new-project");
        context.apply_patch(&patch);

        assert_eq!(context.active_project.as_deref(), Some("new-project"));
        // History was not part of the patch and stays untouched.
        assert_eq!(context.project_history, vec!["old-project"]);
        assert_eq!(context.ttl, patch.ttl);
    }
}
