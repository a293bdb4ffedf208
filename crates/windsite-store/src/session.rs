use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use windsite_core::config::LayeredConfig;
use windsite_core::error::{Result, WindsiteError};
use windsite_core::models::{SessionContext, SessionPatch};

use crate::ports::{SessionStore, SessionTracker};

/// Availability-over-consistency fallback for backing-store read failures.
///
/// Session context tracking is a convenience feature; a broken session store
/// must never take project operations down with it. This policy lives in one
/// place so the degrade contract stays auditable: a failed read serves the
/// stale cached context when one exists, otherwise a fresh ephemeral context
/// that is never persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct GracefulDegrade;

impl GracefulDegrade {
    fn resolve(
        &self,
        session_id: &str,
        stale: Option<SessionContext>,
        session_ttl_secs: i64,
        error: &WindsiteError,
    ) -> SessionContext {
        match stale {
            Some(context) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %error,
                    "Session store read failed, serving stale cached context"
                );
                context
            }
            None => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %error,
                    "Session store read failed with no cached fallback, serving ephemeral context"
                );
                SessionContext::new(session_id, None, session_ttl_secs)
            }
        }
    }
}

/// Cache and session TTL figures exposed for inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub cache_size: usize,
    pub cache_ttl_secs: u64,
    pub session_ttl_secs: i64,
}

struct CachedContext {
    context: SessionContext,
    cached_at: Instant,
}

/// Per-session active-project pointer and history over a TTL key-value store
///
/// Fronted by an in-process cache with a short TTL. All read paths degrade
/// through [`GracefulDegrade`] instead of failing, and write paths fall back
/// to cache-only updates when the backing store rejects them. The cache is
/// not coherent across processes; other processes may observe a stale active
/// project for up to one cache TTL window.
pub struct SessionContextManager<S: SessionStore> {
    backend: S,
    cache: RwLock<HashMap<String, CachedContext>>,
    cache_ttl: Duration,
    session_ttl_secs: i64,
    history_limit: usize,
    degrade: GracefulDegrade,
}

impl<S: SessionStore> SessionContextManager<S> {
    /// Create a session manager over a backing store, tuned from config
    pub fn new(backend: S, config: &LayeredConfig) -> Self {
        Self {
            backend,
            cache: RwLock::new(HashMap::new()),
            cache_ttl: Duration::from_secs(config.session_cache_ttl_secs.value),
            session_ttl_secs: config.session_ttl_secs.value,
            history_limit: config.history_limit.value,
            degrade: GracefulDegrade,
        }
    }

    /// Current context for a session; creates one lazily when missing
    ///
    /// Never fails: backing-store errors degrade to the stale cached entry
    /// or an ephemeral context.
    pub async fn context(&self, session_id: &str) -> SessionContext {
        let (stale, fresh) = self.cached(session_id);
        if let Some(context) = fresh {
            return context;
        }

        match self.backend.get(session_id).await {
            Ok(Some(context)) => {
                self.insert_cache(context.clone());
                context
            }
            Ok(None) => {
                let context = SessionContext::new(session_id, None, self.session_ttl_secs);
                if let Err(error) = self.backend.put(&context).await {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %error,
                        "Failed to persist fresh session context, continuing unpersisted"
                    );
                }
                self.insert_cache(context.clone());
                context
            }
            Err(error) => {
                let context =
                    self.degrade.resolve(session_id, stale, self.session_ttl_secs, &error);
                self.insert_cache(context.clone());
                context
            }
        }
    }

    /// The session's active project name, if one is set
    pub async fn active_project(&self, session_id: &str) -> Option<String> {
        self.context(session_id).await.active_project
    }

    /// Point the session at a project; an empty name clears the pointer
    ///
    /// Refreshes the session TTL. A failed backing-store update keeps the
    /// cache-only change instead of failing the call.
    pub async fn set_active_project(&self, session_id: &str, name: &str) {
        let mut context = self.context(session_id).await;
        context.set_active_project(name);
        context.touch(self.session_ttl_secs);

        let patch = SessionPatch::touch(self.session_ttl_secs).with_active_project(name);
        if let Err(error) = self.backend.update(session_id, &patch).await {
            tracing::warn!(
                session_id = %session_id,
                error = %error,
                "Session store update failed, keeping cache-only active project"
            );
        }

        self.insert_cache(context);
    }

    /// Push a project name to the front of the session history
    ///
    /// Deduplicates, truncates to the configured bound, refreshes the TTL.
    /// Same fail-soft write behavior as [`Self::set_active_project`].
    pub async fn add_to_history(&self, session_id: &str, name: &str) {
        let mut context = self.context(session_id).await;
        context.push_history(name, self.history_limit);
        context.touch(self.session_ttl_secs);

        let patch = SessionPatch::touch(self.session_ttl_secs)
            .with_history(context.project_history.clone());
        if let Err(error) = self.backend.update(session_id, &patch).await {
            tracing::warn!(
                session_id = %session_id,
                error = %error,
                "Session store update failed, keeping cache-only history"
            );
        }

        self.insert_cache(context);
    }

    /// Drop one session from the in-process cache
    pub fn invalidate_cache(&self, session_id: &str) {
        self.cache.write().unwrap().remove(session_id);
    }

    /// Drop every cached session
    pub fn clear_cache(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Cache size and TTL figures
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            cache_size: self.cache.read().unwrap().len(),
            cache_ttl_secs: self.cache_ttl.as_secs(),
            session_ttl_secs: self.session_ttl_secs,
        }
    }

    /// Cached context regardless of freshness, plus the fresh-only view
    fn cached(&self, session_id: &str) -> (Option<SessionContext>, Option<SessionContext>) {
        let cache = self.cache.read().unwrap();
        match cache.get(session_id) {
            Some(entry) => {
                let stale = Some(entry.context.clone());
                let fresh = (entry.cached_at.elapsed() <= self.cache_ttl)
                    .then(|| entry.context.clone());
                (stale, fresh)
            }
            None => (None, None),
        }
    }

    fn insert_cache(&self, context: SessionContext) {
        self.cache.write().unwrap().insert(
            context.session_id.clone(),
            CachedContext { context, cached_at: Instant::now() },
        );
    }
}

#[async_trait]
impl<S: SessionStore> SessionTracker for SessionContextManager<S> {
    async fn context(&self, session_id: &str) -> Result<SessionContext> {
        Ok(SessionContextManager::context(self, session_id).await)
    }

    async fn active_project(&self, session_id: &str) -> Result<Option<String>> {
        Ok(SessionContextManager::active_project(self, session_id).await)
    }

    async fn set_active_project(&self, session_id: &str, name: &str) -> Result<()> {
        SessionContextManager::set_active_project(self, session_id, name).await;
        Ok(())
    }

    async fn add_to_history(&self, session_id: &str, name: &str) -> Result<()> {
        SessionContextManager::add_to_history(self, session_id, name).await;
        Ok(())
    }
}
