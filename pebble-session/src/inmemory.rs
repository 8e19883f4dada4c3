use pebble_core::{Result, SessionMap, SessionStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Process-local session store.
///
/// Cloning shares the underlying maps, so several handles (one per request)
/// can see each other's persisted sessions.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionMap>>>,
    current_id: Arc<RwLock<Option<String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `id` as the current session id, as a cookie-reading host would.
    pub fn with_current_id(self, id: impl Into<String>) -> Self {
        self.set_current_id(Some(id.into()));
        self
    }

    pub fn set_current_id(&self, id: Option<String>) {
        *self.current_id.write().unwrap_or_else(PoisonError::into_inner) = id;
    }

    /// Store `data` under `id` directly, bypassing any session handle.
    pub fn insert(&self, id: impl Into<String>, data: SessionMap) {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner).insert(id.into(), data);
    }

    /// What is currently stored under `id`.
    pub fn stored(&self, id: &str) -> Option<SessionMap> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionMap>> {
        Ok(self.stored(id))
    }

    async fn persist(&self, id: &str, data: &SessionMap) -> Result<()> {
        self.insert(id, data.clone());
        debug!(session.id = id, keys = data.len(), "persisted in memory");
        Ok(())
    }

    fn current_id(&self) -> Option<String> {
        self.current_id.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner).remove(id);

        let mut current = self.current_id.write().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(id) {
            *current = None;
        }
        Ok(())
    }
}
