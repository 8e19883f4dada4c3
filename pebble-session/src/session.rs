use crate::lifecycle::{OpenOutcome, SessionLifecycle};
use crate::marker::Marker;
use pebble_core::{Clock, Result, SessionConfig, SessionMap, SessionStore};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Caller-facing session API.
///
/// Plain values are read and written with [`get`](Self::get) and
/// [`set`](Self::set). Flash values survive exactly one later
/// [`open`](Self::open); temp values survive until their expiry. Both are
/// read back with the same `get` as any other value.
///
/// Every accessor fails with
/// [`PebbleError::SessionNotStarted`](pebble_core::PebbleError::SessionNotStarted)
/// until the session is opened, and again after it is closed.
///
/// ```no_run
/// use pebble_session::{InMemorySessionStore, Session};
/// use std::sync::Arc;
///
/// # async fn handle() -> pebble_core::Result<()> {
/// let store = Arc::new(InMemorySessionStore::new());
/// let mut session = Session::new(store);
///
/// session.open().await?;
/// session.set_flash("notice", "Profile saved")?;
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    lifecycle: SessionLifecycle,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { lifecycle: SessionLifecycle::new(store) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.lifecycle = self.lifecycle.with_clock(clock);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.lifecycle = self.lifecycle.with_config(config);
        self
    }

    pub fn lifecycle(&self) -> &SessionLifecycle {
        &self.lifecycle
    }

    /// Open the session under the id the handle or store already knows.
    pub async fn open(&mut self) -> Result<OpenOutcome> {
        self.lifecycle.open(None).await
    }

    /// Open the session under `id`.
    pub async fn open_with_id(&mut self, id: &str) -> Result<OpenOutcome> {
        self.lifecycle.open(Some(id)).await
    }

    pub fn id(&self) -> Option<&str> {
        self.lifecycle.id()
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.lifecycle.check_key(key)?;
        Ok(self.lifecycle.state()?.values.get(key).cloned())
    }

    /// The value under `key`, or `default` when there is none.
    pub fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// The value under `key` deserialized as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        self.lifecycle.check_key(&key)?;
        self.lifecycle.state_mut()?.values.insert(key, value.into());
        Ok(())
    }

    pub fn has(&self, key: &str) -> Result<bool> {
        self.lifecycle.check_key(key)?;
        Ok(self.lifecycle.state()?.values.contains_key(key))
    }

    /// Remove the value under `key` along with any marker on it.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.lifecycle.check_key(key)?;
        let state = self.lifecycle.state_mut()?;
        state.values.remove(key);
        state.markers.remove(key);
        Ok(())
    }

    /// Every value in the session. The marker table is never included.
    pub fn all(&self) -> Result<SessionMap> {
        Ok(self.lifecycle.state()?.values.clone())
    }

    /// Set a value that is removed by the second `open` after this one.
    pub fn set_flash(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        self.set(key.clone(), value)?;
        self.lifecycle.mark_flash(&key)
    }

    /// Set a value that is removed once `ttl_secs` have passed.
    ///
    /// Lifetimes of 30 days or more are taken as an absolute epoch
    /// timestamp instead; see [`Marker::temp`].
    pub fn set_temp(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        ttl_secs: i64,
    ) -> Result<()> {
        let key = key.into();
        self.set(key.clone(), value)?;
        self.lifecycle.mark_temp(&key, ttl_secs)
    }

    /// [`set_temp`](Self::set_temp) with the configured default lifetime.
    pub fn set_temp_default(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let ttl_secs = self.lifecycle.config().default_temp_ttl_secs;
        self.set_temp(key, value, ttl_secs)
    }

    pub fn mark_flash(&mut self, key: &str) -> Result<()> {
        self.lifecycle.check_key(key)?;
        self.lifecycle.mark_flash(key)
    }

    pub fn mark_temp(&mut self, key: &str, ttl_secs: i64) -> Result<()> {
        self.lifecycle.check_key(key)?;
        self.lifecycle.mark_temp(key, ttl_secs)
    }

    pub fn unmark(&mut self, key: &str) -> Result<()> {
        self.lifecycle.check_key(key)?;
        self.lifecycle.unmark(key)
    }

    pub fn marker(&self, key: &str) -> Result<Option<Marker>> {
        self.lifecycle.check_key(key)?;
        self.lifecycle.marker(key)
    }

    pub fn persisted_snapshot(&self) -> Result<SessionMap> {
        self.lifecycle.persisted_snapshot()
    }

    /// Remove every value but keep the session open under the same id.
    pub fn reset(&mut self) -> Result<()> {
        self.lifecycle.reset()
    }

    /// Remove every value, delete the stored session and forget its id.
    pub async fn destroy(&mut self) -> Result<()> {
        self.lifecycle.destroy().await
    }

    /// Persist the session and close the handle.
    pub async fn close(&mut self) -> Result<()> {
        self.lifecycle.close().await
    }
}
