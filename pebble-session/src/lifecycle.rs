use crate::marker::{FlashAge, Marker, MarkerTable, SweepReport};
use pebble_core::{Clock, PebbleError, Result, SessionConfig, SessionMap, SessionStore, SystemClock};
use pebble_telemetry::{record_sweep, session_close_span, session_destroy_span, session_open_span};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

/// What happened during a call to [`SessionLifecycle::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    /// Effective id of the open session.
    pub session_id: String,
    /// The handle was already open; nothing was loaded or swept.
    pub already_open: bool,
    /// The store had nothing under this id, so an empty session was started.
    pub created: bool,
    pub sweep: SweepReport,
}

pub(crate) struct OpenState {
    pub(crate) values: SessionMap,
    pub(crate) markers: MarkerTable,
}

impl OpenState {
    fn persisted(&self, marker_key: &str) -> SessionMap {
        let mut out = self.values.clone();
        if let Some(encoded) = self.markers.encode() {
            out.insert(marker_key.to_string(), encoded);
        }
        out
    }
}

/// Owns one session's mapping between `open` and `close`.
///
/// Every `open` on a closed handle loads the mapping from the store and runs
/// exactly one sweep over the marker table before any caller code sees the
/// values. Opening an already open handle does nothing.
///
/// Dropping an open handle discards its changes; call [`close`](Self::close)
/// on every exit path that should persist.
pub struct SessionLifecycle {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    id: Option<String>,
    state: Option<OpenState>,
}

impl SessionLifecycle {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config: SessionConfig::default(),
            id: None,
            state: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Effective session id while open.
    pub fn id(&self) -> Option<&str> {
        self.state.as_ref().and(self.id.as_deref())
    }

    /// Load the session and sweep its markers.
    ///
    /// The id is resolved in order: `session_id` when given and non-empty
    /// (starting a new logical session under that id), the id this handle
    /// used last, the store's current id, then a fresh UUID.
    ///
    /// A store failure leaves the handle closed and is returned as
    /// [`PebbleError::StorageUnavailable`].
    pub async fn open(&mut self, session_id: Option<&str>) -> Result<OpenOutcome> {
        if self.state.is_some() {
            let session_id = self.id.clone().unwrap_or_default();
            return Ok(OpenOutcome {
                session_id,
                already_open: true,
                created: false,
                sweep: SweepReport::default(),
            });
        }

        self.config.validate()?;

        let id = match session_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self
                .id
                .clone()
                .or_else(|| self.store.current_id())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        };

        let span = session_open_span(&id);
        let loaded = guarded(self.config.store_timeout, "load", self.store.load(&id))
            .instrument(span.clone())
            .await?;

        let _enter = span.enter();
        let created = loaded.is_none();
        let mut values = loaded.unwrap_or_default();
        let (mut markers, discarded) = MarkerTable::extract(&mut values, &self.config.marker_key);
        let mut sweep = markers.sweep(&mut values, self.clock.now());
        sweep.discarded = discarded;
        record_sweep(sweep.aged, sweep.expired, sweep.orphaned);

        info!(
            created,
            keys = values.len(),
            tracked = markers.len(),
            "session opened"
        );

        self.id = Some(id.clone());
        self.state = Some(OpenState { values, markers });

        Ok(OpenOutcome { session_id: id, already_open: false, created, sweep })
    }

    /// Persist the mapping and close the handle.
    ///
    /// The handle is closed even when the store fails; the error is
    /// returned and the changes are lost. Closing a closed handle is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        let Some(state) = self.state.take() else {
            return Ok(());
        };
        let id = self.id.clone().unwrap_or_default();

        let snapshot = state.persisted(&self.config.marker_key);
        let span = session_close_span(&id, snapshot.len());
        guarded(self.config.store_timeout, "persist", self.store.persist(&id, &snapshot))
            .instrument(span)
            .await?;

        debug!(session.id = %id, "session closed");
        Ok(())
    }

    /// Drop all values and markers, delete the stored session, and forget
    /// its id. The handle ends up closed.
    pub async fn destroy(&mut self) -> Result<()> {
        if self.state.take().is_none() {
            return Err(PebbleError::SessionNotStarted);
        }
        let Some(id) = self.id.take() else {
            return Ok(());
        };

        guarded(self.config.store_timeout, "destroy", self.store.destroy(&id))
            .instrument(session_destroy_span(&id))
            .await?;

        info!(session.id = %id, "session destroyed");
        Ok(())
    }

    /// Clear every value and marker while keeping the session open.
    pub fn reset(&mut self) -> Result<()> {
        let state = self.state_mut()?;
        state.values.clear();
        state.markers.clear();
        Ok(())
    }

    /// Mark `key` as a flash value, resetting its age if it already was one.
    /// Does nothing when `key` holds no value.
    pub fn mark_flash(&mut self, key: &str) -> Result<()> {
        let state = self.state_mut()?;
        if state.values.contains_key(key) {
            state.markers.insert(key, Marker::Flash(FlashAge::New));
        }
        Ok(())
    }

    /// Mark `key` as a temp value. See [`Marker::temp`] for how `ttl_secs`
    /// is read. Does nothing when `key` holds no value.
    pub fn mark_temp(&mut self, key: &str, ttl_secs: i64) -> Result<()> {
        let now = self.clock.now();
        let state = self.state_mut()?;
        if state.values.contains_key(key) {
            state.markers.insert(key, Marker::temp(now, ttl_secs));
        }
        Ok(())
    }

    /// Stop tracking `key`. The value itself is left alone.
    pub fn unmark(&mut self, key: &str) -> Result<()> {
        self.state_mut()?.markers.remove(key);
        Ok(())
    }

    pub fn marker(&self, key: &str) -> Result<Option<Marker>> {
        Ok(self.state()?.markers.get(key))
    }

    pub fn markers(&self) -> Result<&MarkerTable> {
        Ok(&self.state()?.markers)
    }

    /// The mapping `close` would hand to the store right now, including the
    /// encoded marker table when anything is tracked.
    pub fn persisted_snapshot(&self) -> Result<SessionMap> {
        Ok(self.state()?.persisted(&self.config.marker_key))
    }

    pub(crate) fn check_key(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(PebbleError::InvalidKey("session keys must not be empty".into()));
        }
        if key == self.config.marker_key {
            return Err(PebbleError::InvalidKey(format!("`{}` is reserved", key)));
        }
        Ok(())
    }

    pub(crate) fn state(&self) -> Result<&OpenState> {
        self.state.as_ref().ok_or(PebbleError::SessionNotStarted)
    }

    pub(crate) fn state_mut(&mut self) -> Result<&mut OpenState> {
        self.state.as_mut().ok_or(PebbleError::SessionNotStarted)
    }
}

impl Drop for SessionLifecycle {
    fn drop(&mut self) {
        if self.state.is_some() {
            warn!(
                session.id = self.id.as_deref().unwrap_or_default(),
                "session dropped while open; changes were not persisted"
            );
        }
    }
}

/// Run a store call, bounded by the configured timeout. Every failure comes
/// back as `StorageUnavailable`.
async fn guarded<T>(
    limit: Option<Duration>,
    op: &'static str,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    let result = match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                return Err(PebbleError::StorageUnavailable(format!(
                    "store {} timed out after {:?}",
                    op, limit
                )));
            }
        },
        None => call.await,
    };

    result.map_err(|e| match e {
        PebbleError::StorageUnavailable(_) => e,
        other => PebbleError::StorageUnavailable(format!("store {} failed: {}", op, other)),
    })
}
