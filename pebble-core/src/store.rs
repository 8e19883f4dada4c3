use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// The full key/value mapping stored for one session id.
pub type SessionMap = HashMap<String, Value>;

/// Contract for the persistent key/value store behind a session.
///
/// Implementations own durability and consistency. Any failure, including a
/// timeout inside the store, should be reported as
/// [`PebbleError::StorageUnavailable`](crate::PebbleError::StorageUnavailable).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the mapping stored under `id`, or `None` if nothing is stored.
    async fn load(&self, id: &str) -> Result<Option<SessionMap>>;

    /// Replace the mapping stored under `id`.
    async fn persist(&self, id: &str, data: &SessionMap) -> Result<()>;

    /// The id the host has already associated with the current unit of work
    /// (for example one read from a cookie), if any.
    fn current_id(&self) -> Option<String>;

    /// Remove everything stored under `id`.
    ///
    /// A store that tracks a current id must forget it when that id is
    /// destroyed, so the next open starts a fresh session.
    async fn destroy(&self, id: &str) -> Result<()>;
}
