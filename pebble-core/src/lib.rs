//! # pebble-core
//!
//! Core traits and types shared by the pebble session crates.
//!
//! ## Overview
//!
//! - [`SessionStore`] - Contract for the persistent key/value store behind a session
//! - [`Clock`] - Time source used to age temp values
//! - [`SessionConfig`] - Reserved key name, default lifetimes, store timeout
//! - [`PebbleError`] / [`Result`] - Unified error handling
//!
//! ## Implementing a store
//!
//! ```rust,ignore
//! #[async_trait]
//! impl SessionStore for MyStore {
//!     async fn load(&self, id: &str) -> Result<Option<SessionMap>> { ... }
//!     async fn persist(&self, id: &str, data: &SessionMap) -> Result<()> { ... }
//!     fn current_id(&self) -> Option<String> { ... }
//!     async fn destroy(&self, id: &str) -> Result<()> { ... }
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    DEFAULT_MARKER_KEY, DEFAULT_TEMP_TTL_SECS, RELATIVE_TTL_LIMIT_SECS, SessionConfig,
};
pub use error::{PebbleError, Result};
pub use store::{SessionMap, SessionStore};
