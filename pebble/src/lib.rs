//! # pebble
//!
//! Request-scoped sessions whose values can be plain, flash (readable for
//! one more request) or temp (readable until an expiry time).
//!
//! ## Quick Start
//!
//! ```no_run
//! use pebble::prelude::*;
//!
//! # async fn handler() -> Result<()> {
//! let store = Arc::new(InMemorySessionStore::new());
//! let mut session = Session::new(store);
//!
//! session.open().await?;
//! if let Some(notice) = session.get("notice")? {
//!     println!("{notice}");
//! }
//! session.set_flash("notice", "Welcome back")?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `sessions` (default) - [`Session`](session::Session), the lifecycle and the in-memory store
//! - `telemetry` (default) - logging initialisation and span helpers
//! - `sqlite` - `DatabaseSessionStore` backed by SQLite

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Store contract, clock, configuration and errors. Always available.
pub use pebble_core::*;

// Re-export common dependencies for convenience
pub use async_trait::async_trait;
pub use serde_json;

/// Session lifecycle, flash/temp markers and reference stores.
///
/// Available with feature: `sessions`
#[cfg(feature = "sessions")]
#[cfg_attr(docsrs, doc(cfg(feature = "sessions")))]
pub mod session {
    pub use pebble_session::*;
}

/// Logging setup and session spans.
///
/// Available with feature: `telemetry`
#[cfg(feature = "telemetry")]
#[cfg_attr(docsrs, doc(cfg(feature = "telemetry")))]
pub mod telemetry {
    pub use pebble_telemetry::*;
}

/// Convenience prelude for common imports.
///
/// ```
/// use pebble::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Clock, ManualClock, PebbleError, Result, SessionConfig, SessionMap, SessionStore,
        SystemClock,
    };

    #[cfg(feature = "sessions")]
    pub use crate::session::{InMemorySessionStore, Marker, OpenOutcome, Session};

    #[cfg(feature = "telemetry")]
    pub use crate::telemetry::init_telemetry;

    pub use crate::async_trait;
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
