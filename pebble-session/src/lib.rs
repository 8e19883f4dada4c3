//! # pebble-session
//!
//! Session values with flash and temp lifetimes, layered over any
//! [`SessionStore`](pebble_core::SessionStore).
//!
//! ## Overview
//!
//! - [`Session`] - Caller-facing get/set API plus flash and temp helpers
//! - [`SessionLifecycle`] - Open/close, the per-open sweep, mark/unmark
//! - [`MarkerTable`] / [`Marker`] - Per-key aging metadata and its wire format
//! - [`InMemorySessionStore`] - Process-local store
//! - `DatabaseSessionStore` - SQLite store (feature `sqlite`)
//!
//! ## Flash and temp values
//!
//! A flash value set during one request is still readable during the next
//! request that opens the session, and is gone after the one after that.
//! A temp value is readable until its expiry instant. Both are cleaned up
//! lazily: only [`Session::open`] sweeps.
//!
//! ```rust,no_run
//! use pebble_session::{InMemorySessionStore, Session};
//! use std::sync::Arc;
//!
//! # async fn example() -> pebble_core::Result<()> {
//! let store = Arc::new(InMemorySessionStore::new().with_current_id("abc"));
//!
//! // request 1
//! let mut session = Session::new(store.clone());
//! session.open().await?;
//! session.set_flash("notice", "Saved")?;
//! session.set_temp("otp", "913055", 300)?;
//! session.close().await?;
//!
//! // request 2: still there
//! let mut session = Session::new(store.clone());
//! session.open().await?;
//! assert!(session.has("notice")?);
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod inmemory;
pub mod lifecycle;
pub mod marker;
pub mod session;

#[cfg(feature = "sqlite")]
pub mod database;

pub use inmemory::InMemorySessionStore;
pub use lifecycle::{OpenOutcome, SessionLifecycle};
pub use marker::{FlashAge, Marker, MarkerTable, SweepReport};
pub use session::Session;

#[cfg(feature = "sqlite")]
pub use database::DatabaseSessionStore;
