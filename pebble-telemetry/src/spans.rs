//! Span helpers for session operations
//!
//! Provides pre-configured spans for the I/O points of a session: open,
//! close and destroy. Everything between them is in-memory.

use tracing::Span;

/// Create a span for opening a session
///
/// # Arguments
/// * `session_id` - Effective session id being loaded
///
/// # Example
/// ```
/// use pebble_telemetry::session_open_span;
/// let span = session_open_span("4c1f0f9e");
/// let _enter = span.enter();
/// // Store load and sweep here
/// ```
pub fn session_open_span(session_id: &str) -> Span {
    tracing::info_span!(
        "session.open",
        session.id = session_id,
        sweep.aged = tracing::field::Empty,
        sweep.expired = tracing::field::Empty,
        sweep.orphaned = tracing::field::Empty,
    )
}

/// Create a span for persisting and closing a session
///
/// # Example
/// ```
/// use pebble_telemetry::session_close_span;
/// let span = session_close_span("4c1f0f9e", 3);
/// let _enter = span.enter();
/// ```
pub fn session_close_span(session_id: &str, key_count: usize) -> Span {
    tracing::info_span!("session.close", session.id = session_id, session.keys = key_count)
}

pub fn session_destroy_span(session_id: &str) -> Span {
    tracing::info_span!("session.destroy", session.id = session_id)
}

/// Record sweep counters on the current span
///
/// Only has an effect inside a span created by [`session_open_span`].
pub fn record_sweep(aged: usize, expired: usize, orphaned: usize) {
    let span = Span::current();
    span.record("sweep.aged", aged);
    span.record("sweep.expired", expired);
    span.record("sweep.orphaned", orphaned);
}
