//! Walks one session through three requests to show flash and temp aging.
//!
//! Run with: `RUST_LOG=debug cargo run -p pebble-session --example flash_messages`

use pebble_core::{ManualClock, Result};
use pebble_session::{InMemorySessionStore, Session};
use pebble_telemetry::init_telemetry;
use std::sync::Arc;

async fn request(
    label: &str,
    store: &Arc<InMemorySessionStore>,
    clock: &Arc<ManualClock>,
    work: impl FnOnce(&mut Session) -> Result<()>,
) -> Result<()> {
    let mut session = Session::new(store.clone()).with_clock(clock.clone());
    let outcome = session.open().await?;
    println!(
        "{label}: aged={} expired={} notice={:?} otp={:?}",
        outcome.sweep.aged,
        outcome.sweep.expired,
        session.get("notice")?,
        session.get("otp")?,
    );

    // Close even when the handler fails, so the sweep result is persisted.
    let result = work(&mut session);
    session.close().await?;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = init_telemetry("flash-messages") {
        eprintln!("telemetry disabled: {e}");
    }

    let store = Arc::new(InMemorySessionStore::new().with_current_id("demo"));
    let clock = Arc::new(ManualClock::new(1_700_000_000));

    request("POST /profile", &store, &clock, |s| {
        s.set_flash("notice", "Profile saved")?;
        s.set_temp("otp", "913055", 90)
    })
    .await?;

    clock.advance(30);
    request("GET /profile", &store, &clock, |_| Ok(())).await?;

    clock.advance(60);
    request("GET /profile", &store, &clock, |_| Ok(())).await?;

    Ok(())
}
