//! Telemetry initialization and configuration

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize console logging
///
/// Reads the filter from `RUST_LOG`, falling back to `info`. Only the first
/// call installs a subscriber; later calls are no-ops.
///
/// # Arguments
/// * `service_name` - Name of the service, recorded on the startup event
///
/// # Example
/// ```
/// use pebble_telemetry::init_telemetry;
/// init_telemetry("my-web-app").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init();

        if installed.is_ok() {
            tracing::info!(service.name = service_name, "Telemetry initialized");
        }
    });

    Ok(())
}

/// Initialize JSON logging, one object per line
///
/// Intended for log shippers. Shares the once-only guard with
/// [`init_telemetry`], so whichever runs first wins.
///
/// # Example
/// ```
/// use pebble_telemetry::init_json_telemetry;
/// init_json_telemetry("my-web-app").expect("Failed to initialize telemetry");
/// ```
pub fn init_json_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init();

        if installed.is_ok() {
            tracing::info!(service.name = service_name, format = "json", "Telemetry initialized");
        }
    });

    Ok(())
}
