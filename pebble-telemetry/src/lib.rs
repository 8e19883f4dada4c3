//! # Pebble Telemetry
//!
//! Structured logging for pebble sessions using `tracing`.
//!
//! ## Features
//! - Console or JSON output through `tracing-subscriber`
//! - `RUST_LOG` style filtering
//! - Spans around the session I/O points (open, close, destroy)
//!
//! ## Usage
//!
//! ```rust
//! use pebble_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("my-web-app")?;
//!     info!("ready");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use init::{init_json_telemetry, init_telemetry};
pub use spans::*;
