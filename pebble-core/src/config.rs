use crate::{PebbleError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Session key under which the marker table is persisted.
///
/// The colon keeps it out of the identifier-style names callers normally use.
pub const DEFAULT_MARKER_KEY: &str = "__pebble:markers__";

/// Temp lifetimes below this many seconds (30 days) are relative to now;
/// anything at or above it is taken as an absolute epoch timestamp.
pub const RELATIVE_TTL_LIMIT_SECS: i64 = 2_592_000;

/// Lifetime used by `set_temp_default`, in seconds.
pub const DEFAULT_TEMP_TTL_SECS: i64 = 300;

/// Configuration for a session handle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Reserved key holding the marker table. Callers may not use it.
    pub marker_key: String,
    /// Lifetime for temp values set without an explicit lifetime
    pub default_temp_ttl_secs: i64,
    /// Upper bound on a single store load/persist/destroy call (default: none)
    #[serde(with = "optional_secs")]
    pub store_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            marker_key: DEFAULT_MARKER_KEY.to_string(),
            default_temp_ttl_secs: DEFAULT_TEMP_TTL_SECS,
            store_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    ///
    /// ```
    /// use pebble_core::SessionConfig;
    ///
    /// let config = SessionConfig::from_toml_str("store_timeout = 2").unwrap();
    /// assert_eq!(config.store_timeout, Some(std::time::Duration::from_secs(2)));
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| PebbleError::Config(format!("invalid session config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_marker_key(mut self, marker_key: impl Into<String>) -> Self {
        self.marker_key = marker_key.into();
        self
    }

    pub fn with_default_temp_ttl(mut self, secs: i64) -> Self {
        self.default_temp_ttl_secs = secs;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.marker_key.is_empty() {
            return Err(PebbleError::Config("marker_key must not be empty".into()));
        }
        if self.default_temp_ttl_secs < 0 {
            return Err(PebbleError::Config(format!(
                "default_temp_ttl_secs must not be negative, got {}",
                self.default_temp_ttl_secs
            )));
        }
        Ok(())
    }
}

mod optional_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
