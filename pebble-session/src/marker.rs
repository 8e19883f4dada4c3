//! The marker table: per-key aging metadata stored beside session values.
//!
//! The table is persisted under a single reserved session key as a JSON
//! object mapping value keys to `"new"`, `"old"`, or an integer expiry in
//! epoch seconds. It never holds the values themselves.

use pebble_core::{RELATIVE_TTL_LIMIT_SECS, SessionMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// How many open cycles a flash value has survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashAge {
    /// Marked during the current cycle.
    New,
    /// Survived one sweep; the next sweep removes it.
    Old,
}

/// Aging state of one tracked session value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Marker {
    Flash(FlashAge),
    /// Absolute expiry in epoch seconds.
    Temp(i64),
}

impl Marker {
    /// Build a temp marker from a lifetime.
    ///
    /// `ttl_secs` below [`RELATIVE_TTL_LIMIT_SECS`] (30 days) is an offset
    /// from `now`; anything larger is already an absolute epoch timestamp
    /// and is kept as given.
    ///
    /// ```
    /// use pebble_session::Marker;
    ///
    /// assert_eq!(Marker::temp(1_000, 100), Marker::Temp(1_100));
    /// assert_eq!(Marker::temp(1_000, 1_700_000_000), Marker::Temp(1_700_000_000));
    /// ```
    pub fn temp(now: i64, ttl_secs: i64) -> Self {
        if ttl_secs < RELATIVE_TTL_LIMIT_SECS {
            Marker::Temp(now.saturating_add(ttl_secs))
        } else {
            Marker::Temp(ttl_secs)
        }
    }

    pub fn is_flash(&self) -> bool {
        matches!(self, Marker::Flash(_))
    }
}

/// Counters describing what a single sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Flash markers moved from `New` to `Old`.
    pub aged: usize,
    /// Values removed together with their marker (old flash or expired temp).
    pub expired: usize,
    /// Markers dropped because their value no longer exists.
    pub orphaned: usize,
    /// Persisted marker entries that could not be decoded and were dropped.
    pub discarded: usize,
}

impl SweepReport {
    pub fn is_noop(&self) -> bool {
        *self == SweepReport::default()
    }
}

/// Value key to [`Marker`] mapping for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerTable {
    entries: HashMap<String, Marker>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the persisted table stored under `marker_key` from `data` and
    /// decode it.
    ///
    /// Entries that do not decode are dropped; the second element of the
    /// result counts them. A table that is not a JSON object is dropped whole.
    pub fn extract(data: &mut SessionMap, marker_key: &str) -> (Self, usize) {
        let mut table = Self::new();
        let raw = match data.remove(marker_key) {
            None | Some(Value::Null) => return (table, 0),
            Some(raw) => raw,
        };

        let Value::Object(map) = raw else {
            warn!(marker_key, "discarding marker table that is not an object");
            return (table, 1);
        };

        let mut discarded = 0;
        for (key, value) in map {
            match serde_json::from_value::<Marker>(value) {
                Ok(marker) => {
                    table.entries.insert(key, marker);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "discarding undecodable marker");
                    discarded += 1;
                }
            }
        }

        (table, discarded)
    }

    /// Persisted form of the table, or `None` when there is nothing to track.
    pub fn encode(&self) -> Option<Value> {
        if self.entries.is_empty() {
            return None;
        }

        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, marker)| {
                let value = match marker {
                    Marker::Flash(FlashAge::New) => Value::from("new"),
                    Marker::Flash(FlashAge::Old) => Value::from("old"),
                    Marker::Temp(expires_at) => Value::from(*expires_at),
                };
                (key.clone(), value)
            })
            .collect();

        Some(Value::Object(map))
    }

    pub fn get(&self, key: &str) -> Option<Marker> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set or overwrite the marker for `key`.
    pub fn insert(&mut self, key: impl Into<String>, marker: Marker) {
        self.entries.insert(key.into(), marker);
    }

    pub fn remove(&mut self, key: &str) -> Option<Marker> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Marker)> {
        self.entries.iter().map(|(key, marker)| (key.as_str(), *marker))
    }

    /// Age and expire every tracked key in one pass.
    ///
    /// Entries are independent, so iteration order does not matter:
    /// - value missing from `data`: marker dropped
    /// - `Flash(New)`: becomes `Flash(Old)`
    /// - `Flash(Old)`: marker and value removed
    /// - `Temp(t)` with `now >= t`: marker and value removed
    /// - `Temp(t)` with `now < t`: unchanged
    pub fn sweep(&mut self, data: &mut SessionMap, now: i64) -> SweepReport {
        let mut report = SweepReport::default();

        self.entries.retain(|key, marker| {
            if !data.contains_key(key) {
                debug!(key = %key, "dropping orphaned marker");
                report.orphaned += 1;
                return false;
            }

            match *marker {
                Marker::Flash(FlashAge::New) => {
                    *marker = Marker::Flash(FlashAge::Old);
                    report.aged += 1;
                    true
                }
                Marker::Flash(FlashAge::Old) => {
                    debug!(key = %key, "removing flash value");
                    data.remove(key);
                    report.expired += 1;
                    false
                }
                Marker::Temp(expires_at) if now >= expires_at => {
                    debug!(key = %key, expires_at, now, "removing expired temp value");
                    data.remove(key);
                    report.expired += 1;
                    false
                }
                Marker::Temp(_) => true,
            }
        });

        report
    }
}
