//! Session state types for automatic save/restore
//!
//! The working set of tabs is persisted as a history-free snapshot after a
//! quiet period following each change, and restored on the next start.
//! Snapshots hold only names and text: restored tabs always start clean.

pub mod capture;
pub mod manager;
pub mod restore;
pub mod scheduler;
pub mod storage;

pub use capture::capture_session;
pub use manager::{InboundSignal, SessionEvent, SessionManager};
pub use restore::{NoSessionReason, RestoreError, RestoreOutcome, parse_snapshot, restore_registry};
pub use scheduler::{SaveScheduler, SchedulerState};
pub use storage::{FileStore, MemoryStore, SessionStore, StoreError};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Persisted working set: every open tab in order plus the active position
///
/// Wire shape: `{ "tabs": [{ "name": .., "content": .. }], "activeIndex": n }`
///
/// Only `tabs` is structural: it must be present and an array. Everything
/// inside is read leniently so one odd field never discards the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Tabs in tab strip order
    #[serde(deserialize_with = "lenient_tabs")]
    pub tabs: Vec<SessionTab>,
    /// Position of the active tab (`-1` before any tab exists)
    #[serde(default, deserialize_with = "lenient_index")]
    pub active_index: i64,
}

impl SessionSnapshot {
    /// Snapshot with no tabs, which restores as "no session"
    pub fn empty() -> Self {
        Self {
            tabs: Vec::new(),
            active_index: -1,
        }
    }
}

/// A single tab in a saved session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTab {
    /// Tab name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Full document text
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
}

/// Entries that are not objects restore as empty tabs
fn lenient_tabs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SessionTab>, D::Error> {
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry).unwrap_or_else(|e| {
                log::warn!("Session restore: unreadable tab entry ({}), using empty tab", e);
                SessionTab::default()
            })
        })
        .collect())
}

/// `null` and non-scalar values become empty; numbers and booleans keep
/// their JSON text
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Integral numbers (including `1.0`) are kept; anything else maps to `-1`,
/// which restore treats as out of range
fn lenient_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let index = match &value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    Ok(index.unwrap_or(-1))
}
