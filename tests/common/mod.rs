//! Shared integration test helpers for scratchpad.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{restored_manager, edit_active};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use scratchpad::config::Config;
use scratchpad::session::{MemoryStore, SessionManager, SessionSnapshot, SessionTab};
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Session key used by every helper (the config default)
pub fn session_key() -> String {
    Config::default().session_key
}

/// A manager over `store` with default config; not yet restored
pub fn manager_with_store(store: Arc<MemoryStore>) -> SessionManager<MemoryStore> {
    SessionManager::new(Config::default(), store, Handle::current())
}

/// A manager over an empty in-memory store, already restored to the
/// default single tab
pub async fn restored_manager() -> (SessionManager<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut manager = manager_with_store(Arc::clone(&store));
    manager.restore().await;
    (manager, store)
}

/// A store pre-seeded with a stored session value
pub fn store_with(value: Value) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_value(&session_key(), value))
}

/// Build a snapshot from `(name, content)` pairs
pub fn snapshot(tabs: &[(&str, &str)], active_index: i64) -> SessionSnapshot {
    SessionSnapshot {
        tabs: tabs
            .iter()
            .map(|(name, content)| SessionTab {
                name: name.to_string(),
                content: content.to_string(),
            })
            .collect(),
        active_index,
    }
}

/// The last value written for the session key, decoded
pub fn stored_snapshot(store: &MemoryStore) -> Option<SessionSnapshot> {
    store
        .value(&session_key())
        .map(|value| serde_json::from_value(value).expect("stored value is a snapshot"))
}
