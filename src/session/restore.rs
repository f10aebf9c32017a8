//! Helpers for restoring session state
//!
//! A stored value goes through two checks: structural validation
//! ([`parse_snapshot`]) and reconstruction ([`restore_registry`]). Any
//! failure along the way means "no session" and the caller starts fresh.

use super::storage::StoreError;
use super::SessionSnapshot;
use crate::tab::TabManager;
use thiserror::Error;

/// Why a stored session could not be used
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The stored value does not have the snapshot shape.
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The persistence backend failed to read.
    #[error("failed to read stored session: {0}")]
    Store(#[from] StoreError),
}

/// Reason a restore fell back to the default tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoSessionReason {
    /// Nothing stored under the session key
    Missing,
    /// A snapshot with no tabs
    Empty,
    /// The stored value failed validation
    Corrupt(String),
    /// The backend read failed
    ReadFailed(String),
}

/// Result of a startup restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Tabs were rebuilt from the stored snapshot
    Restored { tabs: usize, active_index: usize },
    /// No usable session; a single default tab was created
    Fresh { reason: NoSessionReason },
    /// Tabs already existed, so the stored session was ignored
    Skipped,
}

impl From<&RestoreError> for NoSessionReason {
    fn from(err: &RestoreError) -> Self {
        match err {
            RestoreError::Corrupt(e) => NoSessionReason::Corrupt(e.to_string()),
            RestoreError::Store(e) => NoSessionReason::ReadFailed(e.to_string()),
        }
    }
}

/// Validate a stored value as a snapshot
pub fn parse_snapshot(value: serde_json::Value) -> Result<SessionSnapshot, RestoreError> {
    Ok(serde_json::from_value(value)?)
}

/// Rebuild a registry from a snapshot
///
/// Returns `None` when the snapshot has no tabs. Every entry becomes a tab
/// through the normal creation path, so all restored tabs are clean. An
/// `active_index` outside `[0, len)` activates the first tab.
pub fn restore_registry(snapshot: &SessionSnapshot, placeholder_name: &str) -> Option<TabManager> {
    if snapshot.tabs.is_empty() {
        return None;
    }

    let mut manager = TabManager::with_placeholder_name(placeholder_name);
    for saved in &snapshot.tabs {
        manager.create_tab(Some(&saved.name), Some(&saved.content));
    }

    let active = usize::try_from(snapshot.active_index)
        .ok()
        .filter(|idx| *idx < manager.tab_count());
    match active {
        Some(idx) => {
            manager.switch_to_index(idx);
        }
        None => {
            log::warn!(
                "Session restore: active index {} out of range for {} tabs, using 0",
                snapshot.active_index,
                manager.tab_count()
            );
            manager.switch_to_index(0);
        }
    }

    Some(manager)
}
