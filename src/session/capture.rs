//! Capture the live tab registry as a session snapshot

use super::{SessionSnapshot, SessionTab};
use crate::tab::TabManager;

/// Project the registry into a snapshot: names and current text in order,
/// plus the active position. Undo history and save markers are not kept.
pub fn capture_session(manager: &TabManager) -> SessionSnapshot {
    let tabs = manager
        .tabs()
        .iter()
        .map(|tab| SessionTab {
            name: tab.name.clone(),
            content: tab.text().to_string(),
        })
        .collect();

    let active_index = manager
        .active_tab_index()
        .map(|idx| idx as i64)
        .unwrap_or(-1);

    SessionSnapshot { tabs, active_index }
}
