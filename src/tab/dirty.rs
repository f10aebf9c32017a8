//! Unsaved-change detection.
//!
//! Dirtiness is always derived from the live document: a tab is dirty iff
//! its document's generation differs from the generation recorded at the
//! last save. [`DirtyTracker`] only remembers what was last *reported* so
//! that change notifications fire on edges; it is never consulted to answer
//! whether a tab is dirty.

use super::{Tab, TabId};
use crate::document::Document;
use std::collections::HashMap;

/// Whether `tab` has changes since its last confirmed save
pub fn is_dirty(tab: &Tab) -> bool {
    !tab.document().is_clean(tab.last_saved_generation())
}

/// A dirty-state transition to report to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyChange {
    pub id: TabId,
    pub index: usize,
    pub dirty: bool,
}

/// Edge detector for dirty-state notifications
#[derive(Debug, Default)]
pub struct DirtyTracker {
    reported: HashMap<TabId, bool>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute every tab and return the tabs whose dirty state differs
    /// from the last report. Tabs seen for the first time are reported only
    /// when dirty. Entries for tabs no longer present are dropped.
    pub fn refresh(&mut self, tabs: &[Tab]) -> Vec<DirtyChange> {
        let mut changes = Vec::new();
        for (index, tab) in tabs.iter().enumerate() {
            let dirty = is_dirty(tab);
            let previous = self.reported.insert(tab.id, dirty).unwrap_or(false);
            if previous != dirty {
                changes.push(DirtyChange {
                    id: tab.id,
                    index,
                    dirty,
                });
            }
        }
        self.reported
            .retain(|id, _| tabs.iter().any(|t| t.id == *id));
        changes
    }

    /// Forget everything reported so far
    pub fn reset(&mut self) {
        self.reported.clear();
    }
}
