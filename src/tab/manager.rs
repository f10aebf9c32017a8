//! Tab registry: the ordered set of open tabs plus the active-tab pointer

use super::{Tab, TabId, TabSummary};

/// Manages the open tabs of one editing surface
///
/// Tabs are identified by a stable [`TabId`]; positions are derived from the
/// current order and only used for rendering and positional commands. Once
/// the first tab exists the registry never becomes empty and always has
/// exactly one active tab.
#[derive(Debug)]
pub struct TabManager {
    /// All tabs, in tab strip order
    tabs: Vec<Tab>,
    /// Currently active tab ID
    active_tab_id: Option<TabId>,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
    /// Name used when a tab is created without one
    placeholder_name: String,
}

impl TabManager {
    /// Create an empty registry (the pre-initialization state)
    pub fn new() -> Self {
        Self::with_placeholder_name(scratchpad_config::defaults::placeholder_tab_name())
    }

    /// Create an empty registry that names unnamed tabs `placeholder_name`
    pub fn with_placeholder_name(placeholder_name: impl Into<String>) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            next_tab_id: 1,
            placeholder_name: placeholder_name.into(),
        }
    }

    /// Append a new tab and return its ID
    ///
    /// The tab owns a fresh document seeded with `content` (default empty) and
    /// starts clean. A missing or empty `name` falls back to the placeholder.
    /// The first tab created becomes active; later tabs do not change the
    /// active tab.
    pub fn create_tab(&mut self, name: Option<&str>, content: Option<&str>) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => self.placeholder_name.clone(),
        };
        self.tabs.push(Tab::new(id, name, content.unwrap_or_default()));

        if self.active_tab_id.is_none() {
            self.active_tab_id = Some(id);
        }

        log::info!("Created tab {} (total: {})", id, self.tabs.len());
        id
    }

    /// Switch to a tab by ID. Unknown IDs are ignored; returns whether the switch happened
    pub fn switch_to(&mut self, id: TabId) -> bool {
        if self.tabs.iter().any(|t| t.id == id) {
            self.active_tab_id = Some(id);
            log::debug!("Switched to tab {}", id);
            true
        } else {
            log::debug!("Ignoring switch to unknown tab {}", id);
            false
        }
    }

    /// Switch to a tab by 0-based position. Out-of-range positions are ignored
    pub fn switch_to_index(&mut self, index: usize) -> bool {
        match self.tabs.get(index) {
            Some(tab) => {
                let id = tab.id;
                self.switch_to(id)
            }
            None => {
                log::debug!(
                    "Ignoring switch to index {} (total: {})",
                    index,
                    self.tabs.len()
                );
                false
            }
        }
    }

    /// Close a tab by ID
    ///
    /// Refuses to close the last remaining tab. Returns whether a tab was removed.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        match self.index_of(id) {
            Some(idx) => self.close_tab_at(idx),
            None => {
                log::debug!("Ignoring close of unknown tab {}", id);
                false
            }
        }
    }

    /// Close the tab at a 0-based position
    ///
    /// - Refuses (returns `false`) when only one tab remains or `index` is out of range.
    /// - Closing the active tab activates the tab at `max(0, index - 1)`.
    /// - Closing any other tab keeps the same logical tab active; a tab
    ///   before the active one shifts the active position down by one.
    pub fn close_tab_at(&mut self, index: usize) -> bool {
        if self.tabs.len() <= 1 {
            log::debug!("Refusing to close the last tab");
            return false;
        }
        if index >= self.tabs.len() {
            log::debug!(
                "Ignoring close of index {} (total: {})",
                index,
                self.tabs.len()
            );
            return false;
        }

        let removed = self.tabs.remove(index);
        log::info!("Closing tab {} (index {})", removed.id, index);

        if self.active_tab_id == Some(removed.id) {
            let new_idx = index.saturating_sub(1);
            self.active_tab_id = Some(self.tabs[new_idx].id);
        }
        true
    }

    /// Rename the active tab. Returns `false` when no tab is active
    pub fn rename_active(&mut self, name: &str) -> bool {
        match self.active_tab_mut() {
            Some(tab) => {
                log::debug!("Renaming tab {} to {:?}", tab.id, name);
                tab.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
    }

    /// Get a mutable reference to the active tab
    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let active_id = self.active_tab_id;
        active_id.and_then(move |id| self.tabs.iter_mut().find(|t| t.id == id))
    }

    /// Get the active tab ID
    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Get index of active tab (0-based)
    pub fn active_tab_index(&self) -> Option<usize> {
        self.active_tab_id.and_then(|id| self.index_of(id))
    }

    /// Position of a tab in the current order
    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Get the number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Whether no tab has been created yet
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Get all tabs as a slice
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Get a tab by ID
    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a tab by ID
    pub fn get_tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Render-ready summaries of all tabs in order
    pub fn summaries(&self, untitled: &str) -> Vec<TabSummary> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| TabSummary {
                id: tab.id,
                index,
                name: tab.name.clone(),
                label: tab.label(untitled),
                dirty: tab.is_dirty(),
                active: Some(tab.id) == self.active_tab_id,
            })
            .collect()
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    /// Registry with one tab per name, the last one active
    fn manager_with(names: &[&str]) -> TabManager {
        let mut mgr = TabManager::new();
        for name in names {
            mgr.create_tab(Some(name), Some(name));
        }
        if let Some(last) = mgr.tabs.last() {
            mgr.active_tab_id = Some(last.id);
        }
        mgr
    }

    fn names(mgr: &TabManager) -> Vec<&str> {
        mgr.tabs.iter().map(|t| t.name.as_str()).collect()
    }

    fn active_name(mgr: &TabManager) -> &str {
        mgr.active_tab().map(|t| t.name.as_str()).unwrap_or("")
    }

    #[test]
    fn empty_registry_has_no_active_tab() {
        let mgr = TabManager::new();
        assert!(mgr.is_empty());
        assert_eq!(mgr.active_tab_index(), None);
    }

    #[test]
    fn first_tab_becomes_active() {
        let mut mgr = TabManager::new();
        let a = mgr.create_tab(Some("a"), None);
        mgr.create_tab(Some("b"), None);
        assert_eq!(mgr.active_tab_id(), Some(a));
        assert_eq!(mgr.active_tab_index(), Some(0));
    }

    #[test]
    fn create_defaults_name_and_content() {
        let mut mgr = TabManager::with_placeholder_name("New Script");
        let id = mgr.create_tab(None, None);
        let empty = mgr.create_tab(Some(""), Some("x"));
        let tab = mgr.get_tab(id).unwrap();
        assert_eq!(tab.name, "New Script");
        assert_eq!(tab.text(), "");
        assert!(!tab.is_dirty());
        assert_eq!(mgr.get_tab(empty).unwrap().name, "New Script");
    }

    #[test]
    fn ids_are_never_reused() {
        let mut mgr = manager_with(&["a", "b"]);
        let b = mgr.active_tab_id().unwrap();
        assert!(mgr.close_tab(b));
        let c = mgr.create_tab(Some("c"), None);
        assert!(c > b);
    }

    #[test]
    fn switch_out_of_range_is_noop() {
        let mut mgr = manager_with(&["a", "b"]);
        assert!(!mgr.switch_to_index(2));
        assert!(!mgr.switch_to(99));
        assert_eq!(active_name(&mgr), "b");
        assert!(mgr.switch_to_index(0));
        assert_eq!(active_name(&mgr), "a");
    }

    #[test]
    fn close_before_active_keeps_logical_tab() {
        let mut mgr = manager_with(&["A", "B", "C"]);
        assert!(mgr.close_tab_at(0));
        assert_eq!(names(&mgr), vec!["B", "C"]);
        assert_eq!(active_name(&mgr), "C");
        assert_eq!(mgr.active_tab_index(), Some(1));
    }

    #[test]
    fn close_active_at_end_selects_previous() {
        let mut mgr = manager_with(&["A", "B", "C"]);
        assert!(mgr.close_tab_at(2));
        assert_eq!(names(&mgr), vec!["A", "B"]);
        assert_eq!(active_name(&mgr), "B");
        assert_eq!(mgr.active_tab_index(), Some(1));
    }

    #[test]
    fn close_active_in_middle_selects_previous() {
        let mut mgr = manager_with(&["A", "B", "C"]);
        mgr.switch_to_index(1);
        assert!(mgr.close_tab_at(1));
        assert_eq!(active_name(&mgr), "A");
        assert_eq!(mgr.active_tab_index(), Some(0));
    }

    #[test]
    fn close_active_first_tab_selects_new_first() {
        let mut mgr = manager_with(&["A", "B", "C"]);
        mgr.switch_to_index(0);
        assert!(mgr.close_tab_at(0));
        assert_eq!(names(&mgr), vec!["B", "C"]);
        assert_eq!(active_name(&mgr), "B");
        assert_eq!(mgr.active_tab_index(), Some(0));
    }

    #[test]
    fn close_after_active_leaves_active_unchanged() {
        let mut mgr = manager_with(&["A", "B", "C"]);
        mgr.switch_to_index(0);
        assert!(mgr.close_tab_at(2));
        assert_eq!(active_name(&mgr), "A");
        assert_eq!(mgr.active_tab_index(), Some(0));
    }

    #[test]
    fn close_last_remaining_tab_is_refused() {
        let mut mgr = manager_with(&["only"]);
        assert!(!mgr.close_tab_at(0));
        let id = mgr.active_tab_id().unwrap();
        assert!(!mgr.close_tab(id));
        assert_eq!(mgr.tab_count(), 1);
        assert_eq!(mgr.active_tab_index(), Some(0));
    }

    #[test]
    fn close_out_of_range_is_noop() {
        let mut mgr = manager_with(&["A", "B"]);
        assert!(!mgr.close_tab_at(5));
        assert!(!mgr.close_tab(42));
        assert_eq!(mgr.tab_count(), 2);
    }

    #[test]
    fn random_create_close_sequences_keep_invariants() {
        // Deterministic pseudo-random walk over create/close/switch
        let mut mgr = manager_with(&["seed"]);
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..500 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let len = mgr.tab_count();
            match state % 3 {
                0 => {
                    mgr.create_tab(None, None);
                }
                1 => {
                    mgr.close_tab_at((state >> 8) as usize % (len + 1));
                }
                _ => {
                    mgr.switch_to_index((state >> 8) as usize % (len + 1));
                }
            }
            assert!(mgr.tab_count() >= 1);
            let active = mgr.active_tab_index().expect("active tab");
            assert!(active < mgr.tab_count());
        }
    }

    #[test]
    fn rename_active_only_touches_active() {
        let mut mgr = manager_with(&["a", "b"]);
        assert!(mgr.rename_active("renamed.js"));
        assert_eq!(names(&mgr), vec!["a", "renamed.js"]);

        let mut empty = TabManager::new();
        assert!(!empty.rename_active("x"));
    }

    #[test]
    fn summaries_reflect_dirty_and_active() {
        let mut mgr = manager_with(&["a", ""]);
        mgr.tabs[0].document_mut().set_text("changed");
        let summaries = mgr.summaries("Untitled");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].label, "a *");
        assert!(summaries[0].dirty);
        assert!(!summaries[0].active);
        assert_eq!(summaries[1].index, 1);
        assert!(summaries[1].active);
    }
}
