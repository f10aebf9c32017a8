//! Tests for the tab registry and its chrome-facing state
//!
//! Covers positional bookkeeping (creation order, close rules, the
//! last-tab guard), per-tab dirty tracking, and the chrome helpers the
//! view binds to (window title, tab labels).

mod common;

use common::restored_manager;
use scratchpad::TabManager;
use scratchpad::session::{InboundSignal, SessionEvent};

fn names(manager: &TabManager) -> Vec<String> {
    manager.tabs().iter().map(|t| t.name.clone()).collect()
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_create_appends_and_first_tab_is_active() {
    let mut manager = TabManager::new();
    assert!(manager.is_empty());
    assert_eq!(manager.active_tab_index(), None);

    manager.create_tab(Some("a"), Some("1"));
    manager.create_tab(Some("b"), None);
    manager.create_tab(None, None);

    assert_eq!(names(&manager), vec!["a", "b", "New Script"]);
    assert_eq!(manager.active_tab_index(), Some(0));
    assert_eq!(manager.tabs()[1].text(), "");
}

#[test]
fn test_close_active_tab_activates_previous() {
    // [a, b, c] with c active; closing c leaves [a, b] with b active
    let mut manager = TabManager::new();
    manager.create_tab(Some("a"), None);
    manager.create_tab(Some("b"), None);
    manager.create_tab(Some("c"), None);
    manager.switch_to_index(2);

    assert!(manager.close_tab_at(2));
    assert_eq!(names(&manager), vec!["a", "b"]);
    assert_eq!(manager.active_tab_index(), Some(1));
}

#[test]
fn test_close_first_active_tab_activates_new_first() {
    let mut manager = TabManager::new();
    manager.create_tab(Some("a"), None);
    manager.create_tab(Some("b"), None);

    assert!(manager.close_tab_at(0));
    assert_eq!(names(&manager), vec!["b"]);
    assert_eq!(manager.active_tab_index(), Some(0));
}

#[test]
fn test_close_inactive_tab_keeps_active_document() {
    let mut manager = TabManager::new();
    manager.create_tab(Some("a"), None);
    let b = manager.create_tab(Some("b"), None);
    manager.create_tab(Some("c"), None);
    manager.switch_to(b);

    assert!(manager.close_tab_at(0));
    assert_eq!(manager.active_tab_id(), Some(b));
    assert_eq!(manager.active_tab_index(), Some(0));

    assert!(manager.close_tab_at(1));
    assert_eq!(manager.active_tab_id(), Some(b));
}

#[test]
fn test_last_tab_is_never_closed() {
    let mut manager = TabManager::new();
    let only = manager.create_tab(Some("only"), None);

    assert!(!manager.close_tab_at(0));
    assert!(!manager.close_tab(only));
    assert_eq!(manager.tab_count(), 1);
    assert_eq!(manager.active_tab_id(), Some(only));
}

#[test]
fn test_out_of_range_operations_are_ignored() {
    let mut manager = TabManager::new();
    manager.create_tab(Some("a"), None);
    manager.create_tab(Some("b"), None);

    assert!(!manager.switch_to_index(5));
    assert!(!manager.close_tab_at(5));
    assert!(!manager.switch_to(999));
    assert_eq!(manager.tab_count(), 2);
    assert_eq!(manager.active_tab_index(), Some(0));
}

#[test]
fn test_tab_ids_are_never_reused() {
    let mut manager = TabManager::new();
    let a = manager.create_tab(None, None);
    let b = manager.create_tab(None, None);
    manager.close_tab(b);
    let c = manager.create_tab(None, None);

    assert_ne!(c, a);
    assert_ne!(c, b);
}

// ============================================================================
// Dirty Tracking Tests
// ============================================================================

#[test]
fn test_new_tab_is_clean_and_edit_makes_it_dirty() {
    let mut manager = TabManager::new();
    manager.create_tab(Some("a"), Some("seed"));
    let tab = manager.active_tab_mut().expect("active tab");
    assert!(!tab.is_dirty());

    tab.document_mut().append("!");
    assert!(tab.is_dirty());

    tab.mark_saved();
    assert!(!tab.is_dirty());
}

#[test]
fn test_dirty_state_is_independent_per_tab() {
    let mut manager = TabManager::new();
    let a = manager.create_tab(Some("a"), None);
    let b = manager.create_tab(Some("b"), None);

    manager
        .get_tab_mut(a)
        .expect("tab a")
        .document_mut()
        .append("x");

    assert!(manager.get_tab(a).expect("tab a").is_dirty());
    assert!(!manager.get_tab(b).expect("tab b").is_dirty());

    manager.switch_to(b);
    assert!(manager.get_tab(a).expect("tab a").is_dirty());
}

// ============================================================================
// Chrome Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_labels_and_title_follow_dirty_state() {
    let (mut manager, _store) = restored_manager().await;
    manager.new_tab();

    let summaries = manager.tab_summaries();
    assert_eq!(summaries[1].name, "scratchpad2.js");
    assert!(summaries[1].active);
    assert_eq!(summaries[1].label, "scratchpad2.js");

    manager.edit_active(|doc| doc.append("x"));
    assert_eq!(manager.tab_summaries()[1].label, "scratchpad2.js *");
    assert_eq!(manager.window_title(), "*scratchpad2.js");

    manager.handle_signal(InboundSignal::SaveConfirmed {
        filename: Some("saved.js".to_string()),
    });
    assert_eq!(manager.window_title(), "saved.js");
    assert!(!manager.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn test_switching_emits_active_change_for_view_rebind() {
    let (mut manager, _store) = restored_manager().await;
    let second = manager.new_tab();
    manager.drain_events();

    assert!(manager.switch_to_index(0));
    let events = manager.drain_events();
    assert!(events.contains(&SessionEvent::ActiveChanged { id: 1, index: 0 }));

    assert!(manager.switch_to(second));
    let events = manager.drain_events();
    assert!(events.contains(&SessionEvent::ActiveChanged {
        id: second,
        index: 1
    }));

    assert!(!manager.switch_to_index(9));
    assert!(manager.drain_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_file_load_replaces_active_content_clean() {
    let (mut manager, _store) = restored_manager().await;
    manager.edit_active(|doc| doc.append("unsaved"));
    assert!(manager.needs_discard_confirmation());

    manager.handle_signal(InboundSignal::FileLoaded {
        filename: "loaded.js".to_string(),
        text: "line1\r\nline2".to_string(),
    });

    assert_eq!(manager.active_text().as_deref(), Some("line1\nline2"));
    assert_eq!(manager.window_title(), "loaded.js");
    assert!(!manager.has_unsaved_changes());

    manager.edit_active(|doc| doc.append("!"));
    assert!(manager.has_unsaved_changes());
}
