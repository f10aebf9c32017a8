//! Session manager: the single owned state object behind one editing surface
//!
//! Holds the tab registry, reports chrome changes through [`SessionEvent`]s,
//! consumes [`InboundSignal`]s from external collaborators (file picker,
//! download helper, settings), and drives the debounced autosave.

use super::capture::capture_session;
use super::restore::{NoSessionReason, RestoreError, RestoreOutcome, parse_snapshot, restore_registry};
use super::scheduler::{SaveScheduler, SchedulerState};
use super::storage::{SessionStore, StoreError};
use super::SessionSnapshot;
use crate::document::{Document, TextBuffer};
use crate::status_bar::{CursorStatus, cursor_status};
use crate::tab::{DirtyTracker, TabId, TabManager, TabSummary};
use parking_lot::Mutex;
use scratchpad_config::Config;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use tokio::runtime::Handle;

/// Chrome updates produced by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A tab became dirty or clean
    DirtyChanged { id: TabId, index: usize, dirty: bool },
    /// A different tab (or the same tab at a new position) is active; the
    /// view should bind to its document
    ActiveChanged { id: TabId, index: usize },
    /// The tab strip needs re-rendering
    TabsChanged(Vec<TabSummary>),
}

/// Signals from collaborators outside the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundSignal {
    /// A file was read into the active tab
    FileLoaded { filename: String, text: String },
    /// The active tab's content was saved, possibly under a new file name
    SaveConfirmed { filename: Option<String> },
    /// The tab width for status bar math changed
    TabSizeChanged(usize),
}

/// Owns one working set of tabs and its persistence
pub struct SessionManager<S: SessionStore> {
    config: Config,
    store: Arc<S>,
    registry: Arc<Mutex<TabManager>>,
    scheduler: SaveScheduler<S>,
    dirty: DirtyTracker,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
    /// Last active tab reported to the view
    reported_active: Option<(TabId, usize)>,
    tab_size: usize,
}

impl<S: SessionStore> SessionManager<S> {
    /// Create a manager with an empty registry. Call [`restore`](Self::restore)
    /// before accepting edits.
    pub fn new(config: Config, store: Arc<S>, runtime: Handle) -> Self {
        let registry = Arc::new(Mutex::new(TabManager::with_placeholder_name(
            config.placeholder_tab_name.clone(),
        )));
        let scheduler = SaveScheduler::new(
            Arc::clone(&store),
            config.session_key.clone(),
            config.autosave_delay(),
            Arc::clone(&registry),
            runtime,
        );
        let (events_tx, events_rx) = channel();
        let tab_size = config.tab_size;

        Self {
            config,
            store,
            registry,
            scheduler,
            dirty: DirtyTracker::new(),
            events_tx,
            events_rx,
            reported_active: None,
            tab_size,
        }
    }

    // ── Startup ───────────────────────────────────────────────────────────

    /// Read the stored session and apply it, falling back to a single default
    /// tab when nothing usable is stored. Never fails: backend and validation
    /// errors are logged and treated as "no session".
    pub async fn restore(&mut self) -> RestoreOutcome {
        if !self.registry.lock().is_empty() {
            log::info!("Session restore skipped: tabs already exist");
            return RestoreOutcome::Skipped;
        }

        let loaded = self.load_snapshot().await;
        self.apply_restore(loaded)
    }

    async fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, RestoreError> {
        let value = self.store.get(&self.config.session_key).await?;
        value.map(parse_snapshot).transpose()
    }

    /// Apply the result of reading the store
    ///
    /// If any tab was created while the read was outstanding, the stored
    /// session is ignored: the first path to populate the registry wins.
    pub fn apply_restore(
        &mut self,
        loaded: Result<Option<SessionSnapshot>, RestoreError>,
    ) -> RestoreOutcome {
        if !self.registry.lock().is_empty() {
            log::info!("Session restore ignored: tabs were created first");
            return RestoreOutcome::Skipped;
        }

        let restored = match &loaded {
            Ok(Some(snapshot)) => restore_registry(snapshot, &self.config.placeholder_tab_name),
            _ => None,
        };

        let outcome = match restored {
            Some(manager) => {
                let outcome = RestoreOutcome::Restored {
                    tabs: manager.tab_count(),
                    active_index: manager.active_tab_index().unwrap_or(0),
                };
                *self.registry.lock() = manager;
                log::info!("Session restored: {:?}", outcome);
                outcome
            }
            None => {
                let reason = match &loaded {
                    Ok(None) => NoSessionReason::Missing,
                    Ok(Some(_)) => NoSessionReason::Empty,
                    Err(e) => {
                        log::warn!("Session restore failed, starting fresh: {}", e);
                        NoSessionReason::from(e)
                    }
                };
                self.registry.lock().create_tab(
                    Some(&self.config.default_tab_name),
                    Some(&self.config.default_tab_content),
                );
                log::info!("No session restored ({:?}), created default tab", reason);
                RestoreOutcome::Fresh { reason }
            }
        };

        self.dirty.reset();
        self.publish_chrome();
        self.scheduler.request_save();
        outcome
    }

    // ── Tab registry operations ───────────────────────────────────────────

    /// Append a tab without switching to it
    pub fn create_tab(&mut self, name: Option<&str>, content: Option<&str>) -> TabId {
        let id = self.registry.lock().create_tab(name, content);
        self.publish_chrome();
        self.scheduler.request_save();
        id
    }

    /// The new-tab action: append a numbered tab and switch to it
    pub fn new_tab(&mut self) -> TabId {
        let name = {
            let registry = self.registry.lock();
            self.config.new_tab_name(registry.tab_count() + 1)
        };
        let id = self.registry.lock().create_tab(Some(&name), None);
        self.switch_to(id);
        id
    }

    /// Switch to a tab by ID; unknown IDs are ignored
    pub fn switch_to(&mut self, id: TabId) -> bool {
        let switched = self.registry.lock().switch_to(id);
        self.after_switch(switched)
    }

    /// Switch to a tab by position; out-of-range positions are ignored
    pub fn switch_to_index(&mut self, index: usize) -> bool {
        let switched = self.registry.lock().switch_to_index(index);
        self.after_switch(switched)
    }

    fn after_switch(&mut self, switched: bool) -> bool {
        if switched {
            // Rebinding always notifies the view, even for the current tab
            self.reported_active = None;
            self.publish_chrome();
            self.scheduler.request_save();
        }
        switched
    }

    /// Close a tab by ID. The last remaining tab is never closed
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let closed = self.registry.lock().close_tab(id);
        self.after_close(closed)
    }

    /// Close a tab by position. The last remaining tab is never closed
    pub fn close_tab_at(&mut self, index: usize) -> bool {
        let closed = self.registry.lock().close_tab_at(index);
        self.after_close(closed)
    }

    fn after_close(&mut self, closed: bool) -> bool {
        if closed {
            self.publish_chrome();
        }
        self.scheduler.request_save();
        closed
    }

    /// Rename the active tab
    pub fn rename_active(&mut self, name: &str) -> bool {
        let renamed = self.registry.lock().rename_active(name);
        if renamed {
            self.publish_chrome();
            self.scheduler.request_save();
        }
        renamed
    }

    // ── Editing and inbound signals ───────────────────────────────────────

    /// Apply a mutation to the active document, then refresh dirty state
    /// and schedule a save. With no active tab, `edit` is not called, no
    /// save is requested and `None` is returned.
    pub fn edit_active<R>(&mut self, edit: impl FnOnce(&mut TextBuffer) -> R) -> Option<R> {
        let result = {
            let mut registry = self.registry.lock();
            let tab = registry.active_tab_mut()?;
            edit(tab.document_mut())
        };
        self.document_changed();
        Some(result)
    }

    /// Recompute dirty state after the active document changed outside
    /// [`edit_active`](Self::edit_active), and schedule a save
    pub fn document_changed(&mut self) {
        self.publish_chrome();
        self.scheduler.request_save();
    }

    /// Handle a signal from an external collaborator
    pub fn handle_signal(&mut self, signal: InboundSignal) {
        match signal {
            InboundSignal::FileLoaded { filename, text } => {
                let loaded = {
                    let mut registry = self.registry.lock();
                    match registry.active_tab_mut() {
                        Some(tab) => {
                            tab.name = filename.clone();
                            tab.document_mut().set_text(&text.replace('\r', ""));
                            tab.mark_saved();
                            true
                        }
                        None => false,
                    }
                };
                if loaded {
                    log::info!("Loaded {:?} into active tab", filename);
                    self.document_changed();
                }
            }
            InboundSignal::SaveConfirmed { filename } => {
                let saved = {
                    let mut registry = self.registry.lock();
                    match registry.active_tab_mut() {
                        Some(tab) => {
                            if let Some(name) = &filename {
                                tab.name = name.clone();
                            }
                            tab.mark_saved();
                            true
                        }
                        None => false,
                    }
                };
                if saved {
                    log::info!("Save confirmed for active tab");
                    self.document_changed();
                }
            }
            InboundSignal::TabSizeChanged(size) => {
                if size == 0 {
                    log::warn!("Ignoring tab size of zero");
                } else {
                    log::debug!("Tab size changed to {}", size);
                    self.tab_size = size;
                }
            }
        }
    }

    /// Read `path` and load it into the active tab
    pub async fn load_file(&mut self, path: &Path) -> std::io::Result<()> {
        let text = tokio::fs::read_to_string(path).await?;
        self.handle_signal(InboundSignal::FileLoaded {
            filename: file_name_of(path),
            text,
        });
        Ok(())
    }

    /// Write the active tab's text to `path`; the save is confirmed only
    /// after the write succeeds
    pub async fn export_active_to(&mut self, path: &Path) -> std::io::Result<()> {
        let Some(text) = self.active_text() else {
            return Ok(());
        };
        tokio::fs::write(path, text).await?;
        self.handle_signal(InboundSignal::SaveConfirmed {
            filename: Some(file_name_of(path)),
        });
        Ok(())
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Write the current state now instead of waiting for the timer
    pub async fn flush(&mut self) -> Result<(), StoreError> {
        self.scheduler.flush().await
    }

    /// Replace the stored session with an empty one, so the next start
    /// creates the default tab. Any pending save is cancelled; the in-memory
    /// tabs are left alone.
    pub async fn clear_stored_session(&mut self) -> Result<(), StoreError> {
        self.scheduler.cancel();
        let value = serde_json::to_value(SessionSnapshot::empty())?;
        self.store.set(&self.config.session_key, value).await?;
        log::info!("Session {:?} cleared", self.config.session_key);
        Ok(())
    }

    /// Capture the current state as a snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        capture_session(&self.registry.lock())
    }

    /// State of the autosave timer
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Run `f` with read access to the registry
    pub fn with_registry<R>(&self, f: impl FnOnce(&TabManager) -> R) -> R {
        f(&self.registry.lock())
    }

    pub fn tab_count(&self) -> usize {
        self.registry.lock().tab_count()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.registry.lock().active_tab_index()
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.registry.lock().active_tab_id()
    }

    /// Text of the active document
    pub fn active_text(&self) -> Option<String> {
        self.registry
            .lock()
            .active_tab()
            .map(|tab| tab.text().to_string())
    }

    /// Whether the tab at `index` has unsaved changes
    pub fn is_dirty_at(&self, index: usize) -> Option<bool> {
        self.registry
            .lock()
            .tabs()
            .get(index)
            .map(|tab| tab.is_dirty())
    }

    /// Whether the active tab has unsaved changes (close/unload guard)
    pub fn has_unsaved_changes(&self) -> bool {
        self.registry
            .lock()
            .active_tab()
            .is_some_and(|tab| tab.is_dirty())
    }

    /// Whether opening a file into the active tab would discard changes
    pub fn needs_discard_confirmation(&self) -> bool {
        self.has_unsaved_changes()
    }

    /// Window title: the active tab's name, prefixed with `*` when dirty
    pub fn window_title(&self) -> String {
        let registry = self.registry.lock();
        match registry.active_tab() {
            Some(tab) if tab.is_dirty() => format!("*{}", tab.name),
            Some(tab) => tab.name.clone(),
            None => String::new(),
        }
    }

    /// Tab strip contents in order
    pub fn tab_summaries(&self) -> Vec<TabSummary> {
        self.registry.lock().summaries(&self.config.untitled_label)
    }

    /// Current tab width for status bar math
    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Line and column of `offset` in the active document
    pub fn cursor_status(&self, offset: usize) -> Option<CursorStatus> {
        let registry = self.registry.lock();
        let tab = registry.active_tab()?;
        Some(cursor_status(tab.document().text(), offset, self.tab_size))
    }

    // ── Outbound events ───────────────────────────────────────────────────

    /// Next pending chrome event, if any (non-blocking)
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// All pending chrome events
    pub fn drain_events(&self) -> Vec<SessionEvent> {
        self.events_rx.try_iter().collect()
    }

    /// Recompute dirty and active state and emit whatever changed, followed
    /// by a fresh tab strip
    fn publish_chrome(&mut self) {
        let (changes, active, summaries) = {
            let registry = self.registry.lock();
            let changes = self.dirty.refresh(registry.tabs());
            let active = registry
                .active_tab_id()
                .zip(registry.active_tab_index());
            (changes, active, registry.summaries(&self.config.untitled_label))
        };

        for change in changes {
            self.emit(SessionEvent::DirtyChanged {
                id: change.id,
                index: change.index,
                dirty: change.dirty,
            });
        }
        if active != self.reported_active {
            if let Some((id, index)) = active {
                self.emit(SessionEvent::ActiveChanged { id, index });
            }
            self.reported_active = active;
        }
        self.emit(SessionEvent::TabsChanged(summaries));
    }

    fn emit(&self, event: SessionEvent) {
        // The receiver lives as long as `self`
        let _ = self.events_tx.send(event);
    }
}

impl<S: SessionStore> std::fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("tabs", &self.tab_count())
            .field("active", &self.active_index())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
