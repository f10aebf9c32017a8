//! Debounced session persistence
//!
//! Every qualifying change re-arms a single pending timer; only when the
//! quiet period passes without another change is the registry captured and
//! written. The snapshot is taken when the timer fires, not when it was
//! armed, so the write always reflects the latest state.
//!
//! Changes made in the last quiet period before the process exits are lost
//! unless [`SaveScheduler::flush`] runs first.

use super::capture::capture_session;
use super::storage::{SessionStore, StoreError};
use super::SessionSnapshot;
use crate::tab::TabManager;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Whether a write is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer armed
    Idle,
    /// A timer is armed and will write when it expires
    Pending,
}

/// State shared between the scheduler and its writer task
struct WriteState<S: SessionStore> {
    store: Arc<S>,
    key: String,
    registry: Arc<Mutex<TabManager>>,
    /// Held for the duration of each write so writes never overlap
    gate: tokio::sync::Mutex<()>,
    /// A timer fired and its state has not been written yet
    dirty: AtomicBool,
    /// A writer task exists; further fires only set `dirty`
    writer_active: AtomicBool,
}

/// Single-slot debounce timer in front of a [`SessionStore`]
///
/// At most one write is in flight. A timer that fires while a write is
/// still running does not queue a second writer: it marks the state dirty
/// and the running writer captures and writes again once it finishes.
pub struct SaveScheduler<S: SessionStore> {
    shared: Arc<WriteState<S>>,
    delay: Duration,
    runtime: Handle,
    /// The armed timer, replaced on every request
    pending: Option<JoinHandle<()>>,
}

impl<S: SessionStore> std::fmt::Debug for SaveScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveScheduler")
            .field("key", &self.shared.key)
            .field("delay", &self.delay)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<S: SessionStore> SaveScheduler<S> {
    pub fn new(
        store: Arc<S>,
        key: impl Into<String>,
        delay: Duration,
        registry: Arc<Mutex<TabManager>>,
        runtime: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(WriteState {
                store,
                key: key.into(),
                registry,
                gate: tokio::sync::Mutex::new(()),
                dirty: AtomicBool::new(false),
                writer_active: AtomicBool::new(false),
            }),
            delay,
            runtime,
            pending: None,
        }
    }

    /// Current state of the timer slot
    pub fn state(&self) -> SchedulerState {
        match &self.pending {
            Some(handle) if !handle.is_finished() => SchedulerState::Pending,
            _ => SchedulerState::Idle,
        }
    }

    /// Arm the timer, replacing any armed timer
    pub fn request_save(&mut self) {
        let rearmed = self.cancel();

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;

        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            shared.dirty.store(true, Ordering::SeqCst);
            if shared.writer_active.swap(true, Ordering::SeqCst) {
                log::debug!("Autosave timer fired during a write; coalescing");
                return;
            }
            log::debug!("Autosave timer fired");

            // The writer runs as its own task so re-arming the timer can
            // never abort a write that has already started.
            tokio::spawn(drain_writes(shared));
        });
        self.pending = Some(handle);

        if rearmed {
            log::trace!("Autosave timer re-armed ({:?})", self.delay);
        } else {
            log::trace!("Autosave timer armed ({:?})", self.delay);
        }
    }

    /// Disarm the timer without writing. Returns whether a timer was armed
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Disarm the timer and write the current state now, waiting for any
    /// write already in flight to finish first
    pub async fn flush(&mut self) -> Result<(), StoreError> {
        self.cancel();
        let _guard = self.shared.gate.lock().await;
        self.shared.dirty.store(false, Ordering::SeqCst);
        let snapshot = capture_session(&self.shared.registry.lock());
        write_snapshot(self.shared.store.as_ref(), &self.shared.key, &snapshot).await
    }
}

impl<S: SessionStore> Drop for SaveScheduler<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Write until no fired timer is left unwritten. The snapshot is captured
/// after the gate is taken, so every write carries the state at write time.
async fn drain_writes<S: SessionStore>(shared: Arc<WriteState<S>>) {
    loop {
        {
            let _guard = shared.gate.lock().await;
            if shared.dirty.swap(false, Ordering::SeqCst) {
                let snapshot = capture_session(&shared.registry.lock());
                if let Err(e) = write_snapshot(shared.store.as_ref(), &shared.key, &snapshot).await {
                    log::error!("Failed to save session: {}", e);
                }
                continue;
            }
        }

        shared.writer_active.store(false, Ordering::SeqCst);
        // A fire that raced with the release above saw `writer_active` set
        // and left its work to us
        if !shared.dirty.load(Ordering::SeqCst)
            || shared.writer_active.swap(true, Ordering::SeqCst)
        {
            break;
        }
    }
}

async fn write_snapshot<S: SessionStore>(
    store: &S,
    key: &str,
    snapshot: &SessionSnapshot,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(snapshot)?;
    store.set(key, value).await?;
    log::info!(
        "Saved session ({} tabs, active {})",
        snapshot.tabs.len(),
        snapshot.active_index
    );
    Ok(())
}
