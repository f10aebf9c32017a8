//! Multi-document scratchpad engine
//!
//! An ordered set of named text tabs with exactly one active tab, per-tab
//! unsaved-change tracking against the last saved state, and a debounced
//! session snapshot that survives restarts.
//!
//! # Mutex Usage Policy
//!
//!   - `parking_lot::Mutex` guards the tab registry. It is only ever held
//!     for synchronous work; never across an `.await`.
//!   - `tokio::sync::Mutex` serializes session writes so that only one
//!     snapshot write reaches the store at a time.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
pub mod document;
pub mod session;
pub mod status_bar;
pub mod tab;

pub use scratchpad_config as config;

pub use document::{Document, TextBuffer};
pub use session::{SessionManager, SessionSnapshot};
pub use tab::{Tab, TabId, TabManager};
