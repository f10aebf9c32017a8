//! Tab management for the multi-document editing surface
//!
//! This module provides the core tab infrastructure including:
//! - `Tab`: A named document plus the generation it was last saved at
//! - `TabManager`: The ordered tab registry with its active-tab pointer
//! - `TabId`: Stable identifier for each tab
//! - `dirty`: Unsaved-change detection and change reporting

pub mod dirty;
mod manager;

pub use dirty::{DirtyChange, DirtyTracker, is_dirty};
pub use manager::TabManager;

use crate::document::{Document, Generation, TextBuffer};

/// Stable tab identifier, unique within one registry and never reused
pub type TabId = u64;

/// A single editor tab
#[derive(Debug)]
pub struct Tab {
    /// Unique identifier for this tab
    pub id: TabId,
    /// Display name (usually a file name)
    pub name: String,
    /// Document owned by this tab
    document: TextBuffer,
    /// Generation of `document` at the last confirmed save
    last_saved: Generation,
}

impl Tab {
    /// Create a tab around a fresh document seeded with `content`.
    ///
    /// The save marker is taken from the new document, so the tab starts clean.
    pub(crate) fn new(id: TabId, name: String, content: &str) -> Self {
        let document = TextBuffer::new(content);
        let last_saved = document.generation();
        Self {
            id,
            name,
            document,
            last_saved,
        }
    }

    /// The tab's document
    pub fn document(&self) -> &TextBuffer {
        &self.document
    }

    /// Mutable access to the tab's document
    pub fn document_mut(&mut self) -> &mut TextBuffer {
        &mut self.document
    }

    /// Current text of the document
    pub fn text(&self) -> &str {
        self.document.text()
    }

    /// Generation recorded at the last confirmed save
    pub fn last_saved_generation(&self) -> Generation {
        self.last_saved
    }

    /// Record the document's current generation as saved
    pub fn mark_saved(&mut self) {
        self.last_saved = self.document.generation();
    }

    /// Whether the document changed since the last save
    pub fn is_dirty(&self) -> bool {
        is_dirty(self)
    }

    /// Tab strip label: the name (or `untitled` when empty), plus ` *` when dirty
    pub fn label(&self, untitled: &str) -> String {
        let name = if self.name.is_empty() {
            untitled
        } else {
            self.name.as_str()
        };
        if self.is_dirty() {
            format!("{name} *")
        } else {
            name.to_string()
        }
    }
}

/// Render-ready view of one tab, in tab strip order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSummary {
    pub id: TabId,
    pub index: usize,
    pub name: String,
    pub label: String,
    pub dirty: bool,
    pub active: bool,
}
