//! Text documents held by tabs.
//!
//! The editing widget is an external collaborator; the session engine only
//! relies on the [`Document`] contract: current text, content replacement,
//! and a change generation that can be compared against a saved marker.
//! [`TextBuffer`] is the in-process implementation used by tabs.

use std::fmt;
use std::ops::Range;
use thiserror::Error;
use uuid::Uuid;

/// Identity of a single document instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Marker of a document's mutation history at a point in time.
///
/// Generations carry the id of the document that produced them, so a marker
/// taken from one document never reports another document as clean.
/// Only equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation {
    document: DocumentId,
    seq: u64,
}

impl Generation {
    /// Document that produced this marker
    pub fn document(&self) -> DocumentId {
        self.document
    }
}

/// Errors from edits with invalid positions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The offset or range lies past the end of the text.
    #[error("offset {offset} is past the end of the document (len {len})")]
    OutOfBounds { offset: usize, len: usize },

    /// The offset splits a multi-byte character.
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    /// The range end precedes its start.
    #[error("invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },
}

/// Contract consumed by the tab registry and dirty tracker
pub trait Document {
    /// Current text
    fn text(&self) -> &str;

    /// Replace the entire text
    fn set_text(&mut self, text: &str);

    /// Current change generation
    fn generation(&self) -> Generation;

    /// Whether the document is unchanged since `marker` was taken
    fn is_clean(&self, marker: Generation) -> bool {
        self.generation() == marker
    }
}

/// In-memory text document with a monotonic change counter
#[derive(Debug, Clone)]
pub struct TextBuffer {
    id: DocumentId,
    text: String,
    seq: u64,
}

impl TextBuffer {
    /// Create a document seeded with `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            text: text.into(),
            seq: 0,
        }
    }

    /// Id of this document
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Length of the text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert `text` at byte `offset`
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), DocumentError> {
        self.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        self.text.insert_str(offset, text);
        self.bump();
        Ok(())
    }

    /// Append `text` at the end
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        self.bump();
    }

    /// Delete the byte `range`
    pub fn delete(&mut self, range: Range<usize>) -> Result<(), DocumentError> {
        if range.end < range.start {
            return Err(DocumentError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        self.check_offset(range.start)?;
        self.check_offset(range.end)?;
        if range.is_empty() {
            return Ok(());
        }
        self.text.replace_range(range, "");
        self.bump();
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<(), DocumentError> {
        if offset > self.text.len() {
            return Err(DocumentError::OutOfBounds {
                offset,
                len: self.text.len(),
            });
        }
        if !self.text.is_char_boundary(offset) {
            return Err(DocumentError::NotCharBoundary(offset));
        }
        Ok(())
    }

    fn bump(&mut self) {
        self.seq += 1;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Document for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.bump();
    }

    fn generation(&self) -> Generation {
        Generation {
            document: self.id,
            seq: self.seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_clean_at_its_generation() {
        let doc = TextBuffer::new("hello");
        let marker = doc.generation();
        assert!(doc.is_clean(marker));
        assert_eq!(marker.document(), doc.id());
    }

    #[test]
    fn every_mutation_changes_generation() {
        let mut doc = TextBuffer::new("ab");
        let g0 = doc.generation();
        doc.insert(1, "x").unwrap();
        let g1 = doc.generation();
        doc.delete(0..1).unwrap();
        let g2 = doc.generation();
        doc.set_text("new");
        let g3 = doc.generation();
        doc.append("!");
        assert_ne!(g0, g1);
        assert_ne!(g1, g2);
        assert_ne!(g2, g3);
        assert_ne!(g3, doc.generation());
        assert_eq!(doc.text(), "new!");
    }

    #[test]
    fn empty_edits_keep_generation() {
        let mut doc = TextBuffer::new("abc");
        let marker = doc.generation();
        doc.insert(1, "").unwrap();
        doc.delete(2..2).unwrap();
        doc.append("");
        assert!(doc.is_clean(marker));
    }

    #[test]
    fn markers_do_not_cross_documents() {
        let a = TextBuffer::new("same");
        let b = TextBuffer::new("same");
        assert!(!b.is_clean(a.generation()));
    }

    #[test]
    fn insert_rejects_bad_offsets() {
        let mut doc = TextBuffer::new("héllo");
        assert_eq!(
            doc.insert(99, "x"),
            Err(DocumentError::OutOfBounds { offset: 99, len: 6 })
        );
        assert_eq!(doc.insert(2, "x"), Err(DocumentError::NotCharBoundary(2)));
        assert_eq!(doc.text(), "héllo");
    }

    #[test]
    fn delete_rejects_reversed_range() {
        let mut doc = TextBuffer::new("abc");
        #[allow(clippy::reversed_empty_ranges)]
        let result = doc.delete(2..1);
        assert_eq!(result, Err(DocumentError::InvalidRange { start: 2, end: 1 }));
    }
}
