//! Cursor position readout for the status bar.

/// 1-based line and column of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStatus {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for CursorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

/// Compute the line and visual column of byte `offset` in `text`.
///
/// Tab characters advance the column to the next multiple of `tab_size`.
/// Offsets past the end are clamped, and offsets inside a multi-byte
/// character are moved back to its start.
pub fn cursor_status(text: &str, offset: usize, tab_size: usize) -> CursorStatus {
    let tab_size = tab_size.max(1);
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = before.matches('\n').count() + 1;

    let mut column = 0;
    for ch in before[line_start..].chars() {
        if ch == '\t' {
            column = (column / tab_size + 1) * tab_size;
        } else {
            column += 1;
        }
    }

    CursorStatus {
        line,
        column: column + 1,
    }
}
