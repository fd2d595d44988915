//! Cursor-to-viewport coordinate transform and render queries.
//!
//! The viewport is the document coordinate of the top-left visible cell. It
//! persists across frames so small cursor movements repaint in place, and
//! `scroll_to` moves each offset by exactly the overshoot — no centering, no
//! jump-ahead. After `scroll_to`, `offset <= cursor < offset + visible`
//! holds on both axes (for non-degenerate window sizes).
//!
//! The render queries hand the excluded painter byte slices and a screen
//! cursor; nothing here touches a terminal.

use core_buffer::{Document, Line};
use core_session::Cursor;

pub mod status;

/// Top-left visible document coordinate. Persists across render calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the cursor inside the `text_rows` x `text_cols` window, moving
    /// each offset by the smallest amount required. Returns true when an
    /// offset changed. Zero-sized windows (transient resize states) leave
    /// the offsets untouched.
    pub fn scroll_to(&mut self, cursor: Cursor, text_rows: usize, text_cols: usize) -> bool {
        if text_rows == 0 || text_cols == 0 {
            return false;
        }
        let prev = *self;
        if cursor.row < self.row_offset {
            self.row_offset = cursor.row;
        }
        if cursor.row >= self.row_offset + text_rows {
            self.row_offset = cursor.row - text_rows + 1;
        }
        if cursor.col < self.col_offset {
            self.col_offset = cursor.col;
        }
        if cursor.col >= self.col_offset + text_cols {
            self.col_offset = cursor.col - text_cols + 1;
        }
        *self != prev
    }
}

/// The visible part of `line`: bytes from `col_offset`, at most `text_cols`
/// of them. Empty when the line is scrolled entirely off to the left.
pub fn visible_slice(line: &Line, col_offset: usize, text_cols: usize) -> &[u8] {
    let bytes = line.as_bytes();
    if col_offset >= bytes.len() {
        return &[];
    }
    let end = (col_offset + text_cols).min(bytes.len());
    &bytes[col_offset..end]
}

/// Per-row render feed: `Some(slice)` for document lines, `None` for rows
/// past the document end (the painter draws a placeholder there).
pub fn visible_rows<'a>(
    document: &'a Document,
    viewport: Viewport,
    text_rows: usize,
    text_cols: usize,
) -> impl Iterator<Item = Option<&'a [u8]>> {
    (0..text_rows).map(move |y| {
        document
            .line(viewport.row_offset + y)
            .map(|line| visible_slice(line, viewport.col_offset, text_cols))
    })
}

/// Cursor position relative to the viewport, clamped into the visible
/// rectangle. The clamp only matters in transient states (a resize shrinking
/// the window before the next `scroll_to`); steady-state positions are
/// already in range.
pub fn screen_cursor(
    cursor: Cursor,
    viewport: Viewport,
    text_rows: usize,
    text_cols: usize,
) -> (u16, u16) {
    let max_row = text_rows.saturating_sub(1);
    let max_col = text_cols.saturating_sub(1);
    let row = cursor.row.saturating_sub(viewport.row_offset).min(max_row);
    let col = cursor.col.saturating_sub(viewport.col_offset).min(max_col);
    (row as u16, col as u16)
}
