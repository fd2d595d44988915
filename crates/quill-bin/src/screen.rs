//! Screen painting: document rows, status bar, message line, cursor.
//!
//! The bottom two rows are reserved (status + message); the text area is
//! whatever remains, never less than one row. Output is queued and flushed
//! once per frame. The painter works against any `Write`, so frames can be
//! rendered into a buffer in tests.

use anyhow::Result;
use core_session::EditSession;
use core_view::{Viewport, screen_cursor, status::compose_status, visible_rows};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

/// Rows reserved below the text area: status bar and message line.
pub const RESERVED_ROWS: u16 = 2;

/// Number of text rows for a terminal height.
pub fn text_rows(rows: u16) -> usize {
    (rows.saturating_sub(RESERVED_ROWS)).max(1) as usize
}

/// Paint one frame: scroll the viewport after the latest edit, then draw
/// the visible document slice, both bars, and the cursor.
pub fn refresh(
    out: &mut impl Write,
    session: &mut EditSession,
    viewport: &mut Viewport,
    cols: u16,
    rows: u16,
) -> Result<()> {
    let text_rows = text_rows(rows);
    let text_cols = cols as usize;
    session.set_text_rows(text_rows);
    viewport.scroll_to(session.cursor(), text_rows, text_cols);

    queue!(out, Hide)?;
    for (y, row) in visible_rows(session.document(), *viewport, text_rows, text_cols).enumerate() {
        queue!(out, MoveTo(0, y as u16), Clear(ClearType::UntilNewLine))?;
        match row {
            Some(slice) => queue!(out, Print(String::from_utf8_lossy(slice)))?,
            None => queue!(out, Print("~"))?,
        }
    }

    if rows >= RESERVED_ROWS {
        let status = compose_status(
            session.file_name(),
            session.is_dirty(),
            session.cursor(),
            text_cols,
        );
        queue!(
            out,
            MoveTo(0, rows - 2),
            SetAttribute(Attribute::Reverse),
            Print(status),
            SetAttribute(Attribute::Reset),
            MoveTo(0, rows - 1),
            Clear(ClearType::UntilNewLine),
        )?;
        if let Some(message) = session.status_line() {
            let visible: String = message.chars().take(text_cols).collect();
            queue!(out, Print(visible))?;
        }
    }

    let (cy, cx) = screen_cursor(session.cursor(), *viewport, text_rows, text_cols);
    queue!(out, MoveTo(cx, cy), Show)?;
    out.flush()?;
    Ok(())
}
