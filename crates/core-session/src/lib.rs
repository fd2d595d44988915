//! Editing session: document + cursor + dirty flag, and the editing
//! operations a key-dispatch layer invokes one at a time.
//!
//! Every operation here is total. Out-of-range cursor input clamps, edits at
//! document boundaries degrade to no-ops, and the single normalizing step
//! (`clamp_column`) runs after anything that can shrink the current line or
//! change the row. Fallibility lives entirely at the I/O boundary
//! (`core-files`); nothing in this crate returns an error.
//!
//! Vertical movement does not remember a "desired column": moving onto a
//! shorter line snaps the column to that line's end and the original column
//! is forgotten. That matches the behavior this editor models, and keeps the
//! cursor a plain `(row, col)` pair.

use core_buffer::{Document, Line};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Current edit position in document coordinates.
///
/// Invariant after every public `EditSession` call: `row` names an existing
/// line and `col <=` that line's length (`col == len` means "after the last
/// character").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Cursor movement requests accepted by [`EditSession::move_cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Abstract command surface consumed from the key-dispatch layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InsertChar(u8),
    InsertNewline,
    Backspace,
    DeleteForward,
    Move(Direction),
    Save,
    Quit,
}

/// Outcome of a quit request. The two-step confirmation protocol itself is
/// dispatch-layer state; the session only reports whether the buffer is safe
/// to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitDecision {
    /// No unsaved changes; quitting is safe.
    Confirmed,
    /// Unsaved changes present; an explicit second confirmation is required.
    NeedsConfirm,
}

/// Status message with an expiry instant.
#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    expires_at: Instant,
}

/// One open document plus its cursor, dirty flag, and status message.
pub struct EditSession {
    document: Document,
    cursor: Cursor,
    dirty: bool,
    file_name: Option<PathBuf>,
    status: Option<StatusMessage>,
    /// Text-area height last reported by the render loop; page motions
    /// repeat a single-row step `text_rows - 1` times.
    text_rows: usize,
}

impl EditSession {
    /// Session over `document`, cursor at the origin, clean.
    pub fn new(document: Document, file_name: Option<PathBuf>) -> Self {
        Self {
            document,
            cursor: Cursor::origin(),
            dirty: false,
            file_name,
            status: None,
            text_rows: 0,
        }
    }

    /// Fresh one-line empty session (no file association until first save).
    pub fn empty(file_name: Option<PathBuf>) -> Self {
        Self::new(Document::new(), file_name)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Mark the session clean; called by the dispatch layer after a
    /// successful save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Record the text-area height for page motions.
    pub fn set_text_rows(&mut self, rows: usize) {
        self.text_rows = rows;
    }

    /// Replace the status message; it stays visible for `ttl`.
    pub fn set_status(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// The status message, unless it has expired.
    pub fn status_line(&self) -> Option<&str> {
        match &self.status {
            Some(m) if Instant::now() < m.expires_at => Some(&m.text),
            _ => None,
        }
    }

    fn current_line(&self) -> &Line {
        &self.document.lines()[self.cursor.row]
    }

    fn current_line_mut(&mut self) -> &mut Line {
        self.document
            .line_mut(self.cursor.row)
            .expect("cursor row names an existing line")
    }

    /// The single normalizing step: `col = min(col, current line length)`.
    fn clamp_column(&mut self) {
        let len = self.current_line().len();
        if self.cursor.col > len {
            self.cursor.col = len;
        }
    }

    /// Insert `byte` at the cursor and advance one column.
    ///
    /// The key-decode layer admits only printable ASCII and tab; this
    /// operation does not re-check.
    pub fn insert_char(&mut self, byte: u8) {
        let at = self.cursor.col;
        self.current_line_mut().insert_char(at, byte);
        self.cursor.col += 1;
        self.dirty = true;
    }

    /// Split the current line at the cursor column. The left part stays on
    /// the current row, the right part becomes a new line directly below,
    /// and the cursor lands at the start of it.
    pub fn insert_newline(&mut self) {
        let at = self.cursor.col;
        let right = self.current_line_mut().split_off(at);
        self.document.insert_line(self.cursor.row + 1, right);
        self.cursor.row += 1;
        self.cursor.col = 0;
        self.dirty = true;
    }

    /// Delete the character left of the cursor, or merge with the previous
    /// line when the cursor sits at column 0. No-op at the document start.
    pub fn backspace(&mut self) {
        if self.cursor.row == 0 && self.cursor.col == 0 {
            return;
        }
        if self.cursor.col > 0 {
            let at = self.cursor.col - 1;
            self.current_line_mut().delete_char(at);
            self.cursor.col -= 1;
        } else {
            let before = self.document.total_bytes();
            let row = self.cursor.row;
            let current = self.current_line().clone();
            let prev = self
                .document
                .line_mut(row - 1)
                .expect("row > 0 implies a previous line");
            let prev_len = prev.len();
            prev.append(&current);
            self.document.delete_line(row);
            self.cursor.row = row - 1;
            self.cursor.col = prev_len;
            debug_assert_eq!(
                self.document.total_bytes(),
                before,
                "line merge must not lose or duplicate bytes"
            );
            debug!(target: "session", row, new_col = prev_len, "merged_with_previous");
        }
        self.dirty = true;
    }

    /// Delete the character under the cursor, or merge the next line into
    /// this one when the cursor sits at the line end. No-op at the end of
    /// the last line. The cursor does not move.
    pub fn delete_forward(&mut self) {
        let at = self.cursor.col;
        if at < self.current_line().len() {
            self.current_line_mut().delete_char(at);
            self.dirty = true;
            return;
        }
        let row = self.cursor.row;
        if row + 1 >= self.document.line_count() {
            return;
        }
        let before = self.document.total_bytes();
        let next = self.document.lines()[row + 1].clone();
        self.current_line_mut().append(&next);
        self.document.delete_line(row + 1);
        debug_assert_eq!(
            self.document.total_bytes(),
            before,
            "line merge must not lose or duplicate bytes"
        );
        self.dirty = true;
    }

    /// Apply one movement request, then re-clamp the column.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::PageUp | Direction::PageDown => {
                let row_step = if direction == Direction::PageUp {
                    Direction::Up
                } else {
                    Direction::Down
                };
                // A page is one step short of the text area so one row of
                // context survives; degrades to single-row movement at the
                // document edges and for tiny windows.
                let count = self.text_rows.saturating_sub(1).max(1);
                for _ in 0..count {
                    self.step(row_step);
                }
            }
            other => self.step(other),
        }
        self.clamp_column();
    }

    fn step(&mut self, direction: Direction) {
        let line_len = self.current_line().len();
        match direction {
            Direction::Left => {
                if self.cursor.col > 0 {
                    self.cursor.col -= 1;
                } else if self.cursor.row > 0 {
                    self.cursor.row -= 1;
                    self.cursor.col = self.current_line().len();
                }
            }
            Direction::Right => {
                if self.cursor.col < line_len {
                    self.cursor.col += 1;
                } else if self.cursor.row + 1 < self.document.line_count() {
                    self.cursor.row += 1;
                    self.cursor.col = 0;
                }
            }
            Direction::Up => {
                if self.cursor.row > 0 {
                    self.cursor.row -= 1;
                }
            }
            Direction::Down => {
                if self.cursor.row + 1 < self.document.line_count() {
                    self.cursor.row += 1;
                }
            }
            Direction::Home => self.cursor.col = 0,
            Direction::End => self.cursor.col = line_len,
            Direction::PageUp | Direction::PageDown => {
                unreachable!("page motions expand to row steps in move_cursor")
            }
        }
        self.clamp_column();
    }

    /// Quit policy gate: safe immediately when clean, otherwise the caller
    /// must obtain a second explicit confirmation.
    pub fn request_quit(&self) -> QuitDecision {
        if self.dirty {
            QuitDecision::NeedsConfirm
        } else {
            QuitDecision::Confirmed
        }
    }

    /// Replace the whole document (used by load), resetting cursor and
    /// dirty state.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.cursor = Cursor::origin();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::{Document, Line};

    fn session_from(lines: &[&str]) -> EditSession {
        let doc = Document::from_lines(
            lines.iter().map(|l| Line::from_slice(l.as_bytes())).collect(),
        );
        EditSession::new(doc, None)
    }

    fn line_str(session: &EditSession, row: usize) -> String {
        String::from_utf8_lossy(session.document().line(row).unwrap().as_bytes()).into_owned()
    }

    #[test]
    fn insert_into_fresh_document() {
        let mut s = EditSession::empty(None);
        s.insert_char(b'x');
        assert_eq!(line_str(&s, 0), "x");
        assert_eq!(s.cursor(), Cursor { row: 0, col: 1 });
        assert!(s.is_dirty());
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut s = session_from(&["abc", "def"]);
        s.backspace();
        assert_eq!(s.cursor(), Cursor::origin());
        assert_eq!(line_str(&s, 0), "abc");
        assert_eq!(s.document().line_count(), 2);
        assert!(!s.is_dirty());
    }

    #[test]
    fn newline_splits_without_losing_bytes() {
        let mut s = session_from(&["abcdef"]);
        s.move_cursor(Direction::Right);
        s.move_cursor(Direction::Right);
        let before = s.document().total_bytes();
        s.insert_newline();
        assert_eq!(line_str(&s, 0), "ab");
        assert_eq!(line_str(&s, 1), "cdef");
        assert_eq!(s.document().total_bytes(), before);
        assert_eq!(s.cursor(), Cursor { row: 1, col: 0 });
    }

    #[test]
    fn newline_then_backspace_restores_content() {
        let mut s = session_from(&["hello world"]);
        for _ in 0..5 {
            s.move_cursor(Direction::Right);
        }
        let before = s.cursor();
        s.insert_newline();
        s.backspace();
        assert_eq!(s.document().line_count(), 1);
        assert_eq!(line_str(&s, 0), "hello world");
        assert_eq!(s.cursor(), before);
    }

    #[test]
    fn backspace_merges_lines() {
        let mut s = session_from(&["ab", "cd"]);
        s.move_cursor(Direction::Down);
        assert_eq!(s.cursor(), Cursor { row: 1, col: 0 });
        s.backspace();
        assert_eq!(s.document().line_count(), 1);
        assert_eq!(line_str(&s, 0), "abcd");
        // Cursor lands at the previous line's old end.
        assert_eq!(s.cursor(), Cursor { row: 0, col: 2 });
    }

    #[test]
    fn delete_forward_within_line_keeps_cursor() {
        let mut s = session_from(&["abc"]);
        s.move_cursor(Direction::Right);
        s.delete_forward();
        assert_eq!(line_str(&s, 0), "ac");
        assert_eq!(s.cursor(), Cursor { row: 0, col: 1 });
    }

    #[test]
    fn delete_forward_merges_rows() {
        // Load "a" / "bb" / "ccc", put the cursor at (1, 2), delete-forward:
        // rows 1 and 2 merge into "bbccc" and two lines remain.
        let mut s = session_from(&["a", "bb", "ccc"]);
        s.move_cursor(Direction::Down);
        s.move_cursor(Direction::End);
        assert_eq!(s.cursor(), Cursor { row: 1, col: 2 });
        s.delete_forward();
        assert_eq!(s.document().line_count(), 2);
        assert_eq!(line_str(&s, 1), "bbccc");
        assert_eq!(s.cursor(), Cursor { row: 1, col: 2 });
    }

    #[test]
    fn delete_forward_at_document_end_is_noop() {
        let mut s = session_from(&["ab"]);
        s.move_cursor(Direction::End);
        s.delete_forward();
        assert_eq!(line_str(&s, 0), "ab");
        assert!(!s.is_dirty());
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        let mut s = session_from(&["abc", "d"]);
        s.move_cursor(Direction::Down);
        s.move_cursor(Direction::Left);
        assert_eq!(s.cursor(), Cursor { row: 0, col: 3 });
    }

    #[test]
    fn right_wraps_to_next_line_start() {
        let mut s = session_from(&["a", "bc"]);
        s.move_cursor(Direction::End);
        s.move_cursor(Direction::Right);
        assert_eq!(s.cursor(), Cursor { row: 1, col: 0 });
        // At the very end of the document Right stays put.
        s.move_cursor(Direction::End);
        s.move_cursor(Direction::Right);
        assert_eq!(s.cursor(), Cursor { row: 1, col: 2 });
    }

    #[test]
    fn vertical_move_snaps_column_to_shorter_line() {
        let mut s = session_from(&["abcdef", "ab", "abcdef"]);
        s.move_cursor(Direction::End);
        assert_eq!(s.cursor().col, 6);
        s.move_cursor(Direction::Down);
        assert_eq!(s.cursor(), Cursor { row: 1, col: 2 });
        // No desired-column memory: the snapped column carries down.
        s.move_cursor(Direction::Down);
        assert_eq!(s.cursor(), Cursor { row: 2, col: 2 });
    }

    #[test]
    fn page_motions_clamp_at_edges() {
        let lines: Vec<String> = (0..30).map(|i| format!("line{i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut s = session_from(&refs);
        s.set_text_rows(10);
        s.move_cursor(Direction::PageDown);
        assert_eq!(s.cursor().row, 9);
        s.move_cursor(Direction::PageDown);
        s.move_cursor(Direction::PageDown);
        s.move_cursor(Direction::PageDown);
        assert_eq!(s.cursor().row, 29, "page-down clamps at the last line");
        s.move_cursor(Direction::PageUp);
        assert_eq!(s.cursor().row, 20);
        for _ in 0..5 {
            s.move_cursor(Direction::PageUp);
        }
        assert_eq!(s.cursor().row, 0, "page-up clamps at the first line");
    }

    #[test]
    fn page_motion_without_known_height_moves_one_row() {
        let mut s = session_from(&["a", "b", "c"]);
        s.move_cursor(Direction::PageDown);
        assert_eq!(s.cursor().row, 1);
    }

    #[test]
    fn cursor_column_always_within_line() {
        // Drive a mixed operation sequence and re-check the invariant after
        // every step.
        let mut s = session_from(&["alpha", "be", "gamma rays"]);
        let ops: &[&dyn Fn(&mut EditSession)] = &[
            &|s| s.move_cursor(Direction::End),
            &|s| s.move_cursor(Direction::Down),
            &|s| s.insert_char(b'!'),
            &|s| s.insert_newline(),
            &|s| s.backspace(),
            &|s| s.move_cursor(Direction::Down),
            &|s| s.delete_forward(),
            &|s| s.move_cursor(Direction::Up),
            &|s| s.move_cursor(Direction::PageDown),
            &|s| s.backspace(),
        ];
        for op in ops {
            op(&mut s);
            let c = s.cursor();
            assert!(c.row < s.document().line_count());
            assert!(c.col <= s.document().line(c.row).unwrap().len());
        }
    }

    #[test]
    fn quit_policy_follows_dirty_flag() {
        let mut s = session_from(&["x"]);
        assert_eq!(s.request_quit(), QuitDecision::Confirmed);
        s.insert_char(b'y');
        assert_eq!(s.request_quit(), QuitDecision::NeedsConfirm);
        s.mark_clean();
        assert_eq!(s.request_quit(), QuitDecision::Confirmed);
    }

    #[test]
    fn status_message_expires() {
        let mut s = EditSession::empty(None);
        s.set_status("saved", Duration::from_millis(0));
        // Zero TTL: already expired.
        assert!(s.status_line().is_none());
        s.set_status("hello", Duration::from_secs(60));
        assert_eq!(s.status_line(), Some("hello"));
    }

    #[test]
    fn replace_document_resets_cursor_and_dirty() {
        let mut s = session_from(&["abc"]);
        s.move_cursor(Direction::End);
        s.insert_char(b'!');
        s.replace_document(Document::new());
        assert_eq!(s.cursor(), Cursor::origin());
        assert!(!s.is_dirty());
        assert_eq!(s.document().line_count(), 1);
    }
}
