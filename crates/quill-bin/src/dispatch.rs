//! Command dispatch: routes decoded commands into the session and owns the
//! two-step quit confirmation state.
//!
//! Editing and movement commands are direct pass-throughs. Save goes out
//! through `core-files` and is reported as a status message either way; the
//! dirty flag clears only on full success. A quit with unsaved changes arms
//! a pending state: the next Ctrl+Q quits anyway, Ctrl+S saves and stays,
//! and any other command disarms.

use core_files::LoadOutcome;
use core_session::{Command, EditSession, QuitDecision};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// What the event loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Dispatcher {
    message_ttl: Duration,
    pending_quit: bool,
}

impl Dispatcher {
    pub fn new(message_ttl: Duration) -> Self {
        Self {
            message_ttl,
            pending_quit: false,
        }
    }

    /// Apply one command to the session.
    pub fn execute(&mut self, session: &mut EditSession, command: Command) -> Control {
        match command {
            Command::InsertChar(byte) => {
                self.pending_quit = false;
                session.insert_char(byte);
            }
            Command::InsertNewline => {
                self.pending_quit = false;
                session.insert_newline();
            }
            Command::Backspace => {
                self.pending_quit = false;
                session.backspace();
            }
            Command::DeleteForward => {
                self.pending_quit = false;
                session.delete_forward();
            }
            Command::Move(direction) => {
                self.pending_quit = false;
                session.move_cursor(direction);
            }
            Command::Save => {
                self.pending_quit = false;
                self.save(session);
            }
            Command::Quit => return self.quit(session),
        }
        Control::Continue
    }

    fn quit(&mut self, session: &mut EditSession) -> Control {
        match session.request_quit() {
            QuitDecision::Confirmed => Control::Quit,
            QuitDecision::NeedsConfirm if self.pending_quit => {
                info!(target: "runtime", "quit_discarding_changes");
                Control::Quit
            }
            QuitDecision::NeedsConfirm => {
                self.pending_quit = true;
                session.set_status(
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save.",
                    self.message_ttl,
                );
                Control::Continue
            }
        }
    }

    fn save(&self, session: &mut EditSession) {
        let Some(path) = session.file_name().map(Path::to_path_buf) else {
            session.set_status(
                "No file name. Start quill with a path to save.",
                self.message_ttl,
            );
            return;
        };
        match core_files::save(session.document(), &path) {
            Ok(()) => {
                session.mark_clean();
                session.set_status(format!("Saved: {}", path.display()), self.message_ttl);
            }
            Err(e) => {
                warn!(target: "runtime", path = %path.display(), error = %e, "save_failed");
                session.set_status(format!("Save failed: {e}"), self.message_ttl);
            }
        }
    }
}

/// Build the initial session for an optional startup path, degrading to an
/// empty buffer when the file is missing or unreadable.
pub fn open_session(
    path: Option<std::path::PathBuf>,
    message_ttl: Duration,
) -> EditSession {
    let Some(path) = path else {
        let mut session = EditSession::empty(None);
        session.set_status("Ctrl+S save | Ctrl+Q quit", message_ttl);
        return session;
    };
    match core_files::load(&path) {
        LoadOutcome::Opened(document) => {
            let mut session = EditSession::new(document, Some(path.clone()));
            session.set_status(format!("Opened: {}", path.display()), message_ttl);
            session
        }
        LoadOutcome::NewFile => {
            let mut session = EditSession::empty(Some(path.clone()));
            session.set_status(
                format!("New file: {} (Ctrl+S to save)", path.display()),
                message_ttl,
            );
            session
        }
        LoadOutcome::Unreadable(e) => {
            let mut session = EditSession::empty(Some(path.clone()));
            session.set_status(
                format!("Cannot read {}: {e} (starting empty)", path.display()),
                message_ttl,
            );
            session
        }
    }
}
