//! Keystroke decoding: crossterm key events to abstract commands.
//!
//! This is the policy gate for text input: only printable ASCII and tab
//! reach `InsertChar`. Everything undecodable maps to `None` and is dropped
//! by the loop.

use core_session::{Command, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Decode one key event. `None` means "ignore this key".
pub fn translate(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Save),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(c) => {
            // Shift is part of ordinary typing; any other modifier makes
            // this a chord we do not handle.
            if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
                return None;
            }
            if c == ' ' || c.is_ascii_graphic() {
                Some(Command::InsertChar(c as u8))
            } else {
                None
            }
        }
        KeyCode::Tab => Some(Command::InsertChar(b'\t')),
        KeyCode::Enter => Some(Command::InsertNewline),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Delete => Some(Command::DeleteForward),
        KeyCode::Left => Some(Command::Move(Direction::Left)),
        KeyCode::Right => Some(Command::Move(Direction::Right)),
        KeyCode::Up => Some(Command::Move(Direction::Up)),
        KeyCode::Down => Some(Command::Move(Direction::Down)),
        KeyCode::Home => Some(Command::Move(Direction::Home)),
        KeyCode::End => Some(Command::Move(Direction::End)),
        KeyCode::PageUp => Some(Command::Move(Direction::PageUp)),
        KeyCode::PageDown => Some(Command::Move(Direction::PageDown)),
        _ => None,
    }
}
