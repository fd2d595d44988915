//! Status line composition.
//!
//! Format: ` <name>[ (modified)]` on the left, ` Ln X, Col Y ` (1-based)
//! right-aligned, padded to the full width. The painter renders the result
//! in reverse video; this module only builds the text.

use core_session::Cursor;
use std::path::Path;

/// Label shown for a buffer with no associated file.
pub const NO_NAME: &str = "[No Name]";

/// Build the status line, exactly `width` characters wide. When the window
/// is too narrow for both segments the position gives way to the name.
pub fn compose_status(
    file_name: Option<&Path>,
    dirty: bool,
    cursor: Cursor,
    width: usize,
) -> String {
    let name = file_name
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| NO_NAME.to_string());
    let left = format!(" {}{}", name, if dirty { " (modified)" } else { "" });
    let right = format!(" Ln {}, Col {} ", cursor.row + 1, cursor.col + 1);

    let right_len = right.chars().count();
    let mut out = String::with_capacity(width);
    let mut used = 0;
    let left_budget = if right_len < width { width - right_len } else { width };
    for ch in left.chars().take(left_budget) {
        out.push(ch);
        used += 1;
    }
    if right_len < width {
        while used < left_budget {
            out.push(' ');
            used += 1;
        }
        out.push_str(&right);
    } else {
        while used < width {
            out.push(' ');
            used += 1;
        }
    }
    out
}
