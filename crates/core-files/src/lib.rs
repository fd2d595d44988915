//! Document persistence: load a path into a `Document`, save a `Document`
//! back with a write-temp-then-rename protocol.
//!
//! Loading is byte-oriented: records are split on `\n` and a trailing `\r`
//! per record is stripped, so both LF and CRLF files read cleanly.
//! Terminators are never stored. Saving always writes `\n` after every line,
//! the last one included.
//!
//! A save either fully replaces the destination or leaves it untouched: all
//! bytes go to `<path>.tmp` in the same directory, the temp file is flushed
//! and synced, and only then renamed over the destination. Any failure
//! removes the temp file on the way out.

use core_buffer::{Document, Line};
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result of attempting to load a path.
#[derive(Debug)]
pub enum LoadOutcome {
    /// File read and split into lines.
    Opened(Document),
    /// The path does not exist yet; the session starts empty and the file
    /// is created on first save.
    NewFile,
    /// The path exists but could not be read (permissions, a directory,
    /// ...). The session degrades to an empty buffer.
    Unreadable(io::Error),
}

/// Load `path` into a document. Never fails hard: the non-success outcomes
/// carry enough for the caller to pick a status message.
pub fn load(path: &Path) -> LoadOutcome {
    match fs::read(path) {
        Ok(bytes) => {
            let document = parse_document(&bytes);
            debug!(
                target: "files",
                path = %path.display(),
                bytes = bytes.len(),
                lines = document.line_count(),
                "loaded"
            );
            LoadOutcome::Opened(document)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(target: "files", path = %path.display(), "new_file");
            LoadOutcome::NewFile
        }
        Err(e) => {
            warn!(target: "files", path = %path.display(), error = %e, "unreadable");
            LoadOutcome::Unreadable(e)
        }
    }
}

/// Split raw file content into lines. A trailing terminator does not
/// produce a phantom final line; an empty file yields one empty line.
fn parse_document(bytes: &[u8]) -> Document {
    let mut lines: Vec<Line> = bytes
        .split(|&b| b == b'\n')
        .map(|record| {
            let record = record.strip_suffix(b"\r").unwrap_or(record);
            Line::from_slice(record)
        })
        .collect();
    if bytes.ends_with(b"\n") {
        lines.pop();
    }
    Document::from_lines(lines)
}

/// Why a save did not happen. The destination is untouched in every case.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not create temporary file: {0}")]
    Create(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    #[error("could not replace destination: {0}")]
    Persist(#[source] io::Error),
}

/// Removes the temporary file on drop unless the rename succeeded.
struct TempGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> TempGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(self.path);
        }
    }
}

/// `<path>.tmp`, alongside the destination so the final rename stays on one
/// filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Write `document` to `path` atomically: old content or fully-written new
/// content, never a partial file.
pub fn save(document: &Document, path: &Path) -> Result<(), SaveError> {
    let tmp = temp_path(path);
    let file = File::create(&tmp).map_err(SaveError::Create)?;
    let mut guard = TempGuard::new(&tmp);

    let mut writer = BufWriter::new(file);
    for line in document.lines() {
        writer.write_all(line.as_bytes()).map_err(SaveError::Write)?;
        writer.write_all(b"\n").map_err(SaveError::Write)?;
    }
    let file = writer
        .into_inner()
        .map_err(|e| SaveError::Write(e.into_error()))?;
    file.sync_all().map_err(SaveError::Write)?;
    drop(file);

    fs::rename(&tmp, path).map_err(SaveError::Persist)?;
    guard.disarm();
    info!(
        target: "files",
        path = %path.display(),
        lines = document.line_count(),
        bytes = document.total_bytes() + document.line_count(),
        "saved"
    );
    Ok(())
}
