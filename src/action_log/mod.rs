//! Append-only action log.
//!
//! A [`FileLog`] records what a command did to remote entities so that a
//! later run can audit or undo it. Entries are buffered in memory and
//! appended to the backing file on [`FileLog::flush`] or [`FileLog::close`].
//! A hard crash before either loses the unflushed tail; the log is an audit
//! trail, not a write-ahead log.
//!
//! # File Format
//!
//! Plain text, one entry per line (see [`entry`]):
//! ```text
//! // item move 2024-06-01T10:00:00+00:00
//! CREATE 5f1c...
//! MOVED 0a9e...
//! // Failed to archive 77b2...: API error (409): version mismatch
//! ```
//!
//! A final line without a terminating newline is the mark of an interrupted
//! write and is ignored on load.

pub mod entry;

pub use entry::{ActionKind, LogEntry};

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// An action log bound to at most one file, owned by a single command run.
#[derive(Debug)]
pub struct FileLog {
    path: Option<PathBuf>,
    title: Option<String>,
    entries: Vec<LogEntry>,
    /// Number of leading entries already on disk.
    flushed: usize,
    header_written: bool,
    /// Length of the complete lines of a loaded file that ended mid-line.
    torn_tail_at: Option<u64>,
    closed: bool,
}

impl FileLog {
    /// Start a fresh log that will be written to `path`.
    ///
    /// Nothing touches the filesystem until the first flush. The title is
    /// written as a leading comment line.
    pub fn create(path: impl Into<PathBuf>, title: &str) -> Self {
        Self {
            path: Some(path.into()),
            title: Some(title.to_string()),
            entries: Vec::new(),
            flushed: 0,
            header_written: false,
            torn_tail_at: None,
            closed: false,
        }
    }

    /// A log with no backing file. Entries are still kept in memory.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            path: None,
            title: None,
            entries: Vec::new(),
            flushed: 0,
            header_written: true,
            torn_tail_at: None,
            closed: false,
        }
    }

    /// Parse an existing log file.
    ///
    /// Entries added afterwards are appended to the same file on close. A
    /// torn final line is ignored here and cut off before the first append,
    /// so new entries always start on a fresh line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogNotFound`] if the file does not exist or cannot be
    /// opened, and [`Error::Io`] if it cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::IsADirectory => {
                Error::LogNotFound {
                    path: path.to_path_buf(),
                }
            }
            _ => Error::Io(e),
        })?;

        let complete_len = content
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let (complete, tail) = content.split_at(complete_len);

        let torn_tail_at = if tail.is_empty() {
            None
        } else {
            warn!(
                path = %path.display(),
                line = %String::from_utf8_lossy(tail),
                "Ignoring incomplete trailing line in action log"
            );
            Some(complete_len as u64)
        };

        let mut entries = Vec::new();
        for (number, raw) in complete.split(|&b| b == b'\n').enumerate() {
            match std::str::from_utf8(raw) {
                Ok(line) => entries.extend(LogEntry::from_line(line)),
                Err(e) => warn!(
                    path = %path.display(),
                    line = number + 1,
                    error = %e,
                    "Skipping undecodable action log line"
                ),
            }
        }
        debug!(path = %path.display(), count = entries.len(), "Loaded action log");

        Ok(Self {
            path: Some(path.to_path_buf()),
            title: None,
            flushed: entries.len(),
            entries,
            header_written: true,
            torn_tail_at,
            closed: false,
        })
    }

    /// Record an action. Never fails.
    pub fn add_action(&mut self, kind: ActionKind, payload: &str) {
        debug!(%kind, payload, "Action logged");
        self.entries.push(LogEntry::new(kind, payload));
    }

    /// Record a free-text annotation. Never fails.
    pub fn add_comment(&mut self, text: &str) {
        debug!(text, "Comment logged");
        self.entries.push(LogEntry::comment(text));
    }

    /// Payloads of every entry of `kind`, in the order they were appended.
    #[must_use]
    pub fn get_data(&self, kind: &ActionKind) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| &e.kind == kind)
            .map(|e| e.payload.as_str())
            .collect()
    }

    /// All comment texts, in order.
    #[must_use]
    pub fn comments(&self) -> Vec<&str> {
        self.get_data(&ActionKind::Comment)
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append every entry not yet on disk to the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created or written.
    /// Unwritten entries stay buffered and are retried on the next flush.
    pub fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let Some(path) = self.path.clone() else {
            self.flushed = self.entries.len();
            return Ok(());
        };
        if self.flushed == self.entries.len() && self.header_written {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if let Some(len) = self.torn_tail_at {
            OpenOptions::new().write(true).open(&path)?.set_len(len)?;
            self.torn_tail_at = None;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);

        if !self.header_written {
            if let Some(title) = &self.title {
                writeln!(writer, "{}", LogEntry::comment(title).to_line())?;
            }
        }
        for entry in &self.entries[self.flushed..] {
            writeln!(writer, "{}", entry.to_line())?;
        }
        writer.flush()?;

        self.header_written = true;
        self.flushed = self.entries.len();
        Ok(())
    }

    /// Flush and close. Later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns the flush error, after reporting it as a warning. The log is
    /// considered closed either way.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.flush();
        self.closed = true;

        if let Err(ref e) = result {
            let path = self
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            warn!(path, error = %e, "Failed to write action log");
        }
        result
    }
}

impl Drop for FileLog {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_preserves_order_per_kind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("move.log");

        let mut log = FileLog::create(&path, "item move");
        log.add_action(ActionKind::Create, "dst-1");
        log.add_action(ActionKind::Moved, "src-1");
        log.add_comment("Failed to archive src-2: boom");
        log.add_action(ActionKind::Create, "dst-3");
        log.add_action(ActionKind::Moved, "src-3");
        log.close().unwrap();

        let loaded = FileLog::load_from_file(&path).unwrap();
        assert_eq!(loaded.get_data(&ActionKind::Moved), vec!["src-1", "src-3"]);
        assert_eq!(loaded.get_data(&ActionKind::Create), vec!["dst-1", "dst-3"]);
        assert_eq!(
            loaded.comments(),
            vec!["item move", "Failed to archive src-2: boom"]
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = FileLog::load_from_file(Path::new("/nonexistent/move.log"));
        assert!(matches!(result, Err(Error::LogNotFound { .. })));
    }

    #[test]
    fn test_incomplete_trailing_line_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");
        fs::write(&path, "// item move\nMOVED a\nMOVED b\nMOV").unwrap();

        let log = FileLog::load_from_file(&path).unwrap();
        assert_eq!(log.get_data(&ActionKind::Moved), vec!["a", "b"]);
        assert!(log.get_data(&ActionKind::Other("MOV".to_string())).is_empty());
    }

    #[test]
    fn test_torn_utf8_tail_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");
        fs::write(&path, b"MOVED a\n// Failed to copy x (\xC3").unwrap();

        let log = FileLog::load_from_file(&path).unwrap();
        assert_eq!(log.get_data(&ActionKind::Moved), vec!["a"]);
        assert!(log.comments().is_empty());
    }

    #[test]
    fn test_undecodable_complete_line_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");
        fs::write(&path, b"MOVED a\n// bad \xFF\xFE\nMOVED b\n").unwrap();

        let log = FileLog::load_from_file(&path).unwrap();
        assert_eq!(log.get_data(&ActionKind::Moved), vec!["a", "b"]);
    }

    #[test]
    fn test_append_after_torn_tail_starts_clean_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");
        fs::write(&path, "MOVED a\nMOV").unwrap();

        let mut log = FileLog::load_from_file(&path).unwrap();
        log.add_action(ActionKind::Moved, "b");
        log.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "MOVED a\nMOVED b\n");
        let reloaded = FileLog::load_from_file(&path).unwrap();
        assert_eq!(reloaded.get_data(&ActionKind::Moved), vec!["a", "b"]);
    }

    #[test]
    fn test_other_kind_with_space_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");
        let kind = ActionKind::Other("PUBLISH ITEM".to_string());

        let mut log = FileLog::create(&path, "item move");
        log.add_action(kind.clone(), "x");
        log.close().unwrap();

        let loaded = FileLog::load_from_file(&path).unwrap();
        assert_eq!(loaded.get_data(&kind), vec!["x"]);
    }

    #[test]
    fn test_unknown_kinds_survive_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");
        fs::write(&path, "PUBLISH x\nMOVED a\n").unwrap();

        let mut log = FileLog::load_from_file(&path).unwrap();
        log.add_action(ActionKind::Moved, "b");
        log.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "PUBLISH x\nMOVED a\nMOVED b\n");
    }

    #[test]
    fn test_close_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");

        let mut log = FileLog::create(&path, "item move");
        log.add_action(ActionKind::Moved, "a");
        log.close().unwrap();
        log.close().unwrap();
        assert!(log.is_closed());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "// item move\nMOVED a\n");
    }

    #[test]
    fn test_flush_then_close_writes_each_entry_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");

        let mut log = FileLog::create(&path, "item move");
        log.add_action(ActionKind::Create, "a");
        log.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "// item move\nCREATE a\n");

        log.add_action(ActionKind::Create, "b");
        log.close().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "// item move\nCREATE a\nCREATE b\n"
        );
    }

    #[test]
    fn test_drop_persists_unclosed_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("move.log");

        {
            let mut log = FileLog::create(&path, "item move");
            log.add_action(ActionKind::Moved, "a");
        }

        let log = FileLog::load_from_file(&path).unwrap();
        assert_eq!(log.get_data(&ActionKind::Moved), vec!["a"]);
    }

    #[test]
    fn test_disabled_log_keeps_entries_in_memory() {
        let mut log = FileLog::disabled();
        log.add_action(ActionKind::Moved, "a");
        log.close().unwrap();

        assert!(log.path().is_none());
        assert_eq!(log.get_data(&ActionKind::Moved), vec!["a"]);
    }
}
