//! Append-only error log
//!
//! Every recoverable failure is traced, kept in memory for the end-of-run report, and
//! appended to the log file. The file is opened, appended and closed per event so entries
//! already written survive a later crash.

use crate::model::CrawlError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Error log shared by all workers of a run
#[derive(Debug, Default)]
pub struct ErrorLog {
    path: Option<PathBuf>,
    entries: Mutex<Vec<CrawlError>>,
}

/// Appends one line to the file at `path`
fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

impl ErrorLog {
    /// Creates a log that also appends to the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Creates a log that only keeps entries in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CrawlError>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records one failure
    ///
    /// Failing to write the log file is traced and otherwise ignored.
    pub fn record(&self, error: CrawlError) {
        tracing::warn!("{}", error.message);

        if let Some(path) = &self.path {
            if let Err(e) = append_line(path, &error.log_line()) {
                tracing::error!("Failed to append to error log {}: {}", path.display(), e);
            }
        }

        self.lock().push(error);
    }

    /// Records several failures in order
    pub fn record_all(&self, errors: impl IntoIterator<Item = CrawlError>) {
        for error in errors {
            self.record(error);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every entry recorded so far
    pub fn entries(&self) -> Vec<CrawlError> {
        self.lock().clone()
    }
}
