//! In-memory result sink
//!
//! Records accumulate here for the whole run and reach disk in a single write. The sink
//! is shared by all workers; appends take one lock per page.

use crate::model::ListingRecord;
use crate::output::tsv::write_tsv_file;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Append-only record store for one run
#[derive(Debug, Default)]
pub struct ResultSink {
    records: Mutex<Vec<ListingRecord>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    // A worker that panicked mid-run cannot leave a half-pushed batch behind, so the
    // records stay usable after poisoning.
    fn lock(&self) -> MutexGuard<'_, Vec<ListingRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends the records of one page, keeping their order
    pub fn append(&self, records: Vec<ListingRecord>) {
        self.lock().extend(records);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of everything collected so far
    pub fn snapshot(&self) -> Vec<ListingRecord> {
        self.lock().clone()
    }

    /// Writes everything collected so far to `path`
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of data rows written
    /// * `Err(HarvestError)` - The file could not be written
    pub fn write_tsv(&self, path: &Path) -> crate::Result<usize> {
        let records = self.lock();
        write_tsv_file(path, &records)?;
        Ok(records.len())
    }
}
