//! Run statistics and the end-of-run summary
//!
//! Each worker keeps its own `RunStats` while walking; the coordinator merges them once the
//! walk is over and prints the summary.

use crate::model::{DealershipLabel, ListingRecord};
use crate::state::{AbandonReason, PageOutcome};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

/// Traversal counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Page requests issued
    pub pages_requested: u64,

    /// Pages that yielded at least one listing
    pub pages_with_listings: u64,

    /// Pages that rendered without listings
    pub pages_empty: u64,

    /// Pages whose results never rendered
    pub pages_timed_out: u64,

    /// Pages that failed to fetch or parse
    pub pages_failed: u64,

    /// Records extracted, across all pages
    pub records: u64,

    /// Brackets left, by reason
    pub brackets_abandoned: HashMap<AbandonReason, u64>,
}

impl RunStats {
    /// Counts one page request and its outcome
    pub fn record_page(&mut self, outcome: PageOutcome) {
        self.pages_requested += 1;
        match outcome {
            PageOutcome::Listings(count) => {
                self.pages_with_listings += 1;
                self.records += count as u64;
            }
            PageOutcome::Empty => self.pages_empty += 1,
            PageOutcome::Timeout => self.pages_timed_out += 1,
            PageOutcome::Failed => self.pages_failed += 1,
        }
    }

    pub fn record_abandon(&mut self, reason: AbandonReason) {
        *self.brackets_abandoned.entry(reason).or_insert(0) += 1;
    }

    /// Total number of brackets walked to their end
    pub fn brackets_walked(&self) -> u64 {
        self.brackets_abandoned.values().sum()
    }

    /// Adds another worker's counters to these
    pub fn merge(&mut self, other: &RunStats) {
        self.pages_requested += other.pages_requested;
        self.pages_with_listings += other.pages_with_listings;
        self.pages_empty += other.pages_empty;
        self.pages_timed_out += other.pages_timed_out;
        self.pages_failed += other.pages_failed;
        self.records += other.records;
        for (reason, count) in &other.brackets_abandoned {
            *self.brackets_abandoned.entry(*reason).or_insert(0) += count;
        }
    }
}

/// Number of distinct dealerships among `records`
///
/// Dealership labels are compared by name only, so the same dealer advertising a different
/// stock count on two pages is counted once.
pub fn distinct_dealerships(records: &[ListingRecord]) -> usize {
    records
        .iter()
        .filter_map(|record| record.dealership.as_deref())
        .map(|label| DealershipLabel::parse(label).name)
        .filter(|name| !name.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: RunStats,

    /// Data rows in the output file
    pub records_written: usize,

    /// Entries added to the error log
    pub errors: usize,

    pub dealerships: usize,

    pub output_path: PathBuf,

    pub elapsed: Duration,

    /// True when the walk was cut short by Ctrl-C
    pub interrupted: bool,
}

/// Prints the run summary to stdout
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    let stats = &summary.stats;

    println!("=== Harvest Summary ===\n");

    if summary.interrupted {
        println!("Run was interrupted; partial results were written.\n");
    }

    println!("Output:");
    println!("  File: {}", summary.output_path.display());
    println!("  Records written: {}", summary.records_written);
    println!("  Distinct dealerships: {}", summary.dealerships);
    println!("  Errors logged: {}", summary.errors);
    println!();

    println!("Pages:");
    println!("  Requested: {}", stats.pages_requested);
    println!("  With listings: {}", stats.pages_with_listings);
    println!("  Empty: {}", stats.pages_empty);
    println!("  Timed out: {}", stats.pages_timed_out);
    println!("  Failed: {}", stats.pages_failed);
    println!();

    if !stats.brackets_abandoned.is_empty() {
        println!("Brackets Finished ({}):", stats.brackets_walked());
        let mut reasons: Vec<_> = stats.brackets_abandoned.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1));

        for (reason, count) in reasons {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    let seconds = summary.elapsed.as_secs_f64();
    let rate = if seconds > 0.0 {
        stats.pages_requested as f64 / seconds
    } else {
        0.0
    };
    println!("Elapsed: {:.1}s ({:.2} pages/sec)", seconds, rate);
}
