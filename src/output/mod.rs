//! Output module for the durable artifacts of a run
//!
//! This module handles:
//! - Collecting listing records in memory (`ResultSink`)
//! - Writing them as a tab-separated file
//! - Appending recoverable failures to the error log
//! - Counting traversal outcomes for the end-of-run summary

mod error_log;
mod sink;
pub mod stats;
pub mod tsv;

pub use error_log::ErrorLog;
pub use sink::ResultSink;
pub use stats::{distinct_dealerships, print_summary, RunStats, RunSummary};
pub use tsv::{output_file_name, output_path, write_records, HEADER};
