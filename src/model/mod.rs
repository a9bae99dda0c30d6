//! Data produced by a run
//!
//! - `ListingRecord`: one advertisement snapshot plus the search provenance that found it
//! - `SpecKind`: classification of specification list items
//! - `CrawlError` / `AxisContext`: recoverable failures and where they happened
//! - `DealershipLabel`: the dealership name and advertised stock count folded into one label

mod dealership;
mod error;
mod record;

pub use dealership::DealershipLabel;
pub use error::{AxisContext, CrawlError};
pub use record::{ListingRecord, SpecKind};
