//! Tab-separated output file
//!
//! The file layout is a contract with downstream consumers: twelve fixed columns, one row
//! per listing, absent values written as empty cells, named after the run's start date.

use crate::model::ListingRecord;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column header of the data file
pub const HEADER: [&str; 12] = [
    "Name",
    "Price",
    "Year",
    "Mileage",
    "Engine",
    "Owner",
    "Dealership Name",
    "Seller",
    "Body Type",
    "Min Mileage",
    "Max Mileage",
    "Date Collected",
];

/// File name for the data collected by a run started on `date`
///
/// The extension is `.csv` even though the content is tab-separated; consumers match on
/// this exact name.
pub fn output_file_name(date: NaiveDate) -> String {
    format!("autotrader_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Full output path inside `directory`
pub fn output_path(directory: &Path, date: NaiveDate) -> PathBuf {
    directory.join(output_file_name(date))
}

fn to_row(record: &ListingRecord) -> [String; 12] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    [
        text(&record.name),
        text(&record.price),
        text(&record.year),
        text(&record.mileage),
        text(&record.engine),
        text(&record.owners),
        text(&record.dealership),
        text(&record.seller),
        record.category.clone(),
        record.bracket.min.to_string(),
        record.bracket.max.to_string(),
        record.date_collected.format("%Y-%m-%d").to_string(),
    ]
}

/// Writes the header and one row per record
pub fn write_records<W: Write>(writer: W, records: &[ListingRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(to_row(record))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `records` to `path`, creating the parent directory if needed
///
/// An existing file at `path` is replaced.
pub fn write_tsv_file(path: &Path, records: &[ListingRecord]) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_records(file, records)?;

    Ok(())
}
