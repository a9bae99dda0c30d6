//! Listing extraction
//!
//! Turns listing handles into `ListingRecord`s. Each sub-field is read on its own: a field
//! that fails is recorded as a `CrawlError` and left unset, and the record is kept with
//! whatever else could be read. No listing is ever dropped because of a bad field.

use crate::crawler::fetcher::RenderedPage;
use crate::crawler::parser::{ExtractError, FieldError, ListingFields, MarkupParser};
use crate::model::{AxisContext, CrawlError, ListingRecord, SpecKind};
use chrono::NaiveDate;

/// Records and field-level errors produced from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// One record per listing, in document order
    pub records: Vec<ListingRecord>,

    /// Field failures, each carrying the listing's axis context
    pub errors: Vec<CrawlError>,
}

/// Keeps the value of a field read, or records why it could not be read
fn capture<T>(
    result: Result<T, FieldError>,
    field: &str,
    context: &AxisContext,
    errors: &mut Vec<CrawlError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(CrawlError::field(context.clone(), field, e));
            None
        }
    }
}

/// Builds the record for one listing
///
/// Specification items are classified with `SpecKind::classify`; unclassified items are
/// dropped and a later item of the same kind replaces an earlier one.
pub fn extract_listing<L: ListingFields>(
    listing: &L,
    context: &AxisContext,
    date_collected: NaiveDate,
    errors: &mut Vec<CrawlError>,
) -> ListingRecord {
    let mut record = ListingRecord::new(&context.slot, date_collected);

    record.name = capture(listing.title(), "name", context, errors).flatten();
    record.price = capture(listing.price(), "price", context, errors).flatten();
    record.dealership = capture(listing.dealership(), "dealership", context, errors).flatten();

    if let Some(items) = capture(listing.spec_items(), "specs", context, errors) {
        for item in items {
            if let Some(kind) = SpecKind::classify(&item) {
                record.set_spec(kind, item);
            }
        }
    }

    record.seller = capture(listing.seller(), "seller", context, errors).flatten();

    record
}

/// Extracts every listing of a page
///
/// `context` identifies the page; each error additionally names the listing's position.
/// The result depends only on the arguments, so extracting the same page twice gives the
/// same records.
pub fn extract_listings<L: ListingFields>(
    listings: &[L],
    context: &AxisContext,
    date_collected: NaiveDate,
) -> PageExtraction {
    let mut extraction = PageExtraction::default();

    for (index, listing) in listings.iter().enumerate() {
        let listing_context = context.listing(index);
        let record = extract_listing(
            listing,
            &listing_context,
            date_collected,
            &mut extraction.errors,
        );
        extraction.records.push(record);
    }

    extraction
}

/// Parses a rendered page and extracts its listings
///
/// # Returns
///
/// * `Ok(PageExtraction)` - Possibly empty; an empty result means the page had no listings
/// * `Err(ExtractError)` - The page could not be split into listings at all
pub fn extract<P: MarkupParser>(
    parser: &P,
    page: &RenderedPage,
    context: &AxisContext,
    date_collected: NaiveDate,
) -> Result<PageExtraction, ExtractError> {
    let listings = parser.find_listings(&page.markup)?;
    Ok(extract_listings(&listings, context, date_collected))
}
