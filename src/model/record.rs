use crate::search::{MileageBracket, SearchSlot};
use chrono::NaiveDate;

/// One advertisement as it appeared on a search results page
///
/// Every listing field is optional; only the provenance (body type, bracket and collection
/// date) is guaranteed. Values are kept verbatim; normalizing prices or mileages is left to
/// whoever consumes the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub name: Option<String>,
    pub price: Option<String>,
    pub year: Option<String>,
    pub engine: Option<String>,
    pub mileage: Option<String>,
    pub owners: Option<String>,
    pub dealership: Option<String>,
    pub seller: Option<String>,

    /// Body type the listing was found under
    pub category: String,

    /// Mileage bracket the listing was found under
    pub bracket: MileageBracket,

    /// Start date of the run that collected the listing
    pub date_collected: NaiveDate,
}

impl ListingRecord {
    /// Creates a record with only its provenance filled in
    pub fn new(slot: &SearchSlot, date_collected: NaiveDate) -> Self {
        Self {
            name: None,
            price: None,
            year: None,
            engine: None,
            mileage: None,
            owners: None,
            dealership: None,
            seller: None,
            category: slot.category.clone(),
            bracket: slot.bracket,
            date_collected,
        }
    }

    /// Returns the number of listing fields (excluding provenance) that were captured
    pub fn populated_fields(&self) -> usize {
        [
            &self.name,
            &self.price,
            &self.year,
            &self.engine,
            &self.mileage,
            &self.owners,
            &self.dealership,
            &self.seller,
        ]
        .iter()
        .filter(|field| field.is_some())
        .count()
    }
}

/// Category a specification list item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecKind {
    Year,
    Engine,
    Mileage,
    Owners,
}

impl SpecKind {
    /// Classifies one specification item by substring markers
    ///
    /// Markers are checked in priority order and the first match wins:
    /// `reg` → year, `cc` → engine, `miles` (any case) → mileage, `owner` (any case) → owners.
    /// Items matching none of them are not classified.
    ///
    /// # Examples
    ///
    /// ```
    /// use autotrader_harvest::model::SpecKind;
    ///
    /// assert_eq!(SpecKind::classify("2019 (19 reg)"), Some(SpecKind::Year));
    /// assert_eq!(SpecKind::classify("649cc"), Some(SpecKind::Engine));
    /// assert_eq!(SpecKind::classify("12,000 Miles"), Some(SpecKind::Mileage));
    /// assert_eq!(SpecKind::classify("Manual"), None);
    /// ```
    pub fn classify(text: &str) -> Option<Self> {
        if text.contains("reg") {
            return Some(Self::Year);
        }
        if text.contains("cc") {
            return Some(Self::Engine);
        }

        let lower = text.to_lowercase();
        if lower.contains("miles") {
            Some(Self::Mileage)
        } else if lower.contains("owner") {
            Some(Self::Owners)
        } else {
            None
        }
    }
}

impl ListingRecord {
    /// Stores a classified specification value; a later item of the same kind replaces
    /// an earlier one
    pub fn set_spec(&mut self, kind: SpecKind, value: String) {
        let slot = match kind {
            SpecKind::Year => &mut self.year,
            SpecKind::Engine => &mut self.engine,
            SpecKind::Mileage => &mut self.mileage,
            SpecKind::Owners => &mut self.owners,
        };
        *slot = Some(value);
    }
}
