//! HTML parser for locating listings and reading their fields
//!
//! Parsing is split in two steps so the extraction logic can run against synthetic
//! listings in tests:
//! - `MarkupParser::find_listings` turns a rendered page into listing handles, in document order
//! - `ListingFields` reads the individual sub-fields of one handle
//!
//! `HtmlParser` is the CSS-selector implementation used against real pages.

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use thiserror::Error;

/// A listing sub-field could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{element} present without its {missing}")]
    MissingChild {
        element: &'static str,
        missing: &'static str,
    },

    #[error("{0}")]
    Malformed(String),
}

/// A page could not be split into listings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("rendered page is empty")]
    EmptyDocument,

    #[error("malformed markup: {0}")]
    Malformed(String),
}

/// Accessors for the sub-fields of one listing
///
/// `Ok(None)` means the sub-element is absent, which is normal. `Err` means it is present
/// but could not be read.
pub trait ListingFields {
    fn title(&self) -> Result<Option<String>, FieldError>;
    fn price(&self) -> Result<Option<String>, FieldError>;
    fn dealership(&self) -> Result<Option<String>, FieldError>;
    /// Texts of the specification list items, in order
    fn spec_items(&self) -> Result<Vec<String>, FieldError>;
    fn seller(&self) -> Result<Option<String>, FieldError>;
}

/// Splits rendered markup into listing handles
pub trait MarkupParser {
    type Listing: ListingFields;

    /// Returns the listings of the page in document order; an empty vector means the page
    /// rendered without results
    fn find_listings(&self, markup: &str) -> Result<Vec<Self::Listing>, ExtractError>;
}

/// Compiled selectors shared by every listing handle
#[derive(Debug)]
struct ListingSelectors {
    listing: Selector,
    title_link: Selector,
    title_heading: Selector,
    price: Selector,
    dealership: Selector,
    spec_item: Selector,
    seller: Selector,
}

fn compile(name: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        name,
        selector: selector.to_string(),
    })
}

/// CSS-selector based parser for search results pages
#[derive(Debug, Clone)]
pub struct HtmlParser {
    selectors: Arc<ListingSelectors>,
}

impl HtmlParser {
    /// Compiles the configured selectors
    ///
    /// # Example
    ///
    /// ```
    /// use autotrader_harvest::config::SelectorConfig;
    /// use autotrader_harvest::crawler::{HtmlParser, ListingFields, MarkupParser};
    ///
    /// let parser = HtmlParser::new(&SelectorConfig::default()).unwrap();
    /// let html = r#"<div data-testid="trader-seller-listing">
    ///     <a data-testid="search-listing-title"><h3>Honda CB500F</h3></a>
    /// </div>"#;
    /// let listings = parser.find_listings(html).unwrap();
    /// assert_eq!(listings[0].title().unwrap(), Some("Honda CB500F".to_string()));
    /// ```
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let selectors = ListingSelectors {
            listing: compile("listing", &config.listing)?,
            title_link: compile("title-link", &config.title_link)?,
            title_heading: compile("title-heading", &config.title_heading)?,
            price: compile("price", &config.price)?,
            dealership: compile("dealership", &config.dealership)?,
            spec_item: compile("spec-item", &config.spec_item)?,
            seller: compile("seller", &config.seller)?,
        };

        Ok(Self {
            selectors: Arc::new(selectors),
        })
    }
}

impl MarkupParser for HtmlParser {
    type Listing = HtmlListing;

    fn find_listings(&self, markup: &str) -> Result<Vec<HtmlListing>, ExtractError> {
        if markup.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let document = Html::parse_document(markup);
        let listings = document
            .select(&self.selectors.listing)
            .map(|element| HtmlListing {
                fragment: Html::parse_fragment(&element.html()),
                selectors: Arc::clone(&self.selectors),
            })
            .collect();

        Ok(listings)
    }
}

/// One listing element, detached from the page it came from
pub struct HtmlListing {
    fragment: Html,
    selectors: Arc<ListingSelectors>,
}

/// Collects the text of an element, trimmed; blank text counts as absent
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

impl HtmlListing {
    fn first_text(&self, selector: &Selector) -> Option<String> {
        self.fragment.select(selector).next().and_then(element_text)
    }
}

impl ListingFields for HtmlListing {
    fn title(&self) -> Result<Option<String>, FieldError> {
        let Some(link) = self.fragment.select(&self.selectors.title_link).next() else {
            return Ok(None);
        };

        match link.select(&self.selectors.title_heading).next() {
            Some(heading) => Ok(element_text(heading)),
            None => Err(FieldError::MissingChild {
                element: "title link",
                missing: "heading",
            }),
        }
    }

    fn price(&self) -> Result<Option<String>, FieldError> {
        Ok(self.first_text(&self.selectors.price))
    }

    fn dealership(&self) -> Result<Option<String>, FieldError> {
        Ok(self.first_text(&self.selectors.dealership))
    }

    fn spec_items(&self) -> Result<Vec<String>, FieldError> {
        Ok(self
            .fragment
            .select(&self.selectors.spec_item)
            .filter_map(element_text)
            .collect())
    }

    fn seller(&self) -> Result<Option<String>, FieldError> {
        Ok(self.first_text(&self.selectors.seller))
    }
}
