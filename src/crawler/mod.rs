//! Crawler module for rendering search pages and harvesting listings
//!
//! This module contains the core harvesting logic, including:
//! - Page rendering through WebDriver or plain HTTP
//! - HTML parsing and per-field listing extraction
//! - The pagination walker and request pacing
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod http;
mod pacing;
mod parser;
mod walker;
mod webdriver;

pub use coordinator::{run_harvest, HarvestReport, Harvester};
pub use extractor::{extract, extract_listing, extract_listings, PageExtraction};
pub use fetcher::{FetchResult, PageRenderer, RenderedPage, SessionFactory};
pub use http::{build_http_client, HttpRenderer, HttpSessions};
pub use pacing::Pacer;
pub use parser::{ExtractError, FieldError, HtmlListing, HtmlParser, ListingFields, MarkupParser};
pub use walker::{CategoryQueue, WalkPlan, Walker};
pub use webdriver::{session_capabilities, WebDriverRenderer, WebDriverSessions};
