//! Autotrader-Harvest: a bounded listing harvester
//!
//! This crate walks a fixed search space (body type × mileage bracket × page) on a
//! marketplace site, renders each results page through a browser session, extracts listing
//! records from the markup and writes them to a tab-separated file for downstream analysis.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod search;
pub mod state;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser session error: {0}")]
    Session(#[from] SessionError),

    #[error("Failed to write output: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker {worker} stopped unexpectedly: {message}")]
    Worker { worker: usize, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for {name}: {selector}")]
    InvalidSelector { name: &'static str, selector: String },
}

/// Raised when a page renderer cannot be started
///
/// This is the only failure that aborts a whole run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to connect to WebDriver at {endpoint}: {message}")]
    WebDriver { endpoint: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{CrawlError, ListingRecord};
pub use search::{AxisSpace, MileageBracket};
pub use state::WalkState;
