//! Configuration module for Autotrader-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults matching the reference run, so an empty file (or no file
//! at all) is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use autotrader_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Walking {} body types", config.axes.categories.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AxesConfig, BrowserConfig, Config, CrawlerConfig, OutputConfig, RendererKind, SearchConfig,
    SelectorConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, parse_config_with_hash};
pub use validation::validate;
