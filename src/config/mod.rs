//! Configuration module for Forum-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use forum_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Listing pages: {}", config.pages.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    listing_uri, AggregationMode, Config, CrawlerConfig, KeywordConfig, OutputConfig, PageSpec,
    ReportFormat, SelectorConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, config_digest, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
