//! Configuration module for the faculty finder
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ui_faculty_finder::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("finder.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SearchConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash, parse_config};
