//! Configuration module for Column-Scribe
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and compiling the site template's selectors.
//!
//! # Example
//!
//! ```no_run
//! use column_scribe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scribe.toml")).unwrap();
//! println!("Articles are resolved against {}", config.site.base_url);
//! ```

mod parser;
mod template;
mod types;
mod validation;

// Re-export types
pub use template::Template;
pub use types::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, TemplateConfig, DEFAULT_BASE_URL,
    DEFAULT_LISTING_URL,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
