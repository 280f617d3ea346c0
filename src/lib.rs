//! Column-Scribe: a documentation column archiver
//!
//! This crate crawls the articles of a documentation "column" (either by following
//! next-page links or by enumerating a navigation menu), converts every article body
//! to Markdown, and stores embedded images next to the Markdown files.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Column-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Network-level failures: timeouts, refused connections and non-2xx responses
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL the failed request was addressed to
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Http { url, .. } => url,
        }
    }
}

/// An expected element was missing from a fetched page
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Content container '{selector}' not found in {url}")]
    MissingContent { url: String, selector: String },

    #[error("Listing '{selector}' not found in {url}")]
    MissingListing { url: String, selector: String },
}

/// HTML could not be turned into Markdown
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Markdown conversion failed: {0}")]
    Markdown(String),
}

/// Filesystem failures while writing articles or assets
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid column name '{name}': must be a single directory name")]
    InvalidColumnName { name: String },
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

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Empty URL")]
    Empty,
}

/// Column index file errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to read index {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write index {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Column-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, Template};
pub use crawler::{ColumnCrawler, ColumnReport, MenuResolver, NavigationResolver, PaginationResolver};
pub use state::CrawlState;
