//! URL handling module for Column-Scribe
//!
//! This module resolves hrefs found on article pages, decodes percent-encoded
//! navigation links, and derives local filenames from URLs.

mod filename;
mod resolve;

// Re-export main functions
pub use filename::{asset_filename, url_basename};
pub use resolve::{decode_href, parse_start_url, resolve_href};
