//! Output module for writing converted articles
//!
//! This module handles:
//! - Converting article HTML to Markdown
//! - Downloading images and rewriting their references
//! - Laying out column directories and writing Markdown files
//! - Summarising crawl results

mod assets;
mod markdown;
pub mod stats;
mod writer;

pub use assets::{collect_image_sources, AssetLocalizer, LocalizedMarkdown};
pub use markdown::MarkdownConverter;
pub use stats::{print_statistics, CrawlStatistics};
pub use writer::{ColumnLayout, ASSETS_DIR_NAME};
