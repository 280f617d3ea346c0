//! State module for tracking column crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the lifecycle of a single column crawl (start, fetching, done, aborted)

mod crawl_state;

// Re-export main types
pub use crawl_state::CrawlState;
