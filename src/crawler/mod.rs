//! Crawler module for column discovery and article processing
//!
//! This module contains the core crawl-and-convert logic, including:
//! - HTTP fetching with a fixed timeout
//! - Title and content extraction, banner cleaning
//! - Pagination and menu navigation strategies
//! - The column coordinator tying them together

mod coordinator;
mod extractor;
mod fetcher;
mod navigation;

pub use coordinator::{
    ArticleOutcome, ArticlePipeline, Column, ColumnCrawler, ColumnReport, FailedArticle,
};
pub use extractor::{sanitize_title, ContentExtractor, TitleFallback};
pub use fetcher::PageFetcher;
pub use navigation::{FailurePolicy, MenuResolver, NavigationResolver, PaginationResolver};

pub(crate) use navigation::{is_donation_link, last_sublist_items};

use crate::config::{Config, Template};
use crate::output::ColumnLayout;
use crate::url::parse_start_url;
use crate::ScribeError;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Which navigation strategy to crawl a column with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMode {
    /// The start URL is the first article; follow next-page links
    #[default]
    Pagination,
    /// The start URL is a column page; enumerate its navigation menu
    Menu,
}

/// Everything needed to crawl, built once from a [`Config`]
pub struct CrawlContext {
    pub template: Arc<Template>,
    pub base_url: Url,
    pub fetcher: PageFetcher,
}

impl CrawlContext {
    /// Compiles the template and builds the HTTP client
    pub fn from_config(config: &Config) -> Result<Self, ScribeError> {
        let template = Arc::new(Template::compile(&config.template)?);
        let base_url = Url::parse(&config.site.base_url)
            .map_err(|e| crate::UrlError::Parse(format!("{}: {}", config.site.base_url, e)))?;
        let fetcher = PageFetcher::from_config(&config.crawler)?;

        Ok(Self {
            template,
            base_url,
            fetcher,
        })
    }

    /// Builds the navigation strategy for `mode`
    pub fn navigation(&self, mode: CrawlMode, config: &Config) -> Box<dyn NavigationResolver> {
        match mode {
            CrawlMode::Pagination => Box::new(PaginationResolver::from_config(
                Arc::clone(&self.template),
                self.base_url.clone(),
                &config.crawler,
            )),
            CrawlMode::Menu => Box::new(MenuResolver::from_config(
                Arc::clone(&self.template),
                self.base_url.clone(),
                &config.crawler,
            )),
        }
    }

    /// A fresh article pipeline sharing this context's client and template
    pub fn pipeline(&self) -> ArticlePipeline {
        ArticlePipeline::new(self.fetcher.clone(), Arc::clone(&self.template))
    }
}

/// Crawls one column into `{root-dir}/{name}`
///
/// This is the main entry point for a column crawl. `start` may be absolute
/// or relative to the site base URL.
///
/// # Returns
///
/// * `Ok(ColumnReport)` - The crawl ran; inspect the report for its outcome
/// * `Err(ScribeError)` - The crawl could not be set up (unusable column name,
///   bad URL, client error)
pub async fn crawl_column(
    config: &Config,
    name: &str,
    start: &str,
    mode: CrawlMode,
) -> Result<ColumnReport, ScribeError> {
    let layout = ColumnLayout::new(Path::new(&config.output.root_dir), name)?;

    let context = CrawlContext::from_config(config)?;
    let column = Column {
        name: name.to_string(),
        start_url: parse_start_url(start, &context.base_url)?,
    };

    let crawler = ColumnCrawler::new(context.pipeline(), context.navigation(mode, config));
    Ok(crawler.crawl(&column, &layout).await)
}

/// Converts a single article into `{article-dir}`
///
/// Untitled articles are named after the last segment of their URL.
pub async fn convert_article(config: &Config, url: &str) -> Result<ArticleOutcome, ScribeError> {
    let context = CrawlContext::from_config(config)?;
    let url = parse_start_url(url, &context.base_url)?;

    let layout = ColumnLayout::at(Path::new(&config.output.article_dir).to_path_buf());
    layout.create()?;

    context
        .pipeline()
        .process(&url, &layout, TitleFallback::UrlBasename, None)
        .await
}
