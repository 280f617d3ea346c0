//! Column crawl coordinator - main crawl orchestration logic
//!
//! This module contains the article pipeline and the column loop:
//! - Fetching, extracting, cleaning, converting and localizing one article
//! - Driving the loop over a column with an injected [`NavigationResolver`]
//! - Enforcing the fixed delay between articles
//! - Guaranteeing termination through a visited set

use crate::config::Template;
use crate::crawler::extractor::{ContentExtractor, TitleFallback};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::navigation::{FailurePolicy, NavigationResolver};
use crate::output::{collect_image_sources, AssetLocalizer, ColumnLayout, MarkdownConverter};
use crate::state::CrawlState;
use crate::ScribeError;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// A column to crawl: its name (used as the directory name) and start URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub start_url: Url,
}

/// An article that could not be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedArticle {
    pub url: String,
    pub reason: String,
}

/// Result of crawling one column
#[derive(Debug, Clone)]
pub struct ColumnReport {
    pub column: String,

    /// Final state: `Done` or `Aborted`
    pub state: CrawlState,

    /// Markdown files written, in crawl order
    pub saved: Vec<PathBuf>,

    pub failed: Vec<FailedArticle>,

    /// Number of throttling pauses taken between articles
    pub delays: usize,
}

impl ColumnReport {
    fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            state: CrawlState::Start,
            saved: Vec::new(),
            failed: Vec::new(),
            delays: 0,
        }
    }

    /// Moves the report to `next`, logging illegal transitions
    fn transition(&mut self, next: CrawlState) {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                "Unexpected crawl state transition {} -> {} for column {}",
                self.state,
                next,
                self.column
            );
        }
        tracing::trace!("Column {}: {} -> {}", self.column, self.state, next);
        self.state = next;
    }
}

/// What processing a single article produced
#[derive(Debug, Clone)]
pub struct ArticleOutcome {
    pub path: PathBuf,
    pub title: String,
    pub images_localized: usize,
    pub images_unresolved: usize,

    /// The following article, when the navigation strategy paginates
    pub next_url: Option<Url>,
}

/// Fetch → extract → clean → convert → localize → save, for one article
pub struct ArticlePipeline {
    fetcher: PageFetcher,
    extractor: ContentExtractor,
    converter: MarkdownConverter,
    localizer: AssetLocalizer,
}

impl ArticlePipeline {
    pub fn new(fetcher: PageFetcher, template: Arc<Template>) -> Self {
        Self {
            localizer: AssetLocalizer::new(fetcher.clone()),
            extractor: ContentExtractor::new(template),
            converter: MarkdownConverter::new(),
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Processes the article at `url` into `layout`
    ///
    /// The next-page URL is looked up through `navigation` but only reported
    /// once the Markdown file has been written.
    ///
    /// # Returns
    ///
    /// * `Ok(ArticleOutcome)` - The article was saved
    /// * `Err(ScribeError)` - Fetch, extraction, conversion or write failed;
    ///   image failures never end up here
    pub async fn process(
        &self,
        url: &Url,
        layout: &ColumnLayout,
        fallback: TitleFallback,
        navigation: Option<&dyn NavigationResolver>,
    ) -> Result<ArticleOutcome, ScribeError> {
        let mut document = self.fetcher.fetch(url).await?;

        let title = self.extractor.title_or_fallback(&document, url, fallback);

        // Images are enumerated before the banner is removed
        let sources = collect_image_sources(self.extractor.extract_content(&document, url)?);

        self.extractor.clean(&mut document);
        let content_html = self.extractor.extract_content(&document, url)?.html();
        let markdown = self.converter.convert(&content_html)?;

        let next_url = navigation.and_then(|nav| nav.next_url(&document));
        drop(document);

        let localized = self
            .localizer
            .localize(&markdown, &sources, url, layout)
            .await;

        let path = layout.save_markdown(&title, &localized.markdown)?;

        Ok(ArticleOutcome {
            path,
            title,
            images_localized: localized.localized,
            images_unresolved: localized.unresolved.len(),
            next_url,
        })
    }
}

/// Crawls a column using an injected navigation strategy
pub struct ColumnCrawler {
    pipeline: ArticlePipeline,
    navigation: Box<dyn NavigationResolver>,
}

impl ColumnCrawler {
    pub fn new(pipeline: ArticlePipeline, navigation: Box<dyn NavigationResolver>) -> Self {
        Self {
            pipeline,
            navigation,
        }
    }

    /// Runs the crawl for `column`, writing into `layout`
    ///
    /// # Crawl Flow
    ///
    /// 1. Create the column and assets directories
    /// 2. Seed the queue: the start URL itself (pagination) or the articles
    ///    listed on the start page (menu); an unreachable listing aborts, a
    ///    listing without the article menu finishes with nothing saved
    /// 3. For each queued URL: process the article
    ///    - success: queue the next-page URL unless empty or already visited
    ///    - failure: abort or skip according to the strategy's policy
    /// 4. Pause for the strategy's delay whenever another article follows
    ///
    /// Every URL enters the visited set before it is fetched, so a next-page
    /// chain that cycles back terminates.
    pub async fn crawl(&self, column: &Column, layout: &ColumnLayout) -> ColumnReport {
        let mut report = ColumnReport::new(&column.name);

        tracing::info!(
            "Starting column '{}' from {} ({} navigation)",
            column.name,
            column.start_url,
            self.navigation.name()
        );

        if let Err(e) = layout.create() {
            tracing::error!("Cannot prepare output for column '{}': {}", column.name, e);
            report.transition(CrawlState::Aborted);
            return report;
        }

        let seed = match self.seed_queue(column).await {
            Ok(seed) => seed,
            Err(ScribeError::Extraction(e)) => {
                tracing::error!("Column '{}' has no article list: {}", column.name, e);
                report.transition(CrawlState::Done);
                return report;
            }
            Err(e) => {
                tracing::error!("Failed to fetch listing for column '{}': {}", column.name, e);
                report.transition(CrawlState::Aborted);
                return report;
            }
        };

        let mut visited: HashSet<Url> = HashSet::new();
        let mut queue: VecDeque<Url> = seed
            .into_iter()
            .filter(|url| visited.insert(url.clone()))
            .collect();

        if queue.is_empty() {
            tracing::warn!("No articles found for column '{}'", column.name);
            report.transition(CrawlState::Done);
            return report;
        }

        while let Some(url) = queue.pop_front() {
            report.transition(CrawlState::FetchingArticle);
            tracing::info!("Processing article: {}", url);

            match self
                .pipeline
                .process(
                    &url,
                    layout,
                    TitleFallback::Timestamp,
                    Some(self.navigation.as_ref()),
                )
                .await
            {
                Ok(outcome) => {
                    report.saved.push(outcome.path);

                    if let Some(next) = outcome.next_url {
                        if visited.insert(next.clone()) {
                            queue.push_back(next);
                        } else {
                            tracing::info!("Next page {} was already processed, stopping", next);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to process article {}: {}", url, e);
                    report.failed.push(FailedArticle {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });

                    if self.navigation.failure_policy() == FailurePolicy::AbortColumn {
                        report.transition(CrawlState::Aborted);
                        break;
                    }
                }
            }

            if !queue.is_empty() {
                tracing::info!("Waiting before processing next article...");
                tokio::time::sleep(self.navigation.delay()).await;
                report.delays += 1;
            }
        }

        if report.state != CrawlState::Aborted {
            report.transition(CrawlState::Done);
        }

        tracing::info!(
            "Column '{}' finished ({}): {} saved, {} failed",
            column.name,
            report.state,
            report.saved.len(),
            report.failed.len()
        );

        report
    }

    /// Initial article URLs for `column`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Url>)` - The start URL itself, or the articles listed on it
    /// * `Err(ScribeError::Fetch)` - The listing page is unreachable
    /// * `Err(ScribeError::Extraction)` - The listing page has no article menu
    async fn seed_queue(&self, column: &Column) -> Result<Vec<Url>, ScribeError> {
        if !self.navigation.requires_listing() {
            return Ok(vec![column.start_url.clone()]);
        }

        let listing = self.pipeline.fetcher().fetch(&column.start_url).await?;
        Ok(self.navigation.list_articles(&listing, &column.start_url)?)
    }
}
