//! Navigation strategies
//!
//! A column's articles are discovered in one of two ways:
//! - **Pagination**: each article links to the next one inside a dedicated
//!   container; the chain ends when the link is missing.
//! - **Menu enumeration**: the column page carries a navigation menu; the
//!   last sub-list of that menu holds every article link.
//!
//! Both implement [`NavigationResolver`], which the coordinator is
//! parameterised over. Which one to use is the caller's decision.

use crate::config::{CrawlerConfig, Template};
use crate::url::{decode_href, resolve_href};
use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// What the coordinator does when a single article fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the column: later articles cannot be reached without this one
    AbortColumn,
    /// Log the failure and move on to the next article
    SkipArticle,
}

/// A strategy for discovering the articles of a column
pub trait NavigationResolver {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// True if the column's start URL is a listing page to enumerate rather
    /// than the first article
    fn requires_listing(&self) -> bool;

    /// Enumerates article URLs from the listing page at `listing_url`, in page order
    fn list_articles(
        &self,
        _listing: &Html,
        _listing_url: &Url,
    ) -> Result<Vec<Url>, ExtractionError> {
        Ok(Vec::new())
    }

    /// Finds the URL of the article following `article`, if any
    fn next_url(&self, _article: &Html) -> Option<Url> {
        None
    }

    /// How a failed article affects the rest of the column
    fn failure_policy(&self) -> FailurePolicy;

    /// Fixed pause between consecutive article requests
    fn delay(&self) -> Duration;
}

/// Follows next-page links from article to article
#[derive(Debug, Clone)]
pub struct PaginationResolver {
    template: Arc<Template>,
    base_url: Url,
    delay: Duration,
}

impl PaginationResolver {
    pub fn new(template: Arc<Template>, base_url: Url, delay: Duration) -> Self {
        Self {
            template,
            base_url,
            delay,
        }
    }

    /// Builds a resolver using the `[crawler]` pagination delay
    pub fn from_config(template: Arc<Template>, base_url: Url, config: &CrawlerConfig) -> Self {
        Self::new(
            template,
            base_url,
            Duration::from_millis(config.pagination_delay_ms),
        )
    }
}

impl NavigationResolver for PaginationResolver {
    fn name(&self) -> &'static str {
        "pagination"
    }

    fn requires_listing(&self) -> bool {
        false
    }

    /// Finds the first anchor inside the next-page container
    ///
    /// The href is percent-decoded, then resolved against the site base URL.
    /// A missing container, anchor or href ends the column.
    fn next_url(&self, article: &Html) -> Option<Url> {
        let Ok(anchor) = Selector::parse("a") else {
            return None;
        };

        let href = article
            .select(&self.template.next_page)
            .next()
            .and_then(|container| container.select(&anchor).next())
            .and_then(|link| link.value().attr("href"));

        let Some(href) = href else {
            tracing::info!("No next page found");
            return None;
        };

        let decoded = decode_href(href);
        match resolve_href(&self.base_url, &decoded) {
            Ok(url) => {
                tracing::info!("Found next page URL: {}", url);
                Some(url)
            }
            Err(e) => {
                tracing::info!("Next page link '{}' is not usable ({}), ending column", href, e);
                None
            }
        }
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::AbortColumn
    }

    fn delay(&self) -> Duration {
        self.delay
    }
}

/// Enumerates article links from the navigation menu
#[derive(Debug, Clone)]
pub struct MenuResolver {
    template: Arc<Template>,
    base_url: Url,
    delay: Duration,
}

impl MenuResolver {
    pub fn new(template: Arc<Template>, base_url: Url, delay: Duration) -> Self {
        Self {
            template,
            base_url,
            delay,
        }
    }

    /// Builds a resolver using the `[crawler]` menu delay
    pub fn from_config(template: Arc<Template>, base_url: Url, config: &CrawlerConfig) -> Self {
        Self::new(template, base_url, Duration::from_millis(config.menu_delay_ms))
    }
}

impl NavigationResolver for MenuResolver {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn requires_listing(&self) -> bool {
        true
    }

    /// Lists every menu item in the menu's last sub-list
    ///
    /// Earlier sub-lists belong to other navigation on the site template; only
    /// the last one is the column's article list. Links whose href contains the
    /// donation marker are excluded. A page without the menu or its sub-lists
    /// is a [`ExtractionError::MissingListing`].
    fn list_articles(
        &self,
        listing: &Html,
        listing_url: &Url,
    ) -> Result<Vec<Url>, ExtractionError> {
        let Some(items) = last_sublist_items(&self.template, listing) else {
            return Err(ExtractionError::MissingListing {
                url: listing_url.to_string(),
                selector: format!(
                    "{} {}",
                    self.template.source.menu_selector, self.template.source.sublist_selector
                ),
            });
        };

        let mut articles = Vec::new();
        for item in items {
            let Some(href) = item.value().attr("href") else {
                continue;
            };

            if is_donation_link(href, &self.template.donation_marker) {
                tracing::debug!("Skipping donation link {}", href);
                continue;
            }

            match resolve_href(&self.base_url, href) {
                Ok(url) => articles.push(url),
                Err(e) => tracing::warn!("Skipping menu link '{}': {}", href, e),
            }
        }

        tracing::info!("Found {} articles in the menu", articles.len());
        Ok(articles)
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::SkipArticle
    }

    fn delay(&self) -> Duration {
        self.delay
    }
}

/// Returns the menu-item anchors of the last qualifying sub-list
///
/// `None` when the menu container or its sub-lists are missing.
pub(crate) fn last_sublist_items<'a>(
    template: &Template,
    document: &'a Html,
) -> Option<Vec<ElementRef<'a>>> {
    let Some(menu) = document.select(&template.menu).next() else {
        tracing::error!("Navigation menu not found");
        return None;
    };

    let Some(sublist) = menu.select(&template.sublist).last() else {
        tracing::error!("No sub-lists found in the navigation menu");
        return None;
    };

    Some(sublist.select(&template.menu_item).collect())
}

/// True if `href` contains the donation marker, raw or percent-decoded
pub(crate) fn is_donation_link(href: &str, marker: &str) -> bool {
    href.contains(marker) || decode_href(href).contains(marker)
}
