//! Site-wide column discovery
//!
//! The site listing page carries the same navigation menu as a column page;
//! its last sub-list links to every column. Each column page in turn lists its
//! articles inside the content container, and the first one is where a
//! pagination crawl starts.

use crate::config::Template;
use crate::crawler::{is_donation_link, last_sublist_items, CrawlContext};
use crate::index::IndexEntry;
use crate::url::resolve_href;
use scraper::{Html, Selector};
use url::Url;

/// Builds index entries for every column linked from `listing_url`
///
/// Menu items need both an `id` (the column name) and an `href`. Columns whose
/// page cannot be fetched or lists no articles are logged and left out. An
/// unreachable listing yields an empty list.
pub async fn discover_columns(context: &CrawlContext, listing_url: &Url) -> Vec<IndexEntry> {
    tracing::info!("Fetching column list from {}", listing_url);

    let columns = match context.fetcher.fetch(listing_url).await {
        Ok(listing) => column_links(&context.template, &context.base_url, &listing),
        Err(e) => {
            tracing::error!("Error occurred while fetching column list: {}", e);
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for (name, column_url) in columns {
        tracing::info!("Fetching first article URL for column: {}", column_url);

        let page = match context.fetcher.fetch(&column_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Failed to fetch column page for '{}': {}", name, e);
                continue;
            }
        };

        match first_article_url(&context.template, &context.base_url, &page) {
            Some(first) => entries.push(IndexEntry::new(name, first.to_string())),
            None => tracing::warn!("No articles found for column '{}'", name),
        }
    }

    if entries.is_empty() {
        tracing::error!("No columns found");
    } else {
        tracing::info!("Found {} columns", entries.len());
    }

    entries
}

/// (column name, column URL) pairs from the listing page's menu
fn column_links(template: &Template, base_url: &Url, listing: &Html) -> Vec<(String, Url)> {
    let Some(items) = last_sublist_items(template, listing) else {
        return Vec::new();
    };

    let mut columns = Vec::new();
    for item in items {
        let href = item.value().attr("href");
        let id = item.value().attr("id");

        match (id, href) {
            (Some(id), Some(href)) if !id.trim().is_empty() => match resolve_href(base_url, href) {
                Ok(url) => columns.push((id.trim().to_string(), url)),
                Err(e) => tracing::error!("Invalid href '{}' for column '{}': {}", href, id, e),
            },
            (_, Some(href)) => tracing::error!("Missing id for column with href: {}", href),
            (id, None) => tracing::error!("Missing href for column with id: {:?}", id),
        }
    }

    columns
}

/// Finds the first article linked from a column page
///
/// The article list is the first `ul` of the last `div` inside the content
/// container; donation links are skipped.
pub fn first_article_url(template: &Template, base_url: &Url, column_page: &Html) -> Option<Url> {
    let (Ok(div), Ok(list), Ok(anchor)) = (
        Selector::parse("div"),
        Selector::parse("ul"),
        Selector::parse("a[href]"),
    ) else {
        return None;
    };

    let content = column_page.select(&template.content).next()?;
    let last_div = content.select(&div).last()?;
    let articles = last_div.select(&list).next()?;

    articles
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !is_donation_link(href, &template.donation_marker))
        .find_map(|href| resolve_href(base_url, href).ok())
}
