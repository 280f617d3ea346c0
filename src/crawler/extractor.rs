//! Article extraction
//!
//! Locates the title and body of an article page, strips the injected notice
//! banner, and turns titles into filesystem-safe names.

use crate::config::Template;
use crate::url::url_basename;
use crate::ExtractionError;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use url::Url;

/// Name used when neither a title nor a URL basename is available
const UNTITLED: &str = "untitled";

/// How to name an article whose page has no usable title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleFallback {
    /// `article_<unix seconds>`, used while crawling a column
    Timestamp,
    /// The article URL's last path segment, used for single-article conversion
    UrlBasename,
}

impl TitleFallback {
    /// Produces the fallback name for an article at `url`
    pub fn name_for(&self, url: &Url) -> String {
        match self {
            Self::Timestamp => format!("article_{}", chrono::Utc::now().timestamp()),
            Self::UrlBasename => url_basename(url)
                .map(|name| sanitize_title(&name))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
        }
    }
}

/// Pulls titles and body containers out of article documents
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    template: Arc<Template>,
}

impl ContentExtractor {
    pub fn new(template: Arc<Template>) -> Self {
        Self { template }
    }

    /// Extracts and sanitizes the article title
    ///
    /// Returns `None` if the title element is missing or sanitizes to nothing;
    /// the caller picks a [`TitleFallback`].
    pub fn extract_title(&self, document: &Html) -> Option<String> {
        document
            .select(&self.template.title)
            .next()
            .map(|element| sanitize_title(element.text().collect::<String>().trim()))
            .filter(|title| !title.is_empty())
    }

    /// Extracts the title, falling back per `fallback` when absent
    pub fn title_or_fallback(&self, document: &Html, url: &Url, fallback: TitleFallback) -> String {
        match self.extract_title(document) {
            Some(title) => title,
            None => {
                let name = fallback.name_for(url);
                tracing::warn!("Title not found in {}, using '{}'", url, name);
                name
            }
        }
    }

    /// Locates the article body container
    ///
    /// # Returns
    ///
    /// * `Ok(ElementRef)` - The content container
    /// * `Err(ExtractionError::MissingContent)` - The page has no container; the
    ///   article cannot be processed
    pub fn extract_content<'a>(
        &self,
        document: &'a Html,
        url: &Url,
    ) -> Result<ElementRef<'a>, ExtractionError> {
        document
            .select(&self.template.content)
            .next()
            .ok_or_else(|| ExtractionError::MissingContent {
                url: url.to_string(),
                selector: self.template.source.content_selector.clone(),
            })
    }

    /// Removes the notice banner from the content container, if present
    ///
    /// Only the container's first child element is inspected. It is removed
    /// when it is a `div` with `align="center"` whose text contains the
    /// configured notice phrase. Nothing else is ever removed.
    ///
    /// Returns true if the banner was removed.
    pub fn clean(&self, document: &mut Html) -> bool {
        let banner_id = {
            let Some(content) = document.select(&self.template.content).next() else {
                return false;
            };

            let Some(first) = content.children().filter_map(ElementRef::wrap).next() else {
                tracing::debug!("Content container has no child elements");
                return false;
            };

            if !is_centered_div(&first) {
                tracing::debug!("No center-aligned div at the top of the content");
                return false;
            }

            let text: String = first.text().map(str::trim).collect();
            if !text.contains(&self.template.notice_phrase) {
                tracing::debug!("Centered first div does not contain the notice, keeping it");
                return false;
            }

            first.id()
        };

        match document.tree.get_mut(banner_id) {
            Some(mut node) => {
                node.detach();
                tracing::info!("Removed notice banner from article content");
                true
            }
            None => false,
        }
    }
}

/// Returns true for `<div align="center">`
fn is_centered_div(element: &ElementRef) -> bool {
    element.value().name() == "div"
        && element
            .value()
            .attr("align")
            .map(|align| align.trim().eq_ignore_ascii_case("center"))
            .unwrap_or(false)
}

/// Reduces a title to characters that are safe in a filename
///
/// Keeps alphanumerics (any script), whitespace, `-` and `_`; everything else,
/// including the `****` index delimiter, is dropped. Whitespace runs collapse to
/// one space and the ends are trimmed.
///
/// # Examples
///
/// ```
/// use column_scribe::crawler::sanitize_title;
///
/// assert_eq!(sanitize_title("Hello, World! / Chapter-1_"), "Hello World Chapter-1_");
/// ```
pub fn sanitize_title(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
