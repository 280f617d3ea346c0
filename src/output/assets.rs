//! Image localization
//!
//! Every image referenced by an article is downloaded into the column's
//! assets directory and its Markdown reference rewritten to a relative path.
//! Rewriting is literal string substitution of the original `src` value
//! throughout the Markdown text.

use crate::crawler::PageFetcher;
use crate::output::writer::{ColumnLayout, ASSETS_DIR_NAME};
use crate::url::{asset_filename, resolve_href};
use scraper::{ElementRef, Selector};
use url::Url;

/// Markdown after image localization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedMarkdown {
    /// Markdown with downloaded images pointing at `./assets/<file>`
    pub markdown: String,

    /// Number of images downloaded and rewritten
    pub localized: usize,

    /// `src` values left untouched because resolution or download failed
    pub unresolved: Vec<String>,
}

/// Collects the distinct `src` values of all images under `content`, in document order
///
/// This must run on the content before the notice banner is removed.
pub fn collect_image_sources(content: ElementRef) -> Vec<String> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    let mut sources: Vec<String> = Vec::new();
    for img in content.select(&selector) {
        match img.value().attr("src") {
            Some(src) if !src.trim().is_empty() => {
                if !sources.iter().any(|seen| seen == src) {
                    sources.push(src.to_string());
                }
            }
            _ => tracing::warn!("Skipping image without src"),
        }
    }

    sources
}

/// Downloads images and rewrites their Markdown references
#[derive(Debug, Clone)]
pub struct AssetLocalizer {
    fetcher: PageFetcher,
}

impl AssetLocalizer {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Localizes every image in `sources`
    ///
    /// Each `src` is resolved against the article's own URL. The image is
    /// written to the layout's assets directory before its reference is
    /// rewritten; when any step fails the reference is left as it was.
    pub async fn localize(
        &self,
        markdown: &str,
        sources: &[String],
        article_url: &Url,
        layout: &ColumnLayout,
    ) -> LocalizedMarkdown {
        let mut markdown = markdown.to_string();
        let mut localized = 0;
        let mut unresolved = Vec::new();

        for src in sources {
            match self.download(src, article_url, layout).await {
                Some(filename) => {
                    let relative = format!("./{}/{}", ASSETS_DIR_NAME, filename);
                    markdown = rewrite_reference(&markdown, src, &relative);
                    localized += 1;
                }
                None => unresolved.push(src.clone()),
            }
        }

        if !unresolved.is_empty() {
            tracing::warn!(
                "{} of {} images in {} could not be localized",
                unresolved.len(),
                sources.len(),
                article_url
            );
        }

        LocalizedMarkdown {
            markdown,
            localized,
            unresolved,
        }
    }

    /// Downloads one image; returns its local filename on success
    async fn download(&self, src: &str, article_url: &Url, layout: &ColumnLayout) -> Option<String> {
        if src.trim_start().starts_with("data:") {
            tracing::debug!("Skipping inline data image");
            return None;
        }

        let url = match resolve_href(article_url, src) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot resolve image '{}' in {}: {}", src, article_url, e);
                return None;
            }
        };

        let Some(filename) = asset_filename(&url) else {
            tracing::warn!("Image URL {} has no filename", url);
            return None;
        };

        let bytes = match self.fetcher.fetch_bytes(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to download image {}: {}", url, e);
                return None;
            }
        };

        match layout.save_asset(&filename, &bytes) {
            Ok(path) => {
                tracing::debug!("Saved image {} to {}", url, path.display());
                Some(filename)
            }
            Err(e) => {
                tracing::error!("Failed to store image {}: {}", url, e);
                None
            }
        }
    }
}

/// Replaces every occurrence of `src` in `markdown` with `relative`
///
/// The converter backslash-escapes parentheses in link destinations, so the
/// escaped spelling of `src` is rewritten too, to the equally escaped path.
fn rewrite_reference(markdown: &str, src: &str, relative: &str) -> String {
    let rewritten = markdown.replace(src, relative);

    let escaped_src = escape_parens(src);
    if escaped_src == src {
        return rewritten;
    }

    rewritten.replace(&escaped_src, &escape_parens(relative))
}

fn escape_parens(text: &str) -> String {
    text.replace('(', "\\(").replace(')', "\\)")
}
