//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the scribe:
//! - Building the shared HTTP client with the request timeout
//! - GET requests returning parsed documents (article, listing pages)
//! - GET requests returning raw bytes (images)
//! - Error classification into [`FetchError`]
//!
//! There are no retries at this layer; callers decide whether a failure aborts
//! an article or a whole column.

use crate::config::CrawlerConfig;
use crate::FetchError;
use reqwest::{Client, Response};
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Fetches pages and assets with a bounded timeout
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher whose requests time out after `timeout`
    ///
    /// No custom headers are configured beyond the client defaults.
    ///
    /// # Returns
    ///
    /// * `Ok(PageFetcher)` - Successfully built HTTP client
    /// * `Err(reqwest::Error)` - Failed to build client (TLS backend unavailable)
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Builds a fetcher from the `[crawler]` config section
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Self::new(Duration::from_secs(config.request_timeout_secs))
    }

    /// Fetches `url` and parses the body as an HTML document
    ///
    /// # Returns
    ///
    /// * `Ok(Html)` - The parsed document
    /// * `Err(FetchError)` - Timeout, connection failure, or non-2xx status
    pub async fn fetch(&self, url: &Url) -> Result<Html, FetchError> {
        let response = self.get(url).await?;

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());

        Ok(Html::parse_document(&body))
    }

    /// Fetches `url` and returns the raw response body
    ///
    /// Uses the same timeout and failure policy as [`PageFetcher::fetch`].
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        Ok(bytes.to_vec())
    }

    /// Sends a GET and rejects non-success statuses
    async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
