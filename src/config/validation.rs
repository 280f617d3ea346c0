use crate::config::template::compile_selector;
use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, TemplateConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the per-request timeout (seconds)
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_template_config(&config.template)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site URLs
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("listing-url", &config.listing_url)?;
    Ok(())
}

/// Validates request and delay settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 || config.request_timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates that every selector compiles and marker strings are present
fn validate_template_config(config: &TemplateConfig) -> Result<(), ConfigError> {
    for selector in [
        &config.title_selector,
        &config.content_selector,
        &config.next_page_selector,
        &config.menu_selector,
        &config.sublist_selector,
        &config.menu_item_selector,
    ] {
        compile_selector(selector)?;
    }

    if config.donation_marker.is_empty() {
        // An empty marker would exclude every menu link
        return Err(ConfigError::Validation(
            "donation-marker cannot be empty".to_string(),
        ));
    }

    if config.notice_phrase.is_empty() {
        return Err(ConfigError::Validation(
            "notice-phrase cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output locations
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root_dir.is_empty() {
        return Err(ConfigError::Validation("root-dir cannot be empty".to_string()));
    }

    if config.article_dir.is_empty() {
        return Err(ConfigError::Validation(
            "article-dir cannot be empty".to_string(),
        ));
    }

    if config.index_path.is_empty() {
        return Err(ConfigError::Validation(
            "index-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that `value` parses as an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
