use serde::Deserialize;

/// Default site root, used to resolve navigation links
pub const DEFAULT_BASE_URL: &str = "https://learn.lianglianglee.com/";

/// Default page listing every column on the site
pub const DEFAULT_LISTING_URL: &str = "https://learn.lianglianglee.com/%e4%b8%93%e6%a0%8f";

/// Main configuration structure for Column-Scribe
///
/// Every section is optional; a missing file or section falls back to the
/// values that match the target site's template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
}

/// Location of the documentation site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL that navigation hrefs are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Page that lists every column (used by `discover`)
    #[serde(rename = "listing-url")]
    pub listing_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
        }
    }
}

/// Request and throttling behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Timeout applied to every GET (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Delay between articles when following next-page links (milliseconds)
    #[serde(rename = "pagination-delay-ms")]
    pub pagination_delay_ms: u64,

    /// Delay between articles when enumerating a menu (milliseconds)
    #[serde(rename = "menu-delay-ms")]
    pub menu_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            pagination_delay_ms: 2000,
            menu_delay_ms: 5000,
        }
    }
}

/// CSS selectors and marker strings describing the site's page template
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    #[serde(rename = "title-selector")]
    pub title_selector: String,

    #[serde(rename = "content-selector")]
    pub content_selector: String,

    #[serde(rename = "next-page-selector")]
    pub next_page_selector: String,

    #[serde(rename = "menu-selector")]
    pub menu_selector: String,

    #[serde(rename = "sublist-selector")]
    pub sublist_selector: String,

    #[serde(rename = "menu-item-selector")]
    pub menu_item_selector: String,

    /// Substring marking donation links in the menu
    #[serde(rename = "donation-marker")]
    pub donation_marker: String,

    /// Phrase identifying the injected banner at the top of article bodies
    #[serde(rename = "notice-phrase")]
    pub notice_phrase: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            title_selector: "h1#title".to_string(),
            content_selector: "div.book-post".to_string(),
            next_page_selector: "div#nextPage".to_string(),
            menu_selector: "div.book-menu.uncollapsible".to_string(),
            sublist_selector: "ul.uncollapsible".to_string(),
            menu_item_selector: "a.menu-item".to_string(),
            donation_marker: "捐赠".to_string(),
            notice_phrase: "因收到Google相关通知，网站将会择期关闭".to_string(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which column directories are created
    #[serde(rename = "root-dir")]
    pub root_dir: String,

    /// Directory used by single-article conversion
    #[serde(rename = "article-dir")]
    pub article_dir: String,

    /// Column index file read by `all` and written by `discover`
    #[serde(rename = "index-path")]
    pub index_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: ".".to_string(),
            article_dir: "output".to_string(),
            index_path: "course_list.txt".to_string(),
        }
    }
}
