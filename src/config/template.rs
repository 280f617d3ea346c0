use crate::config::types::TemplateConfig;
use crate::{ConfigError, ConfigResult};
use scraper::Selector;

/// The site template with every selector compiled once
///
/// Built from a [`TemplateConfig`]; components receive a shared reference
/// instead of re-parsing selector strings per page.
#[derive(Debug, Clone)]
pub struct Template {
    /// Article title heading
    pub title: Selector,

    /// Article body container
    pub content: Selector,

    /// Container holding the next-page anchor
    pub next_page: Selector,

    /// Navigation menu container
    pub menu: Selector,

    /// Sub-lists inside the menu; only the last one is used
    pub sublist: Selector,

    /// Article anchors inside a sub-list
    pub menu_item: Selector,

    pub donation_marker: String,
    pub notice_phrase: String,

    /// The selector strings this template was compiled from
    pub source: TemplateConfig,
}

impl Template {
    /// Compiles every selector in `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Template)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed to parse
    pub fn compile(config: &TemplateConfig) -> ConfigResult<Self> {
        Ok(Self {
            title: compile_selector(&config.title_selector)?,
            content: compile_selector(&config.content_selector)?,
            next_page: compile_selector(&config.next_page_selector)?,
            menu: compile_selector(&config.menu_selector)?,
            sublist: compile_selector(&config.sublist_selector)?,
            menu_item: compile_selector(&config.menu_item_selector)?,
            donation_marker: config.donation_marker.clone(),
            notice_phrase: config.notice_phrase.clone(),
            source: config.clone(),
        })
    }

    /// Template matching the default site layout
    pub fn site_default() -> ConfigResult<Self> {
        Self::compile(&TemplateConfig::default())
    }
}

/// Parses a single CSS selector, mapping failures to a config error
pub(crate) fn compile_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
