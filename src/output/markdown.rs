//! HTML to Markdown conversion
//!
//! Article bodies are converted with `htmd`. Tables are turned into pipe
//! tables by a pre-pass because `htmd` 0.1 has no table rule; everything else
//! (links, images, nested lists, code blocks, emphasis) is left to `htmd`.
//! Output is never hard-wrapped.

use crate::ConversionError;
use scraper::{ElementRef, Html, Selector};

/// Tags whose subtrees never contribute to the article text
const SKIPPED_TAGS: [&str; 4] = ["script", "style", "iframe", "noscript"];

/// Converts article HTML into Markdown
pub struct MarkdownConverter {
    converter: htmd::HtmlToMarkdown,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let converter = htmd::HtmlToMarkdown::builder()
            .skip_tags(SKIPPED_TAGS.to_vec())
            .build();

        Self { converter }
    }

    /// Converts an HTML fragment to Markdown
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Markdown ending in a single newline
    /// * `Err(ConversionError)` - `htmd` rejected the input
    pub fn convert(&self, html: &str) -> Result<String, ConversionError> {
        let (html, tables) = self.extract_tables(html)?;

        let mut markdown = self
            .converter
            .convert(&html)
            .map_err(|e| ConversionError::Markdown(e.to_string()))?;

        for (index, table) in tables.iter().enumerate() {
            markdown = markdown.replacen(&table_placeholder(index), table, 1);
        }

        tracing::debug!(
            "Converted {} bytes of HTML to {} bytes of Markdown ({} tables)",
            html.len(),
            markdown.len(),
            tables.len()
        );

        Ok(collapse_blank_lines(&markdown))
    }

    /// Replaces every outermost `<table>` with a placeholder paragraph
    ///
    /// Returns the rewritten HTML and the Markdown tables, in placeholder order.
    fn extract_tables(&self, html: &str) -> Result<(String, Vec<String>), ConversionError> {
        let fragment = Html::parse_fragment(html);
        let Ok(table_selector) = Selector::parse("table") else {
            return Ok((html.to_string(), Vec::new()));
        };

        let outermost: Vec<ElementRef> = fragment
            .select(&table_selector)
            .filter(|table| !has_table_ancestor(table))
            .collect();

        if outermost.is_empty() {
            return Ok((html.to_string(), Vec::new()));
        }

        // Both the haystack and the needles are serialized from the same tree
        let mut rewritten = fragment.root_element().inner_html();
        let mut tables = Vec::new();

        for table in outermost {
            let markdown = self.table_to_markdown(&table)?;
            if markdown.is_empty() {
                continue;
            }

            let placeholder = format!("<p>{}</p>", table_placeholder(tables.len()));
            rewritten = rewritten.replacen(&table.html(), &placeholder, 1);
            tables.push(markdown);
        }

        Ok((rewritten, tables))
    }

    /// Renders a table element as a pipe table
    ///
    /// The first row is the header. Cell contents are converted inline so links
    /// and images inside cells survive.
    fn table_to_markdown(&self, table: &ElementRef) -> Result<String, ConversionError> {
        let Ok(row_selector) = Selector::parse("tr") else {
            return Ok(String::new());
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in table.select(&row_selector) {
            let cells = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                .map(|cell| self.cell_to_markdown(&cell))
                .collect::<Result<Vec<_>, _>>()?;

            if !cells.is_empty() {
                rows.push(cells);
            }
        }

        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        if column_count == 0 {
            return Ok(String::new());
        }

        for row in &mut rows {
            row.resize(column_count, String::new());
        }

        let mut md = String::new();
        md.push_str(&format_row(&rows[0]));
        md.push_str(&format_row(&vec!["---".to_string(); column_count]));
        for row in &rows[1..] {
            md.push_str(&format_row(row));
        }

        Ok(md)
    }

    /// Converts one cell to single-line Markdown
    fn cell_to_markdown(&self, cell: &ElementRef) -> Result<String, ConversionError> {
        let markdown = self
            .converter
            .convert(&cell.inner_html())
            .map_err(|e| ConversionError::Markdown(e.to_string()))?;

        Ok(markdown
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|"))
    }
}

fn table_placeholder(index: usize) -> String {
    format!("SCRIBETABLE{}PLACEHOLDER", index)
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

fn has_table_ancestor(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "table")
}

/// Collapses runs of blank lines outside fenced code into a single blank line
fn collapse_blank_lines(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut in_fence = false;
    let mut blank_run = 0;

    for line in markdown.trim().lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        if !in_fence && line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        out.push_str(line);
        out.push('\n');
    }

    out
}
