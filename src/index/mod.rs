//! Column index: the list of columns to crawl
//!
//! The index is a plain text file with one `{column}****{first article URL}`
//! entry per line. `discover` produces it from the site listing; `all` reads it
//! and crawls each column in turn.

mod discovery;

pub use discovery::{discover_columns, first_article_url};

use crate::IndexError;
use std::fmt;
use std::path::Path;

/// Separator between column name and URL on an index line
pub const INDEX_DELIMITER: &str = "****";

/// One line of the column index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub column: String,
    pub first_article_url: String,
}

impl IndexEntry {
    pub fn new(column: impl Into<String>, first_article_url: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            first_article_url: first_article_url.into(),
        }
    }

    /// Parses a single index line
    ///
    /// Returns `None` for lines without the delimiter or with an empty side.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (column, url) = line.trim().split_once(INDEX_DELIMITER)?;
        let (column, url) = (column.trim(), url.trim());

        if column.is_empty() || url.is_empty() {
            return None;
        }

        Some(Self::new(column, url))
    }

    /// True if the entry survives a write/read cycle unchanged
    fn is_writable(&self) -> bool {
        let single_line = |s: &str| !s.contains('\n') && !s.contains('\r');
        !self.column.contains(INDEX_DELIMITER)
            && single_line(&self.column)
            && single_line(&self.first_article_url)
            && !self.column.trim().is_empty()
            && !self.first_article_url.trim().is_empty()
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.column, INDEX_DELIMITER, self.first_article_url
        )
    }
}

/// Parses index file contents, skipping blank and malformed lines
pub fn parse_index(content: &str) -> Vec<IndexEntry> {
    let mut entries = Vec::new();

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match IndexEntry::parse_line(line) {
            Some(entry) => entries.push(entry),
            None => tracing::warn!("Skipping malformed index line {}: {}", number + 1, line),
        }
    }

    entries
}

/// Reads the index file at `path`
pub fn read_index(path: &Path) -> Result<Vec<IndexEntry>, IndexError> {
    let content = std::fs::read_to_string(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_index(&content);
    tracing::info!("Loaded {} columns from {}", entries.len(), path.display());
    Ok(entries)
}

/// Writes `entries` to `path`, one per line
///
/// Entries that would not read back unchanged (a name containing the
/// delimiter or a newline) are skipped with a warning.
pub fn write_index(path: &Path, entries: &[IndexEntry]) -> Result<usize, IndexError> {
    let mut content = String::new();
    let mut written = 0;

    for entry in entries {
        if !entry.is_writable() {
            tracing::warn!("Skipping index entry that cannot be stored: {:?}", entry);
            continue;
        }
        content.push_str(&entry.to_string());
        content.push('\n');
        written += 1;
    }

    std::fs::write(path, content).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Wrote {} columns to {}", written, path.display());
    Ok(written)
}
