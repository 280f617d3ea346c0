//! Column directory layout and Markdown persistence

use crate::PersistenceError;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the image directory inside every column directory
pub const ASSETS_DIR_NAME: &str = "assets";

/// On-disk layout of one column: `{column}/` and `{column}/assets/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl ColumnLayout {
    /// Layout for column `name` under `root`
    ///
    /// The name is used verbatim as the directory name, so it must be a single
    /// plain path component: not absolute, no `/` or `\`, and not `.` or `..`.
    ///
    /// # Returns
    ///
    /// * `Ok(ColumnLayout)` - The layout, always inside `root`
    /// * `Err(PersistenceError::InvalidColumnName)` - The name would leave `root`
    pub fn new(root: &Path, name: &str) -> Result<Self, PersistenceError> {
        if !is_valid_column_name(name) {
            return Err(PersistenceError::InvalidColumnName {
                name: name.to_string(),
            });
        }

        Ok(Self::at(root.join(name)))
    }

    /// Layout rooted at an explicit directory
    pub fn at(output_dir: PathBuf) -> Self {
        let assets_dir = output_dir.join(ASSETS_DIR_NAME);
        Self {
            output_dir,
            assets_dir,
        }
    }

    /// Creates both directories; existing directories are reused as-is
    pub fn create(&self) -> Result<(), PersistenceError> {
        for dir in [&self.output_dir, &self.assets_dir] {
            fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        tracing::info!(
            "Created directory structure at {}",
            self.output_dir.display()
        );
        Ok(())
    }

    /// Path of the Markdown file for an article titled `title`
    pub fn article_path(&self, title: &str) -> PathBuf {
        self.output_dir.join(format!("{}.md", title))
    }

    /// Writes an article, replacing any existing file with the same title
    pub fn save_markdown(&self, title: &str, markdown: &str) -> Result<PathBuf, PersistenceError> {
        let path = self.article_path(title);
        write_file(&path, markdown.as_bytes())?;
        tracing::info!("Saved article: {}", path.display());
        Ok(path)
    }

    /// Writes an image into the assets directory (last write wins)
    pub fn save_asset(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistenceError> {
        let path = self.assets_dir.join(filename);
        write_file(&path, bytes)?;
        Ok(path)
    }
}

fn is_valid_column_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !Path::new(name).is_absolute()
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    fs::write(path, bytes).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}
