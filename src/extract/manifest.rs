//! In-memory file tree produced for one document.

use std::collections::BTreeMap;

use serde::Serialize;

/// Subdirectory for per-page text.
pub const TEXT_DIR: &str = "text";
/// Subdirectory for formula Markdown.
pub const FORMULAS_DIR: &str = "formulas";
/// Subdirectory for images and their `.npy` dumps.
pub const IMAGES_DIR: &str = "images";
/// Subdirectory for table CSV and Markdown.
pub const TABLES_DIR: &str = "tables";
/// Subdirectory for the combined text.
pub const COMBINED_DIR: &str = "combined_text";

/// Mapping of `<base>/<dir>/<file>` paths to file contents.
///
/// Every path is rooted at the sanitized document name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionManifest {
    base: String,
    entries: BTreeMap<String, Vec<u8>>,
}

impl ExtractionManifest {
    /// Create an empty manifest rooted at `base`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Root directory name.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Add `<base>/<dir>/<file>`, replacing any previous content.
    pub fn insert(&mut self, dir: &str, file: &str, data: impl Into<Vec<u8>>) {
        let path = format!("{}/{}/{}", self.base, dir, file);
        self.entries.insert(path, data.into());
    }

    /// Look up a full path (`"doc/text/doc_page_1.txt"`).
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Look up a path relative to the base (`"text/doc_page_1.txt"`).
    pub fn get_relative(&self, relative: &str) -> Option<&[u8]> {
        self.get(&format!("{}/{}", self.base, relative))
    }

    /// Look up a relative path as UTF-8 text.
    pub fn text(&self, relative: &str) -> Option<&str> {
        self.get_relative(relative)
            .and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Check whether a relative path exists.
    pub fn contains_relative(&self, relative: &str) -> bool {
        self.get_relative(relative).is_some()
    }

    /// Full paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over (full path, contents).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest has no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of all file contents in bytes.
    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl IntoIterator for ExtractionManifest {
    type Item = (String, Vec<u8>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Counts gathered while extracting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    /// Pages processed
    pub pages: usize,
    /// Formula lines found
    pub formulas: usize,
    /// Images written
    pub images: usize,
    /// Tables written
    pub tables: usize,
    /// Tables whose Markdown used the plain-row fallback
    pub markdown_fallbacks: usize,
}

impl ExtractionSummary {
    /// Add another summary's counts to this one.
    pub fn absorb(&mut self, other: &ExtractionSummary) {
        self.pages += other.pages;
        self.formulas += other.formulas;
        self.images += other.images;
        self.tables += other.tables;
        self.markdown_fallbacks += other.markdown_fallbacks;
    }
}
