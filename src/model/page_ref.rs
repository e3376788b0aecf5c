//! Page references: (document index, page index) pairs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::SourceDocument;

/// Separator between a page key and its label in list items.
const ITEM_SEPARATOR: &str = " | ";

/// Stable key of one page: `"<doc>:<page>"`, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageKey {
    /// Index into the document list
    pub doc: usize,
    /// Zero-based page index
    pub page: usize,
}

impl PageKey {
    /// Create a key.
    pub fn new(doc: usize, page: usize) -> Self {
        Self { doc, page }
    }

    /// Parse a list item (`"0:3 | report.pdf • p4"`) or a bare key (`"0:3"`).
    pub fn from_item(item: &str) -> Result<Self> {
        let key = item.split(ITEM_SEPARATOR).next().unwrap_or(item);
        key.parse()
    }

    /// Resolve this key against a document list.
    ///
    /// Fails with [`Error::InputResolution`] when the document index or the
    /// page index is out of range.
    pub fn resolve<'a>(&self, documents: &'a [SourceDocument]) -> Result<&'a SourceDocument> {
        let document = documents.get(self.doc).ok_or_else(|| {
            Error::unresolved(
                self.to_string(),
                format!("no document at index {} ({} loaded)", self.doc, documents.len()),
            )
        })?;
        if self.page >= document.page_count {
            return Err(Error::unresolved(
                self.to_string(),
                format!(
                    "page index {} is out of range for {} ({} pages)",
                    self.page, document.label, document.page_count
                ),
            ));
        }
        Ok(document)
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.doc, self.page)
    }
}

impl FromStr for PageKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let malformed = || Error::unresolved(trimmed, "expected '<document>:<page>'");

        let (doc, page) = trimmed.split_once(':').ok_or_else(malformed)?;
        let doc = doc.trim().parse::<usize>().map_err(|_| malformed())?;
        let page = page.trim().parse::<usize>().map_err(|_| malformed())?;
        Ok(Self { doc, page })
    }
}

/// A page of a loaded document with its display label.
///
/// Derived from the document list, never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    /// Page key
    pub key: PageKey,
    /// Human label, e.g. `"report.pdf • p3"`
    pub label: String,
}

impl PageRef {
    /// Build the reference for one page of one document.
    pub fn new(doc: usize, page: usize, document: &SourceDocument) -> Self {
        Self {
            key: PageKey::new(doc, page),
            label: page_label(&document.label, page),
        }
    }

    /// Every page of every document, in document then page order.
    pub fn enumerate(documents: &[SourceDocument]) -> Vec<PageRef> {
        documents
            .iter()
            .enumerate()
            .flat_map(|(di, document)| {
                (0..document.page_count).map(move |pi| PageRef::new(di, pi, document))
            })
            .collect()
    }

    /// The pages of a single document.
    pub fn for_document(doc: usize, document: &SourceDocument) -> Vec<PageRef> {
        (0..document.page_count)
            .map(|pi| PageRef::new(doc, pi, document))
            .collect()
    }

    /// List item text: `"<key> | <label>"`.
    pub fn item(&self) -> String {
        format!("{}{}{}", self.key, ITEM_SEPARATOR, self.label)
    }
}

/// Label of a zero-based page: `"<name> • p<n>"` with `n` one-based.
pub fn page_label(name: &str, page: usize) -> String {
    format!("{} \u{2022} p{}", name, page + 1)
}
